//! Startup movement hints.
//!
//! Four key glyphs (W, A, S, D) fade in around the player when the game
//! starts and pulse gently until the player first moves. They then fade out
//! and are gone for good; the hints never come back within a session.

use bevy::prelude::*;

use crate::constants::{HINT_DISTANCE, HINT_FADE_IN_SECONDS, HINT_FADE_OUT_SECONDS};
use crate::layout::MapLayout;
use crate::player::{Player, PlayerActivity};
use crate::tween::{Ease, Fade, GlowPulse, Opacity};

/// Dimmest point of the idle hint pulse.
const HINT_PULSE_LOW: f32 = 0.5;
/// Brightest point of the idle hint pulse.
const HINT_PULSE_HIGH: f32 = 1.0;
/// Hint pulse period in seconds.
const HINT_PULSE_PERIOD: f32 = 1.5;
/// Opacity below which a dismissed glyph is despawned.
const HINT_GONE_THRESHOLD: f32 = 0.01;

/// One key glyph floating near the player.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HintGlyph {
    /// Key label the glyph shows.
    pub label: char,
    /// Offset from the player centre in unscaled pixels.
    pub offset: Vec2,
}

/// The four glyphs and their placement around the player.
const GLYPHS: [(char, Vec2); 4] = [
    ('W', Vec2::new(0.0, HINT_DISTANCE)),
    ('S', Vec2::new(0.0, -HINT_DISTANCE)),
    ('A', Vec2::new(-HINT_DISTANCE, 0.0)),
    ('D', Vec2::new(HINT_DISTANCE, 0.0)),
];

/// Lifecycle of the hint display.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HintState {
    /// Glyphs visible, waiting for the first move.
    #[default]
    Showing,
    /// The player moved; glyphs are fading out or gone.
    Dismissed,
}

/// Spawns the glyphs around the player's start position, fading in.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn spawn_hints(mut commands: Commands, layout: Res<MapLayout>) {
    let start = crate::player::start_position(&layout);
    for (label, offset) in GLYPHS {
        let at = start + offset * layout.scale;
        let mut glyph = commands.spawn((
            HintGlyph { label, offset },
            Transform::from_translation(at.extend(5.0)),
            Opacity(0.0),
            Fade::new(0.0, 1.0, HINT_FADE_IN_SECONDS, Ease::QuadOut),
            GlowPulse::new(HINT_PULSE_LOW, HINT_PULSE_HIGH, HINT_PULSE_PERIOD),
        ));
        glyph.insert(Name::new(format!("hint {label}")));
        #[cfg(feature = "render")]
        glyph.insert((
            bevy::text::Text2d::new(label.to_string()),
            bevy::text::TextColor(Color::srgb(0.9, 0.9, 0.9)),
        ));
    }
}

/// Keeps the glyphs positioned around the player as it moves.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn follow_player(
    layout: Res<MapLayout>,
    players: Query<&Transform, (With<Player>, Without<HintGlyph>)>,
    mut glyphs: Query<(&HintGlyph, &mut Transform), Without<Player>>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let centre = player.translation.truncate();
    for (glyph, mut transform) in &mut glyphs {
        let at = centre + glyph.offset * layout.scale;
        transform.translation.x = at.x;
        transform.translation.y = at.y;
    }
}

/// Fades the glyphs out once the player first moves.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn dismiss_on_first_move(
    mut commands: Commands,
    activity: Res<PlayerActivity>,
    mut state: ResMut<HintState>,
    glyphs: Query<(Entity, &Opacity), With<HintGlyph>>,
) {
    if *state == HintState::Dismissed || !activity.has_moved {
        return;
    }
    *state = HintState::Dismissed;
    log::debug!("dismissing movement hints");
    for (entity, opacity) in &glyphs {
        commands
            .entity(entity)
            .remove::<GlowPulse>()
            .insert(Fade::new(
                opacity.0,
                0.0,
                HINT_FADE_OUT_SECONDS,
                Ease::QuadOut,
            ));
    }
}

/// Removes dismissed glyphs once their fade has completed.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn sweep_dismissed(
    mut commands: Commands,
    state: Res<HintState>,
    glyphs: Query<(Entity, &Opacity), (With<HintGlyph>, Without<Fade>)>,
) {
    if *state != HintState::Dismissed {
        return;
    }
    for (entity, opacity) in &glyphs {
        if opacity.0 <= HINT_GONE_THRESHOLD {
            commands.entity(entity).despawn();
        }
    }
}

/// Plugin owning the startup hint glyphs.
#[derive(Debug, Default)]
pub struct HintsPlugin;

impl Plugin for HintsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HintState>();
        app.add_systems(Startup, spawn_hints);
        app.add_systems(Update, (follow_player, dismiss_on_first_move, sweep_dismissed));
    }
}
