//! Content orbs revealed inside a section.
//!
//! Each catalog entry becomes one orb, laid out on a centred grid inside the
//! section's inner bounds. Walking onto a ready orb engages it: the orb pops,
//! an activation is broadcast, and the overlay takes over. When the overlay
//! closes the orb dims and recovers for a while before it can be engaged
//! again, so closing the overlay does not immediately reopen it.

use bevy::prelude::*;

use crate::constants::{
    ORBS_PER_ROW, ORB_AREA_HEIGHT_FRACTION, ORB_AREA_WIDTH_FRACTION, ORB_COOLDOWN_OPACITY,
    ORB_COOLDOWN_SECONDS, ORB_GRID_DROP, ORB_IDLE_OPACITY, ORB_OVERLAP_RADIUS, ORB_REARM_SECONDS,
};
use crate::content::{Catalog, SectionKind};
use crate::layout::MapLayout;
use crate::overlay::OverlayState;
use crate::player::Player;
use crate::sections::{section_def, SectionHidden, SectionRevealed};
use crate::tween::{Bob, Ease, Fade, Opacity, ScalePulse};

/// Orb bob amplitude in unscaled pixels.
const ORB_BOB_AMPLITUDE: f32 = 2.0;
/// Orb bob period in seconds.
const ORB_BOB_PERIOD: f32 = 1.5;
/// Orb sprite edge length in unscaled pixels.
const ORB_SIZE: f32 = 28.0;
/// Peak of the scale pop when an orb engages.
const ORB_POP_SCALE: f32 = 1.3;
/// Duration of the engage pop, in seconds.
const ORB_POP_SECONDS: f32 = 0.2;
/// Duration of the dim and restore fades, in seconds.
const ORB_FADE_SECONDS: f32 = 0.2;

/// One interactive orb bound to a catalog entry.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orb {
    /// Section the orb belongs to.
    pub kind: SectionKind,
    /// Index of the entry in the section's catalog list.
    pub index: usize,
}

/// Interaction lifecycle of an orb.
#[derive(Component, Debug, Default)]
pub enum OrbPhase {
    /// Idle and waiting for the player to step on it.
    #[default]
    Ready,
    /// Engaged; the overlay is showing its entry.
    Engaged,
    /// Released and recovering before it can be engaged again.
    Recovering {
        /// Short guard before overlap testing resumes.
        rearm: Timer,
        /// Longer dim period before the orb looks ready again.
        cooldown: Timer,
    },
}

impl OrbPhase {
    /// Phase entered when the overlay closes.
    #[must_use]
    pub fn recovering() -> Self {
        Self::Recovering {
            rearm: Timer::from_seconds(ORB_REARM_SECONDS, TimerMode::Once),
            cooldown: Timer::from_seconds(ORB_COOLDOWN_SECONDS, TimerMode::Once),
        }
    }
}

/// The player stepped onto a ready orb.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbActivated {
    /// The orb entity that was engaged.
    pub orb: Entity,
    /// Section the orb belongs to.
    pub kind: SectionKind,
    /// Catalog index of the orb's entry.
    pub index: usize,
}

/// The overlay closed and released its orb.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbReleased {
    /// The orb entity to put into recovery.
    pub orb: Entity,
}

/// World positions for `count` orbs inside a section's grid area.
///
/// The grid fills a band sized as fractions of the inner bounds, dropped a
/// fixed distance below the inner bounds' top edge. Full rows hold
/// [`ORBS_PER_ROW`] orbs; a final partial row is centred.
#[must_use]
pub fn orb_grid_positions(layout: &MapLayout, kind: SectionKind, count: usize) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    let def = section_def(kind);
    let ts = layout.tile_size();
    let span = def.inner.max - def.inner.min;
    let area = Vec2::new(
        span.x * ts * ORB_AREA_WIDTH_FRACTION,
        span.y * ts * ORB_AREA_HEIGHT_FRACTION,
    );
    let centre_x = layout
        .tile_to_world((def.inner.min + def.inner.max) * 0.5)
        .x;
    // Dropped from the inner area's top edge so every orb stays inside the
    // bounds that keep the section revealed while the player stands on it.
    let top_y = layout.tile_to_world(def.inner.min).y - ORB_GRID_DROP * layout.scale;

    let rows = count.div_ceil(ORBS_PER_ROW);
    #[expect(
        clippy::cast_precision_loss,
        reason = "Orb and row counts are single digits."
    )]
    let row_height = area.y / rows as f32;
    #[expect(
        clippy::cast_precision_loss,
        reason = "Orb and row counts are single digits."
    )]
    let cell_width = area.x / ORBS_PER_ROW as f32;

    let mut positions = Vec::with_capacity(count);
    for row in 0..rows {
        let in_row = ORBS_PER_ROW.min(count - row * ORBS_PER_ROW);
        #[expect(
            clippy::cast_precision_loss,
            reason = "Orb and row counts are single digits."
        )]
        let row_width = cell_width * in_row as f32;
        for slot in 0..in_row {
            #[expect(
                clippy::cast_precision_loss,
                reason = "Orb and row counts are single digits."
            )]
            let position = Vec2::new(
                centre_x - row_width * 0.5 + (slot as f32 + 0.5) * cell_width,
                top_y - (row as f32 + 0.5) * row_height,
            );
            positions.push(position);
        }
    }
    positions
}

/// Whether the player overlaps an orb at the current map scale.
#[must_use]
pub fn player_overlaps_orb(player: Vec2, orb: Vec2, scale: f32) -> bool {
    player.distance_squared(orb) <= (ORB_OVERLAP_RADIUS * scale).powi(2)
}

/// Spawns a revealed section's orbs from the catalog.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy observer parameters use `Res<T>` by value."
)]
fn on_section_revealed(
    revealed: On<SectionRevealed>,
    mut commands: Commands,
    layout: Res<MapLayout>,
    catalog: Res<Catalog>,
) {
    let kind = revealed.event().kind;
    let entries = catalog.entries(kind);
    let positions = orb_grid_positions(&layout, kind, entries.len());
    log::debug!("spawning {} orbs for {kind:?}", positions.len());
    for (index, at) in positions.into_iter().enumerate() {
        let mut orb = commands.spawn((
            Orb { kind, index },
            OrbPhase::Ready,
            Transform::from_translation(at.extend(2.5)),
            Bob::new(at.y, ORB_BOB_AMPLITUDE * layout.scale, ORB_BOB_PERIOD),
            Opacity(ORB_IDLE_OPACITY),
        ));
        orb.insert(Name::new(format!("orb {index}")));
        #[cfg(feature = "render")]
        orb.insert(Sprite {
            color: Color::srgb(0.4, 0.75, 1.0),
            custom_size: Some(Vec2::splat(ORB_SIZE * layout.scale)),
            ..Default::default()
        });
    }
}

/// Despawns a hidden section's orbs.
fn on_section_hidden(
    hidden: On<SectionHidden>,
    mut commands: Commands,
    orbs: Query<(Entity, &Orb)>,
) {
    let kind = hidden.event().kind;
    for (entity, orb) in &orbs {
        if orb.kind == kind {
            commands.entity(entity).despawn();
        }
    }
}

/// Puts a released orb into its recovery phase, dimmed.
fn on_orb_released(
    released: On<OrbReleased>,
    mut commands: Commands,
    mut orbs: Query<(&mut OrbPhase, &Opacity), With<Orb>>,
) {
    let entity = released.event().orb;
    let Ok((mut phase, opacity)) = orbs.get_mut(entity) else {
        return;
    };
    *phase = OrbPhase::recovering();
    commands.entity(entity).insert(Fade::new(
        opacity.0,
        ORB_COOLDOWN_OPACITY,
        ORB_FADE_SECONDS,
        Ease::QuadOut,
    ));
}

/// Engages ready orbs the player walks onto.
///
/// Nothing engages while an overlay is already open; a second orb in range
/// stays ready instead of being consumed with nowhere to go.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn engage_orbs(
    mut commands: Commands,
    layout: Res<MapLayout>,
    overlay: Res<OverlayState>,
    players: Query<&Transform, With<Player>>,
    mut orbs: Query<(Entity, &Orb, &mut OrbPhase, &Transform), Without<Player>>,
) {
    if overlay.is_open() {
        return;
    }
    let Ok(player) = players.single() else {
        return;
    };
    let at = player.translation.truncate();
    for (entity, orb, mut phase, transform) in &mut orbs {
        if !matches!(*phase, OrbPhase::Ready) {
            continue;
        }
        if !player_overlaps_orb(at, transform.translation.truncate(), layout.scale) {
            continue;
        }
        log::debug!("orb engaged: {:?} #{}", orb.kind, orb.index);
        *phase = OrbPhase::Engaged;
        commands
            .entity(entity)
            .insert(ScalePulse::new(1.0, ORB_POP_SCALE, ORB_POP_SECONDS));
        commands.trigger(OrbActivated {
            orb: entity,
            kind: orb.kind,
            index: orb.index,
        });
        // One overlay at a time.
        break;
    }
}

/// Ticks recovering orbs back to ready.
///
/// The dim lifts as soon as the cooldown runs out, even with the player
/// still standing on the orb. Re-arming additionally waits for the player
/// to step off, so standing still after closing the overlay never reopens
/// it.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn recover_orbs(
    mut commands: Commands,
    time: Res<Time>,
    layout: Res<MapLayout>,
    players: Query<&Transform, With<Player>>,
    mut orbs: Query<(Entity, &mut OrbPhase, &Transform, &Opacity), Without<Player>>,
) {
    let player_at = players
        .single()
        .map(|transform| transform.translation.truncate())
        .ok();
    for (entity, mut phase, transform, opacity) in &mut orbs {
        let OrbPhase::Recovering { rearm, cooldown } = &mut *phase else {
            continue;
        };
        rearm.tick(time.delta());
        cooldown.tick(time.delta());
        if cooldown.just_finished() {
            commands.entity(entity).insert(Fade::new(
                opacity.0,
                ORB_IDLE_OPACITY,
                ORB_FADE_SECONDS,
                Ease::QuadOut,
            ));
        }
        if !(rearm.finished() && cooldown.finished()) {
            continue;
        }
        let occupied = player_at.is_some_and(|at| {
            player_overlaps_orb(at, transform.translation.truncate(), layout.scale)
        });
        if occupied {
            continue;
        }
        *phase = OrbPhase::Ready;
    }
}

/// Repositions orbs when the layout changes.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn reposition_orbs(
    layout: Res<MapLayout>,
    catalog: Res<Catalog>,
    mut orbs: Query<(&Orb, &mut Transform, &mut Bob)>,
) {
    if !layout.is_changed() {
        return;
    }
    for kind in SectionKind::ALL {
        let positions = orb_grid_positions(&layout, kind, catalog.entries(kind).len());
        for (orb, mut transform, mut bob) in &mut orbs {
            if orb.kind != kind {
                continue;
            }
            let Some(at) = positions.get(orb.index) else {
                continue;
            };
            transform.translation.x = at.x;
            transform.translation.y = at.y;
            bob.base_y = at.y;
            bob.amplitude = ORB_BOB_AMPLITUDE * layout.scale;
        }
    }
}

/// Plugin owning orb spawning and the interaction lifecycle.
#[derive(Debug, Default)]
pub struct OrbsPlugin;

impl Plugin for OrbsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Catalog>();
        app.add_systems(Update, (engage_orbs, recover_orbs, reposition_orbs));
        app.add_observer(on_section_revealed);
        app.add_observer(on_section_hidden);
        app.add_observer(on_orb_released);
    }
}
