//! The roaming player avatar.
//!
//! The player spawns in the neutral corridor between the four sections and
//! moves with the arrow keys or WASD. Opposing keys resolve by priority
//! (left over right, up over down), diagonals are normalised so they are no
//! faster than straight lines, and movement is resolved against the wall
//! grid one axis at a time so the player slides along walls. While the
//! overlay is open all movement is frozen.

use bevy::input::keyboard::KeyCode;
use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::collision::{resolve_movement, WallGrid};
use crate::constants::{
    PLAYER_SPEED, PLAYER_START_TILE_X, PLAYER_START_TILE_Y, PLAYER_TILE_FRACTION,
};
use crate::layout::MapLayout;
use crate::overlay::OverlayState;

/// The player avatar.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    /// Whether the player moved this frame.
    pub moving: bool,
}

/// Whether the player has ever moved, for one-shot startup behaviour.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerActivity {
    /// Set on the first frame of movement and never cleared.
    pub has_moved: bool,
}

/// Movement direction from the pressed keys, before normalisation.
///
/// Left wins over right and up wins over down when both are held, matching
/// the original's input polling order.
#[must_use]
pub fn movement_direction(keys: &ButtonInput<KeyCode>) -> Vec2 {
    let left = keys.pressed(KeyCode::ArrowLeft) || keys.pressed(KeyCode::KeyA);
    let right = keys.pressed(KeyCode::ArrowRight) || keys.pressed(KeyCode::KeyD);
    let up = keys.pressed(KeyCode::ArrowUp) || keys.pressed(KeyCode::KeyW);
    let down = keys.pressed(KeyCode::ArrowDown) || keys.pressed(KeyCode::KeyS);

    let x = if left {
        -1.0
    } else if right {
        1.0
    } else {
        0.0
    };
    let y = if up {
        1.0
    } else if down {
        -1.0
    } else {
        0.0
    };
    Vec2::new(x, y)
}

/// Player collision half-extent at the current map scale.
#[must_use]
pub fn player_half_extent(layout: &MapLayout) -> f32 {
    layout.tile_size() * PLAYER_TILE_FRACTION * 0.5
}

/// World position of the player's start tile centre.
#[must_use]
pub fn start_position(layout: &MapLayout) -> Vec2 {
    layout.tile_to_world(Vec2::new(
        PLAYER_START_TILE_X + 0.5,
        PLAYER_START_TILE_Y + 0.5,
    ))
}

/// Spawns the player on its start tile.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn spawn_player(mut commands: Commands, layout: Res<MapLayout>) {
    let at = start_position(&layout);
    log::info!("player spawned at {at:?}");
    let mut player = commands.spawn((
        Player::default(),
        Transform::from_translation(at.extend(4.0)),
    ));
    player.insert(Name::new("Player"));
    #[cfg(feature = "render")]
    player.insert((
        Sprite {
            color: Color::srgb(1.0, 0.9, 0.1),
            custom_size: Some(Vec2::splat(player_half_extent(&layout) * 2.0)),
            ..Default::default()
        },
        ChompAnimation::default(),
    ));
}

/// Moves the player from keyboard input, resolving against the wall grid.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn move_player(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    overlay: Res<OverlayState>,
    layout: Res<MapLayout>,
    walls: Res<WallGrid>,
    mut activity: ResMut<PlayerActivity>,
    mut players: Query<(&mut Player, &mut Transform)>,
) {
    let Ok((mut player, mut transform)) = players.single_mut() else {
        return;
    };
    if overlay.is_open() {
        player.moving = false;
        return;
    }

    let pressed = movement_direction(&keys);
    if pressed == Vec2::ZERO {
        player.moving = false;
        return;
    }
    let heading = pressed.normalize();
    let delta = heading * PLAYER_SPEED * layout.scale * time.delta_secs();

    let from = transform.translation.truncate();
    let moved = resolve_movement(&walls, &layout, from, delta, player_half_extent(&layout));
    transform.translation.x = moved.x;
    transform.translation.y = moved.y;
    transform.rotation = Quat::from_rotation_z(heading.y.atan2(heading.x));

    player.moving = moved != from;
    if player.moving && !activity.has_moved {
        activity.has_moved = true;
        log::debug!("player moved for the first time");
    }
}

/// Two-frame chomp cycle shown while the player moves.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
#[derive(Component, Debug)]
pub struct ChompAnimation {
    /// Frame clock; each tick flips the mouth.
    pub timer: Timer,
    /// Whether the mouth is currently open.
    pub open: bool,
}

#[cfg(feature = "render")]
impl Default for ChompAnimation {
    fn default() -> Self {
        Self {
            // Two frames at 10 fps.
            timer: Timer::from_seconds(0.1, TimerMode::Repeating),
            open: true,
        }
    }
}

/// Advances the chomp frames while moving and resets them while idle.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn animate_chomp(
    time: Res<Time>,
    layout: Res<MapLayout>,
    mut players: Query<(&Player, &mut ChompAnimation, &mut Sprite)>,
) {
    let full = player_half_extent(&layout) * 2.0;
    for (player, mut chomp, mut sprite) in &mut players {
        if !player.moving {
            chomp.open = true;
            chomp.timer.reset();
            sprite.custom_size = Some(Vec2::splat(full));
            continue;
        }
        chomp.timer.tick(time.delta());
        if chomp.timer.just_finished() {
            chomp.open = !chomp.open;
        }
        // The closed frame squashes the sprite along the facing axis.
        let height = if chomp.open { full } else { full * 0.6 };
        sprite.custom_size = Some(Vec2::new(full, height));
    }
}

/// Keeps the player's position proportional when the layout rescales.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn rescale_player(
    layout: Res<MapLayout>,
    mut previous_scale: Local<Option<f32>>,
    mut players: Query<&mut Transform, With<Player>>,
) {
    let scale = layout.scale;
    let Some(previous) = previous_scale.replace(scale) else {
        return;
    };
    if (previous - scale).abs() <= f32::EPSILON || previous <= f32::EPSILON {
        return;
    }
    let ratio = scale / previous;
    for mut transform in &mut players {
        transform.translation.x *= ratio;
        transform.translation.y *= ratio;
    }
}

/// Plugin owning the player avatar and its movement.
#[derive(Debug, Default)]
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerActivity>();
        app.init_resource::<WallGrid>();
        app.add_systems(Startup, spawn_player);
        app.add_systems(Update, (move_player, rescale_player));
        #[cfg(feature = "render")]
        app.add_systems(Update, animate_chomp.after(move_player));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn keys_with(pressed: &[KeyCode]) -> ButtonInput<KeyCode> {
        let mut keys = ButtonInput::default();
        for key in pressed {
            keys.press(*key);
        }
        keys
    }

    #[rstest]
    #[case::idle(&[], Vec2::ZERO)]
    #[case::east(&[KeyCode::ArrowRight], Vec2::new(1.0, 0.0))]
    #[case::wasd_north(&[KeyCode::KeyW], Vec2::new(0.0, 1.0))]
    #[case::diagonal(&[KeyCode::KeyD, KeyCode::KeyS], Vec2::new(1.0, -1.0))]
    #[case::left_beats_right(&[KeyCode::ArrowLeft, KeyCode::ArrowRight], Vec2::new(-1.0, 0.0))]
    #[case::up_beats_down(&[KeyCode::ArrowUp, KeyCode::ArrowDown], Vec2::new(0.0, 1.0))]
    fn direction_follows_key_priority(#[case] pressed: &[KeyCode], #[case] expected: Vec2) {
        let keys = keys_with(pressed);
        assert_eq!(movement_direction(&keys), expected);
    }

    #[test]
    fn start_tile_is_the_neutral_corridor() {
        let layout = MapLayout::default();
        let tile = layout.world_to_tile(start_position(&layout));
        assert_eq!(tile, IVec2::new(20, 10));
        // Nowhere near any section.
        let proximity = crate::sections::classify_tile(tile);
        assert_eq!(proximity.outer, None);
    }

    #[test]
    fn half_extent_tracks_the_map_scale() {
        let small = MapLayout::compute(Vec2::new(640.0, 360.0), MapLayout::authored_map_px());
        let large = MapLayout::compute(Vec2::new(1280.0, 720.0), MapLayout::authored_map_px());
        assert_relative_eq!(
            player_half_extent(&large),
            player_half_extent(&small) * 2.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn overlay_freezes_movement() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<MapLayout>();
        app.init_resource::<WallGrid>();
        app.init_resource::<PlayerActivity>();
        app.insert_resource(OverlayState::Open {
            orb: Entity::PLACEHOLDER,
        });
        let mut keys = ButtonInput::default();
        keys.press(KeyCode::ArrowRight);
        app.insert_resource(keys);
        app.add_systems(Update, move_player);

        let layout = MapLayout::default();
        let start = start_position(&layout);
        let player = app
            .world_mut()
            .spawn((
                Player { moving: true },
                Transform::from_translation(start.extend(4.0)),
            ))
            .id();

        app.update();
        app.update();

        let world = app.world();
        let transform = world.get::<Transform>(player);
        assert_eq!(
            transform.map(|t| t.translation.truncate()),
            Some(start)
        );
        assert_eq!(world.get::<Player>(player).map(|p| p.moving), Some(false));
        assert!(!world.resource::<PlayerActivity>().has_moved);
    }

    #[test]
    fn rescale_keeps_relative_position() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(MapLayout::compute(
            Vec2::new(1280.0, 720.0),
            MapLayout::authored_map_px(),
        ));
        app.add_systems(Update, rescale_player);

        let player = app
            .world_mut()
            .spawn((
                Player::default(),
                Transform::from_translation(Vec3::new(100.0, -40.0, 4.0)),
            ))
            .id();
        // First frame records the starting scale.
        app.update();

        app.insert_resource(MapLayout::compute(
            Vec2::new(640.0, 360.0),
            MapLayout::authored_map_px(),
        ));
        app.update();

        let translation = app
            .world()
            .get::<Transform>(player)
            .map(|t| t.translation)
            .unwrap_or_default();
        assert_relative_eq!(translation.x, 50.0, epsilon = 1e-3);
        assert_relative_eq!(translation.y, -20.0, epsilon = 1e-3);
    }
}
