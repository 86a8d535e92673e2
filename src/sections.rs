//! Portfolio sections placed on the map.
//!
//! Each of the four sections owns two rectangles of tile space: an outer
//! bound that puts the camera into approach mode, and a tighter inner bound
//! that locks the camera and reveals the section's content. A floating icon
//! marks the section while it is dormant; revealing it fades the icon away
//! and raises a heading in its place, and drifting off the inner bound (or
//! the camera unlocking) restores the dormant look.
//!
//! Reveal and hide are broadcast as entity-less triggers so the orb and
//! overlay plugins can react without this module knowing about them.

use bevy::prelude::*;

use crate::content::SectionKind;
use crate::layout::MapLayout;
use crate::player::Player;
use crate::tween::{Bob, Ease, Fade, GlowPulse, Opacity};

/// Seconds the icon takes to fade out when a section is revealed.
const ICON_FADE_OUT_SECONDS: f32 = 0.3;
/// Seconds the icon takes to fade back in when a section hides.
const ICON_FADE_IN_SECONDS: f32 = 0.5;
/// Icon bob amplitude in unscaled pixels.
const ICON_BOB_AMPLITUDE: f32 = 10.0;
/// Icon bob period in seconds.
const ICON_BOB_PERIOD: f32 = 2.0;
/// Icon edge length in unscaled pixels.
const ICON_SIZE: f32 = 48.0;
/// Heading offset above the anchor, in unscaled pixels.
const HEADING_RISE: f32 = 56.0;
/// Glow band the dormant icons pulse across.
const ICON_GLOW_LOW: f32 = 0.7;
/// Brightest point of the icon glow.
const ICON_GLOW_HIGH: f32 = 1.0;
/// Icon glow period in seconds.
const ICON_GLOW_PERIOD: f32 = 1.5;

/// Axis-aligned rectangle in (possibly fractional) tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// Top-left corner, inclusive.
    pub min: Vec2,
    /// Bottom-right corner, inclusive.
    pub max: Vec2,
}

impl TileBounds {
    /// Builds bounds from corner coordinates.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    /// Whether a whole tile lies inside the bounds.
    ///
    /// Fractional edges exclude the partially covered tile, so a bound
    /// ending at `16.5` admits tile 16 but not 17.
    #[must_use]
    pub fn contains_tile(&self, tile: IVec2) -> bool {
        #[expect(
            clippy::cast_precision_loss,
            reason = "Tile indices are far below f32's integer precision limit."
        )]
        let t = Vec2::new(tile.x as f32, tile.y as f32);
        t.x >= self.min.x && t.x <= self.max.x && t.y >= self.min.y && t.y <= self.max.y
    }
}

/// Static placement of one section on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionDef {
    /// Which section this is.
    pub kind: SectionKind,
    /// Tile the icon, heading, and camera lock centre on.
    pub anchor: Vec2,
    /// Bounds that start a camera approach.
    pub outer: TileBounds,
    /// Bounds that lock the camera and reveal the content.
    pub inner: TileBounds,
}

/// The four sections in their map quadrants.
pub const SECTION_DEFS: [SectionDef; 4] = [
    SectionDef {
        kind: SectionKind::WorkExperience,
        anchor: Vec2::new(10.0, 5.0),
        outer: TileBounds::new(2.0, 2.0, 17.0, 7.0),
        inner: TileBounds::new(3.0, 3.0, 16.5, 6.5),
    },
    SectionDef {
        kind: SectionKind::Projects,
        anchor: Vec2::new(30.0, 5.0),
        outer: TileBounds::new(22.0, 2.0, 38.0, 7.0),
        inner: TileBounds::new(23.0, 3.0, 36.5, 6.5),
    },
    SectionDef {
        kind: SectionKind::Skills,
        anchor: Vec2::new(10.0, 15.0),
        outer: TileBounds::new(2.0, 12.0, 17.0, 18.0),
        inner: TileBounds::new(3.0, 13.0, 16.5, 16.5),
    },
    SectionDef {
        kind: SectionKind::AboutMe,
        anchor: Vec2::new(30.0, 15.0),
        outer: TileBounds::new(22.0, 12.0, 38.0, 18.0),
        inner: TileBounds::new(23.0, 13.0, 36.5, 16.5),
    },
];

/// Placement for one section.
#[must_use]
pub fn section_def(kind: SectionKind) -> &'static SectionDef {
    match kind {
        SectionKind::WorkExperience => &SECTION_DEFS[0],
        SectionKind::Projects => &SECTION_DEFS[1],
        SectionKind::Skills => &SECTION_DEFS[2],
        SectionKind::AboutMe => &SECTION_DEFS[3],
    }
}

/// Which section, if any, contains a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Proximity {
    /// Section whose outer bounds contain the tile.
    pub outer: Option<SectionKind>,
    /// Section whose inner bounds contain the tile.
    pub inner: Option<SectionKind>,
}

/// Classifies a tile against every section's bounds.
///
/// Sections do not overlap, so the first hit wins. The inner hit is only
/// reported for the same section as the outer hit.
#[must_use]
pub fn classify_tile(tile: IVec2) -> Proximity {
    for def in &SECTION_DEFS {
        if def.outer.contains_tile(tile) {
            let inner = def.inner.contains_tile(tile).then_some(def.kind);
            return Proximity {
                outer: Some(def.kind),
                inner,
            };
        }
    }
    Proximity::default()
}

/// Floating marker shown while a section is dormant.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionIcon {
    /// Section the icon belongs to.
    pub kind: SectionKind,
}

/// Heading text raised when a section is revealed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeading {
    /// Section the heading belongs to.
    pub kind: SectionKind,
}

/// Marks a section whose content is currently on display.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revealed;

/// A section's content came on display.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRevealed {
    /// The section that was revealed.
    pub kind: SectionKind,
}

/// A section's content went back into hiding.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHidden {
    /// The section that was hidden.
    pub kind: SectionKind,
}

/// Spawns the four section icons once the layout is available.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn spawn_section_icons(mut commands: Commands, layout: Res<MapLayout>) {
    for def in &SECTION_DEFS {
        let at = layout.tile_to_world(def.anchor);
        let mut icon = commands.spawn((
            SectionIcon { kind: def.kind },
            Transform::from_translation(at.extend(2.0)),
            Bob::new(at.y, ICON_BOB_AMPLITUDE * layout.scale, ICON_BOB_PERIOD),
            GlowPulse::new(ICON_GLOW_LOW, ICON_GLOW_HIGH, ICON_GLOW_PERIOD),
            Opacity::default(),
        ));
        icon.insert(Name::new(def.kind.icon()));
        #[cfg(feature = "render")]
        icon.insert(Sprite {
            color: Color::srgb(0.95, 0.8, 0.25),
            custom_size: Some(Vec2::splat(ICON_SIZE * layout.scale)),
            ..Default::default()
        });
    }
    log::info!("spawned {} section icons", SECTION_DEFS.len());
}

/// Repositions icons and raised headings when the layout changes, e.g.
/// after a window resize.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn reposition_section_display(
    layout: Res<MapLayout>,
    mut icons: Query<(&SectionIcon, &mut Transform, &mut Bob)>,
    mut headings: Query<(&SectionHeading, &mut Transform), Without<SectionIcon>>,
) {
    if !layout.is_changed() {
        return;
    }
    for (icon, mut transform, mut bob) in &mut icons {
        let at = layout.tile_to_world(section_def(icon.kind).anchor);
        transform.translation.x = at.x;
        transform.translation.y = at.y;
        bob.base_y = at.y;
        bob.amplitude = ICON_BOB_AMPLITUDE * layout.scale;
    }
    for (heading, mut transform) in &mut headings {
        let anchor = layout.tile_to_world(section_def(heading.kind).anchor);
        transform.translation.x = anchor.x;
        transform.translation.y = anchor.y + HEADING_RISE * layout.scale;
    }
}

/// Drives reveal and hide from the player's position and the camera.
///
/// A section reveals once the player is inside its inner bounds and the
/// camera has locked onto it, so the content never appears mid-pan. It
/// hides as soon as either stops holding: the player drifting off the
/// inner bounds or the camera unlocking.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn update_section_state(
    mut commands: Commands,
    layout: Res<MapLayout>,
    director: Res<crate::camera::CameraDirector>,
    players: Query<&Transform, With<Player>>,
    icons: Query<(Entity, &SectionIcon, Option<&Revealed>)>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let proximity = classify_tile(layout.world_to_tile(player.translation.truncate()));

    for (entity, icon, revealed) in &icons {
        let kind = icon.kind;
        let locked = director.mode == crate::camera::CameraMode::Locked(kind);
        if revealed.is_none() && proximity.inner == Some(kind) && locked {
            commands.entity(entity).insert(Revealed);
            commands.trigger(SectionRevealed { kind });
        } else if revealed.is_some() && (proximity.inner != Some(kind) || !locked) {
            commands.entity(entity).remove::<Revealed>();
            commands.trigger(SectionHidden { kind });
        }
    }
}

/// Fades the icon out and raises the heading when a section is revealed.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy observer parameters use `Res<T>` by value."
)]
fn on_section_revealed(
    revealed: On<SectionRevealed>,
    mut commands: Commands,
    layout: Res<MapLayout>,
    icons: Query<(Entity, &SectionIcon, &Opacity)>,
) {
    let kind = revealed.event().kind;
    log::info!("revealing section {kind:?}");
    for (entity, icon, opacity) in &icons {
        if icon.kind == kind {
            commands.entity(entity).insert(Fade::new(
                opacity.0,
                0.0,
                ICON_FADE_OUT_SECONDS,
                Ease::QuadOut,
            ));
        }
    }

    let anchor = layout.tile_to_world(section_def(kind).anchor);
    let at = anchor + Vec2::new(0.0, HEADING_RISE * layout.scale);
    let mut heading = commands.spawn((
        SectionHeading { kind },
        Transform::from_translation(at.extend(3.0)),
    ));
    heading.insert(Name::new(kind.title()));
    #[cfg(feature = "render")]
    heading.insert((
        bevy::text::Text2d::new(kind.title()),
        bevy::text::TextColor(Color::WHITE),
    ));
}

/// Restores the icon and removes the heading when a section hides.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy observer parameters use `Res<T>` by value."
)]
fn on_section_hidden(
    hidden: On<SectionHidden>,
    mut commands: Commands,
    icons: Query<(Entity, &SectionIcon, &Opacity)>,
    headings: Query<(Entity, &SectionHeading)>,
) {
    let kind = hidden.event().kind;
    log::info!("hiding section {kind:?}");
    for (entity, icon, opacity) in &icons {
        if icon.kind == kind {
            commands.entity(entity).insert(Fade::new(
                opacity.0,
                1.0,
                ICON_FADE_IN_SECONDS,
                Ease::QuadOut,
            ));
        }
    }
    for (entity, heading) in &headings {
        if heading.kind == kind {
            commands.entity(entity).despawn();
        }
    }
}

/// Plugin owning section placement, icons, and reveal state.
#[derive(Debug, Default)]
pub struct SectionsPlugin;

impl Plugin for SectionsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_section_icons);
        app.add_systems(Update, (reposition_section_display, update_section_state));
        app.add_observer(on_section_revealed);
        app.add_observer(on_section_hidden);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::work_anchor(10, 5, Some(SectionKind::WorkExperience), Some(SectionKind::WorkExperience))]
    #[case::work_fringe(2, 2, Some(SectionKind::WorkExperience), None)]
    #[case::work_half_tile_edge(17, 5, Some(SectionKind::WorkExperience), None)]
    #[case::projects_anchor(30, 5, Some(SectionKind::Projects), Some(SectionKind::Projects))]
    #[case::skills_anchor(10, 15, Some(SectionKind::Skills), Some(SectionKind::Skills))]
    #[case::about_anchor(30, 15, Some(SectionKind::AboutMe), Some(SectionKind::AboutMe))]
    #[case::corridor(20, 10, None, None)]
    #[case::between_columns(19, 5, None, None)]
    fn classification_matches_the_map_quadrants(
        #[case] tx: i32,
        #[case] ty: i32,
        #[case] outer: Option<SectionKind>,
        #[case] inner: Option<SectionKind>,
    ) {
        let proximity = classify_tile(IVec2::new(tx, ty));
        assert_eq!(proximity.outer, outer);
        assert_eq!(proximity.inner, inner);
    }

    #[test]
    fn fractional_bounds_exclude_the_partial_tile() {
        let inner = &section_def(SectionKind::WorkExperience).inner;
        assert!(inner.contains_tile(IVec2::new(16, 6)));
        assert!(!inner.contains_tile(IVec2::new(17, 6)));
        assert!(!inner.contains_tile(IVec2::new(16, 7)));
    }

    #[test]
    fn every_inner_bound_sits_inside_its_outer_bound() {
        for def in &SECTION_DEFS {
            assert!(def.outer.min.x <= def.inner.min.x, "{:?}", def.kind);
            assert!(def.outer.min.y <= def.inner.min.y, "{:?}", def.kind);
            assert!(def.outer.max.x >= def.inner.max.x, "{:?}", def.kind);
            assert!(def.outer.max.y >= def.inner.max.y, "{:?}", def.kind);
        }
    }

    #[test]
    fn anchors_lie_inside_their_inner_bounds() {
        for def in &SECTION_DEFS {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "Anchor tiles are small whole numbers."
            )]
            let tile = IVec2::new(def.anchor.x as i32, def.anchor.y as i32);
            assert!(def.inner.contains_tile(tile), "{:?}", def.kind);
        }
    }

    #[test]
    fn reveal_needs_a_locked_camera_and_hide_follows_the_inner_bounds() {
        use crate::camera::{CameraDirector, CameraMode};

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<crate::layout::ViewportSize>();
        app.init_resource::<MapLayout>();
        app.init_resource::<CameraDirector>();
        app.add_systems(Startup, spawn_section_icons);
        app.add_systems(Update, update_section_state);
        app.add_observer(on_section_revealed);
        app.add_observer(on_section_hidden);

        // Start the player in the neutral corridor.
        let layout = MapLayout::default();
        let corridor = layout.tile_to_world(Vec2::new(20.5, 10.5));
        let player = app
            .world_mut()
            .spawn((
                crate::player::Player::default(),
                Transform::from_translation(corridor.extend(1.0)),
            ))
            .id();
        app.update();
        assert_eq!(count_revealed(&mut app), 0);

        // Inner bounds with the camera still approaching must not reveal.
        move_player(&mut app, player, &layout, Vec2::new(10.5, 5.5));
        app.world_mut().resource_mut::<CameraDirector>().mode =
            CameraMode::Approach(SectionKind::WorkExperience);
        app.update();
        assert_eq!(count_revealed(&mut app), 0);

        // The camera locking on completes the reveal.
        app.world_mut().resource_mut::<CameraDirector>().mode =
            CameraMode::Locked(SectionKind::WorkExperience);
        app.update();
        assert_eq!(count_revealed(&mut app), 1);
        assert_eq!(count_headings(&mut app), 1);

        // Drifting to the outer fringe unlocks the camera and hides the
        // section again, heading included.
        move_player(&mut app, player, &layout, Vec2::new(2.5, 5.5));
        app.world_mut().resource_mut::<CameraDirector>().mode =
            CameraMode::Approach(SectionKind::WorkExperience);
        app.update();
        assert_eq!(count_revealed(&mut app), 0);
        assert_eq!(count_headings(&mut app), 0);

        // Stepping back onto the centre with the camera locked re-reveals.
        move_player(&mut app, player, &layout, Vec2::new(10.5, 5.5));
        app.world_mut().resource_mut::<CameraDirector>().mode =
            CameraMode::Locked(SectionKind::WorkExperience);
        app.update();
        assert_eq!(count_revealed(&mut app), 1);

        // Leaving the section entirely hides it as well.
        move_player(&mut app, player, &layout, Vec2::new(20.5, 10.5));
        app.world_mut().resource_mut::<CameraDirector>().mode = CameraMode::Overview;
        app.update();
        assert_eq!(count_revealed(&mut app), 0);
        assert_eq!(count_headings(&mut app), 0);
    }

    fn move_player(app: &mut App, player: Entity, layout: &MapLayout, tile: Vec2) {
        let at = layout.tile_to_world(tile);
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
            transform.translation.x = at.x;
            transform.translation.y = at.y;
        }
    }

    fn count_revealed(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<(), With<Revealed>>()
            .iter(app.world())
            .count()
    }

    fn count_headings(app: &mut App) -> usize {
        app.world_mut()
            .query::<&SectionHeading>()
            .iter(app.world())
            .count()
    }
}
