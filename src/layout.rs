//! Viewport-driven map layout.
//!
//! The map is never rendered at its authored pixel size: it is scaled to fit
//! the viewport and centred, and every placed thing (player, section icons,
//! orbs) derives its world position from that layout. Resizing the window
//! recomputes [`MapLayout`], and downstream systems reposition their entities
//! through Bevy's resource change detection.
//!
//! World space is y-up with the map centred on the origin; tile rows count
//! from the top of the map as authored in Tiled.

use bevy::prelude::*;

use crate::constants::{MAP_HEIGHT_TILES, MAP_WIDTH_TILES, TILE_SIZE};

/// Current viewport size in logical pixels.
///
/// Updated from window resize events when rendering is enabled; headless
/// tests set it directly.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize(pub Vec2);

impl Default for ViewportSize {
    fn default() -> Self {
        Self(Vec2::new(1280.0, 720.0))
    }
}

/// How the tile map is currently scaled and centred in world space.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MapLayout {
    /// Viewport the layout was computed for.
    pub viewport: Vec2,
    /// Unscaled map size in pixels.
    pub map_px: Vec2,
    /// Uniform scale applied to the map so it fits the viewport.
    pub scale: f32,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self::compute(ViewportSize::default().0, Self::authored_map_px())
    }
}

impl MapLayout {
    /// Pixel size of the authored map before scaling.
    #[must_use]
    pub fn authored_map_px() -> Vec2 {
        #[expect(
            clippy::cast_precision_loss,
            reason = "Tile counts are far below f32's integer precision limit."
        )]
        Vec2::new(
            MAP_WIDTH_TILES as f32 * TILE_SIZE,
            MAP_HEIGHT_TILES as f32 * TILE_SIZE,
        )
    }

    /// Computes the layout that fits `map_px` inside `viewport`, centred.
    ///
    /// A degenerate map size yields scale 1 rather than a division by zero.
    #[must_use]
    pub fn compute(viewport: Vec2, map_px: Vec2) -> Self {
        let scale = if map_px.x <= f32::EPSILON || map_px.y <= f32::EPSILON {
            1.0
        } else {
            (viewport.x / map_px.x).min(viewport.y / map_px.y)
        };
        Self {
            viewport,
            map_px,
            scale,
        }
    }

    /// Scaled map size in world units.
    #[must_use]
    pub fn scaled_size(&self) -> Vec2 {
        self.map_px * self.scale
    }

    /// Edge length of one scaled tile.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        TILE_SIZE * self.scale
    }

    /// World position of a tile coordinate's top-left corner.
    ///
    /// Fractional tiles are meaningful: section bounds are authored with
    /// half-tile precision.
    #[must_use]
    pub fn tile_to_world(&self, tile: Vec2) -> Vec2 {
        let half = self.scaled_size() * 0.5;
        let ts = self.tile_size();
        Vec2::new(tile.x * ts - half.x, half.y - tile.y * ts)
    }

    /// Tile coordinate containing a world position.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Tile indices for any on-screen position fit comfortably in i32."
    )]
    pub fn world_to_tile(&self, world: Vec2) -> IVec2 {
        let half = self.scaled_size() * 0.5;
        let ts = self.tile_size();
        if ts <= f32::EPSILON {
            return IVec2::ZERO;
        }
        IVec2::new(
            ((world.x + half.x) / ts).floor() as i32,
            ((half.y - world.y) / ts).floor() as i32,
        )
    }

    /// World position of the map centre.
    #[must_use]
    pub const fn map_centre() -> Vec2 {
        Vec2::ZERO
    }

    /// Clamps a position so a square of half-extent `half` stays on the map.
    #[must_use]
    pub fn clamp_to_map(&self, position: Vec2, half: f32) -> Vec2 {
        let bound = (self.scaled_size() * 0.5 - Vec2::splat(half)).max(Vec2::ZERO);
        position.clamp(-bound, bound)
    }
}

/// Recomputes [`MapLayout`] whenever the viewport size changes.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn refresh_layout(viewport: Res<ViewportSize>, mut layout: ResMut<MapLayout>) {
    if !viewport.is_changed() {
        return;
    }
    let next = MapLayout::compute(viewport.0, layout.map_px);
    if *layout != next {
        log::debug!(
            "map layout: viewport {:?} scale {:.3}",
            viewport.0,
            next.scale
        );
        *layout = next;
    }
}

/// Feeds window resize events into [`ViewportSize`].
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub fn track_window_size(
    mut resizes: MessageReader<bevy::window::WindowResized>,
    mut viewport: ResMut<ViewportSize>,
) {
    if let Some(resized) = resizes.read().last() {
        viewport.0 = Vec2::new(resized.width, resized.height);
    }
}

/// Plugin owning the viewport and map layout resources.
#[derive(Debug, Default)]
pub struct LayoutPlugin;

impl Plugin for LayoutPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportSize>();
        app.init_resource::<MapLayout>();
        #[cfg(feature = "render")]
        app.add_systems(PreUpdate, track_window_size);
        app.add_systems(PreUpdate, refresh_layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn layout_1280x720() -> MapLayout {
        MapLayout::compute(Vec2::new(1280.0, 720.0), MapLayout::authored_map_px())
    }

    #[test]
    fn scale_fits_the_tighter_axis() {
        // 1280x720 viewport against a 1280x672 map: height is the limit.
        let layout = layout_1280x720();
        assert_relative_eq!(layout.scale, 720.0 / 672.0, epsilon = 1e-5);
        let scaled = layout.scaled_size();
        assert!(scaled.x <= 1280.0 + 1e-3);
        assert_relative_eq!(scaled.y, 720.0, epsilon = 1e-3);
    }

    #[rstest]
    #[case::origin(0, 0)]
    #[case::centre_ish(20, 10)]
    #[case::far_corner(39, 20)]
    fn tile_world_round_trip(#[case] tx: i32, #[case] ty: i32) {
        let layout = layout_1280x720();
        #[expect(
            clippy::cast_precision_loss,
            reason = "Tile indices in tests are tiny."
        )]
        let tile = Vec2::new(tx as f32 + 0.5, ty as f32 + 0.5);
        let world = layout.tile_to_world(tile);
        let back = layout.world_to_tile(world);
        assert_eq!(back, IVec2::new(tx, ty));
    }

    #[test]
    fn resize_moves_anchors_proportionally() {
        let before = layout_1280x720();
        let after = MapLayout::compute(Vec2::new(640.0, 360.0), MapLayout::authored_map_px());
        let anchor = Vec2::new(10.0, 5.0);
        let a = before.tile_to_world(anchor);
        let b = after.tile_to_world(anchor);
        // Halving the viewport halves the scale, and anchors follow linearly.
        assert_relative_eq!(after.scale, before.scale * 0.5, epsilon = 1e-5);
        assert_relative_eq!(b.x, a.x * 0.5, epsilon = 1e-3);
        assert_relative_eq!(b.y, a.y * 0.5, epsilon = 1e-3);
    }

    #[test]
    fn clamp_keeps_positions_on_the_map() {
        let layout = layout_1280x720();
        let half_map = layout.scaled_size() * 0.5;
        let clamped = layout.clamp_to_map(Vec2::new(1e6, -1e6), 8.0);
        assert_relative_eq!(clamped.x, half_map.x - 8.0, epsilon = 1e-3);
        assert_relative_eq!(clamped.y, -(half_map.y - 8.0), epsilon = 1e-3);
    }

    #[test]
    fn degenerate_map_size_defaults_to_unit_scale() {
        let layout = MapLayout::compute(Vec2::new(800.0, 600.0), Vec2::ZERO);
        assert_relative_eq!(layout.scale, 1.0);
    }
}
