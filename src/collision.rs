//! Grid-based wall collision helpers.
//!
//! The host engine's arcade physics used to resolve the player against the
//! wall layer; here that collapses to a tile-set lookup. These helpers are
//! pure over [`WallGrid`] and [`MapLayout`] so they can be exercised without
//! an `App`, in the same spirit as the numeric helpers the simulation side
//! keeps free of ECS types.

use bevy::prelude::*;
use hashbrown::HashSet;

use crate::layout::MapLayout;

/// Set of solid wall tiles, keyed by `(column, row-from-top)`.
#[derive(Resource, Debug, Default, Clone)]
pub struct WallGrid {
    solids: HashSet<IVec2>,
}

impl WallGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a tile as solid.
    pub fn insert(&mut self, tile: IVec2) {
        self.solids.insert(tile);
    }

    /// Whether a tile is solid.
    #[must_use]
    pub fn is_solid(&self, tile: IVec2) -> bool {
        self.solids.contains(&tile)
    }

    /// Number of solid tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// Whether the grid holds no solid tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// Forgets every solid tile, for map unloads.
    pub fn clear(&mut self) {
        self.solids.clear();
    }
}

/// Whether a square of half-extent `half` centred at `centre` touches a wall.
#[must_use]
pub fn square_hits_wall(grid: &WallGrid, layout: &MapLayout, centre: Vec2, half: f32) -> bool {
    // Shrink fractionally so resting flush against a wall does not count as
    // touching it.
    let reach = (half - 1e-3).max(0.0);
    let a = layout.world_to_tile(centre - Vec2::splat(reach));
    let b = layout.world_to_tile(centre + Vec2::splat(reach));
    let (min, max) = (a.min(b), a.max(b));
    for tx in min.x..=max.x {
        for ty in min.y..=max.y {
            if grid.is_solid(IVec2::new(tx, ty)) {
                return true;
            }
        }
    }
    false
}

/// Moves a square through the grid with axis-separated resolution.
///
/// Each axis of `delta` is applied independently and cancelled if it would
/// push the square into a wall, so sliding along a wall keeps the free axis
/// of motion. The result is clamped to the map bounds.
#[must_use]
pub fn resolve_movement(
    grid: &WallGrid,
    layout: &MapLayout,
    from: Vec2,
    delta: Vec2,
    half: f32,
) -> Vec2 {
    let mut position = from;

    let horizontal = Vec2::new(position.x + delta.x, position.y);
    if !square_hits_wall(grid, layout, horizontal, half) {
        position = horizontal;
    }

    let vertical = Vec2::new(position.x, position.y + delta.y);
    if !square_hits_wall(grid, layout, vertical, half) {
        position = vertical;
    }

    layout.clamp_to_map(position, half)
}
