//! Wall extraction from the loaded map.
//!
//! Once `bevy_ecs_tiled` finishes spawning a map, every tile carrying the
//! authored `Collidable` marker is folded into the [`WallGrid`]. The tilemap
//! counts rows from the bottom of the map while the game's grid counts from
//! the top, so the row index is flipped on the way in.

use bevy::prelude::*;
use bevy_ecs_tiled::prelude::{MapCreated, TilePos, TiledEvent};

use crate::collision::WallGrid;
use crate::constants::MAP_HEIGHT_TILES;
use crate::map::Collidable;

/// Converts a bottom-up tilemap position into a top-down grid coordinate.
#[must_use]
pub fn authored_tile_to_grid(tile_pos: &TilePos) -> IVec2 {
    #[expect(
        clippy::cast_possible_wrap,
        reason = "Tile coordinates in practical maps fit comfortably in i32."
    )]
    IVec2::new(
        tile_pos.x as i32,
        MAP_HEIGHT_TILES as i32 - 1 - tile_pos.y as i32,
    )
}

/// Fills the wall grid from `Collidable` tiles after a map finishes loading.
///
/// Listens for `TiledEvent<MapCreated>` so every tile has spawned and had its
/// custom properties hydrated before processing. Inserting into the set is
/// idempotent, so rerunning on a reload is safe.
#[expect(deprecated, reason = "bevy_ecs_tiled 0.10 uses the legacy Event API.")]
pub fn collect_wall_tiles(
    mut map_events: EventReader<TiledEvent<MapCreated>>,
    wall_tiles: Query<&TilePos, With<Collidable>>,
    mut walls: ResMut<WallGrid>,
) {
    // Only process when a map has just finished loading.
    let mut events = map_events.read();
    if events.next().is_none() {
        return;
    }
    events.for_each(drop);

    for tile_pos in &wall_tiles {
        walls.insert(authored_tile_to_grid(tile_pos));
    }
    log::info!("wall grid holds {} solid tiles", walls.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_row_maps_to_the_last_grid_row() {
        let grid = authored_tile_to_grid(&TilePos { x: 0, y: 0 });
        #[expect(
            clippy::cast_possible_wrap,
            reason = "The map height constant is tiny."
        )]
        let last_row = MAP_HEIGHT_TILES as i32 - 1;
        assert_eq!(grid, IVec2::new(0, last_row));
    }

    #[test]
    fn top_row_maps_to_grid_row_zero() {
        let grid = authored_tile_to_grid(&TilePos {
            x: 7,
            y: MAP_HEIGHT_TILES - 1,
        });
        assert_eq!(grid, IVec2::new(7, 0));
    }
}
