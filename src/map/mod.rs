//! Tiled map integration.
//!
//! `AtriumMapPlugin` owns the "load the authored map into ECS" entry point
//! and the translation of authored annotations into game state:
//!
//! - It registers `bevy_ecs_tiled::TiledPlugin` so `.tmx` assets can load.
//! - It spawns a root entity with a `TiledMap` component, which triggers the
//!   `bevy_ecs_tiled` spawn pipeline (layers, tilemaps, etc).
//! - It folds tiles marked `Collidable` into the [`WallGrid`] the player's
//!   movement resolves against.
//!
//! The module tracks the asset load so failures surface as observable error
//! events instead of a silently empty world, and supports unloading the
//! active map so a different one can be swapped in.

pub mod walls;

pub use walls::collect_wall_tiles;

use bevy::asset::RecursiveDependencyLoadState;
use bevy::prelude::*;
use bevy_ecs_tiled::prelude::{TiledMap, TiledMapAsset, TiledPlugin};
use log::error;

use crate::collision::WallGrid;

/// Default Tiled map asset path for the portfolio map.
pub const PORTFOLIO_MAP_PATH: &str = "maps/atrium.tmx";

/// Errors emitted by the map plugin when it cannot load the requested map.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The configured path was invalid for filesystem-backed assets.
    InvalidMapAssetPath {
        /// Asset-server path configured for the map.
        path: String,
    },
    /// The map asset failed to load.
    MapLoadFailed {
        /// Asset-server path configured for the map.
        path: String,
        /// Human-readable detail describing why the load failed.
        detail: String,
    },
    /// Attempted to load a second map while one is already active.
    DuplicateMapAttempted {
        /// Asset-server path of the map that was requested.
        requested_path: String,
        /// Asset-server path of the map currently loaded.
        active_path: String,
    },
}

/// Newtype representing a Bevy asset-server path (relative to the asset root).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapAssetPath(String);

impl MapAssetPath {
    /// Creates a new asset path.
    ///
    /// The path must be relative to the Bevy asset root.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Borrows the underlying asset path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MapAssetPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for MapAssetPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl Default for MapAssetPath {
    fn default() -> Self {
        Self::new(PORTFOLIO_MAP_PATH)
    }
}

/// Runtime configuration for map loading.
#[derive(Resource, Clone, Debug)]
pub struct MapSettings {
    /// Selected `.tmx` file to load as the portfolio map.
    pub map_path: MapAssetPath,
    /// When true, the plugin spawns the map in `PostStartup`.
    pub should_spawn_map: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            map_path: MapAssetPath::default(),
            should_spawn_map: true,
        }
    }
}

/// Marker set in Tiled to flag wall tiles.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct Collidable;

/// Event to request unloading the currently active map.
///
/// The unload observer despawns the map root with all its layers and tiles,
/// clears the wall grid, and resets the asset tracking so a new map can be
/// loaded.
#[derive(Event, Debug, Clone, Default)]
pub struct UnloadMap;

/// Event emitted once the map has been fully unloaded.
#[derive(Event, Debug, Clone, Default)]
pub struct MapUnloaded;

/// Marker component for the root entity of the loaded map.
///
/// Tests can spawn entities with this marker to simulate an existing map
/// without loading assets.
#[derive(Component, Debug, Default)]
pub struct PortfolioMap;

#[derive(Resource, Default)]
struct MapPluginInstalled;

/// Resource tracking the map asset loading state.
///
/// Persists the handle and path so load failures can be reported even if the
/// map entity is despawned during error handling.
#[derive(Resource, Debug, Default)]
pub struct MapAssetTracking {
    /// Asset-server path of the currently loaded or loading map.
    pub asset_path: Option<String>,
    /// Strong handle to the map asset, kept alive during loading.
    pub handle: Option<Handle<TiledMapAsset>>,
    /// Whether loading has completed (successfully or with failure).
    pub has_finalised: bool,
}

fn validate_asset_path(asset_path: &str) -> Result<(), MapError> {
    if asset_path.is_empty() || asset_path.starts_with('/') || asset_path.contains("..") {
        return Err(MapError::InvalidMapAssetPath {
            path: asset_path.to_owned(),
        });
    }
    Ok(())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn spawn_map_if_enabled(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<MapSettings>,
    existing_maps: Query<(), With<PortfolioMap>>,
    mut tracking: ResMut<MapAssetTracking>,
) {
    if !settings.should_spawn_map {
        return;
    }

    // A tracked path means we already committed to a load on an earlier tick.
    if tracking.asset_path.is_some() {
        return;
    }

    // A map entity without tracking means something external spawned one,
    // which violates single-map semantics.
    if !existing_maps.is_empty() {
        let requested_path = settings.map_path.as_str().to_owned();
        log::warn!(
            "attempted to load map '{requested_path}' while an external map is active; ignoring"
        );
        commands.trigger(MapError::DuplicateMapAttempted {
            requested_path,
            active_path: "[external]".to_owned(),
        });
        return;
    }

    let asset_path = settings.map_path.as_str().to_owned();
    if let Err(err) = validate_asset_path(&asset_path) {
        commands.trigger(err);
        return;
    }

    let handle = asset_server.load(asset_path.clone());
    tracking.asset_path = Some(asset_path);
    tracking.handle = Some(handle.clone());
    tracking.has_finalised = false;
    commands.spawn((
        Name::new("PortfolioMap"),
        PortfolioMap,
        TiledMap(handle),
        Visibility::default(),
        Transform::default(),
    ));
}

/// Watches the asset server and reports a failed map load exactly once.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn monitor_map_load_state(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut tracking: ResMut<MapAssetTracking>,
) {
    if tracking.has_finalised {
        return;
    }
    let Some(handle) = tracking.handle.clone() else {
        return;
    };
    match asset_server.recursive_dependency_load_state(handle.id()) {
        RecursiveDependencyLoadState::Loaded => {
            tracking.has_finalised = true;
        }
        RecursiveDependencyLoadState::Failed(error) => {
            commands.trigger(MapError::MapLoadFailed {
                path: tracking.asset_path.clone().unwrap_or_default(),
                detail: error.to_string(),
            });
            tracking.has_finalised = true;
        }
        RecursiveDependencyLoadState::NotLoaded | RecursiveDependencyLoadState::Loading => {}
    }
}

/// Observer that unloads the active map and clears derived state.
fn handle_unload_map(
    _event: On<UnloadMap>,
    mut commands: Commands,
    maps: Query<Entity, With<PortfolioMap>>,
    mut walls: ResMut<WallGrid>,
    mut tracking: ResMut<MapAssetTracking>,
) {
    let mut unloaded_any = false;
    for map_entity in &maps {
        commands.entity(map_entity).despawn();
        unloaded_any = true;
        log::info!("unloaded map entity {map_entity:?}");
    }

    walls.clear();
    tracking.asset_path = None;
    tracking.handle = None;
    tracking.has_finalised = false;

    if unloaded_any {
        commands.trigger(MapUnloaded);
    }
}

fn log_map_unloaded(_event: On<MapUnloaded>) {
    log::info!("map unloaded successfully");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_map_error(event: On<MapError>) {
    error!("map error: {:?}", event.event());
}

/// Bevy plugin exposing Tiled map support.
///
/// The plugin is safe to add multiple times: it guarantees `TiledPlugin` is
/// present, and installs its own systems only once.
#[derive(Debug)]
pub struct AtriumMapPlugin;

impl Plugin for AtriumMapPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TiledPlugin>() {
            app.add_plugins(TiledPlugin::default());
        }

        if app.world().contains_resource::<MapPluginInstalled>() {
            return;
        }
        app.insert_resource(MapPluginInstalled);

        app.register_type::<Collidable>();
        app.add_observer(log_map_error);
        app.add_observer(handle_unload_map);
        app.add_observer(log_map_unloaded);
        app.init_resource::<MapSettings>();
        app.init_resource::<MapAssetTracking>();
        app.init_resource::<WallGrid>();
        app.add_systems(PostStartup, spawn_map_if_enabled);
        app.add_systems(Update, (monitor_map_load_state, walls::collect_wall_tiles));
    }

    fn is_unique(&self) -> bool {
        false
    }
}
