//! Verifies the Tiled map plugin's Bevy wiring: asset pipeline registration,
//! idempotent installation, and the spawn toggle.
#![cfg(all(feature = "map", feature = "render"))]

use bevy::prelude::*;
use bevy_ecs_tiled::prelude::TiledMapAsset;

use atrium::map::{AtriumMapPlugin, MapAssetTracking, MapSettings, PortfolioMap};

fn headless_asset_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins((AssetPlugin::default(), ImagePlugin::default()));
    app
}

#[test]
fn registers_the_tiled_asset_pipeline() {
    let mut app = headless_asset_app();
    assert!(app.world().get_resource::<Assets<TiledMapAsset>>().is_none());

    app.add_plugins(AtriumMapPlugin);

    assert!(app.world().get_resource::<Assets<TiledMapAsset>>().is_some());
}

#[test]
fn adding_the_plugin_twice_is_safe() {
    let mut app = headless_asset_app();
    app.add_plugins(AtriumMapPlugin);
    app.add_plugins(AtriumMapPlugin);

    assert!(app.world().get_resource::<Assets<TiledMapAsset>>().is_some());
    assert!(app.world().get_resource::<MapSettings>().is_some());
}

#[test]
fn disabled_spawn_leaves_the_world_empty() {
    let mut app = headless_asset_app();
    app.insert_resource(MapSettings {
        should_spawn_map: false,
        ..Default::default()
    });
    app.add_plugins(AtriumMapPlugin);

    app.update();
    app.update();

    let maps = app
        .world_mut()
        .query::<&PortfolioMap>()
        .iter(app.world())
        .count();
    assert_eq!(maps, 0);
    let tracking = app.world().resource::<MapAssetTracking>();
    assert!(tracking.asset_path.is_none());
    assert!(tracking.handle.is_none());
}
