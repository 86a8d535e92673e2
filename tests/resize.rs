//! Window-resize behaviour across the layout-driven plugins.
//!
//! The map layout is recomputed from the viewport, and everything placed on
//! the map has to follow it: section icons snap to their rescaled anchors and
//! the player keeps its relative position.

use bevy::prelude::*;

use atrium::layout::{MapLayout, ViewportSize};
use atrium::player::Player;
use atrium::prelude::*;
use atrium::sections::{section_def, SectionHeading, SectionIcon};

fn resize_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.init_resource::<bevy::input::ButtonInput<bevy::input::keyboard::KeyCode>>();
    app.add_plugins((
        LayoutPlugin,
        TweenPlugin,
        PlayerPlugin,
        SectionsPlugin,
        CameraDirectorPlugin,
        OverlayPlugin,
    ));
    app
}

#[test]
fn shrinking_the_viewport_halves_the_layout_scale() {
    let mut app = resize_app();
    app.update();
    let before = app.world().resource::<MapLayout>().scale;

    app.world_mut().resource_mut::<ViewportSize>().0 = Vec2::new(640.0, 360.0);
    app.update();

    let after = app.world().resource::<MapLayout>().scale;
    assert!((after - before * 0.5).abs() < 1e-5, "{before} -> {after}");
}

#[test]
fn icons_follow_their_anchors_after_a_resize() {
    let mut app = resize_app();
    app.update();

    app.world_mut().resource_mut::<ViewportSize>().0 = Vec2::new(640.0, 360.0);
    app.update();

    let layout = *app.world().resource::<MapLayout>();
    let mut icons = app.world_mut().query::<(&SectionIcon, &Transform)>();
    for (icon, transform) in icons.iter(app.world()) {
        let expected = layout.tile_to_world(section_def(icon.kind).anchor);
        assert!(
            (transform.translation.x - expected.x).abs() < 1e-3,
            "{:?} icon x drifted",
            icon.kind
        );
    }
}

/// Offset of the first heading from its section anchor under the current
/// layout.
fn heading_offset(app: &mut App) -> Vec2 {
    let layout = *app.world().resource::<MapLayout>();
    let anchor = layout.tile_to_world(section_def(SectionKind::WorkExperience).anchor);
    let mut headings = app
        .world_mut()
        .query_filtered::<&Transform, With<SectionHeading>>();
    let Some(transform) = headings.iter(app.world()).next() else {
        panic!("heading missing");
    };
    transform.translation.truncate() - anchor
}

#[test]
fn a_raised_heading_follows_its_anchor_after_a_resize() {
    let mut app = resize_app();
    app.update();

    app.world_mut().spawn((
        SectionHeading {
            kind: SectionKind::WorkExperience,
        },
        Transform::default(),
    ));

    app.world_mut().resource_mut::<ViewportSize>().0 = Vec2::new(640.0, 360.0);
    app.update();
    let small = heading_offset(&mut app);

    app.world_mut().resource_mut::<ViewportSize>().0 = Vec2::new(1280.0, 720.0);
    app.update();
    let large = heading_offset(&mut app);

    // The heading snaps onto the anchor column and its rise scales with the
    // layout.
    assert!(small.x.abs() < 1e-3, "heading drifted off the anchor: {small:?}");
    assert!(large.x.abs() < 1e-3, "heading drifted off the anchor: {large:?}");
    assert!(small.y > 0.0, "heading should sit above the anchor");
    assert!(
        (large.y - small.y * 2.0).abs() < 1e-3,
        "rise did not scale: {} -> {}",
        small.y,
        large.y
    );
}

#[test]
fn player_keeps_its_tile_after_a_resize() {
    let mut app = resize_app();
    app.update();

    let tile_before = {
        let layout = *app.world().resource::<MapLayout>();
        let mut players = app.world_mut().query_filtered::<&Transform, With<Player>>();
        let Some(transform) = players.iter(app.world()).next() else {
            panic!("player missing");
        };
        layout.world_to_tile(transform.translation.truncate())
    };

    app.world_mut().resource_mut::<ViewportSize>().0 = Vec2::new(640.0, 360.0);
    app.update();
    // A second frame lets the rescale system observe the new scale.
    app.update();

    let tile_after = {
        let layout = *app.world().resource::<MapLayout>();
        let mut players = app.world_mut().query_filtered::<&Transform, With<Player>>();
        let Some(transform) = players.iter(app.world()).next() else {
            panic!("player missing");
        };
        layout.world_to_tile(transform.translation.truncate())
    };
    assert_eq!(tile_before, tile_after);
}
