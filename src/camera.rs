//! Camera direction: overview, approach, and locked section framing.
//!
//! The camera runs a three-mode state machine driven by the player's tile
//! position relative to the section bounds:
//!
//! - `Overview`: the whole map is framed; zoom fits the scaled map.
//! - `Approach`: the player entered a section's outer bounds; the camera
//!   follows the player and zooms towards the section framing.
//! - `Locked`: the player reached the inner bounds; following stops and the
//!   camera pans onto the section anchor.
//!
//! Zoom never snaps: it approaches its target each frame with an adaptive
//! lerp factor, faster while the error is large. Mode changes always cancel
//! the active pan tween before starting a new one.

use bevy::prelude::*;

use crate::constants::{
    CAMERA_FOLLOW_LERP, CAMERA_PAN_SECONDS, MAX_SECTION_ZOOM, MIN_OVERVIEW_ZOOM,
    SECTION_ZOOM_FACTOR, ZOOM_LERP_BASE, ZOOM_LERP_GAIN, ZOOM_LERP_MAX,
};
use crate::content::SectionKind;
use crate::layout::{MapLayout, ViewportSize};
use crate::player::Player;
use crate::sections::{classify_tile, section_def};
use crate::tween::Ease;

/// Marker for the camera entity the director drives.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct MainCamera;

/// The director's framing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Whole map framed, camera at the map centre.
    #[default]
    Overview,
    /// Player inside a section's outer bounds; camera follows the player.
    Approach(SectionKind),
    /// Player reached the inner bounds; camera centred on the section.
    Locked(SectionKind),
}

/// Side effect requested by a mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCue {
    /// Start following the player towards a section.
    Approach(SectionKind),
    /// Stop following and pan onto the section anchor.
    Lock(SectionKind),
    /// Pan back to the map centre.
    Overview,
}

/// Camera state machine plus the smoothed zoom value.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CameraDirector {
    /// Current framing mode.
    pub mode: CameraMode,
    /// Smoothed zoom applied to the camera this frame.
    pub zoom: f32,
}

impl Default for CameraDirector {
    fn default() -> Self {
        Self {
            mode: CameraMode::Overview,
            zoom: 1.0,
        }
    }
}

impl CameraDirector {
    /// Zoom that fits the scaled map inside the viewport, floored at
    /// [`MIN_OVERVIEW_ZOOM`].
    #[must_use]
    pub fn overview_zoom(layout: &MapLayout, viewport: Vec2) -> f32 {
        let scaled = layout.scaled_size();
        if scaled.x <= f32::EPSILON || scaled.y <= f32::EPSILON {
            return MIN_OVERVIEW_ZOOM;
        }
        let fit = (viewport.x / scaled.x).min(viewport.y / scaled.y);
        fit.max(MIN_OVERVIEW_ZOOM)
    }

    /// Section framing zoom: a multiple of the overview zoom, capped.
    #[must_use]
    pub fn section_zoom(overview: f32) -> f32 {
        (overview * SECTION_ZOOM_FACTOR).min(MAX_SECTION_ZOOM)
    }

    /// The zoom the current mode is steering towards.
    #[must_use]
    pub fn target_zoom(&self, layout: &MapLayout, viewport: Vec2) -> f32 {
        let overview = Self::overview_zoom(layout, viewport);
        match self.mode {
            CameraMode::Overview => overview,
            CameraMode::Approach(_) | CameraMode::Locked(_) => Self::section_zoom(overview),
        }
    }

    /// Steps the smoothed zoom towards `target` with the adaptive factor
    /// `min(ZOOM_LERP_MAX, ZOOM_LERP_BASE + |error| * ZOOM_LERP_GAIN)`.
    pub fn step_zoom(&mut self, target: f32) {
        let error = (self.zoom - target).abs();
        let factor = (ZOOM_LERP_BASE + error * ZOOM_LERP_GAIN).min(ZOOM_LERP_MAX);
        self.zoom += (target - self.zoom) * factor;
    }

    /// Advances the mode machine from the player's section containment.
    ///
    /// `outer`/`inner` name the section whose outer or inner bounds contain
    /// the player, if any. Returns the side effect the caller must execute;
    /// `None` means the mode (and any running pan or follow) is unchanged.
    pub fn transition(
        &mut self,
        outer: Option<SectionKind>,
        inner: Option<SectionKind>,
    ) -> Option<CameraCue> {
        let Some(section) = outer else {
            // Left every section: return to overview unless already there.
            if self.mode == CameraMode::Overview {
                return None;
            }
            self.mode = CameraMode::Overview;
            return Some(CameraCue::Overview);
        };

        let engaged = matches!(
            self.mode,
            CameraMode::Approach(k) | CameraMode::Locked(k) if k == section
        );
        if !engaged {
            // Entered a new section's outer bounds (possibly straight from
            // another section).
            self.mode = CameraMode::Approach(section);
            return Some(CameraCue::Approach(section));
        }

        match self.mode {
            CameraMode::Approach(k) if inner == Some(k) => {
                self.mode = CameraMode::Locked(k);
                Some(CameraCue::Lock(k))
            }
            CameraMode::Locked(k) if inner != Some(k) => {
                // Drifted off the centre but still inside the section.
                self.mode = CameraMode::Approach(k);
                Some(CameraCue::Approach(k))
            }
            _ => None,
        }
    }
}

/// In-flight camera pan towards a fixed point.
#[derive(Component, Debug)]
pub struct PanTween {
    /// Where the pan started.
    pub from: Vec2,
    /// Where the pan ends.
    pub to: Vec2,
    /// Progress clock.
    pub timer: Timer,
}

impl PanTween {
    /// Creates a pan from `from` to `to` over the standard pan duration.
    #[must_use]
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self {
            from,
            to,
            timer: Timer::from_seconds(CAMERA_PAN_SECONDS, TimerMode::Once),
        }
    }
}

/// Runs the mode machine and executes its cues.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn camera_direct_system(
    mut commands: Commands,
    layout: Res<MapLayout>,
    mut director: ResMut<CameraDirector>,
    players: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    cameras: Query<(Entity, &Transform), With<MainCamera>>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let Ok((camera_entity, camera)) = cameras.single() else {
        return;
    };

    let tile = layout.world_to_tile(player.translation.truncate());
    let proximity = classify_tile(tile);
    let Some(cue) = director.transition(proximity.outer, proximity.inner) else {
        return;
    };

    // Every cue invalidates whatever pan was running.
    commands.entity(camera_entity).remove::<PanTween>();
    let here = camera.translation.truncate();
    match cue {
        CameraCue::Approach(kind) => {
            log::debug!("camera: approaching {kind:?}");
        }
        CameraCue::Lock(kind) => {
            let anchor = layout.tile_to_world(section_def(kind).anchor);
            log::debug!("camera: locking onto {kind:?} at {anchor:?}");
            commands
                .entity(camera_entity)
                .insert(PanTween::new(here, anchor));
        }
        CameraCue::Overview => {
            log::debug!("camera: returning to overview");
            commands
                .entity(camera_entity)
                .insert(PanTween::new(here, MapLayout::map_centre()));
        }
    }
}

/// Follows the player while the director is in approach mode.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn camera_follow_system(
    director: Res<CameraDirector>,
    players: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut cameras: Query<&mut Transform, (With<MainCamera>, Without<PanTween>)>,
) {
    if !matches!(director.mode, CameraMode::Approach(_)) {
        return;
    }
    let Ok(player) = players.single() else {
        return;
    };
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };
    let here = camera.translation.truncate();
    let next = here.lerp(player.translation.truncate(), CAMERA_FOLLOW_LERP);
    camera.translation.x = next.x;
    camera.translation.y = next.y;
}

/// Advances the active pan tween with a decelerating curve.
pub fn camera_pan_system(
    mut commands: Commands,
    time: Res<Time>,
    mut cameras: Query<(Entity, &mut PanTween, &mut Transform), With<MainCamera>>,
) {
    for (entity, mut pan, mut transform) in &mut cameras {
        pan.timer.tick(time.delta());
        let t = Ease::QuadOut.sample(pan.timer.fraction());
        let at = pan.from.lerp(pan.to, t);
        transform.translation.x = at.x;
        transform.translation.y = at.y;
        if pan.timer.finished() {
            commands.entity(entity).remove::<PanTween>();
        }
    }
}

/// Smooths zoom towards the mode's target and applies it to the camera.
///
/// Zoom is applied through the camera transform's scale (`1 / zoom`), which
/// keeps the director testable without a projection.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn camera_zoom_system(
    layout: Res<MapLayout>,
    viewport: Res<ViewportSize>,
    mut director: ResMut<CameraDirector>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let target = director.target_zoom(&layout, viewport.0);
    director.step_zoom(target);
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };
    let inverse = if director.zoom.abs() <= f32::EPSILON {
        1.0
    } else {
        1.0 / director.zoom
    };
    camera.scale = Vec3::new(inverse, inverse, 1.0);
}

/// Spawns the main camera at startup if none exists.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
fn camera_setup(mut commands: Commands, cameras: Query<(), With<Camera2d>>) {
    if cameras.is_empty() {
        commands.spawn((Camera2d, MainCamera, Name::new("MainCamera")));
    }
}

/// Plugin owning the camera director and its systems.
#[derive(Debug, Default)]
pub struct CameraDirectorPlugin;

impl Plugin for CameraDirectorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MainCamera>();
        app.init_resource::<CameraDirector>();
        #[cfg(feature = "render")]
        app.add_systems(Startup, camera_setup);
        app.add_systems(
            Update,
            (
                camera_direct_system,
                camera_follow_system,
                camera_pan_system,
                camera_zoom_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const WORK: SectionKind = SectionKind::WorkExperience;
    const SKILLS: SectionKind = SectionKind::Skills;

    #[test]
    fn overview_zoom_is_floored() {
        // A huge map against a tiny viewport would fit at a microscopic
        // zoom; the floor keeps it legible.
        let layout = MapLayout::compute(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0));
        let zoom = CameraDirector::overview_zoom(&layout, Vec2::new(10.0, 10.0));
        assert_relative_eq!(zoom, MIN_OVERVIEW_ZOOM);
    }

    #[test]
    fn section_zoom_is_capped() {
        assert_relative_eq!(CameraDirector::section_zoom(1.0), MAX_SECTION_ZOOM);
        assert_relative_eq!(CameraDirector::section_zoom(0.5), 2.0);
    }

    #[test]
    fn entering_outer_bounds_starts_an_approach() {
        let mut director = CameraDirector::default();
        let cue = director.transition(Some(WORK), None);
        assert_eq!(cue, Some(CameraCue::Approach(WORK)));
        assert_eq!(director.mode, CameraMode::Approach(WORK));
    }

    #[test]
    fn reaching_inner_bounds_locks_the_camera() {
        let mut director = CameraDirector::default();
        let _ = director.transition(Some(WORK), None);
        let cue = director.transition(Some(WORK), Some(WORK));
        assert_eq!(cue, Some(CameraCue::Lock(WORK)));
        assert_eq!(director.mode, CameraMode::Locked(WORK));
    }

    #[test]
    fn drifting_off_centre_resumes_following() {
        let mut director = CameraDirector::default();
        let _ = director.transition(Some(WORK), Some(WORK));
        let _ = director.transition(Some(WORK), Some(WORK));
        let cue = director.transition(Some(WORK), None);
        assert_eq!(cue, Some(CameraCue::Approach(WORK)));
    }

    #[test]
    fn leaving_the_section_returns_to_overview() {
        let mut director = CameraDirector::default();
        let _ = director.transition(Some(WORK), Some(WORK));
        let cue = director.transition(None, None);
        assert_eq!(cue, Some(CameraCue::Overview));
        assert_eq!(director.mode, CameraMode::Overview);
        // And staying outside produces no further cues.
        assert_eq!(director.transition(None, None), None);
    }

    #[test]
    fn crossing_directly_between_sections_reapproaches() {
        let mut director = CameraDirector::default();
        let _ = director.transition(Some(WORK), Some(WORK));
        let cue = director.transition(Some(SKILLS), None);
        assert_eq!(cue, Some(CameraCue::Approach(SKILLS)));
    }

    #[rstest]
    #[case::far(0.3, 2.5)]
    #[case::close(2.45, 2.5)]
    fn zoom_step_converges_monotonically(#[case] start: f32, #[case] target: f32) {
        let mut director = CameraDirector {
            zoom: start,
            ..Default::default()
        };
        let mut previous_error = (start - target).abs();
        for _ in 0..200 {
            director.step_zoom(target);
            let error = (director.zoom - target).abs();
            assert!(error <= previous_error + 1e-6, "zoom diverged");
            previous_error = error;
        }
        assert!(previous_error < 0.05, "zoom failed to converge");
    }

    #[test]
    fn adaptive_factor_is_faster_when_far() {
        let mut far = CameraDirector {
            zoom: 0.3,
            ..Default::default()
        };
        let mut near = CameraDirector {
            zoom: 2.4,
            ..Default::default()
        };
        far.step_zoom(2.5);
        near.step_zoom(2.5);
        let far_step = far.zoom - 0.3;
        let near_step = near.zoom - 2.4;
        // Relative progress: the distant camera covers a larger fraction of
        // its error than the base factor alone would.
        assert!(far_step / 2.2 > ZOOM_LERP_BASE);
        assert!(near_step / 0.1 < ZOOM_LERP_MAX);
    }
}
