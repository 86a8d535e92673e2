#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate for the arcade-style portfolio.
//!
//! A top-down map presents a portfolio as four explorable sections. The
//! player roams the map; approaching a section zooms the camera in,
//! reaching its centre reveals the section's content orbs, and walking onto
//! an orb opens an overlay with the full entry. This crate provides the
//! plugins for each of those concerns plus the layout and tween machinery
//! they share; rendering and map loading are optional features so the logic
//! tests run headlessly.

pub mod camera;
pub mod collision;
pub mod constants;
pub mod content;
pub mod hints;
pub mod layout;
pub mod logging;
#[cfg(feature = "map")]
#[cfg_attr(docsrs, doc(cfg(feature = "map")))]
pub mod map;
pub mod orbs;
pub mod overlay;
pub mod player;
pub mod sections;
pub mod tween;

pub use constants::*;

// Re-export commonly used items
pub use camera::{CameraDirector, CameraDirectorPlugin, CameraMode, MainCamera};
pub use collision::{resolve_movement, WallGrid};
pub use content::{Catalog, ContentEntry, SectionKind};
pub use hints::HintsPlugin;
pub use layout::{MapLayout, LayoutPlugin, ViewportSize};
pub use logging::init as init_logging;
#[cfg(feature = "map")]
#[cfg_attr(docsrs, doc(cfg(feature = "map")))]
pub use map::AtriumMapPlugin;
pub use orbs::{OrbActivated, OrbReleased, OrbsPlugin};
pub use overlay::{OverlayPlugin, OverlayState};
pub use player::{Player, PlayerPlugin};
pub use sections::{classify_tile, SectionsPlugin};
pub use tween::TweenPlugin;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use atrium::prelude::*;
    //! ```

    pub use crate::camera::{CameraDirector, CameraDirectorPlugin};
    pub use crate::collision::WallGrid;
    pub use crate::content::{Catalog, SectionKind};
    pub use crate::hints::HintsPlugin;
    pub use crate::layout::{LayoutPlugin, MapLayout, ViewportSize};
    #[cfg(feature = "map")]
    pub use crate::map::AtriumMapPlugin;
    pub use crate::orbs::OrbsPlugin;
    pub use crate::overlay::{OverlayPlugin, OverlayState};
    pub use crate::player::PlayerPlugin;
    pub use crate::sections::SectionsPlugin;
    pub use crate::tween::TweenPlugin;
}
