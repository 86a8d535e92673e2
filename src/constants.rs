//! Tunables shared across the game's plugins.
//!
//! These values were lifted from the original arcade layout and are hardcoded
//! rather than loaded from a config file; the handful that genuinely vary at
//! runtime live in settings resources instead.

/// Edge length of one unscaled map tile, in pixels.
pub const TILE_SIZE: f32 = 32.0;
/// Map width in tiles.
pub const MAP_WIDTH_TILES: u32 = 40;
/// Map height in tiles.
pub const MAP_HEIGHT_TILES: u32 = 21;

/// Player speed in pixels per second at map scale 1.0.
pub const PLAYER_SPEED: f32 = 200.0;
/// Player sprite size as a fraction of one scaled tile.
pub const PLAYER_TILE_FRACTION: f32 = 0.8;
/// Tile column the player starts on.
pub const PLAYER_START_TILE_X: f32 = 20.0;
/// Tile row the player starts on.
pub const PLAYER_START_TILE_Y: f32 = 10.0;

/// Lower bound on the zoom that fits the whole map in the viewport.
pub const MIN_OVERVIEW_ZOOM: f32 = 0.3;
/// Section zoom as a multiple of the overview zoom.
pub const SECTION_ZOOM_FACTOR: f32 = 4.0;
/// Upper bound on the section zoom.
pub const MAX_SECTION_ZOOM: f32 = 2.5;
/// Base per-frame zoom lerp factor.
pub const ZOOM_LERP_BASE: f32 = 0.03;
/// Zoom lerp factor gained per unit of zoom error.
pub const ZOOM_LERP_GAIN: f32 = 0.02;
/// Ceiling on the adaptive zoom lerp factor.
pub const ZOOM_LERP_MAX: f32 = 0.08;
/// Per-frame camera follow lerp factor while approaching a section.
pub const CAMERA_FOLLOW_LERP: f32 = 0.1;
/// Duration of a camera pan tween, in seconds.
pub const CAMERA_PAN_SECONDS: f32 = 0.8;

/// Seconds before a released orb's overlap test re-arms.
pub const ORB_REARM_SECONDS: f32 = 0.2;
/// Seconds a released orb stays dimmed and non-interactive.
pub const ORB_COOLDOWN_SECONDS: f32 = 1.2;
/// Orb opacity while recovering from an interaction.
pub const ORB_COOLDOWN_OPACITY: f32 = 0.3;
/// Orb opacity at rest.
pub const ORB_IDLE_OPACITY: f32 = 0.9;
/// Overlap radius around an orb, in pixels at map scale 1.0.
pub const ORB_OVERLAP_RADIUS: f32 = 15.0;

/// Fraction of a section's inner width used for the orb grid.
pub const ORB_AREA_WIDTH_FRACTION: f32 = 0.8;
/// Fraction of a section's inner height used for the orb grid.
pub const ORB_AREA_HEIGHT_FRACTION: f32 = 0.4;
/// Most orbs placed on a single grid row.
pub const ORBS_PER_ROW: usize = 4;
/// Vertical drop of the orb grid from the top of a section's inner area,
/// in pixels.
pub const ORB_GRID_DROP: f32 = 85.0;

/// Seconds for the overlay to fade and scale in.
pub const OVERLAY_OPEN_SECONDS: f32 = 0.3;
/// Widest the overlay panel will grow, in pixels.
pub const OVERLAY_MAX_WIDTH: f32 = 350.0;
/// Tallest the overlay panel will grow, in pixels.
pub const OVERLAY_MAX_HEIGHT: f32 = 250.0;
/// Overlay panel width as a fraction of the viewport width.
pub const OVERLAY_WIDTH_FRACTION: f32 = 0.6;
/// Overlay panel height as a fraction of the viewport height.
pub const OVERLAY_HEIGHT_FRACTION: f32 = 0.35;

/// Seconds for the startup hints to fade in.
pub const HINT_FADE_IN_SECONDS: f32 = 0.5;
/// Seconds for the startup hints to fade out once the player moves.
pub const HINT_FADE_OUT_SECONDS: f32 = 0.3;
/// Distance of each hint glyph from the player centre, in pixels.
pub const HINT_DISTANCE: f32 = 80.0;
