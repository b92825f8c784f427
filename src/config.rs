//! Firmware configuration constants.
//!
//! Layout values like the content-area origin are computed at compile time as
//! `const` and used throughout the rendering code instead of being
//! recalculated per frame.

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (square 480x480 RGB panel).
pub const SCREEN_WIDTH: u32 = 480;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 480;

// =============================================================================
// Page Layout Constants
// =============================================================================

/// Header bar height in pixels. The header is redrawn by every page and is
/// always protected from animation overlays.
pub const HEADER_HEIGHT: u32 = 80;

/// Screen center X coordinate, pre-computed as i32 for drawing code.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Default interval between page rotations.
pub const DEFAULT_PAGE_INTERVAL_MS: u32 = 15_000;

/// Minimum delay between overlay animation frames (~30 FPS cap).
pub const OVERLAY_FRAME_MS: u32 = 33;

/// Timeout handed to the HTTP collaborator for every fetch.
pub const HTTP_TIMEOUT_MS: u32 = 10_000;

// =============================================================================
// Per-page Minimum Refresh Intervals
// =============================================================================
//
// The scheduler never issues a fetch for a page more often than this,
// regardless of how fast the rotation cycles through it.

pub const REFRESH_WEATHER_MS: u32 = 10 * 60_000;
pub const REFRESH_AIR_MS: u32 = 10 * 60_000;
pub const REFRESH_MARKET_MS: u32 = 5 * 60_000;
pub const REFRESH_CALENDAR_MS: u32 = 15 * 60_000;
pub const REFRESH_NEWS_MS: u32 = 15 * 60_000;
pub const REFRESH_QUOTE_MS: u32 = 60 * 60_000;
pub const REFRESH_SUN_MS: u32 = 10 * 60_000;
pub const REFRESH_TEMP24_MS: u32 = 10 * 60_000;
