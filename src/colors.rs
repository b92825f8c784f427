//! Rgb565 color palette shared across pages and overlays.

use embedded_graphics::pixelcolor::Rgb565;

pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);
pub const GRAY: Rgb565 = Rgb565::new(15, 31, 15);
pub const RED: Rgb565 = Rgb565::new(31, 0, 0);
pub const GREEN: Rgb565 = Rgb565::new(0, 63, 0);
pub const ORANGE: Rgb565 = Rgb565::new(31, 40, 0);
pub const YELLOW: Rgb565 = Rgb565::new(31, 63, 0);
pub const CYAN: Rgb565 = Rgb565::new(0, 63, 31);

/// Page background.
pub const COL_BG: Rgb565 = BLACK;
/// Header bar fill.
pub const COL_HEADER: Rgb565 = Rgb565::new(6, 12, 12);
/// Default body text.
pub const COL_TEXT: Rgb565 = WHITE;
/// Primary accent (titles, big values).
pub const COL_ACCENT1: Rgb565 = YELLOW;
/// Secondary accent (sub-lines, deltas).
pub const COL_ACCENT2: Rgb565 = CYAN;

/// Value increased since the previous fetch (fx rows, crypto 24h change).
pub const COL_UP: Rgb565 = Rgb565::new(0, 26, 0);
/// Value decreased since the previous fetch.
pub const COL_DOWN: Rgb565 = Rgb565::new(18, 0, 0);
