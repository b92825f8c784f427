//! Pre-computed static text styles shared by every page renderer.
//!
//! `MonoTextStyle` construction is cheap but happens in every draw call when
//! done inline; defining the common combinations as `const` keeps them in the
//! binary's read-only data and keeps the render functions down to layout code.
//!
//! Pages that need a dynamic color (fx row up/down tint, air verdict color)
//! build `MonoTextStyle::new(FONT, color)` at the call site from the exposed
//! font references.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::Rgb565,
    text::{Alignment, TextStyle, TextStyleBuilder},
};
use profont::{PROFONT_18_POINT, PROFONT_24_POINT};

use crate::colors::{COL_ACCENT1, COL_ACCENT2, COL_TEXT, GRAY, WHITE};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered text. Used for headers and big values.
pub const CENTERED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).build();

/// Left-aligned text. Used for list rows.
pub const LEFT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).build();

/// Right-aligned text. Used for value columns.
pub const RIGHT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Right).build();

// =============================================================================
// Font References (for dynamic color styles)
// =============================================================================

/// Body font (10x20 px), for rows whose color is picked at the call site.
pub const BODY_FONT: &MonoFont = &FONT_10X20;

// =============================================================================
// Pre-computed Text Styles
// =============================================================================

/// Small white detail text.
pub const SMALL_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, WHITE);

/// Small gray detail text for secondary lines.
pub const SMALL_GRAY: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, GRAY);

/// Default body text for list rows.
pub const BODY_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_10X20, COL_TEXT);

/// Accent body text for sub-headings.
pub const BODY_ACCENT: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_10X20, COL_ACCENT2);

/// Header title text.
pub const TITLE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_18_POINT, COL_ACCENT1);

/// Large white text for the page's headline value.
pub const VALUE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_24_POINT, WHITE);

/// Large accent text for the page's headline value.
pub const VALUE_ACCENT: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_24_POINT, COL_ACCENT1);
