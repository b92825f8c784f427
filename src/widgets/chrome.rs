//! Page chrome: header bar, content clearing, separators and text helpers.
//!
//! Every page renders its chrome through these helpers so the header geometry
//! and the protected-region contract stay in one place. The header band
//! (y < [`HEADER_HEIGHT`]) is always protected from animation overlays.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::Text,
};
use embedded_graphics_simulator::SimulatorDisplay;

use crate::colors::{COL_BG, COL_HEADER, GRAY};
use crate::config::{CENTER_X, HEADER_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::styles::{BODY_ACCENT, CENTERED, SMALL_GRAY, TITLE_STYLE};

/// Fill the full screen with the page background.
pub fn clear_screen(display: &mut SimulatorDisplay<Rgb565>) {
    Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(COL_BG))
        .draw(display)
        .ok();
}

/// Fill the content area (everything below the header) with the background.
///
/// Called when leaving a page so stale content and leftover overlay pixels
/// never survive the switch.
pub fn clear_content(display: &mut SimulatorDisplay<Rgb565>) {
    Rectangle::new(
        Point::new(0, HEADER_HEIGHT as i32),
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT - HEADER_HEIGHT),
    )
    .into_styled(PrimitiveStyle::with_fill(COL_BG))
    .draw(display)
    .ok();
}

/// Draw the header band with a centered title and optional sub-line.
pub fn draw_header(display: &mut SimulatorDisplay<Rgb565>, title: &str, subtitle: &str) {
    Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, HEADER_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(COL_HEADER))
        .draw(display)
        .ok();

    Text::with_text_style(title, Point::new(CENTER_X, 36), TITLE_STYLE, CENTERED)
        .draw(display)
        .ok();

    if !subtitle.is_empty() {
        Text::with_text_style(subtitle, Point::new(CENTER_X, 64), BODY_ACCENT, CENTERED)
            .draw(display)
            .ok();
    }

    Line::new(
        Point::new(0, HEADER_HEIGHT as i32 - 1),
        Point::new(SCREEN_WIDTH as i32 - 1, HEADER_HEIGHT as i32 - 1),
    )
    .into_styled(PrimitiveStyle::with_stroke(GRAY, 1))
    .draw(display)
    .ok();
}

/// Thin horizontal separator across the content area.
pub fn draw_separator(display: &mut SimulatorDisplay<Rgb565>, y: i32) {
    Line::new(Point::new(20, y), Point::new(SCREEN_WIDTH as i32 - 21, y))
        .into_styled(PrimitiveStyle::with_stroke(GRAY, 1))
        .draw(display)
        .ok();
}

/// Draw text word-wrapped to `max_chars` per line.
///
/// Returns the y coordinate of the line after the last one drawn. Lines past
/// `max_lines` are dropped.
pub fn draw_wrapped_text(
    display: &mut SimulatorDisplay<Rgb565>,
    text: &str,
    x: i32,
    mut y: i32,
    line_height: i32,
    max_chars: usize,
    max_lines: usize,
    style: MonoTextStyle<'static, Rgb565>,
) -> i32 {
    let mut line = String::new();
    let mut lines = 0usize;
    for word in text.split_whitespace() {
        let candidate_len = if line.is_empty() { word.len() } else { line.len() + 1 + word.len() };
        if candidate_len > max_chars && !line.is_empty() {
            Text::new(&line, Point::new(x, y), style).draw(display).ok();
            y += line_height;
            lines += 1;
            line.clear();
            if lines >= max_lines {
                return y;
            }
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() && lines < max_lines {
        Text::new(&line, Point::new(x, y), style).draw(display).ok();
        y += line_height;
    }
    y
}

/// Centered "no data yet" placeholder for pages whose cache is empty.
pub fn draw_placeholder(display: &mut SimulatorDisplay<Rgb565>, hint: &str) {
    Text::with_text_style("--", Point::new(CENTER_X, 240), crate::styles::VALUE_WHITE, CENTERED)
        .draw(display)
        .ok();
    if !hint.is_empty() {
        Text::with_text_style(hint, Point::new(CENTER_X, 280), SMALL_GRAY, CENTERED)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::COL_TEXT;
    use crate::styles::BODY_WHITE;

    fn display() -> SimulatorDisplay<Rgb565> {
        SimulatorDisplay::with_default_color(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT), COL_BG)
    }

    #[test]
    fn test_header_fills_band() {
        let mut d = display();
        draw_header(&mut d, "WEATHER", "Lugano");
        assert_eq!(d.get_pixel(Point::new(5, 5)), COL_HEADER, "header band must be filled");
        assert_eq!(
            d.get_pixel(Point::new(5, HEADER_HEIGHT as i32 + 5)),
            COL_BG,
            "content area must be untouched"
        );
    }

    #[test]
    fn test_clear_content_preserves_header() {
        let mut d = display();
        draw_header(&mut d, "FX", "");
        // Scribble into the content area, then clear it
        Rectangle::new(Point::new(100, 200), Size::new(50, 50))
            .into_styled(PrimitiveStyle::with_fill(COL_TEXT))
            .draw(&mut d)
            .unwrap();
        clear_content(&mut d);
        assert_eq!(d.get_pixel(Point::new(120, 220)), COL_BG, "content must be cleared");
        assert_eq!(d.get_pixel(Point::new(5, 5)), COL_HEADER, "header must survive");
    }

    #[test]
    fn test_wrapped_text_advances_y() {
        let mut d = display();
        let end = draw_wrapped_text(
            &mut d,
            "one two three four five six seven eight nine ten",
            20,
            120,
            24,
            12,
            10,
            BODY_WHITE,
        );
        assert!(end > 120 + 24, "multiple lines should have been drawn");
    }

    #[test]
    fn test_wrapped_text_respects_max_lines() {
        let mut d = display();
        let end = draw_wrapped_text(
            &mut d,
            "aaaa bbbb cccc dddd eeee ffff gggg hhhh",
            20,
            120,
            24,
            4,
            2,
            BODY_WHITE,
        );
        assert_eq!(end, 120 + 2 * 24, "output must stop after max_lines");
    }
}
