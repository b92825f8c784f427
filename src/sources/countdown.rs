//! Countdown page: time remaining to each configured event, soonest first.
//!
//! Render-only; the targets live in settings as `"YYYY-MM-DD HH:MM"` local
//! time. Slots that are empty or fail to parse are skipped rather than shown
//! as garbage, and events already passed render as done instead of negative.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;
use jiff::Zoned;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

use crate::fetch::{FetchError, HttpClient};
use crate::pages::Page;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_ACCENT, BODY_WHITE, LEFT_ALIGNED, RIGHT_ALIGNED, SMALL_GRAY};
use crate::widgets::chrome;

/// One resolved countdown row.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CountdownRow {
    pub name: String,
    /// Seconds until the target; negative when passed.
    pub remaining_s: i64,
}

/// Parse a settings timestamp into a civil datetime.
pub fn parse_target(when: &str) -> Option<DateTime> {
    DateTime::strptime("%Y-%m-%d %H:%M", when).ok()
}

/// Seconds from `now` to `target`, both taken as local civil time.
fn seconds_until(target: DateTime, now: DateTime) -> Option<i64> {
    // Through UTC so the subtraction is plain seconds, not calendar units
    let t = target.to_zoned(TimeZone::UTC).ok()?.timestamp().as_second();
    let n = now.to_zoned(TimeZone::UTC).ok()?.timestamp().as_second();
    Some(t - n)
}

/// Resolve and sort the configured countdowns, soonest target first.
///
/// Invalid and empty slots are dropped. Sorting is by target instant, so a
/// passed event sorts before everything still pending.
pub fn resolve_rows(cfg: &Settings, now: DateTime) -> Vec<CountdownRow> {
    let mut rows: Vec<CountdownRow> = cfg
        .countdowns
        .iter()
        .filter(|slot| !slot.name.is_empty())
        .filter_map(|slot| {
            let target = parse_target(&slot.when)?;
            let remaining_s = seconds_until(target, now)?;
            Some(CountdownRow { name: slot.name.clone(), remaining_s })
        })
        .collect();
    rows.sort_by_key(|row| row.remaining_s);
    rows
}

/// `"12d 05h"`, `"03h 42m"` under a day, or the passed marker.
pub fn format_remaining(remaining_s: i64, italian: bool) -> String {
    if remaining_s < 0 {
        return if italian { "passato".to_string() } else { "passed".to_string() };
    }
    let days = remaining_s / 86_400;
    let hours = (remaining_s % 86_400) / 3_600;
    let minutes = (remaining_s % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours:02}h")
    } else {
        format!("{hours:02}h {minutes:02}m")
    }
}

pub struct CountdownSource;

impl CountdownSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CountdownSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for CountdownSource {
    fn page(&self) -> Page {
        Page::Countdowns
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        None
    }

    fn fetch(&mut self, _http: &mut dyn HttpClient, _cfg: &Settings) -> Result<(), FetchError> {
        Ok(())
    }

    fn populated(&self) -> bool {
        true
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        let title = if cfg.italian() { "CONTI ALLA ROVESCIA" } else { "COUNTDOWNS" };
        chrome::draw_header(display, title, "");

        let now = Zoned::now().datetime();
        let rows = resolve_rows(cfg, now);
        if rows.is_empty() {
            let msg = if cfg.italian() { "nessun evento" } else { "no events configured" };
            chrome::draw_placeholder(display, msg);
            return;
        }

        let mut y = 140;
        for row in &rows {
            let mut name = row.name.clone();
            name.truncate(22);
            Text::with_text_style(&name, Point::new(40, y), BODY_WHITE, LEFT_ALIGNED)
                .draw(display)
                .ok();
            let remaining = format_remaining(row.remaining_s, cfg.italian());
            Text::with_text_style(&remaining, Point::new(440, y), BODY_ACCENT, RIGHT_ALIGNED)
                .draw(display)
                .ok();
            y += 40;
        }

        Text::with_text_style("soonest first", Point::new(40, 440), SMALL_GRAY, LEFT_ALIGNED)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
