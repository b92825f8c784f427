//! Calendar page: the next few events from a configured ICS feed.
//!
//! The ICS scan is line-oriented and deliberately narrow: each `VEVENT` block
//! contributes its `DTSTART` and `SUMMARY`, everything else is ignored.
//! Events are kept in feed order, capped at [`MAX_EVENTS`].

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::config::{HTTP_TIMEOUT_MS, REFRESH_CALENDAR_MS};
use crate::fetch::{FetchError, HttpClient};
use crate::pages::Page;
use crate::scan;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_WHITE, LEFT_ALIGNED, SMALL_GRAY};
use crate::widgets::chrome;

/// Maximum events shown on screen.
pub const MAX_EVENTS: usize = 5;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CalendarEvent {
    /// `DD.MM` display date.
    pub date: String,
    pub summary: String,
}

/// Parse up to [`MAX_EVENTS`] events out of an ICS body.
///
/// `DTSTART` may carry parameters (`DTSTART;VALUE=DATE:20260825`); only the
/// leading `YYYYMMDD` of the value is used. Blocks missing either field are
/// skipped.
pub fn parse_ics(body: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut at = 0usize;
    while events.len() < MAX_EVENTS {
        let Some(begin) = scan::index_of_ci(body, "BEGIN:VEVENT", at) else { break };
        let Some(end) = scan::index_of_ci(body, "END:VEVENT", begin) else { break };
        let block = &body[begin..end];
        if let (Some(date), Some(summary)) = (ics_dtstart(block), ics_line(block, "SUMMARY")) {
            events.push(CalendarEvent { date, summary: scan::sanitize_text(&summary) });
        }
        at = end + 1;
    }
    events
}

fn ics_line(block: &str, field: &str) -> Option<String> {
    for line in block.lines() {
        let line = line.trim_end_matches('\r');
        let Some(rest) = line.strip_prefix(field) else { continue };
        // Field name may be followed by parameters before the colon
        let Some((params, value)) = rest.split_once(':') else { continue };
        if params.is_empty() || params.starts_with(';') {
            return Some(value.to_string());
        }
    }
    None
}

fn ics_dtstart(block: &str) -> Option<String> {
    let raw = ics_line(block, "DTSTART")?;
    if raw.len() < 8 {
        return None;
    }
    let (month, day) = (&raw[4..6], &raw[6..8]);
    Some(format!("{day}.{month}"))
}

pub struct CalendarSource {
    cache: Option<Vec<CalendarEvent>>,
}

impl CalendarSource {
    pub fn new() -> Self {
        Self { cache: None }
    }

    #[cfg(test)]
    pub fn cached(&self) -> Option<&[CalendarEvent]> {
        self.cache.as_deref()
    }
}

impl Default for CalendarSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for CalendarSource {
    fn page(&self) -> Page {
        Page::Calendar
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        Some(REFRESH_CALENDAR_MS)
    }

    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError> {
        let url = cfg.ics_url.as_deref().ok_or(FetchError::ConfigMissing("ics_url"))?;
        let body = http.get(url, HTTP_TIMEOUT_MS)?;
        self.cache = Some(parse_ics(&body));
        Ok(())
    }

    fn populated(&self) -> bool {
        self.cache.is_some()
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        let title = if cfg.italian() { "CALENDARIO" } else { "CALENDAR" };
        chrome::draw_header(display, title, "");

        let Some(events) = self.cache.as_deref() else {
            chrome::draw_placeholder(display, "waiting for calendar feed");
            return;
        };
        if events.is_empty() {
            let msg = if cfg.italian() { "nessun evento" } else { "no events" };
            chrome::draw_placeholder(display, msg);
            return;
        }

        let mut y = 140;
        for event in events {
            Text::with_text_style(&event.date, Point::new(30, y), SMALL_GRAY, LEFT_ALIGNED)
                .draw(display)
                .ok();
            let mut summary = event.summary.clone();
            summary.truncate(34);
            Text::with_text_style(&summary, Point::new(100, y), BODY_WHITE, LEFT_ALIGNED)
                .draw(display)
                .ok();
            y += 60;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
