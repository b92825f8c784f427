//! Info page: firmware vitals. Uptime, scheduler counters, fetch health and
//! the recent event log. Render-only; everything shown comes from the render
//! context and the settings snapshot.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::fetch::{FetchError, HttpClient};
use crate::pages::{ALL_PAGES, Page};
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_WHITE, LEFT_ALIGNED, RIGHT_ALIGNED, SMALL_GRAY, SMALL_WHITE};
use crate::widgets::chrome;

pub struct InfoSource;

impl InfoSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InfoSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a millisecond duration as `HH:MM:SS` (hours uncapped).
pub fn format_uptime(ms: u32) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

impl PageSource for InfoSource {
    fn page(&self) -> Page {
        Page::Info
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

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, ctx: &RenderCtx) {
        chrome::draw_header(display, "INFO", env!("CARGO_PKG_VERSION"));

        let enabled = ALL_PAGES.iter().filter(|p| cfg.pages.enabled(**p)).count();
        let rows = [
            ("uptime".to_string(), format_uptime(ctx.now.since(cfg.boot_time))),
            ("pages enabled".to_string(), format!("{enabled}/{}", ALL_PAGES.len())),
            ("language".to_string(), cfg.language.code().to_string()),
            ("rotations".to_string(), ctx.metrics.rotations.to_string()),
            ("frames".to_string(), ctx.metrics.frames_rendered.to_string()),
            ("overlay frames".to_string(), ctx.metrics.overlay_frames.to_string()),
            ("fetches".to_string(), ctx.metrics.fetch_attempts.to_string()),
            ("fetch health".to_string(), format!("{}%", ctx.metrics.fetch_success_pct())),
        ];
        let mut y = 120;
        for (label, value) in rows {
            Text::with_text_style(&label, Point::new(40, y), BODY_WHITE, LEFT_ALIGNED)
                .draw(display)
                .ok();
            Text::with_text_style(&value, Point::new(440, y), BODY_WHITE, RIGHT_ALIGNED)
                .draw(display)
                .ok();
            y += 30;
        }

        chrome::draw_separator(display, y + 6);
        y += 30;
        if ctx.events.is_empty() {
            Text::with_text_style("no events", Point::new(40, y), SMALL_GRAY, LEFT_ALIGNED)
                .draw(display)
                .ok();
        } else {
            for line in ctx.events.iter() {
                Text::with_text_style(line, Point::new(40, y), SMALL_WHITE, LEFT_ALIGNED)
                    .draw(display)
                    .ok();
                y += 18;
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
