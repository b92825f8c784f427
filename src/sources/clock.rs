//! Clock page: big local time with the date underneath. Render-only; no
//! network involvement, the wall clock comes from the system timezone.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;
use jiff::Zoned;

use crate::config::CENTER_X;
use crate::fetch::{FetchError, HttpClient};
use crate::pages::Page;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_ACCENT, CENTERED, VALUE_WHITE};
use crate::widgets::chrome;

static WEEKDAYS_EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
static WEEKDAYS_IT: [&str; 7] = ["Lun", "Mar", "Mer", "Gio", "Ven", "Sab", "Dom"];

static MONTHS_EN: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
static MONTHS_IT: [&str; 12] =
    ["Gen", "Feb", "Mar", "Apr", "Mag", "Giu", "Lug", "Ago", "Set", "Ott", "Nov", "Dic"];

pub struct ClockSource;

impl ClockSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClockSource {
    fn default() -> Self {
        Self::new()
    }
}

/// `"Mon 25 Aug 2026"` or the Italian equivalent.
pub fn format_date_line(zoned: &Zoned, italian: bool) -> String {
    let weekday = zoned.weekday().to_monday_zero_offset() as usize;
    let month = zoned.month() as usize - 1;
    let (days, months) =
        if italian { (WEEKDAYS_IT, MONTHS_IT) } else { (WEEKDAYS_EN, MONTHS_EN) };
    format!("{} {:02} {} {}", days[weekday], zoned.day(), months[month], zoned.year())
}

impl PageSource for ClockSource {
    fn page(&self) -> Page {
        Page::Clock
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
        let title = if cfg.italian() { "ORA" } else { "CLOCK" };
        chrome::draw_header(display, title, "");

        let now = Zoned::now();
        let time = format!("{:02}:{:02}", now.hour(), now.minute());
        Text::with_text_style(&time, Point::new(CENTER_X, 230), VALUE_WHITE, CENTERED)
            .draw(display)
            .ok();

        let date = format_date_line(&now, cfg.italian());
        Text::with_text_style(&date, Point::new(CENTER_X, 290), BODY_ACCENT, CENTERED)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
