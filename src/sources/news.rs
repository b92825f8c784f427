//! News page: recent headlines from the configured RSS feed.
//!
//! The channel's own `<title>` is skipped; up to [`MAX_HEADLINES`] item
//! titles are kept, sanitized for the panel font.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::config::{HTTP_TIMEOUT_MS, REFRESH_NEWS_MS};
use crate::fetch::{FetchError, HttpClient};
use crate::pages::Page;
use crate::scan;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::BODY_WHITE;
use crate::widgets::chrome;

/// Maximum headlines shown on screen.
pub const MAX_HEADLINES: usize = 5;

/// Extract item titles from an RSS body, channel title excluded.
pub fn parse_headlines(body: &str) -> Vec<String> {
    let mut headlines = Vec::new();
    let mut at = 0usize;
    // Only titles inside <item> blocks count as headlines
    while headlines.len() < MAX_HEADLINES {
        let Some(item) = scan::index_of_ci(body, "<item", at) else { break };
        let Some((title, next)) = scan::find_tag(body, "title", item) else { break };
        let clean = scan::sanitize_text(&title);
        if !clean.is_empty() {
            headlines.push(clean);
        }
        at = next;
    }
    headlines
}

pub struct NewsSource {
    cache: Option<Vec<String>>,
}

impl NewsSource {
    pub fn new() -> Self {
        Self { cache: None }
    }

    #[cfg(test)]
    pub fn cached(&self) -> Option<&[String]> {
        self.cache.as_deref()
    }
}

impl Default for NewsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for NewsSource {
    fn page(&self) -> Page {
        Page::News
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        Some(REFRESH_NEWS_MS)
    }

    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError> {
        let url = cfg.rss_url.as_deref().ok_or(FetchError::ConfigMissing("rss_url"))?;
        let body = http.get(url, HTTP_TIMEOUT_MS)?;
        let headlines = parse_headlines(&body);
        if headlines.is_empty() {
            return Err(FetchError::MissingField("item.title"));
        }
        self.cache = Some(headlines);
        Ok(())
    }

    fn populated(&self) -> bool {
        self.cache.is_some()
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        let title = if cfg.italian() { "NOTIZIE" } else { "NEWS" };
        chrome::draw_header(display, title, "");

        let Some(headlines) = self.cache.as_deref() else {
            chrome::draw_placeholder(display, "waiting for feed");
            return;
        };

        let mut y = 130;
        for headline in headlines {
            y = chrome::draw_wrapped_text(display, headline, 30, y, 26, 40, 2, BODY_WHITE);
            chrome::draw_separator(display, y + 4);
            y += 22;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
