//! Quote-of-the-day page: a short text generated on the configured topic.
//!
//! Requires both the API key and the topic; without them the fetch
//! short-circuits as unconfigured and the page shows its placeholder. The
//! completion body is scanned for the first `content` field.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::config::{CENTER_X, HTTP_TIMEOUT_MS, REFRESH_QUOTE_MS};
use crate::fetch::{FetchError, HttpClient};
use crate::pages::Page;
use crate::scan;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_WHITE, CENTERED, SMALL_GRAY};
use crate::widgets::chrome;

/// Characters per wrapped line on screen.
const WRAP_CHARS: usize = 36;

pub struct QuoteSource {
    cache: Option<String>,
}

impl QuoteSource {
    pub fn new() -> Self {
        Self { cache: None }
    }

    #[cfg(test)]
    pub fn cached(&self) -> Option<&str> {
        self.cache.as_deref()
    }
}

impl Default for QuoteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for QuoteSource {
    fn page(&self) -> Page {
        Page::QuoteOfDay
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        Some(REFRESH_QUOTE_MS)
    }

    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError> {
        let _key = cfg.openai_key.as_deref().ok_or(FetchError::ConfigMissing("openai_key"))?;
        let topic =
            cfg.openai_topic.as_deref().ok_or(FetchError::ConfigMissing("openai_topic"))?;

        // The transport binds the key as a bearer header; the topic and the
        // reply language ride in the URL so scripted transports can route on
        // them
        let url = format!(
            "https://api.openai.com/v1/chat/completions?topic={topic}&lang={}",
            cfg.language.code()
        );
        let body = http.get(&url, HTTP_TIMEOUT_MS)?;

        let content = scan::find_string_value(&body, "content", 0)
            .ok_or(FetchError::MissingField("content"))?;
        let text = scan::sanitize_text(&content);
        if text.is_empty() {
            return Err(FetchError::MissingField("content"));
        }
        self.cache = Some(text);
        Ok(())
    }

    fn populated(&self) -> bool {
        self.cache.is_some()
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        let title = if cfg.italian() { "CITAZIONE" } else { "QUOTE" };
        let topic = cfg.openai_topic.as_deref().unwrap_or("");
        chrome::draw_header(display, title, topic);

        let Some(text) = self.cache.as_deref() else {
            let hint = if cfg.openai_key.is_none() {
                "configure an API key"
            } else {
                "waiting for completion"
            };
            chrome::draw_placeholder(display, hint);
            return;
        };

        chrome::draw_wrapped_text(display, text, 40, 160, 32, WRAP_CHARS, 8, BODY_WHITE);
        Text::with_text_style("daily", Point::new(CENTER_X, 440), SMALL_GRAY, CENTERED)
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
    use crate::fetch::ScriptedHttp;

    const BODY: &str = r#"{"choices":[{"message":{"role":"assistant","content":"Simplicity is the soul of efficiency."}}]}"#;

    fn configured() -> Settings {
        Settings {
            openai_key: Some("sk-test".into()),
            openai_topic: Some("engineering".into()),
            ..Settings::default()
        }
    }

    #[test]
    fn test_fetch_extracts_content() {
        let mut http = ScriptedHttp::new().route("openai.com", BODY);
        let mut src = QuoteSource::new();
        src.fetch(&mut http, &configured()).expect("fetch");
        assert_eq!(src.cached(), Some("Simplicity is the soul of efficiency."));
    }

    #[test]
    fn test_fetch_requires_key_and_topic() {
        let mut http = ScriptedHttp::new().route("openai.com", BODY);
        let mut src = QuoteSource::new();

        let err = src.fetch(&mut http, &Settings::default()).unwrap_err();
        assert_eq!(err, FetchError::ConfigMissing("openai_key"));

        let cfg = Settings { openai_key: Some("sk-test".into()), ..Settings::default() };
        let err = src.fetch(&mut http, &cfg).unwrap_err();
        assert_eq!(err, FetchError::ConfigMissing("openai_topic"));
        assert!(http.requests().is_empty(), "no request until fully configured");
    }

    #[test]
    fn test_fetch_rejects_empty_content() {
        let mut http = ScriptedHttp::new().route("openai.com", r#"{"content":"   "}"#);
        let mut src = QuoteSource::new();
        let err = src.fetch(&mut http, &configured()).unwrap_err();
        assert_eq!(err, FetchError::MissingField("content"));
        assert!(!src.populated());
    }
}
