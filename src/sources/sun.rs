//! Sunrise/sunset page for the configured coordinates.
//!
//! Both times are required from the same response; committing only one would
//! show a sunrise and a sunset from different days.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::config::{CENTER_X, HTTP_TIMEOUT_MS, REFRESH_SUN_MS};
use crate::fetch::{FetchError, HttpClient};
use crate::pages::Page;
use crate::scan;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_ACCENT, BODY_WHITE, CENTERED, SMALL_GRAY, VALUE_WHITE};
use crate::widgets::chrome;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SunTimes {
    /// `HH:MM` in UTC as delivered by the API.
    pub sunrise: String,
    pub sunset: String,
    /// Day length in seconds, when present in the response.
    pub day_length_s: Option<u32>,
}

/// Pull `HH:MM` out of an ISO-8601 timestamp (`2026-08-25T04:31:07+00:00`).
pub fn clock_part(iso: &str) -> Option<String> {
    let t = iso.find('T')?;
    let rest = &iso[t + 1..];
    if rest.len() < 5 || !rest.as_bytes()[2].eq(&b':') {
        return None;
    }
    Some(rest[..5].to_string())
}

pub struct SunSource {
    cache: Option<SunTimes>,
}

impl SunSource {
    pub fn new() -> Self {
        Self { cache: None }
    }

    #[cfg(test)]
    pub fn cached(&self) -> Option<&SunTimes> {
        self.cache.as_ref()
    }
}

impl Default for SunSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for SunSource {
    fn page(&self) -> Page {
        Page::Sun
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        Some(REFRESH_SUN_MS)
    }

    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError> {
        let (lat, lon) = cfg.coordinates().ok_or(FetchError::ConfigMissing("coordinates"))?;
        let url = format!("https://api.sunrise-sunset.org/json?lat={lat}&lng={lon}&formatted=0");
        let body = http.get(&url, HTTP_TIMEOUT_MS)?;

        // Both from the same body or nothing
        let sunrise = scan::find_string_value(&body, "sunrise", 0)
            .and_then(|iso| clock_part(&iso))
            .ok_or(FetchError::MissingField("sunrise"))?;
        let sunset = scan::find_string_value(&body, "sunset", 0)
            .and_then(|iso| clock_part(&iso))
            .ok_or(FetchError::MissingField("sunset"))?;
        let day_length_s = scan::find_number_value(&body, "day_length", 0).map(|v| v as u32);

        self.cache = Some(SunTimes { sunrise, sunset, day_length_s });
        Ok(())
    }

    fn populated(&self) -> bool {
        self.cache.is_some()
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        let title = if cfg.italian() { "SOLE" } else { "SUN" };
        chrome::draw_header(display, title, &cfg.city);

        let Some(times) = self.cache.as_ref() else {
            chrome::draw_placeholder(display, "waiting for sunrise-sunset");
            return;
        };

        let rise_label = if cfg.italian() { "alba" } else { "sunrise" };
        Text::with_text_style(rise_label, Point::new(CENTER_X, 150), BODY_ACCENT, CENTERED)
            .draw(display)
            .ok();
        Text::with_text_style(&times.sunrise, Point::new(CENTER_X, 195), VALUE_WHITE, CENTERED)
            .draw(display)
            .ok();

        let set_label = if cfg.italian() { "tramonto" } else { "sunset" };
        Text::with_text_style(set_label, Point::new(CENTER_X, 270), BODY_ACCENT, CENTERED)
            .draw(display)
            .ok();
        Text::with_text_style(&times.sunset, Point::new(CENTER_X, 315), VALUE_WHITE, CENTERED)
            .draw(display)
            .ok();

        if let Some(len) = times.day_length_s {
            let line = format!("{}h {:02}m of daylight", len / 3600, (len % 3600) / 60);
            Text::with_text_style(&line, Point::new(CENTER_X, 380), BODY_WHITE, CENTERED)
                .draw(display)
                .ok();
        }
        Text::with_text_style("UTC", Point::new(CENTER_X, 440), SMALL_GRAY, CENTERED)
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

    const BODY: &str = r#"{"results":{"sunrise":"2026-08-25T04:31:07+00:00","sunset":"2026-08-25T18:12:44+00:00","day_length":49297},"status":"OK"}"#;

    fn settings_with_coords() -> Settings {
        Settings { latitude: Some(46.0), longitude: Some(8.95), ..Settings::default() }
    }

    #[test]
    fn test_clock_part() {
        assert_eq!(clock_part("2026-08-25T04:31:07+00:00").as_deref(), Some("04:31"));
        assert_eq!(clock_part("no timestamp"), None);
        assert_eq!(clock_part("2026-08-25T4:3"), None, "malformed time is rejected");
    }

    #[test]
    fn test_fetch_parses_both_times() {
        let mut http = ScriptedHttp::new().route("sunrise-sunset", BODY);
        let mut src = SunSource::new();
        src.fetch(&mut http, &settings_with_coords()).expect("fetch");
        let times = src.cached().expect("times");
        assert_eq!(times.sunrise, "04:31");
        assert_eq!(times.sunset, "18:12");
        assert_eq!(times.day_length_s, Some(49297));
    }

    #[test]
    fn test_fetch_requires_both_times() {
        let partial = r#"{"results":{"sunrise":"2026-08-25T04:31:07+00:00"},"status":"OK"}"#;
        let mut http = ScriptedHttp::new().route("sunrise-sunset", partial);
        let mut src = SunSource::new();
        let err = src.fetch(&mut http, &settings_with_coords()).unwrap_err();
        assert_eq!(err, FetchError::MissingField("sunset"));
        assert!(src.cached().is_none(), "one-sided data must not be committed");
    }

    #[test]
    fn test_fetch_requires_coordinates() {
        let mut http = ScriptedHttp::new().route("sunrise-sunset", BODY);
        let mut src = SunSource::new();
        let err = src.fetch(&mut http, &Settings::default()).unwrap_err();
        assert_eq!(err, FetchError::ConfigMissing("coordinates"));
    }
}
