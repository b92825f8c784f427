//! Weather page: current conditions and a 3-day outlook for the configured
//! city, with a dust-mote overlay drifting around the text.
//!
//! Data comes from the wttr.in JSON endpoint. The current temperature and
//! description are required; the forecast block is best-effort and the page
//! renders without it.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::clock::Millis;
use crate::colors::WHITE;
use crate::config::{CENTER_X, HEADER_HEIGHT, HTTP_TIMEOUT_MS, REFRESH_WEATHER_MS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::fetch::{FetchError, HttpClient};
use crate::overlay::{Motion, ParticlePool, Region};
use crate::pages::Page;
use crate::scan;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_ACCENT, BODY_WHITE, CENTERED, SMALL_GRAY, VALUE_ACCENT};
use crate::widgets::chrome;

/// Number of orbiting dust motes.
const MOTE_COUNT: usize = 80;

/// Overlay frame interval; the motes run a touch slower than the other pools.
const MOTE_FRAME_MS: u32 = 40;

/// Mote palette, dim to bright as a depth cue.
static MOTE_COLORS: [Rgb565; 3] = [Rgb565::new(8, 16, 8), Rgb565::new(15, 31, 15), WHITE];

/// One forecast day from the outlook block.
#[derive(Clone, PartialEq, Debug)]
pub struct DayOutlook {
    /// `YYYY-MM-DD` as delivered.
    pub date: String,
    pub min_c: f64,
    pub max_c: f64,
}

#[derive(Default)]
struct WeatherCache {
    temp_c: Option<f64>,
    /// Description in the provider's language (English); localized at render.
    desc: Option<String>,
    outlook: Vec<DayOutlook>,
}

pub struct WeatherSource {
    cache: WeatherCache,
    motes: ParticlePool,
}

/// Keeps the header, the central reading and the outlook block clear of
/// motes. Must cover every pixel `render` puts text or separators on.
fn mote_protected(x: i32, y: i32) -> bool {
    if y < HEADER_HEIGHT as i32 {
        return true;
    }
    // Central temperature and description block
    if x >= 60 && x <= 420 && y >= 140 && y <= 330 {
        return true;
    }
    // Separator line plus the 3-day outlook rows, full width
    y >= 326 && y <= 452
}

impl WeatherSource {
    pub fn new(seed: u64) -> Self {
        Self {
            cache: WeatherCache::default(),
            motes: ParticlePool::new(
                MOTE_COUNT,
                Motion::Orbit { radius_min: 3.0, radius_max: 14.0, speed_min: 0.02, speed_max: 0.12 },
                Region::new(0, HEADER_HEIGHT as i32, SCREEN_WIDTH as i32 - 1, SCREEN_HEIGHT as i32 - 1),
                &MOTE_COLORS,
                crate::colors::COL_BG,
                mote_protected,
                MOTE_FRAME_MS,
                seed,
            ),
        }
    }

    #[cfg(test)]
    pub fn cached_temp(&self) -> Option<f64> {
        self.cache.temp_c
    }

    #[cfg(test)]
    pub fn cached_desc(&self) -> Option<&str> {
        self.cache.desc.as_deref()
    }
}

/// Translate a provider description into the display language.
///
/// Keyword match on the English text; unknown descriptions pass through
/// unchanged rather than rendering blank.
pub fn localize_desc(desc: &str, italian: bool) -> String {
    if !italian {
        return desc.to_string();
    }
    let lower = desc.to_ascii_lowercase();
    let translated = if lower.contains("thunder") {
        "temporale"
    } else if lower.contains("snow") || lower.contains("blizzard") {
        "nevoso"
    } else if lower.contains("rain") || lower.contains("drizzle") || lower.contains("shower") {
        "piovoso"
    } else if lower.contains("fog") || lower.contains("mist") || lower.contains("haze") {
        "nebbioso"
    } else if lower.contains("overcast") {
        "coperto"
    } else if lower.contains("cloud") {
        "nuvoloso"
    } else if lower.contains("sun") {
        "soleggiato"
    } else if lower.contains("clear") {
        "sereno"
    } else {
        return desc.to_string();
    };
    translated.to_string()
}

impl PageSource for WeatherSource {
    fn page(&self) -> Page {
        Page::Weather
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        Some(REFRESH_WEATHER_MS)
    }

    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError> {
        let url = format!("https://wttr.in/{}?format=j1", cfg.city);
        let body = http.get(&url, HTTP_TIMEOUT_MS)?;

        let current = scan::extract_object_block(&body, "current_condition")
            .ok_or(FetchError::MissingField("current_condition"))?;
        let temp_c =
            scan::find_number_value(current, "temp_C", 0).ok_or(FetchError::MissingField("temp_C"))?;
        let desc_at = scan::index_of_ci(current, "\"weatherDesc\"", 0)
            .ok_or(FetchError::MissingField("weatherDesc"))?;
        let desc = scan::find_string_value(current, "value", desc_at)
            .ok_or(FetchError::MissingField("weatherDesc.value"))?;

        // Outlook is best-effort; a truncated body still commits the reading
        let mut outlook = Vec::new();
        let mut at = scan::index_of_ci(&body, "\"weather\"", 0).unwrap_or(body.len());
        for _ in 0..3 {
            let Some(date) = scan::find_string_value(&body, "date", at) else { break };
            let Some(max_c) = scan::find_number_value(&body, "maxtempC", at) else { break };
            let Some(min_c) = scan::find_number_value(&body, "mintempC", at) else { break };
            outlook.push(DayOutlook { date, min_c, max_c });
            match scan::index_of_ci(&body, "\"mintempC\"", at) {
                Some(next) => at = next + 1,
                None => break,
            }
        }

        self.cache = WeatherCache {
            temp_c: Some(temp_c),
            desc: Some(scan::sanitize_text(&desc)),
            outlook,
        };
        Ok(())
    }

    fn populated(&self) -> bool {
        self.cache.temp_c.is_some()
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        let title = if cfg.italian() { "METEO" } else { "WEATHER" };
        chrome::draw_header(display, title, &cfg.city);

        let (Some(temp), Some(desc)) = (self.cache.temp_c, self.cache.desc.as_deref()) else {
            chrome::draw_placeholder(display, "waiting for wttr.in");
            return;
        };

        let mut line = format!("{temp:.0}c");
        Text::with_text_style(&line, Point::new(CENTER_X, 200), VALUE_ACCENT, CENTERED)
            .draw(display)
            .ok();

        line = localize_desc(desc, cfg.italian());
        Text::with_text_style(&line, Point::new(CENTER_X, 250), BODY_WHITE, CENTERED)
            .draw(display)
            .ok();

        if !self.cache.outlook.is_empty() {
            chrome::draw_separator(display, 330);
            Text::with_text_style("min / max", Point::new(CENTER_X, 348), SMALL_GRAY, CENTERED)
                .draw(display)
                .ok();
            let mut y = 375;
            for day in &self.cache.outlook {
                let row = format!("{}  {:>3.0} / {:<3.0}", day.date, day.min_c, day.max_c);
                Text::with_text_style(&row, Point::new(CENTER_X, y), BODY_ACCENT, CENTERED)
                    .draw(display)
                    .ok();
                y += 32;
            }
        }
    }

    fn overlay_tick(&mut self, display: &mut SimulatorDisplay<Rgb565>, now: Millis) -> bool {
        self.motes.tick(display, now)
    }

    fn overlay_leave(&mut self, display: &mut SimulatorDisplay<Rgb565>) {
        self.motes.erase_all(display);
        self.motes.reset();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::ScriptedHttp;
    use crate::metrics::{EventLog, Metrics};

    const BODY: &str = r#"{
        "current_condition": [{"temp_C": "18", "weatherDesc": [{"value": "Sunny"}]}],
        "weather": [
            {"date": "2026-08-25", "maxtempC": "24", "mintempC": "14"},
            {"date": "2026-08-26", "maxtempC": "22", "mintempC": "13"},
            {"date": "2026-08-27", "maxtempC": "19", "mintempC": "12"}
        ]
    }"#;

    fn ctx<'a>(metrics: &'a Metrics, events: &'a EventLog) -> RenderCtx<'a> {
        RenderCtx { now: Millis(0), metrics, events }
    }

    #[test]
    fn test_fetch_parses_current_and_outlook() {
        let mut http = ScriptedHttp::new().route("wttr.in/Lugano", BODY);
        let mut src = WeatherSource::new(1);
        src.fetch(&mut http, &Settings::default()).expect("fetch");
        assert_eq!(src.cached_temp(), Some(18.0));
        assert_eq!(src.cached_desc(), Some("Sunny"));
        assert_eq!(src.cache.outlook.len(), 3);
        assert_eq!(src.cache.outlook[0].max_c, 24.0);
        assert_eq!(src.cache.outlook[2].date, "2026-08-27");
    }

    #[test]
    fn test_fetch_requires_temperature() {
        let mut http = ScriptedHttp::new()
            .route("wttr.in", r#"{"current_condition":[{"weatherDesc":[{"value":"Sunny"}]}]}"#);
        let mut src = WeatherSource::new(1);
        let err = src.fetch(&mut http, &Settings::default()).unwrap_err();
        assert_eq!(err, FetchError::MissingField("temp_C"));
        assert!(!src.populated(), "failed fetch must not populate the cache");
    }

    #[test]
    fn test_failed_fetch_keeps_previous_cache() {
        let mut http = ScriptedHttp::new().route("wttr.in", BODY);
        let mut src = WeatherSource::new(1);
        src.fetch(&mut http, &Settings::default()).expect("first fetch");

        http.set_offline(true);
        assert!(src.fetch(&mut http, &Settings::default()).is_err());
        assert_eq!(src.cached_temp(), Some(18.0), "last-known-good must survive a failure");
    }

    #[test]
    fn test_localize_desc_italian() {
        assert_eq!(localize_desc("Sunny", true), "soleggiato");
        assert_eq!(localize_desc("Partly cloudy", true), "nuvoloso");
        assert_eq!(localize_desc("Thundery outbreaks", true), "temporale");
        assert_eq!(localize_desc("Sunny", false), "Sunny");
        assert_eq!(localize_desc("Volcanic ash", true), "Volcanic ash", "unknown text passes through");
    }

    #[test]
    fn test_render_placeholder_when_empty() {
        let mut d = SimulatorDisplay::with_default_color(
            Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            crate::colors::COL_BG,
        );
        let src = WeatherSource::new(1);
        let (m, e) = (Metrics::new(), EventLog::new());
        src.render(&mut d, &Settings::default(), &ctx(&m, &e));
        // Header is drawn even without data
        assert_eq!(d.get_pixel(Point::new(5, 5)), crate::colors::COL_HEADER);
    }

    #[test]
    fn test_mote_protection_covers_all_rendered_text() {
        assert!(mote_protected(240, 40), "header band is protected");
        assert!(mote_protected(240, 200), "central reading is protected");
        assert!(mote_protected(30, 330), "separator is protected across the full width");
        assert!(mote_protected(240, 400), "outlook rows are protected");
        assert!(!mote_protected(10, 120), "margins above the reading are open for motes");
        assert!(!mote_protected(240, 470), "bottom strip below the outlook is open");
    }

    #[test]
    fn test_overlay_leaves_outlook_text_intact() {
        let mut http = ScriptedHttp::new().route("wttr.in", BODY);
        let mut src = WeatherSource::new(9);
        src.fetch(&mut http, &Settings::default()).expect("fetch");

        let mut d = SimulatorDisplay::with_default_color(
            Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            crate::colors::COL_BG,
        );
        let (m, e) = (Metrics::new(), EventLog::new());
        src.render(&mut d, &Settings::default(), &ctx(&m, &e));

        // Snapshot the separator and outlook block, animate, leave, compare
        let mut before = Vec::new();
        for y in 320..=460 {
            for x in 0..SCREEN_WIDTH as i32 {
                before.push(d.get_pixel(Point::new(x, y)));
            }
        }
        for i in 0..300u32 {
            src.overlay_tick(&mut d, Millis(i * 40));
        }
        src.overlay_leave(&mut d);

        let mut idx = 0;
        for y in 320..=460 {
            for x in 0..SCREEN_WIDTH as i32 {
                assert_eq!(
                    d.get_pixel(Point::new(x, y)),
                    before[idx],
                    "outlook pixel ({x},{y}) was modified by the overlay"
                );
                idx += 1;
            }
        }
    }
}
