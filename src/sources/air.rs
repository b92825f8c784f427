//! Air-quality page: four pollutant readings, a worst-case verdict, and a
//! drifting-leaves overlay along the bottom of the screen.
//!
//! Data comes from the open-meteo air-quality endpoint. All four pollutants
//! are required; a body missing any of them fails the fetch and keeps the
//! previous readings, so the four values on screen always came from the same
//! response.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::clock::Millis;
use crate::colors::{GREEN, ORANGE, RED};
use crate::config::{CENTER_X, HTTP_TIMEOUT_MS, REFRESH_AIR_MS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::fetch::{FetchError, HttpClient};
use crate::overlay::{Motion, ParticlePool, Region};
use crate::pages::Page;
use crate::scan;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_FONT, BODY_WHITE, CENTERED, LEFT_ALIGNED, RIGHT_ALIGNED};
use crate::widgets::chrome;

/// Number of drifting leaves.
const LEAF_COUNT: usize = 45;

/// Top of the leaf band; readings render above this line.
const LEAF_BAND_TOP: i32 = 330;

static LEAF_COLORS: [Rgb565; 3] =
    [Rgb565::new(4, 30, 2), Rgb565::new(8, 45, 4), Rgb565::new(20, 45, 4)];

/// Air quality verdict, worst category across all pollutants.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AirVerdict {
    Good,
    Fair,
    Poor,
}

impl AirVerdict {
    pub fn label(self, italian: bool) -> &'static str {
        match (self, italian) {
            (AirVerdict::Good, false) => "Good",
            (AirVerdict::Good, true) => "Buona",
            (AirVerdict::Fair, false) => "Fair",
            (AirVerdict::Fair, true) => "Discreta",
            (AirVerdict::Poor, false) => "Poor",
            (AirVerdict::Poor, true) => "Scarsa",
        }
    }

    pub const fn color(self) -> Rgb565 {
        match self {
            AirVerdict::Good => GREEN,
            AirVerdict::Fair => ORANGE,
            AirVerdict::Poor => RED,
        }
    }

    const fn worse(self, other: AirVerdict) -> AirVerdict {
        if self as u8 >= other as u8 { self } else { other }
    }
}

/// One pollutant's categorization thresholds (ug/m3, EAQI-style bands).
fn categorize(value: f64, fair_at: f64, poor_at: f64) -> AirVerdict {
    if value < fair_at {
        AirVerdict::Good
    } else if value < poor_at {
        AirVerdict::Fair
    } else {
        AirVerdict::Poor
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AirReadings {
    pub pm10: f64,
    pub pm2_5: f64,
    pub no2: f64,
    pub o3: f64,
}

impl AirReadings {
    /// Worst category across the four pollutants.
    pub fn verdict(&self) -> AirVerdict {
        categorize(self.pm2_5, 10.0, 25.0)
            .worse(categorize(self.pm10, 20.0, 50.0))
            .worse(categorize(self.no2, 40.0, 120.0))
            .worse(categorize(self.o3, 60.0, 140.0))
    }
}

pub struct AirQualitySource {
    cache: Option<AirReadings>,
    leaves: ParticlePool,
}

/// Leaves stay inside their bottom band; everything above it is content.
fn leaf_protected(_x: i32, y: i32) -> bool {
    y < LEAF_BAND_TOP
}

impl AirQualitySource {
    pub fn new(seed: u64) -> Self {
        Self {
            cache: None,
            leaves: ParticlePool::new(
                LEAF_COUNT,
                Motion::Drift { vx_max: 1.4, vy_max: 0.5 },
                Region::new(0, LEAF_BAND_TOP, SCREEN_WIDTH as i32 - 1, SCREEN_HEIGHT as i32 - 1),
                &LEAF_COLORS,
                crate::colors::COL_BG,
                leaf_protected,
                crate::config::OVERLAY_FRAME_MS,
                seed,
            ),
        }
    }

    #[cfg(test)]
    pub fn cached(&self) -> Option<AirReadings> {
        self.cache
    }
}

impl PageSource for AirQualitySource {
    fn page(&self) -> Page {
        Page::AirQuality
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        Some(REFRESH_AIR_MS)
    }

    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError> {
        let (lat, lon) = cfg.coordinates().ok_or(FetchError::ConfigMissing("coordinates"))?;
        let url = format!(
            "https://air-quality-api.open-meteo.com/v1/air-quality?latitude={lat}&longitude={lon}&hourly=pm10,pm2_5,nitrogen_dioxide,ozone"
        );
        let body = http.get(&url, HTTP_TIMEOUT_MS)?;
        let hourly =
            scan::extract_object_block(&body, "hourly").ok_or(FetchError::MissingField("hourly"))?;

        // All four or nothing, so the verdict never mixes fetches
        let pm10 = scan::first_array_number(hourly, "pm10").ok_or(FetchError::MissingField("pm10"))?;
        let pm2_5 =
            scan::first_array_number(hourly, "pm2_5").ok_or(FetchError::MissingField("pm2_5"))?;
        let no2 = scan::first_array_number(hourly, "nitrogen_dioxide")
            .ok_or(FetchError::MissingField("nitrogen_dioxide"))?;
        let o3 = scan::first_array_number(hourly, "ozone").ok_or(FetchError::MissingField("ozone"))?;

        self.cache = Some(AirReadings { pm10, pm2_5, no2, o3 });
        Ok(())
    }

    fn populated(&self) -> bool {
        self.cache.is_some()
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        let title = if cfg.italian() { "ARIA" } else { "AIR QUALITY" };
        chrome::draw_header(display, title, &cfg.city);

        let Some(readings) = self.cache else {
            chrome::draw_placeholder(display, "waiting for open-meteo");
            return;
        };

        let rows = [
            ("PM10", readings.pm10),
            ("PM2.5", readings.pm2_5),
            ("NO2", readings.no2),
            ("O3", readings.o3),
        ];
        let mut y = 130;
        for (label, value) in rows {
            Text::with_text_style(label, Point::new(90, y), BODY_WHITE, LEFT_ALIGNED)
                .draw(display)
                .ok();
            let val = format!("{value:.1}");
            Text::with_text_style(&val, Point::new(390, y), BODY_WHITE, RIGHT_ALIGNED)
                .draw(display)
                .ok();
            y += 36;
        }

        let verdict = readings.verdict();
        let style = MonoTextStyle::new(BODY_FONT, verdict.color());
        Text::with_text_style(
            verdict.label(cfg.italian()),
            Point::new(CENTER_X, 300),
            style,
            CENTERED,
        )
        .draw(display)
        .ok();
    }

    fn overlay_tick(&mut self, display: &mut SimulatorDisplay<Rgb565>, now: Millis) -> bool {
        self.leaves.tick(display, now)
    }

    fn overlay_leave(&mut self, display: &mut SimulatorDisplay<Rgb565>) {
        self.leaves.erase_all(display);
        self.leaves.reset();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::ScriptedHttp;

    const BODY: &str = r#"{
        "hourly": {
            "pm10": [18.3, 20.0],
            "pm2_5": [7.8],
            "nitrogen_dioxide": [22.5],
            "ozone": [55.0]
        }
    }"#;

    fn settings_with_coords() -> Settings {
        Settings { latitude: Some(46.0), longitude: Some(8.95), ..Settings::default() }
    }

    #[test]
    fn test_fetch_commits_all_four() {
        let mut http = ScriptedHttp::new().route("air-quality", BODY);
        let mut src = AirQualitySource::new(1);
        src.fetch(&mut http, &settings_with_coords()).expect("fetch");
        let r = src.cached().expect("readings");
        assert_eq!(r.pm10, 18.3);
        assert_eq!(r.pm2_5, 7.8);
        assert_eq!(r.no2, 22.5);
        assert_eq!(r.o3, 55.0);
    }

    #[test]
    fn test_fetch_is_atomic() {
        // Missing ozone: nothing may be committed
        let partial = r#"{"hourly":{"pm10":[18.3],"pm2_5":[7.8],"nitrogen_dioxide":[22.5]}}"#;
        let mut http = ScriptedHttp::new().route("air-quality", partial);
        let mut src = AirQualitySource::new(1);
        let err = src.fetch(&mut http, &settings_with_coords()).unwrap_err();
        assert_eq!(err, FetchError::MissingField("ozone"));
        assert!(src.cached().is_none(), "partial data must not be committed");
    }

    #[test]
    fn test_fetch_requires_coordinates() {
        let mut http = ScriptedHttp::new().route("air-quality", BODY);
        let mut src = AirQualitySource::new(1);
        let err = src.fetch(&mut http, &Settings::default()).unwrap_err();
        assert_eq!(err, FetchError::ConfigMissing("coordinates"));
        assert!(http.requests().is_empty(), "no request without coordinates");
    }

    #[test]
    fn test_verdict_is_worst_category() {
        let clean = AirReadings { pm10: 5.0, pm2_5: 3.0, no2: 10.0, o3: 20.0 };
        assert_eq!(clean.verdict(), AirVerdict::Good);

        // One elevated pollutant drags the verdict down
        let one_bad = AirReadings { pm2_5: 30.0, ..clean };
        assert_eq!(one_bad.verdict(), AirVerdict::Poor);

        let fair = AirReadings { pm10: 35.0, ..clean };
        assert_eq!(fair.verdict(), AirVerdict::Fair);
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(AirVerdict::Good.label(false), "Good");
        assert_eq!(AirVerdict::Good.label(true), "Buona");
        assert_eq!(AirVerdict::Poor.label(true), "Scarsa");
    }

    #[test]
    fn test_leaf_band_protection() {
        assert!(leaf_protected(240, 100), "content area is protected from leaves");
        assert!(!leaf_protected(240, 400), "leaf band is open");
    }
}
