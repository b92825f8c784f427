//! Temperature-trend page: a week of daily mean temperatures resampled to a
//! smooth 24-point curve with min/max labels.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::colors::COL_ACCENT2;
use crate::config::{CENTER_X, HTTP_TIMEOUT_MS, REFRESH_TEMP24_MS};
use crate::fetch::{FetchError, HttpClient};
use crate::pages::Page;
use crate::scan;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_WHITE, CENTERED, LEFT_ALIGNED, RIGHT_ALIGNED, SMALL_GRAY};
use crate::widgets::{chrome, graph};

/// Number of points the daily series is resampled to.
pub const CURVE_POINTS: usize = 24;

/// Linearly resample `samples` to [`CURVE_POINTS`] points.
///
/// Needs at least two input samples; the endpoints are preserved exactly.
pub fn resample(samples: &[f32]) -> Option<Vec<f32>> {
    if samples.len() < 2 {
        return None;
    }
    let step = (samples.len() - 1) as f32 / (CURVE_POINTS - 1) as f32;
    let mut out = Vec::with_capacity(CURVE_POINTS);
    for i in 0..CURVE_POINTS {
        let pos = i as f32 * step;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(samples.len() - 1);
        let frac = pos - lo as f32;
        out.push(samples[lo] * (1.0 - frac) + samples[hi] * frac);
    }
    Some(out)
}

pub struct Temp24Source {
    curve: Option<Vec<f32>>,
}

impl Temp24Source {
    pub fn new() -> Self {
        Self { curve: None }
    }

    #[cfg(test)]
    pub fn cached(&self) -> Option<&[f32]> {
        self.curve.as_deref()
    }
}

impl Default for Temp24Source {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for Temp24Source {
    fn page(&self) -> Page {
        Page::Temp24
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        Some(REFRESH_TEMP24_MS)
    }

    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError> {
        let (lat, lon) = cfg.coordinates().ok_or(FetchError::ConfigMissing("coordinates"))?;
        let url = format!(
            "https://api.open-meteo.com/v1/forecast?latitude={lat}&longitude={lon}&daily=temperature_2m_mean&forecast_days=7"
        );
        let body = http.get(&url, HTTP_TIMEOUT_MS)?;
        let daily =
            scan::extract_object_block(&body, "daily").ok_or(FetchError::MissingField("daily"))?;
        let means: Vec<f32> = scan::array_numbers(daily, "temperature_2m_mean")
            .into_iter()
            .map(|v| v as f32)
            .collect();

        self.curve = Some(
            resample(&means).ok_or(FetchError::MissingField("temperature_2m_mean"))?,
        );
        Ok(())
    }

    fn populated(&self) -> bool {
        self.curve.is_some()
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        let title = if cfg.italian() { "TENDENZA" } else { "TEMP TREND" };
        chrome::draw_header(display, title, &cfg.city);

        let Some(curve) = self.curve.as_deref() else {
            chrome::draw_placeholder(display, "waiting for open-meteo");
            return;
        };

        graph::draw_line_graph(display, 40, 140, 400, 220, curve, COL_ACCENT2);

        let min = curve.iter().copied().fold(f32::INFINITY, f32::min);
        let max = curve.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let min_label = format!("min {min:.1}c");
        let max_label = format!("max {max:.1}c");
        Text::with_text_style(&min_label, Point::new(40, 400), BODY_WHITE, LEFT_ALIGNED)
            .draw(display)
            .ok();
        Text::with_text_style(&max_label, Point::new(440, 400), BODY_WHITE, RIGHT_ALIGNED)
            .draw(display)
            .ok();
        Text::with_text_style("7 days", Point::new(CENTER_X, 440), SMALL_GRAY, CENTERED)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
