//! Exchange-rate page: the configured fiat against eight currencies, with a
//! falling-drops overlay down the right-hand column.
//!
//! Rates come from the frankfurter API. Each row keeps its previous value so
//! the tint shows which way the rate moved between fetches; a row whose
//! symbol is missing from the response keeps its last value rather than
//! blanking out.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::clock::Millis;
use crate::colors::{COL_DOWN, COL_UP, GREEN, YELLOW};
use crate::config::{HEADER_HEIGHT, HTTP_TIMEOUT_MS, REFRESH_MARKET_MS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::fetch::{FetchError, HttpClient};
use crate::overlay::{Motion, ParticlePool, Region};
use crate::pages::Page;
use crate::scan;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_FONT, BODY_WHITE, LEFT_ALIGNED, RIGHT_ALIGNED};
use crate::widgets::chrome;

/// Quote currencies shown, in row order.
pub const FX_SYMBOLS: [&str; 8] = ["EUR", "USD", "GBP", "JPY", "CNY", "PLN", "CZK", "SEK"];

/// Left edge of the drop column; rate rows stay left of it.
const DROP_COLUMN_X: i32 = 280;

/// Number of falling drops.
const DROP_COUNT: usize = 22;

static DROP_COLORS: [Rgb565; 2] = [GREEN, YELLOW];

#[derive(Clone, Copy, Default, Debug)]
struct FxRow {
    rate: Option<f64>,
    prev: Option<f64>,
}

pub struct FxSource {
    rows: [FxRow; FX_SYMBOLS.len()],
    drops: ParticlePool,
}

/// Drops own the right column below the header; rows are protected.
fn drop_protected(x: i32, y: i32) -> bool {
    y < HEADER_HEIGHT as i32 || x < DROP_COLUMN_X
}

/// Row tint by direction against the previous fetch; white until a second
/// fetch establishes a baseline.
fn row_color(rate: f64, prev: Option<f64>) -> Rgb565 {
    match prev {
        Some(prev) if rate > prev => COL_UP,
        Some(prev) if rate < prev => COL_DOWN,
        _ => crate::colors::WHITE,
    }
}

impl FxSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rows: Default::default(),
            drops: ParticlePool::new(
                DROP_COUNT,
                Motion::Fall { vy_min: 2.0, vy_max: 7.0 },
                Region::new(
                    DROP_COLUMN_X,
                    HEADER_HEIGHT as i32,
                    SCREEN_WIDTH as i32 - 1,
                    SCREEN_HEIGHT as i32 - 1,
                ),
                &DROP_COLORS,
                crate::colors::COL_BG,
                drop_protected,
                crate::config::OVERLAY_FRAME_MS,
                seed,
            ),
        }
    }

    #[cfg(test)]
    pub fn rate(&self, symbol: &str) -> Option<f64> {
        let idx = FX_SYMBOLS.iter().position(|s| *s == symbol)?;
        self.rows[idx].rate
    }

    #[cfg(test)]
    pub fn previous(&self, symbol: &str) -> Option<f64> {
        let idx = FX_SYMBOLS.iter().position(|s| *s == symbol)?;
        self.rows[idx].prev
    }
}

impl PageSource for FxSource {
    fn page(&self) -> Page {
        Page::Fx
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        Some(REFRESH_MARKET_MS)
    }

    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError> {
        let url = format!("https://api.frankfurter.app/latest?from={}", cfg.fiat);
        let body = http.get(&url, HTTP_TIMEOUT_MS)?;
        let rates =
            scan::extract_object_block(&body, "rates").ok_or(FetchError::MissingField("rates"))?;

        let mut any = false;
        for (idx, symbol) in FX_SYMBOLS.iter().enumerate() {
            if let Some(rate) = scan::find_number_value(rates, symbol, 0) {
                let row = &mut self.rows[idx];
                row.prev = row.rate;
                row.rate = Some(rate);
                any = true;
            }
            // A missing symbol keeps its previous value and tint
        }
        if !any {
            return Err(FetchError::MissingField("rates"));
        }
        Ok(())
    }

    fn populated(&self) -> bool {
        self.rows.iter().any(|row| row.rate.is_some())
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        let subtitle = if cfg.italian() { format!("cambi {}", cfg.fiat) } else { format!("{} rates", cfg.fiat) };
        chrome::draw_header(display, "EXCHANGE", &subtitle);

        if !self.populated() {
            chrome::draw_placeholder(display, "waiting for frankfurter");
            return;
        }

        let mut y = 130;
        for (idx, symbol) in FX_SYMBOLS.iter().enumerate() {
            let row = self.rows[idx];
            let Some(rate) = row.rate else { continue };

            Text::with_text_style(symbol, Point::new(40, y), BODY_WHITE, LEFT_ALIGNED)
                .draw(display)
                .ok();

            let color = row_color(rate, row.prev);
            let value = format!("{rate:.4}");
            Text::with_text_style(
                &value,
                Point::new(DROP_COLUMN_X - 20, y),
                MonoTextStyle::new(BODY_FONT, color),
                RIGHT_ALIGNED,
            )
            .draw(display)
            .ok();
            y += 40;
        }
    }

    fn overlay_tick(&mut self, display: &mut SimulatorDisplay<Rgb565>, now: Millis) -> bool {
        self.drops.tick(display, now)
    }

    fn overlay_leave(&mut self, display: &mut SimulatorDisplay<Rgb565>) {
        self.drops.erase_all(display);
        self.drops.reset();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
