//! Crypto page: Bitcoin price in the configured fiat, 24h change, and an
//! optional holdings valuation.
//!
//! The previous price is committed only on a successful fetch, so the
//! up/down tint always compares two real readings and a render between
//! fetches never flips it.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::colors::{COL_DOWN, COL_UP, GREEN, RED};
use crate::config::{CENTER_X, HTTP_TIMEOUT_MS, REFRESH_MARKET_MS};
use crate::fetch::{FetchError, HttpClient};
use crate::pages::Page;
use crate::scan;
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx};
use crate::styles::{BODY_ACCENT, BODY_FONT, CENTERED, SMALL_GRAY, VALUE_ACCENT};
use crate::widgets::chrome;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BtcQuote {
    pub price: f64,
    /// 24h change in percent as reported by the API.
    pub change_24h: f64,
}

pub struct CryptoSource {
    cache: Option<BtcQuote>,
    /// Price from the fetch before the current one.
    prev_price: Option<f64>,
}

/// Format a fiat amount with thousands separators: `102345.6` → `102'345`.
pub fn format_fiat(amount: f64) -> String {
    let whole = amount.round() as i64;
    let negative = whole < 0;
    let mut digits = whole.unsigned_abs().to_string();
    let mut grouped = String::new();
    while digits.len() > 3 {
        let tail = digits.split_off(digits.len() - 3);
        grouped = if grouped.is_empty() { tail } else { format!("{tail}'{grouped}") };
    }
    grouped = if grouped.is_empty() { digits } else { format!("{digits}'{grouped}") };
    if negative { format!("-{grouped}") } else { grouped }
}

impl CryptoSource {
    pub fn new() -> Self {
        Self { cache: None, prev_price: None }
    }

    #[cfg(test)]
    pub fn cached(&self) -> Option<BtcQuote> {
        self.cache
    }

    #[cfg(test)]
    pub fn previous_price(&self) -> Option<f64> {
        self.prev_price
    }
}

impl Default for CryptoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for CryptoSource {
    fn page(&self) -> Page {
        Page::Crypto
    }

    fn refresh_interval_ms(&self) -> Option<u32> {
        Some(REFRESH_MARKET_MS)
    }

    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError> {
        let fiat = cfg.fiat.to_ascii_lowercase();
        let url = format!(
            "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies={fiat}&include_24hr_change=true"
        );
        let body = http.get(&url, HTTP_TIMEOUT_MS)?;

        let price =
            scan::find_number_value(&body, &fiat, 0).ok_or(FetchError::MissingField("price"))?;
        let change_key = format!("{fiat}_24h_change");
        let change_24h = scan::find_number_value(&body, &change_key, 0)
            .ok_or(FetchError::MissingField("24h_change"))?;

        // Commit the outgoing price as "previous" only now that the new one
        // parsed, so a failed fetch never shifts the comparison baseline
        self.prev_price = self.cache.map(|q| q.price);
        self.cache = Some(BtcQuote { price, change_24h });
        Ok(())
    }

    fn populated(&self) -> bool {
        self.cache.is_some()
    }

    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, _ctx: &RenderCtx) {
        chrome::draw_header(display, "BITCOIN", &cfg.fiat);

        let Some(quote) = self.cache else {
            chrome::draw_placeholder(display, "waiting for coingecko");
            return;
        };

        let price = format_fiat(quote.price);
        Text::with_text_style(&price, Point::new(CENTER_X, 200), VALUE_ACCENT, CENTERED)
            .draw(display)
            .ok();

        let change_color = if quote.change_24h >= 0.0 { GREEN } else { RED };
        let change = format!("{:+.1}% 24h", quote.change_24h);
        Text::with_text_style(
            &change,
            Point::new(CENTER_X, 250),
            MonoTextStyle::new(BODY_FONT, change_color),
            CENTERED,
        )
        .draw(display)
        .ok();

        // Tick direction against the previous fetch, when there was one
        if let Some(prev) = self.prev_price {
            let (glyph, color) =
                if quote.price >= prev { ("^", COL_UP) } else { ("v", COL_DOWN) };
            Text::with_text_style(
                glyph,
                Point::new(CENTER_X + 120, 200),
                MonoTextStyle::new(BODY_FONT, color),
                CENTERED,
            )
            .draw(display)
            .ok();
        }

        if let Some(owned) = cfg.btc_owned {
            chrome::draw_separator(display, 310);
            let value = format_fiat(quote.price * owned);
            let line = format!("{owned:.4} BTC = {value} {}", cfg.fiat);
            Text::with_text_style(&line, Point::new(CENTER_X, 350), BODY_ACCENT, CENTERED)
                .draw(display)
                .ok();
        }

        let src = if cfg.italian() { "fonte: coingecko" } else { "source: coingecko" };
        Text::with_text_style(src, Point::new(CENTER_X, 440), SMALL_GRAY, CENTERED)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
