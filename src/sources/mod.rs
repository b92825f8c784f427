//! Page behavior behind one trait.
//!
//! Every rotating page implements [`PageSource`]: an optional network fetch
//! into an owned cache, a full-screen render from that cache, and an optional
//! animation overlay. The scheduler drives all pages uniformly through this
//! trait and never learns page-specific details; adding a page means adding a
//! module here and a line in [`build_sources`].
//!
//! # Cache Discipline
//!
//! Fetch never partially commits: a page either updates its whole cache or
//! returns an error and leaves the previous cache intact. Render reads only
//! the cache, so it stays deterministic between fetches.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::clock::Millis;
use crate::fetch::{FetchError, HttpClient};
use crate::metrics::{EventLog, Metrics};
use crate::pages::{ALL_PAGES, Page};
use crate::settings::Settings;

pub mod air;
pub mod calendar;
pub mod clock;
pub mod countdown;
pub mod crypto;
pub mod fx;
pub mod info;
pub mod news;
pub mod quote;
pub mod sun;
pub mod temp24;
pub mod weather;

/// Scheduler state handed to renderers alongside the settings snapshot.
pub struct RenderCtx<'a> {
    /// Current tick instant.
    pub now: Millis,
    /// Boot-to-date counters, shown on the Info page.
    pub metrics: &'a Metrics,
    /// Recent scheduler events, shown on the Info page.
    pub events: &'a EventLog,
}

/// One rotating page: fetch, render, and optional overlay animation.
pub trait PageSource {
    /// Which page this source implements.
    fn page(&self) -> Page;

    /// Minimum interval between fetch attempts, or `None` for pages that
    /// render purely from settings and the clock.
    fn refresh_interval_ms(&self) -> Option<u32>;

    /// Refresh the cache from the network. Errors leave the cache untouched.
    fn fetch(&mut self, http: &mut dyn HttpClient, cfg: &Settings) -> Result<(), FetchError>;

    /// True once the cache holds displayable data.
    fn populated(&self) -> bool;

    /// Full-screen render from the cache. An unpopulated cache renders the
    /// page chrome plus a placeholder, never stale or invented values.
    fn render(&self, display: &mut SimulatorDisplay<Rgb565>, cfg: &Settings, ctx: &RenderCtx);

    /// Advance the overlay animation one frame. Returns true when a frame
    /// was drawn. Pages without an overlay keep the default no-op.
    fn overlay_tick(&mut self, _display: &mut SimulatorDisplay<Rgb565>, _now: Millis) -> bool {
        false
    }

    /// Erase overlay artifacts and reset animation state; called when the
    /// scheduler leaves this page.
    fn overlay_leave(&mut self, _display: &mut SimulatorDisplay<Rgb565>) {}
}

/// Build one source per page, indexed by [`Page::index`].
///
/// `seed` feeds the overlay RNGs so the simulator and tests can be
/// deterministic.
pub fn build_sources(seed: u64) -> Vec<Box<dyn PageSource>> {
    let sources: Vec<Box<dyn PageSource>> = vec![
        Box::new(weather::WeatherSource::new(seed)),
        Box::new(air::AirQualitySource::new(seed.wrapping_add(1))),
        Box::new(clock::ClockSource::new()),
        Box::new(calendar::CalendarSource::new()),
        Box::new(crypto::CryptoSource::new()),
        Box::new(quote::QuoteSource::new()),
        Box::new(info::InfoSource::new()),
        Box::new(countdown::CountdownSource::new()),
        Box::new(fx::FxSource::new(seed.wrapping_add(2))),
        Box::new(temp24::Temp24Source::new()),
        Box::new(sun::SunSource::new()),
        Box::new(news::NewsSource::new()),
    ];
    debug_assert_eq!(sources.len(), ALL_PAGES.len());
    sources
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_indexed_by_page() {
        let sources = build_sources(1);
        assert_eq!(sources.len(), ALL_PAGES.len());
        for page in ALL_PAGES {
            assert_eq!(
                sources[page.index()].page(),
                page,
                "source at index {} must implement {:?}",
                page.index(),
                page
            );
        }
    }

    #[test]
    fn test_render_only_pages_have_no_interval() {
        let sources = build_sources(1);
        for page in [Page::Clock, Page::Info, Page::Countdowns] {
            assert_eq!(
                sources[page.index()].refresh_interval_ms(),
                None,
                "{page:?} renders from local state only"
            );
        }
        for page in [Page::Weather, Page::Fx, Page::News] {
            assert!(sources[page.index()].refresh_interval_ms().is_some());
        }
    }
}
