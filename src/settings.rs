//! Device configuration snapshot.
//!
//! Everything here is owned by the settings collaborator (web UI + persisted
//! storage, out of scope for this core) and injected by reference into every
//! fetch/render call. The core never mutates it; when the collaborator does,
//! it signals the scheduler through
//! [`Scheduler::request_refresh`](crate::scheduler::Scheduler::request_refresh)
//! so caches are invalidated on the next opportunity.
//!
//! Optional values use `Option` rather than empty-string sentinels so a
//! fetcher can short-circuit with `ConfigMissing` without guessing.

use crate::clock::Millis;
use crate::config::DEFAULT_PAGE_INTERVAL_MS;
use crate::pages::PageVisibility;

/// Display language for page text.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Language {
    #[default]
    English,
    Italian,
}

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Italian => "it",
        }
    }
}

/// One configured countdown target.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CountdownEvent {
    /// Display name; empty slots are skipped.
    pub name: String,
    /// Target in `"YYYY-MM-DD HH:MM"` local time.
    pub when: String,
}

/// Maximum number of configured countdown events.
pub const COUNTDOWN_SLOTS: usize = 8;

/// Read-only configuration snapshot handed to fetchers and renderers.
#[derive(Clone, Debug)]
pub struct Settings {
    pub language: Language,
    /// City used by the weather page and shown in headers.
    pub city: String,
    /// Geocoded coordinates for the air/sun/temp24 pages.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Base currency for the fx and crypto pages.
    pub fiat: String,
    /// BTC holdings shown on the crypto page; `None` hides the valuation.
    pub btc_owned: Option<f64>,
    /// ICS calendar URL.
    pub ics_url: Option<String>,
    /// RSS feed URL for the news page.
    pub rss_url: Option<String>,
    /// OpenAI credentials for quote-of-the-day generation.
    pub openai_key: Option<String>,
    pub openai_topic: Option<String>,
    pub countdowns: [CountdownEvent; COUNTDOWN_SLOTS],
    /// Which pages participate in rotation.
    pub pages: PageVisibility,
    /// Milliseconds each page stays on screen.
    pub page_interval_ms: u32,
    /// Instant the firmware booted, for the Info page uptime line.
    pub boot_time: Millis,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::English,
            city: "Lugano".to_string(),
            latitude: None,
            longitude: None,
            fiat: "CHF".to_string(),
            btc_owned: None,
            ics_url: None,
            rss_url: None,
            openai_key: None,
            openai_topic: None,
            countdowns: Default::default(),
            pages: PageVisibility::all(),
            page_interval_ms: DEFAULT_PAGE_INTERVAL_MS,
            boot_time: Millis(0),
        }
    }
}

impl Settings {
    /// True when the language is Italian; pages pick IT/EN strings off this.
    #[inline]
    pub fn italian(&self) -> bool {
        self.language == Language::Italian
    }

    /// Coordinates as a pair, or `None` when either half is unset.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
