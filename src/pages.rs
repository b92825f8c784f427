//! Page identifiers and the enabled-page visibility mask.
//!
//! The page set is closed and ordered: rotation order is exactly enumeration
//! order filtered by the visibility mask. The mask is owned by the settings
//! layer (the web UI mutates it); the scheduler only reads it through the
//! selection operations below, all of which terminate in at most
//! [`PAGE_COUNT`] steps even when every page is disabled.

/// Total number of pages.
pub const PAGE_COUNT: usize = 12;

/// One rotating screen of content.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[repr(usize)]
pub enum Page {
    #[default]
    Weather = 0,
    AirQuality,
    Clock,
    Calendar,
    Crypto,
    QuoteOfDay,
    Info,
    Countdowns,
    Fx,
    Temp24,
    Sun,
    News,
}

/// All pages in rotation order.
pub const ALL_PAGES: [Page; PAGE_COUNT] = [
    Page::Weather,
    Page::AirQuality,
    Page::Clock,
    Page::Calendar,
    Page::Crypto,
    Page::QuoteOfDay,
    Page::Info,
    Page::Countdowns,
    Page::Fx,
    Page::Temp24,
    Page::Sun,
    Page::News,
];

impl Page {
    /// Stable index into per-page arrays (equals the enum discriminant).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Next page in rotation order, wrapping after the last.
    #[inline]
    pub const fn next(self) -> Page {
        ALL_PAGES[(self.index() + 1) % PAGE_COUNT]
    }

    /// Short identifier used in logs and on the Info page.
    pub const fn name(self) -> &'static str {
        match self {
            Page::Weather => "weather",
            Page::AirQuality => "air",
            Page::Clock => "clock",
            Page::Calendar => "calendar",
            Page::Crypto => "crypto",
            Page::QuoteOfDay => "quote",
            Page::Info => "info",
            Page::Countdowns => "countdowns",
            Page::Fx => "fx",
            Page::Temp24 => "temp24",
            Page::Sun => "sun",
            Page::News => "news",
        }
    }
}

// =============================================================================
// Visibility Mask
// =============================================================================

/// Bitmask of enabled pages, one bit per [`Page`] in enumeration order.
///
/// Owned by [`Settings`](crate::settings::Settings); the scheduler treats it
/// as read-only. The `u16` representation round-trips through the settings
/// web UI.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PageVisibility(u16);

impl PageVisibility {
    /// All pages enabled.
    pub const fn all() -> Self {
        Self((1 << PAGE_COUNT) - 1)
    }

    /// No pages enabled.
    #[allow(dead_code)]
    pub const fn none() -> Self {
        Self(0)
    }

    /// Exactly one page enabled.
    #[allow(dead_code)]
    pub const fn only(page: Page) -> Self {
        Self(1 << page.index())
    }

    /// Rebuild from a persisted mask; bits above [`PAGE_COUNT`] are ignored.
    pub const fn from_mask(mask: u16) -> Self {
        Self(mask & ((1 << PAGE_COUNT) - 1))
    }

    #[allow(dead_code)]
    pub const fn mask(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn enabled(self, page: Page) -> bool {
        self.0 & (1 << page.index()) != 0
    }

    pub const fn set(&mut self, page: Page, on: bool) {
        if on {
            self.0 |= 1 << page.index();
        } else {
            self.0 &= !(1 << page.index());
        }
    }

    /// Lowest-index enabled page, or `None` if every page is disabled.
    pub fn first_enabled(self) -> Option<Page> {
        ALL_PAGES.into_iter().find(|p| self.enabled(*p))
    }

    /// Next enabled page strictly after `current`, wrapping.
    ///
    /// Returns `None` when no page other than `current` is enabled (including
    /// the all-disabled case); the caller stays on the current page. The
    /// walk is bounded: at most [`PAGE_COUNT`] candidates are examined.
    pub fn next_enabled_after(self, current: Page) -> Option<Page> {
        let mut candidate = current.next();
        for _ in 0..PAGE_COUNT {
            if candidate == current {
                return None;
            }
            if self.enabled(candidate) {
                return Some(candidate);
            }
            candidate = candidate.next();
        }
        None
    }
}

impl Default for PageVisibility {
    fn default() -> Self {
        Self::all()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_matches_all_pages() {
        assert_eq!(ALL_PAGES.len(), PAGE_COUNT);
        for (i, p) in ALL_PAGES.iter().enumerate() {
            assert_eq!(p.index(), i, "enum order must equal rotation order");
        }
    }

    #[test]
    fn test_page_next_wraps() {
        assert_eq!(Page::Weather.next(), Page::AirQuality);
        assert_eq!(Page::News.next(), Page::Weather, "rotation must wrap");
    }

    #[test]
    fn test_mask_round_trip() {
        let mut vis = PageVisibility::none();
        vis.set(Page::Clock, true);
        vis.set(Page::Fx, true);
        let restored = PageVisibility::from_mask(vis.mask());
        assert_eq!(restored, vis, "mask must round-trip");
        assert!(restored.enabled(Page::Clock));
        assert!(restored.enabled(Page::Fx));
        assert!(!restored.enabled(Page::Weather));
    }

    #[test]
    fn test_from_mask_ignores_high_bits() {
        let vis = PageVisibility::from_mask(0xF000 | 1);
        assert_eq!(vis.mask(), 1, "bits above PAGE_COUNT must be dropped");
    }

    #[test]
    fn test_first_enabled() {
        assert_eq!(PageVisibility::all().first_enabled(), Some(Page::Weather));
        assert_eq!(PageVisibility::only(Page::Sun).first_enabled(), Some(Page::Sun));
        assert_eq!(PageVisibility::none().first_enabled(), None);
    }

    #[test]
    fn test_next_enabled_skips_disabled() {
        let mut vis = PageVisibility::all();
        vis.set(Page::AirQuality, false);
        vis.set(Page::Clock, false);
        assert_eq!(
            vis.next_enabled_after(Page::Weather),
            Some(Page::Calendar),
            "disabled pages must be skipped"
        );
    }

    #[test]
    fn test_next_enabled_single_page_stays_put() {
        // With only P enabled, advancing from P never moves.
        for p in ALL_PAGES {
            let vis = PageVisibility::only(p);
            assert_eq!(vis.next_enabled_after(p), None, "single enabled page {p:?} must not advance");
        }
    }

    #[test]
    fn test_next_enabled_all_disabled_terminates() {
        let vis = PageVisibility::none();
        assert_eq!(vis.next_enabled_after(Page::Crypto), None);
    }

    #[test]
    fn test_next_enabled_wraps_backwards() {
        let vis = PageVisibility::only(Page::Weather);
        assert_eq!(
            vis.next_enabled_after(Page::News),
            Some(Page::Weather),
            "advance must wrap past the end of the enum"
        );
    }
}
