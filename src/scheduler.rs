//! Cooperative page scheduler.
//!
//! The firmware main loop calls [`Scheduler::tick`] as fast as it likes; each
//! tick performs at most one unit of work (one state transition: a single
//! fetch attempt, one full render, or one overlay frame), so the loop stays
//! responsive without threads or interrupts.
//!
//! # State Machine
//!
//! ```text
//! Idle -> Fetching -> Rendering -> Animating -> Idle   data was due
//! Idle -> Rendering -> Animating -> Idle               redraw pending
//! Idle -> Animating -> Idle                            steady state
//! ```
//!
//! Fetching always proceeds to Rendering, success or not, so the screen
//! shows last-known-good data (or the placeholder) right after a failure.
//!
//! Rotation, visibility enforcement and settings-refresh handling run at the
//! top of every tick, independent of the state machine.
//!
//! # Fetch Gating
//!
//! A page is fetched only while it is the current page, and never more often
//! than its refresh interval, counted from the last attempt whether it
//! succeeded or failed. A fetch blocked on missing configuration is not
//! retried until settings change.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics_simulator::SimulatorDisplay;
use log::{debug, info, warn};

use crate::clock::{IntervalGate, Millis};
use crate::fetch::{FetchError, HttpClient};
use crate::metrics::{EventLog, Metrics};
use crate::pages::{PAGE_COUNT, Page};
use crate::settings::Settings;
use crate::sources::{PageSource, RenderCtx, build_sources};
use crate::widgets::chrome;

/// What the next unit of work will be.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    Idle,
    Fetching,
    Rendering,
    Animating,
}

/// Per-page fetch bookkeeping.
#[derive(Clone, Copy, Default)]
struct PageRuntime {
    /// Instant of the last fetch attempt, success or failure.
    last_attempt: Option<Millis>,
    /// Set on `ConfigMissing`; cleared when settings change.
    config_blocked: bool,
}

pub struct Scheduler {
    sources: Vec<Box<dyn PageSource>>,
    runtime: [PageRuntime; PAGE_COUNT],
    current: Page,
    state: State,
    rotation: IntervalGate,
    refresh_pending: bool,
    needs_render: bool,
    pub metrics: Metrics,
    pub events: EventLog,
}

impl Scheduler {
    /// Build a scheduler starting on the first enabled page.
    ///
    /// `now` arms the rotation timer so the first page gets a full interval
    /// on screen before the first advance.
    pub fn new(settings: &Settings, now: Millis, seed: u64) -> Self {
        let mut rotation = IntervalGate::new(settings.page_interval_ms);
        rotation.ready(now);
        let current = settings.pages.first_enabled().unwrap_or_default();
        info!("scheduler starting on page {}", current.name());
        Self {
            sources: build_sources(seed),
            runtime: [PageRuntime::default(); PAGE_COUNT],
            current,
            state: State::Idle,
            rotation,
            refresh_pending: false,
            needs_render: true,
            metrics: Metrics::new(),
            events: EventLog::new(),
        }
    }

    pub fn current_page(&self) -> Page {
        self.current
    }

    #[allow(dead_code)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Ask for all caches to be refetched; called by the settings
    /// collaborator after any configuration change.
    pub fn request_refresh(&mut self) {
        self.refresh_pending = true;
    }

    /// Run one unit of work.
    pub fn tick(
        &mut self,
        display: &mut SimulatorDisplay<Rgb565>,
        http: &mut dyn HttpClient,
        settings: &Settings,
        now: Millis,
    ) {
        self.metrics.ticks += 1;

        if self.refresh_pending {
            self.refresh_pending = false;
            for rt in &mut self.runtime {
                rt.last_attempt = None;
                rt.config_blocked = false;
            }
            self.needs_render = true;
            self.events.push("settings changed, refreshing");
            info!("settings refresh requested, all caches marked stale");
        }

        // The settings UI may have disabled the page on screen
        if !settings.pages.enabled(self.current) {
            if let Some(page) = settings.pages.first_enabled() {
                debug!("current page {} disabled, jumping to {}", self.current.name(), page.name());
                self.switch_to(page, display);
            }
            // With every page disabled the current one stays up and
            // rotation below finds nowhere to go
        }

        self.rotation.set_interval(settings.page_interval_ms);
        if self.state == State::Idle && self.rotation.ready(now) {
            match settings.pages.next_enabled_after(self.current) {
                Some(next) => {
                    self.switch_to(next, display);
                    self.metrics.rotations += 1;
                }
                // Nowhere to advance: repaint in place so render-only
                // content (clock time, uptime counters) keeps moving
                None => self.needs_render = true,
            }
        }

        match self.state {
            State::Idle => {
                if self.fetch_due(now) {
                    self.state = State::Fetching;
                } else if self.needs_render {
                    self.state = State::Rendering;
                } else {
                    self.state = State::Animating;
                }
            }
            State::Fetching => {
                self.run_fetch(http, settings, now);
                // Success or failure, the page gets drawn next
                self.state = State::Rendering;
            }
            State::Rendering => {
                chrome::clear_screen(display);
                let ctx = RenderCtx { now, metrics: &self.metrics, events: &self.events };
                self.sources[self.current.index()].render(display, settings, &ctx);
                self.needs_render = false;
                self.metrics.frames_rendered += 1;
                self.state = State::Animating;
            }
            State::Animating => {
                if self.sources[self.current.index()].overlay_tick(display, now) {
                    self.metrics.overlay_frames += 1;
                }
                self.state = State::Idle;
            }
        }
    }

    /// Whether the current page's data is due for a fetch attempt.
    fn fetch_due(&self, now: Millis) -> bool {
        let source = &self.sources[self.current.index()];
        let Some(interval) = source.refresh_interval_ms() else {
            return false;
        };
        let rt = &self.runtime[self.current.index()];
        if rt.config_blocked {
            return false;
        }
        match rt.last_attempt {
            None => true,
            Some(at) => now.since(at) >= interval,
        }
    }

    fn run_fetch(&mut self, http: &mut dyn HttpClient, settings: &Settings, now: Millis) {
        let idx = self.current.index();
        self.runtime[idx].last_attempt = Some(now);
        self.metrics.fetch_attempts += 1;

        match self.sources[idx].fetch(http, settings) {
            Ok(()) => {
                debug!("fetch ok: {}", self.current.name());
            }
            Err(err) => {
                self.metrics.fetch_failures += 1;
                warn!("fetch failed: {}: {err}", self.current.name());
                self.events.push(&format!("{}: {err}", self.current.name()));
                if matches!(err, FetchError::ConfigMissing(_)) {
                    self.runtime[idx].config_blocked = true;
                }
                // The cache is untouched; whatever is on screen stays valid
            }
        }
    }

    /// Leave the current page for `next`: clean up its overlay and schedule
    /// a full redraw so nothing of the old page survives.
    fn switch_to(&mut self, next: Page, display: &mut SimulatorDisplay<Rgb565>) {
        self.sources[self.current.index()].overlay_leave(display);
        // Blank the content area right away; the new page may spend its first
        // tick fetching before it renders
        chrome::clear_content(display);
        debug!("page switch: {} -> {}", self.current.name(), next.name());
        self.current = next;
        self.needs_render = true;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REFRESH_WEATHER_MS;
    use crate::fetch::ScriptedHttp;
    use crate::pages::PageVisibility;
    use embedded_graphics::prelude::*;

    const WEATHER_BODY: &str =
        r#"{"current_condition":[{"temp_C":"18","weatherDesc":[{"value":"Sunny"}]}]}"#;

    fn display() -> SimulatorDisplay<Rgb565> {
        SimulatorDisplay::with_default_color(Size::new(480, 480), crate::colors::COL_BG)
    }

    fn http() -> ScriptedHttp {
        ScriptedHttp::new().route("wttr.in", WEATHER_BODY)
    }

    /// Run `count` ticks spaced `step_ms` apart, starting at `from`.
    fn run(
        sched: &mut Scheduler,
        d: &mut SimulatorDisplay<Rgb565>,
        http: &mut ScriptedHttp,
        cfg: &Settings,
        from: Millis,
        count: u32,
        step_ms: u32,
    ) -> Millis {
        let mut now = from;
        for _ in 0..count {
            sched.tick(d, http, cfg, now);
            now = now.add(step_ms);
        }
        now
    }

    #[test]
    fn test_starts_on_first_enabled_page() {
        let mut cfg = Settings::default();
        cfg.pages = PageVisibility::only(Page::Fx);
        let sched = Scheduler::new(&cfg, Millis(0), 1);
        assert_eq!(sched.current_page(), Page::Fx);
    }

    #[test]
    fn test_rotation_advances_after_interval() {
        let mut cfg = Settings::default();
        cfg.page_interval_ms = 1000;
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 8, 50);
        assert_eq!(sched.current_page(), Page::Weather, "interval not yet elapsed");

        run(&mut sched, &mut d, &mut h, &cfg, Millis(1100), 8, 50);
        assert_eq!(sched.current_page(), Page::AirQuality, "rotation must advance in order");
    }

    #[test]
    fn test_rotation_skips_disabled_pages() {
        let mut cfg = Settings::default();
        cfg.page_interval_ms = 1000;
        cfg.pages.set(Page::AirQuality, false);
        cfg.pages.set(Page::Clock, false);
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        run(&mut sched, &mut d, &mut h, &cfg, Millis(1100), 8, 50);
        assert_eq!(sched.current_page(), Page::Calendar);
    }

    #[test]
    fn test_single_enabled_page_never_rotates() {
        let mut cfg = Settings::default();
        cfg.pages = PageVisibility::only(Page::Clock);
        cfg.page_interval_ms = 100;
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 100, 60);
        assert_eq!(sched.current_page(), Page::Clock);
    }

    #[test]
    fn test_disabling_current_page_jumps_to_first_enabled() {
        let mut cfg = Settings::default();
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());
        assert_eq!(sched.current_page(), Page::Weather);

        cfg.pages.set(Page::Weather, false);
        sched.tick(&mut d, &mut h, &cfg, Millis(10));
        assert_eq!(sched.current_page(), Page::AirQuality);
    }

    #[test]
    fn test_single_enabled_page_keeps_repainting() {
        let mut cfg = Settings::default();
        cfg.pages = PageVisibility::only(Page::Clock);
        cfg.page_interval_ms = 1000;
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        // Ten rotation intervals with nowhere to rotate to
        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 200, 50);
        assert!(
            sched.metrics.frames_rendered >= 5,
            "a lone render-only page must repaint every interval, got {} frames",
            sched.metrics.frames_rendered
        );
        assert_eq!(sched.metrics.rotations, 0, "repainting in place is not a rotation");
    }

    #[test]
    fn test_all_disabled_keeps_current_page() {
        let mut cfg = Settings::default();
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        cfg.pages = PageVisibility::none();
        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 20, 50);
        assert_eq!(sched.current_page(), Page::Weather, "nowhere to go, stay put");
    }

    #[test]
    fn test_fetch_happens_once_within_interval() {
        let cfg = Settings::default();
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        // Plenty of ticks, all well inside the weather refresh interval
        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 50, 100);
        assert_eq!(h.requests().len(), 1, "one fetch per refresh interval");
        assert_eq!(sched.metrics.fetch_attempts, 1);
    }

    #[test]
    fn test_fetch_reissued_after_interval() {
        let mut cfg = Settings::default();
        // Keep rotation parked so Weather stays current
        cfg.pages = PageVisibility::only(Page::Weather);
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 10, 50);
        assert_eq!(h.requests().len(), 1);

        run(&mut sched, &mut d, &mut h, &cfg, Millis(REFRESH_WEATHER_MS + 1000), 10, 50);
        assert_eq!(h.requests().len(), 2, "expired data must be refetched");
    }

    #[test]
    fn test_fetch_failure_keeps_screen_and_retries_later() {
        let mut cfg = Settings::default();
        cfg.pages = PageVisibility::only(Page::Weather);
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        // First fetch succeeds and renders
        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 10, 50);
        assert_eq!(sched.metrics.fetch_failures, 0);

        // Outage: the retry fails but failure count rises by exactly one,
        // so failures are not re-attempted inside the interval either
        h.set_offline(true);
        run(&mut sched, &mut d, &mut h, &cfg, Millis(REFRESH_WEATHER_MS + 1000), 30, 50);
        assert_eq!(sched.metrics.fetch_attempts, 2);
        assert_eq!(sched.metrics.fetch_failures, 1);
        assert!(!sched.events.is_empty(), "failures must land in the event log");
    }

    #[test]
    fn test_config_missing_blocks_until_refresh() {
        let mut cfg = Settings::default();
        cfg.pages = PageVisibility::only(Page::News);
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        // rss_url unset: one ConfigMissing attempt, then no more
        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 20, 50);
        assert_eq!(sched.metrics.fetch_attempts, 1);

        // Operator configures the feed and signals the change
        cfg.rss_url = Some("https://example.org/feed.xml".into());
        h.set_route("feed.xml", "<item><title>Hello</title></item>");
        sched.request_refresh();
        run(&mut sched, &mut d, &mut h, &cfg, Millis(2000), 10, 50);
        assert_eq!(sched.metrics.fetch_attempts, 2, "refresh must unblock the page");
        assert_eq!(sched.metrics.fetch_failures, 1);
    }

    #[test]
    fn test_refresh_request_forces_refetch() {
        let mut cfg = Settings::default();
        cfg.pages = PageVisibility::only(Page::Weather);
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 10, 50);
        assert_eq!(h.requests().len(), 1);

        sched.request_refresh();
        run(&mut sched, &mut d, &mut h, &cfg, Millis(1000), 10, 50);
        assert_eq!(h.requests().len(), 2, "refresh bypasses the refresh interval");
    }

    #[test]
    fn test_tick_is_one_unit_of_work() {
        let cfg = Settings::default();
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        // Idle -> Fetching decision tick, then the fetch itself
        sched.tick(&mut d, &mut h, &cfg, Millis(0));
        assert_eq!(sched.state(), State::Fetching);
        assert!(h.requests().is_empty(), "decision tick must not fetch yet");

        sched.tick(&mut d, &mut h, &cfg, Millis(10));
        assert_eq!(h.requests().len(), 1);
        assert_eq!(sched.state(), State::Rendering, "fetch always proceeds to render");

        let frames_before = sched.metrics.frames_rendered;
        sched.tick(&mut d, &mut h, &cfg, Millis(20));
        assert_eq!(sched.metrics.frames_rendered, frames_before + 1);
        assert_eq!(sched.state(), State::Animating);

        sched.tick(&mut d, &mut h, &cfg, Millis(30));
        assert_eq!(sched.state(), State::Idle);
    }

    #[test]
    fn test_render_happens_after_fetch() {
        let cfg = Settings::default();
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 6, 10);
        assert!(sched.metrics.frames_rendered >= 1);
        // Weather header is on screen
        assert_eq!(d.get_pixel(Point::new(5, 5)), crate::colors::COL_HEADER);
    }

    #[test]
    fn test_overlay_runs_when_idle() {
        let mut cfg = Settings::default();
        cfg.pages = PageVisibility::only(Page::Weather);
        let mut sched = Scheduler::new(&cfg, Millis(0), 1);
        let (mut d, mut h) = (display(), http());

        run(&mut sched, &mut d, &mut h, &cfg, Millis(0), 60, 50);
        assert!(sched.metrics.overlay_frames > 0, "steady state should animate");
    }
}
