// Crate-level lints: Allow common embedded/graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // Intentional f32->i32, u32->i32 casts for pixel math
#![allow(clippy::cast_precision_loss)] // u32/i32->f32 in graphics calculations
#![allow(clippy::cast_possible_wrap)] // u32->i32 wrapping is acceptable for our value ranges
#![allow(clippy::cast_sign_loss)] // i32->u32 where we know sign is positive

//! Rotating info-panel firmware core for a square 480x480 RGB display.
//!
//! The panel cycles through twelve content pages (weather, air quality,
//! clock, calendar, markets, countdowns and friends). Each page owns its
//! fetch-parse-cache-render lifecycle behind the [`sources::PageSource`]
//! trait; the [`scheduler`] drives rotation, fetch gating and the particle
//! overlays with one bounded unit of work per loop iteration, the way the
//! target hardware's cooperative main loop expects.
//!
//! # Simulator Mode
//!
//! This binary runs the core against `embedded-graphics-simulator` with a
//! scripted HTTP transport (canned API bodies), so the whole page lifecycle
//! is exercised without hardware or network. Build with the `sdl-window`
//! feature to watch the panel in an SDL window; the default build renders
//! headless for a fixed number of frames and exits.
//!
//! # Architecture
//!
//! ```text
//! main loop ──> Scheduler::tick ──┬─> fetch (HttpClient, one attempt)
//!                                 ├─> render (full page from cache)
//!                                 └─> overlay (one ParticlePool frame)
//! ```

mod clock;
mod colors;
mod config;
mod fetch;
mod metrics;
mod overlay;
mod pages;
mod scan;
mod scheduler;
mod settings;
mod sources;
mod styles;
mod widgets;

use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorDisplay;
use log::info;

use clock::Millis;
use config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use fetch::ScriptedHttp;
use pages::PageVisibility;
use scheduler::Scheduler;
use settings::{CountdownEvent, Settings};

/// Frames rendered before exit in headless mode.
#[cfg(not(feature = "sdl-window"))]
const HEADLESS_FRAMES: u32 = 2_000;

/// Canned API bodies for the scripted transport, one route per page that
/// fetches. Shapes mirror the live endpoints.
fn demo_transport() -> ScriptedHttp {
    ScriptedHttp::new()
        .route(
            "wttr.in",
            r#"{"current_condition":[{"temp_C":"18","weatherDesc":[{"value":"Partly cloudy"}]}],
                "weather":[{"date":"2026-08-25","maxtempC":"24","mintempC":"14"},
                           {"date":"2026-08-26","maxtempC":"22","mintempC":"13"},
                           {"date":"2026-08-27","maxtempC":"19","mintempC":"12"}]}"#,
        )
        .route(
            "air-quality",
            r#"{"hourly":{"pm10":[18.3],"pm2_5":[7.8],"nitrogen_dioxide":[22.5],"ozone":[55.0]}}"#,
        )
        .route(
            "coingecko",
            r#"{"bitcoin":{"chf":102345.61,"chf_24h_change":-1.84}}"#,
        )
        .route(
            "frankfurter",
            r#"{"rates":{"EUR":0.943,"USD":1.104,"GBP":0.812,"JPY":171.2,"CNY":7.85,"PLN":4.02,"CZK":23.4,"SEK":11.6}}"#,
        )
        .route(
            "open-meteo.com/v1/forecast",
            r#"{"daily":{"temperature_2m_mean":[18.0,19.5,21.0,20.0,17.5,16.0,18.5]}}"#,
        )
        .route(
            "sunrise-sunset",
            r#"{"results":{"sunrise":"2026-08-25T04:31:07+00:00","sunset":"2026-08-25T18:12:44+00:00","day_length":49297}}"#,
        )
        .route(
            "feed.xml",
            "<rss><channel><title>Demo Feed</title>\
             <item><title>Panel firmware demo headline one</title></item>\
             <item><title><![CDATA[Second headline with markup]]></title></item>\
             <item><title>Third headline</title></item></rss>",
        )
        .route(
            "calendar.ics",
            "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nDTSTART;VALUE=DATE:20260901\r\nSUMMARY:Dentist\r\n\
             END:VEVENT\r\nBEGIN:VEVENT\r\nDTSTART:20261015T183000Z\r\nSUMMARY:Team dinner\r\n\
             END:VEVENT\r\nEND:VCALENDAR\r\n",
        )
        .route(
            "openai.com",
            r#"{"choices":[{"message":{"content":"Simplicity is the soul of efficiency."}}]}"#,
        )
}

/// Demo settings matching the scripted transport.
fn demo_settings() -> Settings {
    let mut cfg = Settings::default();
    cfg.latitude = Some(46.005);
    cfg.longitude = Some(8.953);
    cfg.btc_owned = Some(0.042);
    cfg.ics_url = Some("https://example.org/calendar.ics".to_string());
    cfg.rss_url = Some("https://example.org/feed.xml".to_string());
    cfg.openai_key = Some("sk-demo".to_string());
    cfg.openai_topic = Some("engineering".to_string());
    cfg.pages = PageVisibility::from_mask(0x0FFF);
    cfg.page_interval_ms = 8_000;
    cfg.countdowns[0] = CountdownEvent {
        name: "Launch".to_string(),
        when: "2026-09-01 10:00".to_string(),
    };
    cfg.countdowns[1] = CountdownEvent {
        name: "Release review".to_string(),
        when: "2026-11-20 14:30".to_string(),
    };
    cfg
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut display: SimulatorDisplay<Rgb565> =
        SimulatorDisplay::with_default_color(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT), colors::COL_BG);

    let settings = demo_settings();
    let mut http = demo_transport();
    let boot = Instant::now();
    let mut scheduler = Scheduler::new(&settings, Millis(0), 0xC0FFEE);
    info!("panel core starting, {}x{}", SCREEN_WIDTH, SCREEN_HEIGHT);

    run_loop(&mut scheduler, &mut display, &mut http, &settings, boot);

    info!(
        "shutdown on page {} after {} ticks, {} rotations, {} frames, {} requests",
        scheduler.current_page().name(),
        scheduler.metrics.ticks,
        scheduler.metrics.rotations,
        scheduler.metrics.frames_rendered,
        http.requests().len()
    );
}

/// Wall-clock milliseconds since boot, wrapped into the firmware's u32 domain.
fn now_millis(boot: Instant) -> Millis {
    Millis(boot.elapsed().as_millis() as u32)
}

#[cfg(feature = "sdl-window")]
fn run_loop(
    scheduler: &mut Scheduler,
    display: &mut SimulatorDisplay<Rgb565>,
    http: &mut ScriptedHttp,
    settings: &Settings,
    boot: Instant,
) {
    use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorEvent, Window};

    let output_settings = OutputSettingsBuilder::new().build();
    let mut window = Window::new("panel", &output_settings);
    'running: loop {
        scheduler.tick(display, http, settings, now_millis(boot));
        window.update(display);
        for event in window.events() {
            if event == SimulatorEvent::Quit {
                break 'running;
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
}

#[cfg(not(feature = "sdl-window"))]
fn run_loop(
    scheduler: &mut Scheduler,
    display: &mut SimulatorDisplay<Rgb565>,
    http: &mut ScriptedHttp,
    settings: &Settings,
    boot: Instant,
) {
    for _ in 0..HEADLESS_FRAMES {
        scheduler.tick(display, http, settings, now_millis(boot));
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
}
