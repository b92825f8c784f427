//! Runtime counters and the event log shown on the Info page.
//!
//! Updated by the scheduler every tick and read by the Info renderer through
//! the render context. Counters are plain fields so the renderer can format
//! them without accessor ceremony, the same way the per-frame stats are used
//! by the debug screen.

use heapless::{Deque, String};

// =============================================================================
// Event Log Configuration
// =============================================================================

/// Maximum number of event lines kept in the ring buffer.
pub const LOG_BUFFER_SIZE: usize = 6;

/// Maximum characters per event line.
pub const LOG_LINE_LENGTH: usize = 48;

// =============================================================================
// Scheduler Metrics
// =============================================================================

/// Counters accumulated by the scheduler since boot.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Scheduler ticks processed.
    pub ticks: u64,
    /// Fetch attempts issued (success or failure).
    pub fetch_attempts: u32,
    /// Fetch attempts that returned an error.
    pub fetch_failures: u32,
    /// Page rotations performed.
    pub rotations: u32,
    /// Full page renders performed.
    pub frames_rendered: u32,
    /// Overlay animation frames drawn.
    pub overlay_frames: u32,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            fetch_attempts: 0,
            fetch_failures: 0,
            rotations: 0,
            frames_rendered: 0,
            overlay_frames: 0,
        }
    }

    /// Fetch success percentage, or 100 when nothing was attempted yet.
    pub fn fetch_success_pct(&self) -> u32 {
        if self.fetch_attempts == 0 {
            return 100;
        }
        let ok = self.fetch_attempts - self.fetch_failures;
        ok * 100 / self.fetch_attempts
    }
}

// =============================================================================
// Event Log Ring Buffer
// =============================================================================

/// Ring buffer of recent scheduler events (fetch failures, rotations,
/// refresh requests). Oldest entries are dropped when full.
pub struct EventLog {
    buffer: Deque<String<LOG_LINE_LENGTH>, LOG_BUFFER_SIZE>,
}

impl EventLog {
    pub const fn new() -> Self {
        Self { buffer: Deque::new() }
    }

    /// Push an event line, truncating to the line length.
    pub fn push(&mut self, msg: &str) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }
        let mut line: String<LOG_LINE_LENGTH> = String::new();
        for (i, c) in msg.chars().enumerate() {
            if i >= LOG_LINE_LENGTH - 1 {
                break;
            }
            line.push(c).ok();
        }
        self.buffer.push_back(line).ok();
    }

    /// Iterate over event lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.buffer.iter().map(|s| s.as_str())
    }

    #[inline]
    #[allow(dead_code)]
    pub const fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
