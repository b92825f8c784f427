//! Wraparound-safe millisecond timekeeping.
//!
//! The scheduler and the animation overlays are driven by a `u32` monotonic
//! millisecond counter that wraps at 2^32 (about 49.7 days), the same contract
//! an embedded `millis()` gives you. All interval checks therefore use
//! wrapping subtraction: `now.wrapping_sub(then)` is correct across the wrap
//! boundary, while a direct `now >= then + interval` comparison is not.
//!
//! `Millis` is deliberately a newtype instead of a bare `u32` so that the
//! compiler rejects accidental direct comparisons between instants.

/// A monotonic millisecond instant that wraps at 2^32.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Millis(pub u32);

impl Millis {
    /// Milliseconds elapsed since `earlier`, correct across wraparound.
    #[inline]
    pub const fn since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Advance this instant by `ms`, wrapping.
    #[inline]
    #[allow(dead_code)]
    pub const fn add(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }
}

/// Rate limiter gating work to a fixed minimum interval.
///
/// Used by the overlay tick (~30 FPS cap) and the rotation timer. The first
/// call always fires so lazily-started subsystems do their initial work
/// without waiting a full interval.
#[derive(Clone, Copy, Debug)]
pub struct IntervalGate {
    interval_ms: u32,
    last: Option<Millis>,
}

impl IntervalGate {
    pub const fn new(interval_ms: u32) -> Self {
        Self { interval_ms, last: None }
    }

    /// Check whether the interval has elapsed; if so, arm for the next one.
    pub fn ready(&mut self, now: Millis) -> bool {
        match self.last {
            Some(last) if now.since(last) < self.interval_ms => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Re-arm so the next `ready` call fires immediately.
    pub const fn force(&mut self) {
        self.last = None;
    }

    /// Change the interval without resetting the last-fired instant.
    pub const fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_simple() {
        assert_eq!(Millis(1000).since(Millis(400)), 600);
        assert_eq!(Millis(400).since(Millis(400)), 0);
    }

    #[test]
    fn test_since_across_wraparound() {
        // `then` just before the wrap, `now` just after: elapsed must be small
        let then = Millis(u32::MAX - 10);
        let now = then.add(50);
        assert_eq!(now.0, 39, "instant should have wrapped past zero");
        assert_eq!(now.since(then), 50, "elapsed must be wraparound-safe");
    }

    #[test]
    fn test_gate_first_call_fires() {
        let mut gate = IntervalGate::new(1000);
        assert!(gate.ready(Millis(123)), "first check should always fire");
    }

    #[test]
    fn test_gate_respects_interval() {
        let mut gate = IntervalGate::new(1000);
        assert!(gate.ready(Millis(0)));
        assert!(!gate.ready(Millis(999)), "interval not yet elapsed");
        assert!(gate.ready(Millis(1000)), "interval elapsed exactly");
        assert!(!gate.ready(Millis(1500)), "re-armed from the last fire");
    }

    #[test]
    fn test_gate_across_wraparound() {
        let mut gate = IntervalGate::new(100);
        assert!(gate.ready(Millis(u32::MAX - 20)));
        assert!(!gate.ready(Millis(u32::MAX - 1)), "only 19ms elapsed");
        // 120ms after the last fire, past the wrap boundary
        assert!(gate.ready(Millis(99)), "gate must fire across wraparound");
    }

    #[test]
    fn test_gate_force() {
        let mut gate = IntervalGate::new(1000);
        assert!(gate.ready(Millis(0)));
        gate.force();
        assert!(gate.ready(Millis(1)), "forced gate should fire immediately");
    }
}
