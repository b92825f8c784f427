//! Particle animation overlays drawn on top of rendered pages.
//!
//! One pool implementation serves all three animated pages; they differ only
//! in particle count, motion, region and palette. The overlay contract is
//! strict: particles never touch protected pixels (the page content under the
//! animation), and erasing a particle repaints exactly the pixels that were
//! drawn for it, using the same bounds and protection checks. Anything else
//! slowly corrupts the page under the animation.
//!
//! # Frame Pacing
//!
//! Each pool carries its own [`IntervalGate`] so a fast scheduler loop cannot
//! exceed the pool's frame rate. A tick that arrives early is a no-op.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorDisplay;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::clock::{IntervalGate, Millis};

/// Maximum respawn placement attempts before a particle parks inactive.
const RESPAWN_TRIES: usize = 10;

/// Pixel predicate marking page content the overlay must never repaint.
pub type ProtectedFn = fn(i32, i32) -> bool;

// =============================================================================
// Motion Models
// =============================================================================

/// How particles in a pool move between frames.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Motion {
    /// Circular orbit around a fixed per-particle center. Radius and angular
    /// speed are randomized per particle within the given ranges.
    Orbit { radius_min: f32, radius_max: f32, speed_min: f32, speed_max: f32 },
    /// Slow sideways drift with a gentle sink, wrapping horizontally.
    Drift { vx_max: f32, vy_max: f32 },
    /// Constant downward fall; respawns at the region top after leaving it.
    Fall { vy_min: f32, vy_max: f32 },
}

// =============================================================================
// Region
// =============================================================================

/// Inclusive pixel rectangle a pool is confined to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Region {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Region {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

// =============================================================================
// Particles
// =============================================================================

#[derive(Clone, Copy, Debug)]
struct Particle {
    /// Continuous position; rounded to pixels only at draw time.
    x: f32,
    y: f32,
    // Motion state. Orbit uses center/radius/speed/phase, Drift and Fall use
    // the velocity pair; unused fields stay zero.
    cx: f32,
    cy: f32,
    radius: f32,
    speed: f32,
    phase: f32,
    vx: f32,
    vy: f32,
    /// Drawn square side in pixels (1..=3), randomized as a depth cue.
    size: i32,
    color: Rgb565,
    /// Last drawn pixel origin and size, for exact erase. `None` when the
    /// particle has not been drawn since (re)spawn.
    drawn: Option<(i32, i32, i32)>,
    /// Inactive particles failed placement and skip until next respawn.
    active: bool,
}

impl Particle {
    const fn idle() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            cx: 0.0,
            cy: 0.0,
            radius: 0.0,
            speed: 0.0,
            phase: 0.0,
            vx: 0.0,
            vy: 0.0,
            size: 1,
            color: Rgb565::new(0, 0, 0),
            drawn: None,
            active: false,
        }
    }
}

// =============================================================================
// Particle Pool
// =============================================================================

/// A fixed-size pool of animated particles confined to one region.
pub struct ParticlePool {
    particles: Vec<Particle>,
    motion: Motion,
    region: Region,
    palette: &'static [Rgb565],
    background: Rgb565,
    protected: ProtectedFn,
    gate: IntervalGate,
    rng: SmallRng,
    spawned: bool,
}

impl ParticlePool {
    /// Build a pool; particles spawn lazily on the first tick so the page has
    /// rendered (and its protected mask is meaningful) before placement.
    pub fn new(
        count: usize,
        motion: Motion,
        region: Region,
        palette: &'static [Rgb565],
        background: Rgb565,
        protected: ProtectedFn,
        frame_ms: u32,
        seed: u64,
    ) -> Self {
        Self {
            particles: vec![Particle::idle(); count],
            motion,
            region,
            palette,
            background,
            protected,
            gate: IntervalGate::new(frame_ms),
            rng: SmallRng::seed_from_u64(seed),
            spawned: false,
        }
    }

    /// Advance one animation frame if the frame interval elapsed.
    ///
    /// Returns true when a frame was actually drawn.
    pub fn tick(&mut self, display: &mut SimulatorDisplay<Rgb565>, now: Millis) -> bool {
        if !self.gate.ready(now) {
            return false;
        }
        if !self.spawned {
            self.spawn_all();
            self.spawned = true;
        }
        for i in 0..self.particles.len() {
            let mut p = self.particles[i];
            Self::erase_one(display, self.background, self.region, self.protected, &mut p);
            let mut recycled = false;
            if p.active {
                self.advance(&mut p);
                // Leaving the region or straying into page content recycles
                // the particle instead of letting it sit invisible
                let (x, y) = (p.x as i32, p.y as i32);
                if !self.region.contains(x, y) || (self.protected)(x, y) {
                    p = self.respawn();
                    recycled = true;
                }
            } else {
                p = self.respawn();
                recycled = true;
            }
            // A recycled particle sits out the frame it spawned on
            if p.active && !recycled {
                Self::draw_one(display, self.region, self.protected, &mut p);
            }
            self.particles[i] = p;
        }
        true
    }

    /// Repaint every particle's pixels with the background and forget them.
    ///
    /// Called when the scheduler leaves an animated page so no particle
    /// survives onto the next page's canvas.
    pub fn erase_all(&mut self, display: &mut SimulatorDisplay<Rgb565>) {
        for i in 0..self.particles.len() {
            let mut p = self.particles[i];
            Self::erase_one(display, self.background, self.region, self.protected, &mut p);
            self.particles[i] = p;
        }
    }

    /// Drop all particle state and re-arm the frame gate.
    pub fn reset(&mut self) {
        for p in &mut self.particles {
            *p = Particle::idle();
        }
        self.spawned = false;
        self.gate.force();
    }

    /// Positions currently drawn, for tests.
    #[cfg(test)]
    pub fn drawn_positions(&self) -> Vec<(i32, i32, i32)> {
        self.particles.iter().filter_map(|p| p.drawn).collect()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn spawn_all(&mut self) {
        for i in 0..self.particles.len() {
            self.particles[i] = self.respawn();
        }
    }

    /// Place a fresh particle at a random unprotected spot in the region.
    ///
    /// Gives up after a bounded number of tries (a page may protect most of
    /// the region); the particle then sits inactive until the next frame.
    fn respawn(&mut self) -> Particle {
        let mut p = Particle::idle();
        p.size = self.rng.gen_range(1..=3);
        p.color = self.palette[self.rng.gen_range(0..self.palette.len())];
        for _ in 0..RESPAWN_TRIES {
            let x = self.rng.gen_range(self.region.x0..=self.region.x1) as f32;
            let y = self.rng.gen_range(self.region.y0..=self.region.y1) as f32;
            if (self.protected)(x as i32, y as i32) {
                continue;
            }
            p.x = x;
            p.y = y;
            p.active = true;
            break;
        }
        if !p.active {
            return p;
        }
        match self.motion {
            Motion::Orbit { radius_min, radius_max, speed_min, speed_max } => {
                p.radius = self.rng.gen_range(radius_min..=radius_max);
                p.speed = self.rng.gen_range(speed_min..=speed_max);
                p.phase = self.rng.gen_range(0.0..core::f32::consts::TAU);
                // Positioned point becomes a spot on the orbit, not the center
                p.cx = p.x - p.radius * p.phase.cos();
                p.cy = p.y - p.radius * p.phase.sin();
            }
            Motion::Drift { vx_max, vy_max } => {
                p.vx = self.rng.gen_range(-vx_max..=vx_max);
                p.vy = self.rng.gen_range(0.0..=vy_max);
            }
            Motion::Fall { vy_min, vy_max } => {
                p.vy = self.rng.gen_range(vy_min..=vy_max);
                // Fresh drops enter from the region top
                p.y = self.region.y0 as f32;
            }
        }
        p
    }

    fn advance(&mut self, p: &mut Particle) {
        match self.motion {
            Motion::Orbit { .. } => {
                p.phase += p.speed;
                if p.phase > core::f32::consts::TAU {
                    p.phase -= core::f32::consts::TAU;
                }
                p.x = p.cx + p.radius * p.phase.cos();
                p.y = p.cy + p.radius * p.phase.sin();
            }
            Motion::Drift { .. } => {
                p.x += p.vx;
                p.y += p.vy;
                // Drifters wrap horizontally instead of respawning
                if p.x < self.region.x0 as f32 {
                    p.x = self.region.x1 as f32;
                } else if p.x > self.region.x1 as f32 {
                    p.x = self.region.x0 as f32;
                }
            }
            Motion::Fall { .. } => {
                p.y += p.vy;
            }
        }
    }

    /// Draw the particle's square cluster, skipping protected and
    /// out-of-region pixels, and record what was drawn for the erase pass.
    fn draw_one(
        display: &mut SimulatorDisplay<Rgb565>,
        region: Region,
        protected: ProtectedFn,
        p: &mut Particle,
    ) {
        let (ox, oy) = (p.x as i32, p.y as i32);
        for dy in 0..p.size {
            for dx in 0..p.size {
                let (x, y) = (ox + dx, oy + dy);
                if region.contains(x, y) && !protected(x, y) {
                    Pixel(Point::new(x, y), p.color).draw(display).ok();
                }
            }
        }
        p.drawn = Some((ox, oy, p.size));
    }

    /// Repaint the previously drawn cluster with the background, applying the
    /// identical per-pixel checks so erase covers exactly what draw touched.
    fn erase_one(
        display: &mut SimulatorDisplay<Rgb565>,
        background: Rgb565,
        region: Region,
        protected: ProtectedFn,
        p: &mut Particle,
    ) {
        let Some((ox, oy, size)) = p.drawn.take() else {
            return;
        };
        for dy in 0..size {
            for dx in 0..size {
                let (x, y) = (ox + dx, oy + dy);
                if region.contains(x, y) && !protected(x, y) {
                    Pixel(Point::new(x, y), background).draw(display).ok();
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
