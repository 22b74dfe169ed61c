// ambient.rs - Long-lived drifting particles
//
// The ambient population is recreated wholesale on resize; individual
// particles never expire, they wrap toroidally at the surface edges.

use crate::color::Rgb;
use crate::render::Frame;
use crate::rng::RandomSource;

const RADIUS_MIN: f32 = 1.0;
const RADIUS_MAX: f32 = 3.5;
const SPEED_LIMIT: f32 = 0.1;
const OPACITY_MIN: f32 = 0.4;
const OPACITY_MAX: f32 = 0.9;

// Glow approximation: a brighter, smaller disc on top of the base disc,
// cheaper than a blur in the per-frame path.
const INNER_OPACITY_BOOST: f32 = 1.3;
const INNER_RADIUS_SCALE: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientParticle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub opacity: f32,
}

impl AmbientParticle {
    /// Sample a fresh particle for a w x h surface. The draw order
    /// (x, y, radius, vx, vy, opacity) is part of the replay contract.
    pub fn sample(w: f32, h: f32, rng: &mut dyn RandomSource) -> Self {
        Self {
            x: rng.uniform(0.0, w),
            y: rng.uniform(0.0, h),
            radius: rng.uniform(RADIUS_MIN, RADIUS_MAX),
            vx: rng.uniform(-SPEED_LIMIT, SPEED_LIMIT),
            vy: rng.uniform(-SPEED_LIMIT, SPEED_LIMIT),
            opacity: rng.uniform(OPACITY_MIN, OPACITY_MAX),
        }
    }
}

pub struct Ambients {
    pub particles: Vec<AmbientParticle>,
}

impl Ambients {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Discard the population and sample a fresh one for the given bounds.
    pub fn respawn(&mut self, count: usize, w: f32, h: f32, rng: &mut dyn RandomSource) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(AmbientParticle::sample(w, h, rng));
        }
    }

    /// Advance every particle one frame, wrapping into [0, w) x [0, h).
    pub fn update(&mut self, w: f32, h: f32) {
        for p in &mut self.particles {
            p.x = wrap(p.x + p.vx, w);
            p.y = wrap(p.y + p.vy, h);
        }
    }

    pub fn draw(&self, frame: &mut Frame, color: Rgb) {
        for p in &self.particles {
            frame.fill_circle(p.x, p.y, p.radius, color, p.opacity);
            frame.fill_circle(
                p.x,
                p.y,
                p.radius * INNER_RADIUS_SCALE,
                color,
                (p.opacity * INNER_OPACITY_BOOST).min(1.0),
            );
        }
    }
}

/// Wrap v into [0, limit). rem_euclid of a tiny negative can round up to
/// the limit itself, so the result is re-checked against the bound.
#[inline]
pub fn wrap(v: f32, limit: f32) -> f32 {
    if limit <= 0.0 {
        return 0.0;
    }
    let r = v.rem_euclid(limit);
    if r >= limit { 0.0 } else { r }
}
