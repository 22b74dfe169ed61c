// sim/ - Particle field simulation
//
// One ParticleField owns both populations and the output frame. Ticks
// are strictly sequential: update and draw for a frame happen in a
// single synchronous call, so resize and click handlers never observe a
// half-advanced world.

mod ambient;
mod burst;

pub use ambient::{AmbientParticle, Ambients, wrap};
pub use burst::{BURST_BATCH, BURST_MAX_LIFE, BurstParticle, Bursts};

use crate::config::FieldConfig;
use crate::render::Frame;
use crate::rng::RandomSource;

/// Connection distance threshold in surface units.
pub const CONNECT_DISTANCE: f32 = 100.0;
/// Upper bound on a connection line's alpha factor.
pub const CONNECT_MAX_ALPHA: f32 = 0.2;
/// Sub-pixel stroke width, folded into the line alpha.
const LINE_COVERAGE: f32 = 0.8;

/// Per-tick counters, for tests and host debug overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Unordered ambient pairs examined, always n(n-1)/2.
    pub pair_checks: usize,
    /// Pairs close enough to get a line.
    pub connections_drawn: usize,
    pub ambient_drawn: usize,
    pub burst_drawn: usize,
}

pub struct ParticleField {
    w: f32,
    h: f32,
    config: FieldConfig,
    ambient: Ambients,
    bursts: Bursts,
    frame: Frame,
    rng: Box<dyn RandomSource>,
}

impl ParticleField {
    pub fn new(w: u32, h: u32, config: FieldConfig, rng: Box<dyn RandomSource>) -> Self {
        let mut field = Self {
            w: w as f32,
            h: h as f32,
            config,
            ambient: Ambients::new(),
            bursts: Bursts::new(),
            frame: Frame::new(w, h),
            rng,
        };
        field
            .ambient
            .respawn(config.particle_count, field.w, field.h, field.rng.as_mut());
        field
    }

    /// Resize the backing frame and recreate the ambient population.
    /// In-flight bursts are left alone.
    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w as f32;
        self.h = h as f32;
        self.frame.resize(w, h);
        self.ambient
            .respawn(self.config.particle_count, self.w, self.h, self.rng.as_mut());
    }

    /// Spawn one burst batch at surface-local coordinates.
    pub fn burst_at(&mut self, x: f32, y: f32) {
        self.bursts.spawn_batch(x, y, self.rng.as_mut());
    }

    /// Advance the simulation by exactly one frame and redraw.
    pub fn tick(&mut self) -> FrameStats {
        let mut stats = FrameStats::default();
        self.frame.clear();

        let (checks, drawn) = self.draw_connections();
        stats.pair_checks = checks;
        stats.connections_drawn = drawn;

        self.ambient.update(self.w, self.h);
        self.ambient.draw(&mut self.frame, self.config.particle_color);
        stats.ambient_drawn = self.ambient.len();

        self.bursts.update();
        self.bursts.draw(&mut self.frame, self.config.particle_color);
        stats.burst_drawn = self.bursts.len();

        stats
    }

    /// Stroke a line between every ambient pair closer than the
    /// threshold, fading with distance. Each unordered pair is visited
    /// exactly once.
    fn draw_connections(&mut self) -> (usize, usize) {
        let ps = &self.ambient.particles;
        let color = self.config.connection_color;
        let mut checks = 0;
        let mut drawn = 0;
        for i in 0..ps.len() {
            for j in (i + 1)..ps.len() {
                checks += 1;
                let (a, b) = (ps[i], ps[j]);
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                let d = (dx * dx + dy * dy).sqrt();
                if let Some(alpha) = connection_alpha(d) {
                    self.frame
                        .stroke_line(a.x, a.y, b.x, b.y, color, alpha * LINE_COVERAGE);
                    drawn += 1;
                }
            }
        }
        (checks, drawn)
    }

    pub fn ambient(&self) -> &Ambients {
        &self.ambient
    }

    pub fn bursts(&self) -> &Bursts {
        &self.bursts
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.w
    }

    pub fn height(&self) -> f32 {
        self.h
    }
}

/// Alpha factor for a connection at distance d; None at or beyond the
/// threshold.
pub fn connection_alpha(d: f32) -> Option<f32> {
    if d < CONNECT_DISTANCE {
        Some(((CONNECT_DISTANCE - d) / CONNECT_DISTANCE).min(CONNECT_MAX_ALPHA))
    } else {
        None
    }
}
