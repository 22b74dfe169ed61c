// burst.rs - Click-spawned burst particles
//
// Each pointer interaction spawns a fixed batch at the click point.
// Bursts decay every frame and are compacted out once their life runs
// out, preserving the survivors' relative order.

use crate::color::Rgb;
use crate::render::Frame;
use crate::rng::RandomSource;

/// Particles spawned per interaction.
pub const BURST_BATCH: usize = 8;
/// Frames a burst particle lives for.
pub const BURST_MAX_LIFE: i32 = 60;

const RADIUS_MIN: f32 = 2.0;
const RADIUS_MAX: f32 = 6.0;
const SPEED_LIMIT: f32 = 4.0;
const VELOCITY_DAMPING: f32 = 0.98;
const RADIUS_SHRINK: f32 = 0.99;
const DRAW_ALPHA: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstParticle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub life: i32,
}

impl BurstParticle {
    pub fn sample(x: f32, y: f32, rng: &mut dyn RandomSource) -> Self {
        Self {
            x,
            y,
            vx: rng.uniform(-SPEED_LIMIT, SPEED_LIMIT),
            vy: rng.uniform(-SPEED_LIMIT, SPEED_LIMIT),
            radius: rng.uniform(RADIUS_MIN, RADIUS_MAX),
            life: BURST_MAX_LIFE,
        }
    }

    /// Linear fade: 1.0 at birth, 0.0 at expiry.
    pub fn opacity(&self) -> f32 {
        self.life.max(0) as f32 / BURST_MAX_LIFE as f32
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

pub struct Bursts {
    pub particles: Vec<BurstParticle>,
}

impl Bursts {
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

    /// Append one batch centered on the interaction point.
    pub fn spawn_batch(&mut self, x: f32, y: f32, rng: &mut dyn RandomSource) {
        for _ in 0..BURST_BATCH {
            self.particles.push(BurstParticle::sample(x, y, rng));
        }
    }

    /// Decay every particle one frame: damp velocity, shrink, advance,
    /// age. Expired particles are dropped the same frame.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.vx *= VELOCITY_DAMPING;
            p.vy *= VELOCITY_DAMPING;
            p.radius *= RADIUS_SHRINK;
            p.x += p.vx;
            p.y += p.vy;
            p.life -= 1;
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn draw(&self, frame: &mut Frame, color: Rgb) {
        for p in &self.particles {
            frame.fill_circle(p.x, p.y, p.radius, color, p.opacity() * DRAW_ALPHA);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::XorShift32;

    #[test]
    fn batch_spawns_eight_at_the_click_point() {
        let mut rng = XorShift32::new(3);
        let mut bursts = Bursts::new();
        bursts.spawn_batch(40.0, 50.0, &mut rng);
        assert_eq!(bursts.len(), BURST_BATCH);
        for p in &bursts.particles {
            assert_eq!((p.x, p.y), (40.0, 50.0));
            assert_eq!(p.life, BURST_MAX_LIFE);
            assert_eq!(p.opacity(), 1.0);
            assert!((-SPEED_LIMIT..SPEED_LIMIT).contains(&p.vx));
            assert!((-SPEED_LIMIT..SPEED_LIMIT).contains(&p.vy));
            assert!((RADIUS_MIN..RADIUS_MAX).contains(&p.radius));
        }
    }

    #[test]
    fn decay_is_monotonic_until_removal() {
        let mut rng = XorShift32::new(17);
        let mut bursts = Bursts::new();
        bursts.spawn_batch(0.0, 0.0, &mut rng);

        let mut prev: Vec<(f32, f32, f32)> = bursts
            .particles
            .iter()
            .map(|p| (p.radius, p.speed(), p.opacity()))
            .collect();

        for tick in 1..=BURST_MAX_LIFE {
            bursts.update();
            if tick < BURST_MAX_LIFE {
                assert_eq!(bursts.len(), BURST_BATCH, "early removal at tick {tick}");
                for (p, (radius, speed, opacity)) in bursts.particles.iter().zip(&prev) {
                    assert!(p.radius < *radius);
                    assert!(p.speed() <= *speed);
                    assert!(p.opacity() < *opacity);
                }
                prev = bursts
                    .particles
                    .iter()
                    .map(|p| (p.radius, p.speed(), p.opacity()))
                    .collect();
            }
        }

        // life hit zero on the final tick and the batch went with it
        assert!(bursts.is_empty());
    }

    #[test]
    fn compaction_preserves_survivor_order() {
        let mut rng = XorShift32::new(23);
        let mut bursts = Bursts::new();
        bursts.spawn_batch(0.0, 0.0, &mut rng);
        // age the first batch halfway, then add a second
        for _ in 0..30 {
            bursts.update();
        }
        bursts.spawn_batch(5.0, 5.0, &mut rng);
        // first batch dies 30 ticks later; second batch remains, in order
        for _ in 0..30 {
            bursts.update();
        }
        assert_eq!(bursts.len(), BURST_BATCH);
        assert!(bursts.particles.iter().all(|p| p.life == BURST_MAX_LIFE - 30));
    }
}
