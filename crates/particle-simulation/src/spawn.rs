//! Random initial particle placement

use glam::Vec2;
use particle_physics::{Particle, Tint};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnKind {
    Plain,
    Aether { size_min: f32, size_max: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnConfig {
    pub count: usize,
    /// Positions are drawn from `[-extent, extent)` on both axes
    pub extent: f32,
    pub kind: SpawnKind,
    /// Upper bound of the random initial speed (0 spawns at rest)
    pub initial_speed: f32,
    pub trail_capacity: usize,
    /// Tints assigned round-robin
    pub tints: Vec<Tint>,
}

/// Draw from `[low, high)`, falling back to `low` for an empty range
fn sample<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.random_range(low..high)
    } else {
        low
    }
}

/// Create `config.count` particles with random positions (and sizes for aether)
pub fn spawn<R: Rng + ?Sized>(config: &SpawnConfig, rng: &mut R) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(config.count);

    for i in 0..config.count {
        let position = Vec2::new(
            sample(rng, -config.extent, config.extent),
            sample(rng, -config.extent, config.extent),
        );
        let tint = if config.tints.is_empty() {
            Tint::default()
        } else {
            config.tints[i % config.tints.len()]
        };

        let particle = match config.kind {
            SpawnKind::Plain => Particle::new_plain(position, tint, config.trail_capacity),
            SpawnKind::Aether { size_min, size_max } => {
                let size = sample(rng, size_min, size_max);
                Particle::new_aether(position, size, tint, config.trail_capacity)
            }
        };

        let velocity = if config.initial_speed > 0.0 {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            Vec2::from_angle(angle) * sample(rng, 0.0, config.initial_speed)
        } else {
            Vec2::ZERO
        };

        particles.push(particle.with_velocity(velocity));
    }

    log::info!("✓ Spawned {} particles", particles.len());
    particles
}
