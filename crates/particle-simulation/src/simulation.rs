//! CPU particle simulation
//!
//! Particles are advanced one at a time and mutated in place, so a particle
//! late in the collection sees neighbours that already moved this step.

use anyhow::ensure;
use glam::Vec2;
use particle_physics::{
    attraction, avoidance, chained, signed_square, Body, Particle, ParticleId,
};

use crate::params::{AccelerationResponse, Accumulation, ForceLaw, SimulationParams, Viewport};

/// Flip velocity components that carry a body past the viewport edges.
///
/// Only components moving outward are flipped, so a body that overshot
/// keeps heading back instead of flipping every frame.
pub fn reflect_at_borders(body: &mut Body, viewport: &Viewport) {
    let screen = viewport.to_screen(body.position);

    if (screen.x <= 0.0 && body.velocity.x < 0.0)
        || (screen.x >= viewport.width && body.velocity.x > 0.0)
    {
        body.velocity.x = -body.velocity.x;
    }

    if (screen.y <= 0.0 && body.velocity.y < 0.0)
        || (screen.y >= viewport.height && body.velocity.y > 0.0)
    {
        body.velocity.y = -body.velocity.y;
    }
}

/// Summary of the current state, for logging and the window title
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub tick: u64,
    pub particles: usize,
    pub linked: usize,
    pub mean_speed: f32,
    pub max_speed: f32,
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tick {} - {} particles, {} linked, speed mean {:.2} max {:.2}",
            self.tick, self.particles, self.linked, self.mean_speed, self.max_speed
        )
    }
}

pub struct ParticleSimulation {
    params: SimulationParams,
    particles: Vec<Particle>,
    tick: u64,
}

impl ParticleSimulation {
    pub fn new(params: SimulationParams, particles: Vec<Particle>) -> anyhow::Result<Self> {
        ensure!(
            params.timestep > 0.0 && params.timestep.is_finite(),
            "timestep must be positive, got {}",
            params.timestep
        );
        ensure!(
            params.viewport.width > 0.0 && params.viewport.height > 0.0,
            "viewport must have a positive extent, got {}x{}",
            params.viewport.width,
            params.viewport.height
        );
        ensure!(
            params.viewport.scale > 0.0,
            "viewport scale must be positive, got {}",
            params.viewport.scale
        );
        ensure!(
            u32::try_from(particles.len()).is_ok(),
            "too many particles: {}",
            particles.len()
        );

        log::info!(
            "Initializing ParticleSimulation: {} particles, {:?}, links {:?}",
            particles.len(),
            params.force_law,
            params.link_threshold
        );

        Ok(Self {
            params,
            particles,
            tick: 0,
        })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of completed steps
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Resolve a handle, `None` if it is out of bounds
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.index())
    }

    pub fn link_count(&self) -> usize {
        self.particles.iter().filter(|p| p.link().is_some()).count()
    }

    pub fn stats(&self) -> Stats {
        let (total, max) = self
            .particles
            .iter()
            .map(|p| p.body.speed())
            .fold((0.0_f32, 0.0_f32), |(sum, max), speed| {
                (sum + speed, max.max(speed))
            });

        Stats {
            tick: self.tick,
            particles: self.particles.len(),
            linked: self.link_count(),
            mean_speed: if self.particles.is_empty() {
                0.0
            } else {
                total / self.particles.len() as f32
            },
            max_speed: max,
        }
    }

    /// Advance every particle by one timestep
    pub fn step(&mut self) {
        for index in 0..self.particles.len() {
            self.update_links(index);
            let force = self.net_force(index);
            self.integrate(index, force);

            let body = &mut self.particles[index].body;
            reflect_at_borders(body, &self.params.viewport);
            body.trail.push(body.position);
        }

        self.tick += 1;
    }

    /// Latch the first neighbour (in index order) closer than the link threshold.
    ///
    /// Returns the newly latched neighbour. Particles that are plain or already
    /// linked are left untouched.
    pub fn update_links(&mut self, index: usize) -> Option<ParticleId> {
        let particle = &self.particles[index];
        let aether = particle.aether()?;
        if aether.link().is_some() {
            return None;
        }

        let threshold = self
            .params
            .link_distance(aether.size(), particle.body.speed())?;
        let position = particle.position();

        let candidate = self
            .particles
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != index)
            .find(|(_, other)| position.distance(other.position()) < threshold)
            .map(|(other, _)| ParticleId::new(other))?;

        let latched = self.particles[index]
            .aether_mut()
            .is_some_and(|aether| aether.latch(candidate));
        if latched {
            log::debug!("particle #{} linked to {}", index, candidate);
            Some(candidate)
        } else {
            None
        }
    }

    /// Net force on the particle at `index` from the current collection state
    pub fn net_force(&self, index: usize) -> Vec2 {
        let particle = &self.particles[index];
        let position = particle.position();
        let size = particle.effective_size();
        let others = self
            .particles
            .iter()
            .enumerate()
            .filter(move |&(other, _)| other != index)
            .map(|(_, other)| other.position());

        match self.params.force_law {
            ForceLaw::None => Vec2::ZERO,
            ForceLaw::Attraction => {
                let strength = self.params.attraction_strength;
                let forces = others.map(|other| attraction(position, other, strength));
                match self.params.accumulation {
                    Accumulation::Sum => forces.sum(),
                    Accumulation::LastPair => forces.last().unwrap_or(Vec2::ZERO),
                }
            }
            ForceLaw::Avoidance | ForceLaw::AvoidanceChained => {
                let strength = self.params.avoidance_strength;
                let net_avoidance: Vec2 = others
                    .map(|other| avoidance(position, size, other, strength))
                    .sum();

                if self.params.force_law != ForceLaw::AvoidanceChained {
                    return net_avoidance;
                }

                // A handle that no longer resolves simply contributes nothing
                match particle.link().and_then(|id| self.get(id)) {
                    Some(linked) => {
                        net_avoidance + chained(position, size, linked.position(), net_avoidance)
                    }
                    None => net_avoidance,
                }
            }
        }
    }

    fn integrate(&mut self, index: usize, force: Vec2) {
        let dt = self.params.timestep;
        let law = self.params.force_law;
        let response = self.params.response;

        let particle = &mut self.particles[index];
        let size = particle.effective_size();
        let body = &mut particle.body;

        let acceleration = if law.is_avoidance() {
            let shaped = match response {
                AccelerationResponse::SignedSquare => signed_square(force),
                AccelerationResponse::Square => force * force,
            };
            shaped * size
        } else {
            force
        };

        body.force = force;
        body.velocity += acceleration * dt;

        if !body.velocity.is_finite() {
            log::debug!("particle #{} velocity diverged, resetting", index);
            body.velocity = Vec2::ZERO;
        }

        body.position += body.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{LinkThreshold, Variant};
    use particle_physics::Tint;

    fn aether(x: f32, y: f32, size: f32) -> Particle {
        Particle::new_aether(Vec2::new(x, y), size, Tint::White, 100)
    }

    #[test]
    fn test_reflect_right_edge() {
        let viewport = Viewport::new(800.0, 800.0);
        let mut body = Body::new(Vec2::new(400.0, 0.0), Tint::White, 10);
        body.velocity = Vec2::new(5.0, 0.0);

        reflect_at_borders(&mut body, &viewport);
        assert!(body.velocity.x < 0.0);
    }

    #[test]
    fn test_reflect_left_and_vertical_edges() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut body = Body::new(Vec2::new(-401.0, 301.0), Tint::White, 10);
        body.velocity = Vec2::new(-3.0, 2.0);

        reflect_at_borders(&mut body, &viewport);
        assert_eq!(body.velocity, Vec2::new(3.0, -2.0));
    }

    #[test]
    fn test_reflect_leaves_inward_motion() {
        let viewport = Viewport::new(800.0, 800.0);
        let mut body = Body::new(Vec2::new(450.0, 0.0), Tint::White, 10);
        body.velocity = Vec2::new(-5.0, 1.0);

        reflect_at_borders(&mut body, &viewport);
        assert_eq!(body.velocity, Vec2::new(-5.0, 1.0));
    }

    #[test]
    fn test_coincident_particles_stay_finite() {
        let particles = vec![aether(0.0, 0.0, 0.5), aether(0.0, 0.0, 0.5)];
        let mut sim = ParticleSimulation::new(Variant::Chained.params(), particles).unwrap();

        for _ in 0..10 {
            sim.step();
        }

        for particle in sim.particles() {
            assert!(particle.position().is_finite());
            assert!(particle.velocity().is_finite());
        }
    }

    #[test]
    fn test_zero_size_stays_finite() {
        let particles = vec![aether(-5.0, 0.0, 0.0), aether(5.0, 0.0, 0.0)];
        let mut sim = ParticleSimulation::new(Variant::Chained.params(), particles).unwrap();

        for _ in 0..30 {
            sim.step();
            assert!(sim.particles().iter().all(|p| p.position().is_finite()));
        }
    }

    #[test]
    fn test_links_latch_once_and_persist() {
        let params = SimulationParams {
            force_law: ForceLaw::AvoidanceChained,
            link_threshold: LinkThreshold::Fixed(10.0),
            ..Variant::Chained.params()
        };
        let particles = vec![
            aether(0.0, 0.0, 0.5),
            aether(4.0, 0.0, 0.5),
            aether(-4.0, 0.0, 0.5),
            aether(200.0, 0.0, 0.5),
        ];
        let mut sim = ParticleSimulation::new(params, particles).unwrap();

        sim.step();
        let first: Vec<_> = sim.particles().iter().map(Particle::link).collect();
        assert_eq!(first[0], Some(ParticleId::new(1)));

        for _ in 0..200 {
            sim.step();
            for (particle, initial) in sim.particles().iter().zip(&first) {
                if let Some(id) = initial {
                    assert_eq!(particle.link(), Some(*id));
                }
            }
        }
    }

    #[test]
    fn test_plain_particles_never_link() {
        let params = SimulationParams {
            link_threshold: LinkThreshold::Fixed(1000.0),
            ..Variant::Attraction.params()
        };
        let particles = vec![
            Particle::new_plain(Vec2::ZERO, Tint::Red, 10),
            Particle::new_plain(Vec2::X, Tint::Red, 10),
        ];
        let mut sim = ParticleSimulation::new(params, particles).unwrap();
        sim.step();
        assert_eq!(sim.link_count(), 0);
    }

    #[test]
    fn test_trail_capped() {
        let particles = vec![aether(-50.0, 0.0, 0.5), aether(50.0, 0.0, 0.5)];
        let mut sim = ParticleSimulation::new(Variant::Avoidance.params(), particles).unwrap();

        for _ in 0..250 {
            sim.step();
        }

        for particle in sim.particles() {
            assert_eq!(particle.body.trail.len(), 100);
            assert_eq!(particle.body.trail.newest(), Some(particle.position()));
        }
        assert_eq!(sim.tick(), 250);
    }

    #[test]
    fn test_last_pair_keeps_only_final_neighbour() {
        let particles = vec![
            Particle::new_plain(Vec2::ZERO, Tint::Red, 10),
            Particle::new_plain(Vec2::new(10.0, 0.0), Tint::Green, 10),
            Particle::new_plain(Vec2::new(0.0, 20.0), Tint::Blue, 10),
        ];
        let summed = ParticleSimulation::new(Variant::Attraction.params(), particles.clone())
            .unwrap()
            .net_force(0);
        let last = ParticleSimulation::new(
            SimulationParams {
                accumulation: Accumulation::LastPair,
                ..Variant::Attraction.params()
            },
            particles,
        )
        .unwrap()
        .net_force(0);

        assert!((summed - Vec2::new(10.0, 20.0)).length() < 1e-4);
        assert!((last - Vec2::new(0.0, 20.0)).length() < 1e-4);
    }

    #[test]
    fn test_unsigned_square_discards_direction() {
        let particles = vec![aether(-50.0, 0.0, 0.5), aether(50.0, 0.0, 0.5)];
        let params = SimulationParams {
            response: AccelerationResponse::Square,
            ..Variant::Avoidance.params()
        };
        let mut sim = ParticleSimulation::new(params, particles).unwrap();
        sim.step();
        assert!(sim.particles().iter().all(|p| p.velocity().x > 0.0));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = SimulationParams {
            timestep: 0.0,
            ..SimulationParams::default()
        };
        assert!(ParticleSimulation::new(params, Vec::new()).is_err());

        let params = SimulationParams {
            viewport: Viewport::new(0.0, 100.0),
            ..SimulationParams::default()
        };
        assert!(ParticleSimulation::new(params, Vec::new()).is_err());
    }

    #[test]
    fn test_stats() {
        let particles = vec![
            Particle::new_plain(Vec2::ZERO, Tint::Red, 10).with_velocity(Vec2::new(3.0, 4.0)),
            Particle::new_plain(Vec2::X, Tint::Red, 10),
        ];
        let sim = ParticleSimulation::new(Variant::Drift.params(), particles).unwrap();
        let stats = sim.stats();
        assert_eq!(stats.particles, 2);
        assert_eq!(stats.max_speed, 5.0);
        assert_eq!(stats.mean_speed, 2.5);
    }
}
