//! Simulation parameters and the built-in variants

use glam::Vec2;
use particle_physics::{
    Tint, AETHER_TRAIL_CAPACITY, DEFAULT_SCALE, FIXED_LINK_DISTANCE, PLAIN_TRAIL_CAPACITY,
    SIZE_MAX, SIZE_MIN, TIMESTEP,
};

use crate::spawn::{SpawnConfig, SpawnKind};

/// Which force law drives the particles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceLaw {
    /// No forces, particles keep their initial velocity
    None,
    /// Pull toward other particles, proportional to distance
    Attraction,
    /// Inverse-sqrt repulsion scaled by particle size
    Avoidance,
    /// Avoidance plus a pull toward the linked particle
    AvoidanceChained,
}

impl ForceLaw {
    /// Avoidance laws feed the squared force into velocity, the rest are linear
    pub fn is_avoidance(self) -> bool {
        matches!(self, Self::Avoidance | Self::AvoidanceChained)
    }
}

/// How attraction contributions from several particles are combined
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Accumulation {
    /// Sum every pair
    #[default]
    Sum,
    /// Keep only the pair evaluated last
    LastPair,
}

/// How an avoidance force turns into acceleration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AccelerationResponse {
    /// `f * |f|` per axis
    #[default]
    SignedSquare,
    /// `f²` per axis, direction discarded
    Square,
}

/// Distance below which an aether particle latches onto a neighbour
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkThreshold {
    Disabled,
    /// Constant distance in simulation units
    Fixed(f32),
    /// `size^speed + 1/size`, times the viewport scale
    SpeedScaled,
}

/// Window-space mapping: `screen = position * scale + extent / 2`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn to_screen(&self, position: Vec2) -> Vec2 {
        position * self.scale + self.extent() * 0.5
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 800.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    pub force_law: ForceLaw,
    pub accumulation: Accumulation,
    pub response: AccelerationResponse,
    pub link_threshold: LinkThreshold,
    /// Simulated seconds per step
    pub timestep: f32,
    pub avoidance_strength: f32,
    pub attraction_strength: f32,
    pub viewport: Viewport,
}

impl SimulationParams {
    /// Link threshold for a particle of the given size and speed
    pub fn link_distance(&self, size: f32, speed: f32) -> Option<f32> {
        match self.link_threshold {
            LinkThreshold::Disabled => None,
            LinkThreshold::Fixed(distance) => Some(distance),
            LinkThreshold::SpeedScaled => {
                let size = particle_physics::clamp_size(size);
                Some((size.powf(speed) + 1.0 / size) * self.viewport.scale)
            }
        }
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            force_law: ForceLaw::AvoidanceChained,
            accumulation: Accumulation::Sum,
            response: AccelerationResponse::SignedSquare,
            link_threshold: LinkThreshold::SpeedScaled,
            timestep: TIMESTEP,
            avoidance_strength: 1.0,
            attraction_strength: 1.0,
            viewport: Viewport::default(),
        }
    }
}

/// Built-in configurations, one per force law
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Variant {
    /// Aether particles with avoidance, speed-scaled links and chaining pull
    #[default]
    Chained,
    /// Aether particles with avoidance and fixed-distance links
    Avoidance,
    /// Plain particles attracted to each other
    Attraction,
    /// Plain particles drifting without forces
    Drift,
}

impl Variant {
    pub fn params(self) -> SimulationParams {
        let base = SimulationParams::default();
        match self {
            Self::Chained => base,
            Self::Avoidance => SimulationParams {
                force_law: ForceLaw::Avoidance,
                link_threshold: LinkThreshold::Fixed(FIXED_LINK_DISTANCE),
                ..base
            },
            Self::Attraction => SimulationParams {
                force_law: ForceLaw::Attraction,
                link_threshold: LinkThreshold::Disabled,
                ..base
            },
            Self::Drift => SimulationParams {
                force_law: ForceLaw::None,
                link_threshold: LinkThreshold::Disabled,
                ..base
            },
        }
    }

    pub fn spawn_config(self) -> SpawnConfig {
        match self {
            Self::Chained => SpawnConfig {
                count: 15,
                extent: 80.0,
                kind: SpawnKind::Aether {
                    size_min: SIZE_MIN,
                    size_max: SIZE_MAX,
                },
                initial_speed: 0.0,
                trail_capacity: AETHER_TRAIL_CAPACITY,
                tints: vec![Tint::White],
            },
            Self::Avoidance => SpawnConfig {
                count: 30,
                extent: 100.0,
                kind: SpawnKind::Aether {
                    size_min: SIZE_MIN,
                    size_max: SIZE_MAX,
                },
                initial_speed: 0.0,
                trail_capacity: AETHER_TRAIL_CAPACITY,
                tints: vec![Tint::White],
            },
            Self::Attraction => SpawnConfig {
                count: 20,
                extent: 200.0,
                kind: SpawnKind::Plain,
                initial_speed: 0.0,
                trail_capacity: PLAIN_TRAIL_CAPACITY,
                tints: vec![Tint::Red, Tint::Green, Tint::Blue],
            },
            Self::Drift => SpawnConfig {
                count: 100,
                extent: 300.0,
                kind: SpawnKind::Plain,
                initial_speed: 120.0,
                trail_capacity: PLAIN_TRAIL_CAPACITY,
                tints: vec![Tint::Red, Tint::Green, Tint::Blue, Tint::Yellow],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_centres_origin() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.to_screen(Vec2::ZERO), Vec2::new(400.0, 300.0));
        assert_eq!(viewport.to_screen(Vec2::new(-400.0, 300.0)), Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_speed_scaled_threshold() {
        let params = Variant::Chained.params();
        // at rest: size^0 + 1/size = 1 + 2
        let distance = params.link_distance(0.5, 0.0).unwrap();
        assert!((distance - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_finite_for_zero_size() {
        let params = Variant::Chained.params();
        assert!(params.link_distance(0.0, 5.0).unwrap().is_finite());
    }

    #[test]
    fn test_variants_select_force_law() {
        assert_eq!(Variant::Chained.params().force_law, ForceLaw::AvoidanceChained);
        assert_eq!(
            Variant::Avoidance.params().link_threshold,
            LinkThreshold::Fixed(FIXED_LINK_DISTANCE)
        );
        assert_eq!(Variant::Attraction.params().link_distance(0.5, 1.0), None);
        assert_eq!(Variant::Drift.spawn_config().kind, SpawnKind::Plain);
    }
}
