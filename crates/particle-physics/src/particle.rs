//! Particle types for the 2D simulation
//!
//! A [`Particle`] is a movable [`Body`] plus a [`ParticleKind`] that optionally
//! carries the [`Aether`] extension (size and link).

use std::collections::VecDeque;

use glam::Vec2;

use crate::constants::clamp_size;

/// Render tag attached to each body. Not read by any physics code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tint {
    #[default]
    White,
    Red,
    Green,
    Blue,
    Yellow,
}

/// Stable handle to a particle inside a simulation.
///
/// Handles are plain indices; resolve them through the owning collection,
/// which checks bounds before dereferencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u32);

impl ParticleId {
    /// Handle for `index`, or `None` if it does not fit a `u32`
    pub fn try_new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// Handle for an index already known to fit.
    ///
    /// An oversized index panics in debug builds and saturates to a handle
    /// that never resolves in release builds.
    pub fn new(index: usize) -> Self {
        debug_assert!(
            u32::try_from(index).is_ok(),
            "particle index {index} does not fit a handle"
        );
        Self::try_new(index).unwrap_or(Self(u32::MAX))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ParticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bounded history of past positions, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a point, dropping the oldest ones while over capacity
    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Vec2> + '_ {
        self.points.iter()
    }

    pub fn oldest(&self) -> Option<Vec2> {
        self.points.front().copied()
    }

    pub fn newest(&self) -> Option<Vec2> {
        self.points.back().copied()
    }
}

/// Base movable entity shared by every particle kind
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Position in simulation space (origin-centred)
    pub position: Vec2,
    /// Velocity in simulation units per second
    pub velocity: Vec2,
    /// Net force applied during the last step (for the vector overlay)
    pub force: Vec2,
    pub tint: Tint,
    pub trail: Trail,
}

impl Body {
    pub fn new(position: Vec2, tint: Tint, trail_capacity: usize) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            tint,
            trail: Trail::new(trail_capacity),
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Aether extension: a sized particle that can latch onto one neighbour
#[derive(Debug, Clone, PartialEq)]
pub struct Aether {
    size: f32,
    link: Option<ParticleId>,
}

impl Aether {
    pub fn new(size: f32) -> Self {
        Self { size, link: None }
    }

    /// Raw size as spawned
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Size clamped away from zero, safe to divide by
    pub fn effective_size(&self) -> f32 {
        clamp_size(self.size)
    }

    pub fn link(&self) -> Option<ParticleId> {
        self.link
    }

    /// Latch a link. Returns `false` if a link already exists; links are never replaced.
    pub fn latch(&mut self, other: ParticleId) -> bool {
        if self.link.is_some() {
            return false;
        }
        self.link = Some(other);
        true
    }
}

/// Particle kinds that can coexist in one simulation
#[derive(Debug, Clone, PartialEq)]
pub enum ParticleKind {
    Plain,
    Aether(Aether),
}

/// Particle = body + kind-specific extension
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub body: Body,
    pub kind: ParticleKind,
}

impl Particle {
    /// Create a plain particle at rest
    pub fn new_plain(position: Vec2, tint: Tint, trail_capacity: usize) -> Self {
        Self {
            body: Body::new(position, tint, trail_capacity),
            kind: ParticleKind::Plain,
        }
    }

    /// Create an aether particle at rest
    pub fn new_aether(position: Vec2, size: f32, tint: Tint, trail_capacity: usize) -> Self {
        Self {
            body: Body::new(position, tint, trail_capacity),
            kind: ParticleKind::Aether(Aether::new(size)),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.body.velocity = velocity;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    pub fn aether(&self) -> Option<&Aether> {
        match &self.kind {
            ParticleKind::Aether(aether) => Some(aether),
            ParticleKind::Plain => None,
        }
    }

    pub fn aether_mut(&mut self) -> Option<&mut Aether> {
        match &mut self.kind {
            ParticleKind::Aether(aether) => Some(aether),
            ParticleKind::Plain => None,
        }
    }

    /// Size used by the force laws. Plain particles count as unit size.
    pub fn effective_size(&self) -> f32 {
        self.aether().map_or(1.0, Aether::effective_size)
    }

    pub fn link(&self) -> Option<ParticleId> {
        self.aether().and_then(Aether::link)
    }
}
