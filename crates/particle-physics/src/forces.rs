//! Pairwise force laws
//!
//! All functions take plain positions so they can be evaluated against a
//! collection that is being mutated in place. Coincident particles and
//! non-positive sizes produce a zero or clamped contribution instead of NaN.

use glam::Vec2;

use crate::constants::{clamp_size, MIN_DISTANCE};

/// Unit vector and distance from `from` to `to`, or `None` if they coincide
#[inline]
fn separation(from: Vec2, to: Vec2) -> Option<(Vec2, f32)> {
    let delta = to - from;
    let distance = delta.length();
    if !distance.is_finite() || distance <= MIN_DISTANCE {
        return None;
    }
    Some((delta / distance, distance))
}

/// Avoidance (repulsion) felt at `position` from a particle at `other`
/// F = -strength / (size * sqrt(r)), directed along the separation
pub fn avoidance(position: Vec2, size: f32, other: Vec2, strength: f32) -> Vec2 {
    let Some((direction, distance)) = separation(position, other) else {
        return Vec2::ZERO;
    };

    let magnitude = -strength / (clamp_size(size) * distance.sqrt());
    direction * magnitude
}

/// Extra pull toward a linked particle
/// F = (ln(r) + |net_avoidance|) / size, directed toward `linked`
///
/// For `r < 1` the log term is negative and the pull becomes a push unless the
/// avoidance magnitude outweighs it.
pub fn chained(position: Vec2, size: f32, linked: Vec2, net_avoidance: Vec2) -> Vec2 {
    let Some((direction, distance)) = separation(position, linked) else {
        return Vec2::ZERO;
    };

    let magnitude = (distance.ln() + net_avoidance.length()) / clamp_size(size);
    direction * magnitude
}

/// Attraction toward `other`, growing linearly with distance (unbounded)
pub fn attraction(position: Vec2, other: Vec2, strength: f32) -> Vec2 {
    let Some((direction, distance)) = separation(position, other) else {
        return Vec2::ZERO;
    };

    direction * distance * strength
}

/// Per-axis square of a force, keeping the sign of each component
#[inline]
pub fn signed_square(force: Vec2) -> Vec2 {
    force * force.abs()
}
