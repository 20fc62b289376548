//! Simulation constants
//!
//! Tuned for visual effect rather than physical meaning.

/// Fixed simulated time advanced per step (one frame at 60 Hz)
pub const TIMESTEP: f32 = 1.0 / 60.0;

/// Smallest size used in force and acceleration terms.
/// Sizes below this are clamped so `1 / size` stays finite.
pub const MIN_SIZE: f32 = 1.0e-3;

/// Separations at or below this are treated as coincident and contribute no force
pub const MIN_DISTANCE: f32 = 1.0e-6;

/// Default simulation-to-screen scale
pub const DEFAULT_SCALE: f32 = 1.0;

/// Fixed link distance used by the avoidance-only Aether variant
pub const FIXED_LINK_DISTANCE: f32 = 10.0;

/// Trail length for Aether variants
pub const AETHER_TRAIL_CAPACITY: usize = 100;

/// Trail length for plain particle variants
pub const PLAIN_TRAIL_CAPACITY: usize = 10;

/// Aether size range used when spawning
pub const SIZE_MIN: f32 = 0.1;
pub const SIZE_MAX: f32 = 1.0;

/// Clamp a particle size into the usable range (NaN maps to `MIN_SIZE`)
#[inline]
pub fn clamp_size(size: f32) -> f32 {
    size.max(MIN_SIZE)
}
