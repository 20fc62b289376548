//! # Particle Physics
//!
//! Data model for the 2D particle toy and the pairwise force laws acting
//! between particles (avoidance, chaining and attraction).

pub mod constants;
pub mod forces;
pub mod particle;

pub use constants::*;
pub use forces::*;
pub use particle::*;
