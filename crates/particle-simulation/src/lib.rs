//! # Particle Simulation
//!
//! CPU simulation step for the 2D particle toy: link latching, pairwise force
//! summation, fixed-step integration, border reflection and trail capture.

pub mod params;
pub mod simulation;
pub mod spawn;

pub use params::*;
pub use simulation::*;
pub use spawn::*;
