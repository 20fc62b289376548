//! # Particle Renderer
//!
//! Turns the particle set into 2D shapes (circles, trails, vectors, links)
//! and draws them with wgpu.

pub mod draw_list;
pub mod palette;
pub mod renderer;
pub mod tessellate;

pub use draw_list::*;
pub use palette::*;
pub use renderer::*;
pub use tessellate::*;
