//! Screen-space shapes for one frame

use glam::Vec2;
use particle_physics::{Particle, Tint};
use particle_simulation::Viewport;

use crate::palette::{tint_color, Color};

/// Particle circle radius in pixels
pub const PARTICLE_RADIUS: f32 = 5.0;
pub const TRAIL_WIDTH: f32 = 2.0;
pub const VECTOR_WIDTH: f32 = 2.0;
pub const LINK_WIDTH: f32 = 4.0;
/// Pixels per unit of velocity
pub const VELOCITY_VECTOR_SCALE: f32 = 1.0;
/// Pixels per unit of force
pub const FORCE_VECTOR_SCALE: f32 = 10.0;
/// Upper bound on segments in one gradient line
pub const MAX_GRADIENT_SEGMENTS: usize = 2048;

/// Overlay toggles, owned by the driver and passed in every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_vectors: bool,
    pub show_trails: bool,
}

impl RenderOptions {
    pub fn toggle_vectors(&mut self) {
        self.show_vectors = !self.show_vectors;
    }

    pub fn toggle_trails(&mut self) {
        self.show_trails = !self.show_trails;
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_vectors: false,
            show_trails: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Polyline {
        points: Vec<Vec2>,
        width: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    shapes: Vec<Shape>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Line split into one-pixel segments blending from `start` to `end`.
    ///
    /// Segment count is capped at [`MAX_GRADIENT_SEGMENTS`]; a non-finite
    /// endpoint draws nothing.
    pub fn push_gradient_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        start: Color,
        end: Color,
        width: f32,
    ) {
        let distance = from.distance(to);
        if !distance.is_finite() {
            return;
        }
        let steps = (distance as usize).min(MAX_GRADIENT_SEGMENTS);
        if steps == 0 {
            return;
        }

        let step = (to - from) / steps as f32;
        for i in 0..steps {
            let t = i as f32 / steps as f32;
            self.shapes.push(Shape::Line {
                from: from + step * i as f32,
                to: from + step * (i + 1) as f32,
                width,
                color: start.lerp(end, t),
            });
        }
    }

    /// Build the frame for `particles`: trails, links, bodies, then vectors on top
    pub fn from_particles(
        particles: &[Particle],
        viewport: &Viewport,
        options: RenderOptions,
    ) -> Self {
        let mut list = Self::new();

        if options.show_trails {
            for particle in particles {
                let trail = &particle.body.trail;
                if trail.len() > 2 {
                    list.push(Shape::Polyline {
                        points: trail.iter().map(|&p| viewport.to_screen(p)).collect(),
                        width: TRAIL_WIDTH,
                        color: tint_color(particle.body.tint),
                    });
                }
            }
        }

        let link_start = tint_color(Tint::Green);
        let link_end = tint_color(Tint::Blue);
        for particle in particles {
            // Stale handles are skipped rather than dereferenced
            let Some(linked) = particle.link().and_then(|id| particles.get(id.index())) else {
                continue;
            };
            let from = viewport.to_screen(particle.position());
            let to = viewport.to_screen(linked.position());
            list.push(Shape::Line {
                from,
                to,
                width: LINK_WIDTH,
                color: link_start,
            });
            list.push_gradient_line(from, to, link_start, link_end, LINK_WIDTH);
        }

        for particle in particles {
            list.push(Shape::Circle {
                center: viewport.to_screen(particle.position()),
                radius: PARTICLE_RADIUS,
                color: tint_color(particle.body.tint),
            });
        }

        if options.show_vectors {
            let velocity_color = tint_color(Tint::Yellow);
            let force_color = tint_color(Tint::Red);
            for particle in particles {
                let center = viewport.to_screen(particle.position());
                list.push(Shape::Line {
                    from: center,
                    to: center + particle.velocity() * VELOCITY_VECTOR_SCALE,
                    width: VECTOR_WIDTH,
                    color: velocity_color,
                });
                list.push(Shape::Line {
                    from: center,
                    to: center + particle.body.force * FORCE_VECTOR_SCALE,
                    width: VECTOR_WIDTH,
                    color: force_color,
                });
            }
        }

        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_physics::ParticleId;

    fn moving(x: f32, y: f32) -> Particle {
        let mut particle = Particle::new_aether(Vec2::new(x, y), 0.5, Tint::White, 100);
        particle.body.velocity = Vec2::new(1.0, 2.0);
        for i in 0..5 {
            particle.body.trail.push(Vec2::new(x + i as f32, y));
        }
        particle
    }

    fn count(list: &DrawList, pred: impl Fn(&Shape) -> bool) -> usize {
        list.shapes().iter().filter(|&s| pred(s)).count()
    }

    #[test]
    fn test_default_options_show_trails_only() {
        let particles = vec![moving(0.0, 0.0), moving(50.0, 0.0)];
        let list =
            DrawList::from_particles(&particles, &Viewport::default(), RenderOptions::default());

        assert_eq!(count(&list, |s| matches!(s, Shape::Circle { .. })), 2);
        assert_eq!(count(&list, |s| matches!(s, Shape::Polyline { .. })), 2);
        assert_eq!(count(&list, |s| matches!(s, Shape::Line { .. })), 0);
    }

    #[test]
    fn test_toggles() {
        let particles = vec![moving(0.0, 0.0)];
        let mut options = RenderOptions::default();
        options.toggle_trails();
        options.toggle_vectors();

        let list = DrawList::from_particles(&particles, &Viewport::default(), options);
        assert_eq!(count(&list, |s| matches!(s, Shape::Polyline { .. })), 0);
        // velocity + force
        assert_eq!(count(&list, |s| matches!(s, Shape::Line { .. })), 2);
    }

    #[test]
    fn test_short_trail_not_drawn() {
        let mut particle = Particle::new_plain(Vec2::ZERO, Tint::Red, 10);
        particle.body.trail.push(Vec2::ZERO);
        particle.body.trail.push(Vec2::X);

        let list =
            DrawList::from_particles(&[particle], &Viewport::default(), RenderOptions::default());
        assert_eq!(count(&list, |s| matches!(s, Shape::Polyline { .. })), 0);
    }

    #[test]
    fn test_link_draws_line_and_gradient() {
        let mut a = moving(0.0, 0.0);
        let b = moving(10.0, 0.0);
        a.aether_mut().unwrap().latch(ParticleId::new(1));

        let options = RenderOptions {
            show_vectors: false,
            show_trails: false,
        };
        let list = DrawList::from_particles(&[a, b], &Viewport::default(), options);

        // one solid line + 10 one-pixel gradient segments
        assert_eq!(count(&list, |s| matches!(s, Shape::Line { .. })), 11);
    }

    #[test]
    fn test_stale_link_skipped() {
        let mut a = moving(0.0, 0.0);
        a.aether_mut().unwrap().latch(ParticleId::new(9));

        let options = RenderOptions {
            show_vectors: false,
            show_trails: false,
        };
        let list = DrawList::from_particles(&[a], &Viewport::default(), options);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_gradient_segments() {
        let start = Color::rgba(0.0, 1.0, 0.0, 1.0);
        let end = Color::rgba(0.0, 0.0, 1.0, 1.0);
        let mut list = DrawList::new();
        list.push_gradient_line(Vec2::ZERO, Vec2::new(4.0, 0.0), start, end, 4.0);

        assert_eq!(list.len(), 4);
        match &list.shapes()[0] {
            Shape::Line { from, color, .. } => {
                assert_eq!(*from, Vec2::ZERO);
                assert_eq!(*color, start);
            }
            other => panic!("unexpected shape {other:?}"),
        }
        match &list.shapes()[3] {
            Shape::Line { to, .. } => assert_eq!(*to, Vec2::new(4.0, 0.0)),
            other => panic!("unexpected shape {other:?}"),
        }

        let mut empty = DrawList::new();
        empty.push_gradient_line(Vec2::ZERO, Vec2::new(0.5, 0.0), start, end, 4.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_gradient_bounded_for_degenerate_endpoints() {
        let start = Color::rgba(0.0, 1.0, 0.0, 1.0);
        let end = Color::rgba(0.0, 0.0, 1.0, 1.0);

        let mut list = DrawList::new();
        list.push_gradient_line(Vec2::ZERO, Vec2::new(f32::NAN, 0.0), start, end, 4.0);
        list.push_gradient_line(Vec2::ZERO, Vec2::new(f32::INFINITY, 0.0), start, end, 4.0);
        assert!(list.is_empty());

        list.push_gradient_line(Vec2::ZERO, Vec2::new(1.0e12, 0.0), start, end, 4.0);
        assert_eq!(list.len(), MAX_GRADIENT_SEGMENTS);
    }

    #[test]
    fn test_circles_in_screen_space() {
        let particle = Particle::new_plain(Vec2::new(-100.0, 50.0), Tint::Blue, 10);
        let list = DrawList::from_particles(
            &[particle],
            &Viewport::new(800.0, 600.0),
            RenderOptions::default(),
        );

        match &list.shapes()[0] {
            Shape::Circle { center, radius, .. } => {
                assert_eq!(*center, Vec2::new(300.0, 350.0));
                assert_eq!(*radius, PARTICLE_RADIUS);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }
}
