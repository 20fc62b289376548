//! Triangle-list tessellation of draw lists

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::draw_list::{DrawList, Shape};
use crate::palette::Color;

/// Triangles per circle
pub const CIRCLE_SEGMENTS: usize = 16;

/// Pixel-space vertex (matches WGSL `VertexInput`)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn new(position: Vec2, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

fn push_circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Color) {
    let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
    for i in 0..CIRCLE_SEGMENTS {
        let a = center + Vec2::from_angle(step * i as f32) * radius;
        let b = center + Vec2::from_angle(step * (i + 1) as f32) * radius;
        out.extend([
            Vertex::new(center, color),
            Vertex::new(a, color),
            Vertex::new(b, color),
        ]);
    }
}

/// Quad of `width` pixels centred on the segment. Zero-length segments are dropped.
fn push_line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: Color) {
    let Some(direction) = (to - from).try_normalize() else {
        return;
    };
    let offset = direction.perp() * (width * 0.5);

    let (a, b, c, d) = (from + offset, from - offset, to - offset, to + offset);
    out.extend([
        Vertex::new(a, color),
        Vertex::new(b, color),
        Vertex::new(c, color),
        Vertex::new(a, color),
        Vertex::new(c, color),
        Vertex::new(d, color),
    ]);
}

pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for shape in list.shapes() {
        match shape {
            Shape::Circle {
                center,
                radius,
                color,
            } => push_circle(&mut vertices, *center, *radius, *color),
            Shape::Line {
                from,
                to,
                width,
                color,
            } => push_line(&mut vertices, *from, *to, *width, *color),
            Shape::Polyline {
                points,
                width,
                color,
            } => {
                for pair in points.windows(2) {
                    push_line(&mut vertices, pair[0], pair[1], *width, *color);
                }
            }
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    #[test]
    fn test_vertex_counts() {
        let mut list = DrawList::new();
        list.push(Shape::Circle {
            center: Vec2::ZERO,
            radius: 5.0,
            color: WHITE,
        });
        list.push(Shape::Line {
            from: Vec2::ZERO,
            to: Vec2::X,
            width: 2.0,
            color: WHITE,
        });
        list.push(Shape::Polyline {
            points: vec![Vec2::ZERO, Vec2::X, Vec2::ONE],
            width: 2.0,
            color: WHITE,
        });

        assert_eq!(tessellate(&list).len(), CIRCLE_SEGMENTS * 3 + 6 + 12);
    }

    #[test]
    fn test_zero_length_line_dropped() {
        let mut list = DrawList::new();
        list.push(Shape::Line {
            from: Vec2::ONE,
            to: Vec2::ONE,
            width: 2.0,
            color: WHITE,
        });
        assert!(tessellate(&list).is_empty());
    }

    #[test]
    fn test_line_width() {
        let mut list = DrawList::new();
        list.push(Shape::Line {
            from: Vec2::ZERO,
            to: Vec2::new(10.0, 0.0),
            width: 4.0,
            color: WHITE,
        });
        let vertices = tessellate(&list);
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 2.0).abs() < 1e-6));
    }
}
