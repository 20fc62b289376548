//! Catppuccin Mocha colors in linear space

use catppuccin::PALETTE;
use particle_physics::Tint;

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert 8-bit sRGB to linear
    pub fn from_srgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

fn srgb_to_linear(value: u8) -> f32 {
    let c = value as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn mocha(color: &catppuccin::Color) -> Color {
    Color::from_srgb8(color.rgb.r, color.rgb.g, color.rgb.b)
}

/// Frame clear color
pub fn background() -> Color {
    mocha(&PALETTE.mocha.colors.base)
}

pub fn tint_color(tint: Tint) -> Color {
    let colors = &PALETTE.mocha.colors;
    match tint {
        Tint::White => mocha(&colors.text),
        Tint::Red => mocha(&colors.red),
        Tint::Green => mocha(&colors.green),
        Tint::Blue => mocha(&colors.blue),
        Tint::Yellow => mocha(&colors.yellow),
    }
}
