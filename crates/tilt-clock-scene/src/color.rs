//! Color conversion and tone mapping.
//!
//! Shading happens in linear RGB stored in [`Vec3`]; only the final
//! presentation step converts to 8-bit sRGB terminal colors.

use glam::Vec3;
use ratatui::style::Color;

/// Linear color from a `0xRRGGBB` sRGB literal.
pub fn hex(rgb: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((rgb >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Narkowicz fit of the ACES filmic curve.
pub fn aces_filmic(x: f32) -> f32 {
    let x = x.max(0.0);
    ((x * (2.51 * x + 0.03)) / (x * (2.43 * x + 0.59) + 0.14)).clamp(0.0, 1.0)
}

/// Tone map a linear HDR color to a terminal color.
pub fn present(linear: Vec3, exposure: f32) -> Color {
    let to_byte = |c: f32| (linear_to_srgb(aces_filmic(c * exposure)) * 255.0).round() as u8;
    Color::Rgb(to_byte(linear.x), to_byte(linear.y), to_byte(linear.z))
}

/// Display-referred color with no tone mapping, for flat fills.
pub fn present_flat(linear: Vec3) -> Color {
    let to_byte = |c: f32| (linear_to_srgb(c) * 255.0).round() as u8;
    Color::Rgb(to_byte(linear.x), to_byte(linear.y), to_byte(linear.z))
}

/// Convert HSL (hue in degrees, saturation and lightness in 0..1) to
/// linear RGB.
pub fn hsl_to_linear(h: f32, s: f32, l: f32) -> Vec3 {
    if s == 0.0 {
        return Vec3::splat(srgb_to_linear(l));
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    Vec3::new(
        srgb_to_linear(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        srgb_to_linear(hue_to_rgb(p, q, h)),
        srgb_to_linear(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
