//! Textures in linear RGB, loaded from images or generated.

use std::f32::consts::PI;
use std::path::Path;

use glam::{Vec2, Vec3};

use crate::color::{hsl_to_linear, srgb_to_linear};

/// A grid of linear RGB texels.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Vec3>,
}

impl Texture {
    /// Build from 8-bit sRGB RGBA bytes. Alpha is ignored.
    pub fn from_rgba8(width: u32, height: u32, rgba8: &[u8]) -> Option<Self> {
        let count = width as usize * height as usize;
        if count == 0 || rgba8.len() != count * 4 {
            return None;
        }
        let texels = rgba8
            .chunks_exact(4)
            .map(|px| {
                Vec3::new(
                    srgb_to_linear(px[0] as f32 / 255.0),
                    srgb_to_linear(px[1] as f32 / 255.0),
                    srgb_to_linear(px[2] as f32 / 255.0),
                )
            })
            .collect();
        Some(Self {
            width,
            height,
            texels,
        })
    }

    /// Decode an image file.
    pub fn open(path: &Path) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.as_raw()).ok_or_else(|| {
            image::ImageError::Limits(image::error::LimitError::from_kind(
                image::error::LimitErrorKind::DimensionError,
            ))
        })
    }

    fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Vec3) -> Self {
        let texels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn texel(&self, x: i64, y: i64) -> Vec3 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Nearest sample with repeat wrapping. `v = 0` is the bottom row.
    pub fn sample_repeat(&self, uv: Vec2) -> Vec3 {
        let x = (uv.x * self.width as f32).floor() as i64;
        let y = ((1.0 - uv.y) * self.height as f32).floor() as i64;
        self.texel(x, y)
    }

    /// Look up an equirectangular map by direction (Y up, -Z forward).
    pub fn sample_direction(&self, dir: Vec3) -> Vec3 {
        let dir = dir.try_normalize().unwrap_or(Vec3::Y);
        let u = 0.5 + dir.x.atan2(-dir.z) / (2.0 * PI);
        let v = dir.y.clamp(-1.0, 1.0).acos() / PI;
        let x = (u * self.width as f32).floor() as i64;
        let y = ((v * self.height as f32).floor() as i64).clamp(0, self.height as i64 - 1);
        self.texel(x, y)
    }

    /// Light oak floor planks, rows of boards with staggered joints.
    pub fn wood_laminate(size: u32) -> Self {
        let size = size.max(8);
        let plank_height = size / 8;
        Self::from_fn(size, size, |x, y| {
            let plank = y / plank_height;
            let within = (y % plank_height) as f32 / plank_height as f32;
            // Joints sit at a different offset on every row.
            let joint = (hash(plank, 7, 3) * size as f32) as u32;
            let board = (x + size - joint) / (size / 2);

            let tone = hash(plank, board, 11);
            let lightness = 0.30 + 0.10 * tone;
            let hue = 28.0 + 8.0 * hash(plank, board, 13);

            let warp = value_noise(x as f32 / 24.0, plank * 31 + board);
            let grain = ((within * 9.0 + warp * 3.0) * PI * 2.0).sin() * 0.035;

            let edge = if within < 0.04 || (x + size - joint) % (size / 2) == 0 {
                -0.12
            } else {
                0.0
            };

            hsl_to_linear(hue, 0.45, (lightness + grain + edge).clamp(0.02, 0.9))
        })
    }

    /// Studio environment: bright ceiling, warm horizon, dark floor and two
    /// softboxes overhead.
    pub fn studio_environment(width: u32, height: u32) -> Self {
        let width = width.max(4);
        let height = height.max(2);
        Self::from_fn(width, height, |x, y| {
            let u = (x as f32 + 0.5) / width as f32;
            let v = (y as f32 + 0.5) / height as f32;
            let elevation = 0.5 - v;

            let sky = Vec3::new(1.1, 1.15, 1.25);
            let horizon = Vec3::new(0.9, 0.75, 0.55);
            let floor = Vec3::new(0.08, 0.07, 0.06);

            let base = if elevation >= 0.0 {
                horizon.lerp(sky, (elevation * 2.0).min(1.0))
            } else {
                horizon.lerp(floor, (-elevation * 6.0).min(1.0))
            };

            let softbox = |cu: f32, cv: f32| (u - cu).abs() < 0.06 && (v - cv).abs() < 0.07;
            if softbox(0.40, 0.22) || softbox(0.62, 0.18) {
                Vec3::splat(6.0)
            } else {
                base
            }
        })
    }
}

/// Integer hash mapped to `[0, 1)`.
fn hash(a: u32, b: u32, seed: u32) -> f32 {
    let mut h = a
        .wrapping_mul(0x9e37_79b1)
        .wrapping_add(b.wrapping_mul(0x85eb_ca77))
        .wrapping_add(seed.wrapping_mul(0xc2b2_ae3d));
    h ^= h >> 15;
    h = h.wrapping_mul(0x2c1b_3c6d);
    h ^= h >> 12;
    (h & 0x00ff_ffff) as f32 / 0x0100_0000 as f32
}

/// Smooth 1D noise in `[0, 1)`.
fn value_noise(x: f32, seed: u32) -> f32 {
    let i = x.floor();
    let t = x - i;
    let t = t * t * (3.0 - 2.0 * t);
    let a = hash(i as u32, seed, 17);
    let b = hash(i as u32 + 1, seed, 17);
    a + (b - a) * t
}
