//! Materials and the ambient + directional light rig.

use glam::Vec3;

use crate::color::hex;
use crate::texture::Texture;

/// Reflection seen by metal when no environment map is loaded.
const BARE_REFLECTION: f32 = 0.15;

/// Surface response to light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear base color.
    pub color: Vec3,
    pub metalness: f32,
    pub roughness: f32,
}

impl Material {
    pub fn new(rgb: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            color: hex(rgb),
            metalness,
            roughness,
        }
    }

    /// Polished metal for markers, numerals and the hour hand.
    pub fn silver() -> Self {
        Self::new(0xffffff, 1.0, 0.1)
    }

    /// Red lacquered metal for the second hand.
    pub fn second_hand() -> Self {
        Self::new(0xff0000, 0.5, 0.4)
    }

    /// Matte backdrop; tinted by its texture once loaded.
    pub fn backdrop() -> Self {
        Self::new(0xffffff, 0.1, 0.7)
    }

    /// Blinn-Phong exponent approximating this roughness.
    fn shininess(&self) -> f32 {
        let r = self.roughness.clamp(0.05, 1.0);
        (2.0 / (r * r) - 2.0).max(1.0)
    }
}

/// One ambient light and one directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub directional: f32,
    /// Unit vector pointing from the scene toward the light.
    pub direction: Vec3,
    pub exposure: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            directional: 1.5,
            direction: Vec3::new(10.0, 15.0, 35.0).normalize(),
            exposure: 1.0,
        }
    }
}

impl Lighting {
    /// Linear radiance of a surface seen from +Z.
    ///
    /// `albedo` is the material color already multiplied by any texture.
    /// Shadowed surfaces receive only the ambient term.
    pub fn shade(
        &self,
        material: &Material,
        albedo: Vec3,
        normal: Vec3,
        environment: Option<&Texture>,
        shadowed: bool,
    ) -> Vec3 {
        let normal = normal.try_normalize().unwrap_or(Vec3::Z);
        let view = Vec3::Z;
        let n_dot_l = if shadowed {
            0.0
        } else {
            normal.dot(self.direction).max(0.0)
        };

        let diffuse = albedo * (self.ambient + self.directional * n_dot_l) * (1.0 - material.metalness);

        let reflect_dir = 2.0 * normal.dot(view) * normal - view;
        let reflection = environment
            .map(|env| env.sample_direction(reflect_dir))
            .unwrap_or(Vec3::splat(BARE_REFLECTION));
        let metal = albedo * reflection * material.metalness;

        let half = (self.direction + view).normalize();
        let specular_strength = if n_dot_l > 0.0 {
            self.directional * normal.dot(half).max(0.0).powf(material.shininess())
        } else {
            0.0
        };
        let specular_tint = Vec3::splat(0.04).lerp(albedo, material.metalness);

        diffuse + metal + specular_tint * specular_strength
    }
}
