//! Text layout into thickened stroke quads.

use glam::Vec2;

use crate::StrokeFont;

/// Four corners of a thickened stroke, in order around the outline.
pub type Quad = [Vec2; 4];

/// Flat text outline centered on the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextGeometry {
    pub quads: Vec<Quad>,
}

pub(crate) fn layout(font: &StrokeFont, text: &str, size: f32) -> TextGeometry {
    let width = font.weight() * size;
    let mut quads = Vec::new();
    let mut pen = 0.0;

    for ch in text.chars() {
        if let Some(glyph) = font.glyph(ch) {
            for &[x0, y0, x1, y1] in &glyph.strokes {
                let a = Vec2::new(pen + x0 * size, y0 * size);
                let b = Vec2::new(pen + x1 * size, y1 * size);
                quads.push(thicken(a, b, width));
            }
        }
        pen += font.advance() * size;
    }

    if quads.is_empty() {
        return TextGeometry::default();
    }

    let (min, max) = quads
        .iter()
        .flatten()
        .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let center = (min + max) / 2.0;
    for quad in &mut quads {
        for p in quad.iter_mut() {
            *p -= center;
        }
    }

    TextGeometry { quads }
}

/// Turn a segment into a rectangle `width` wide with square caps.
fn thicken(a: Vec2, b: Vec2, width: f32) -> Quad {
    let half = width / 2.0;
    let dir = (b - a).try_normalize().unwrap_or(Vec2::X);
    let along = dir * half;
    let across = dir.perp() * half;
    [
        a - along + across,
        b + along + across,
        b + along - across,
        a - along - across,
    ]
}
