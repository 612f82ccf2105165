//! Seven-segment style digits.

use std::collections::HashMap;

use crate::{DEFAULT_WEIGHT, Glyph, StrokeFont};

const W: f32 = 0.6;

// Segments a-g of a seven-segment cell, 0.6 wide and 1.0 tall.
const A: [f32; 4] = [0.0, 1.0, W, 1.0];
const B: [f32; 4] = [W, 1.0, W, 0.5];
const C: [f32; 4] = [W, 0.5, W, 0.0];
const D: [f32; 4] = [0.0, 0.0, W, 0.0];
const E: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
const F: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
const G: [f32; 4] = [0.0, 0.5, W, 0.5];

/// Segments lit for each digit.
const DIGITS: [&[[f32; 4]]; 10] = [
    &[A, B, C, D, E, F],
    // 1 is a single centered bar rather than the right-hand segments.
    &[[W / 2.0, 0.0, W / 2.0, 1.0]],
    &[A, B, G, E, D],
    &[A, B, G, C, D],
    &[F, G, B, C],
    &[A, F, G, C, D],
    &[A, F, G, E, D, C],
    &[A, B, C],
    &[A, B, C, D, E, F, G],
    &[A, B, C, D, F, G],
];

pub(crate) fn seven_segment() -> StrokeFont {
    let glyphs: HashMap<char, Glyph> = DIGITS
        .iter()
        .enumerate()
        .filter_map(|(n, strokes)| {
            let ch = char::from_digit(n as u32, 10)?;
            Some((
                ch,
                Glyph {
                    strokes: strokes.to_vec(),
                },
            ))
        })
        .collect();
    StrokeFont::from_parts(0.9, DEFAULT_WEIGHT, glyphs)
}
