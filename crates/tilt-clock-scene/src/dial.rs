//! Static clock-face geometry in the clock unit's local frame.
//!
//! Everything is a flat convex polygon in the XY plane at a fixed height:
//! the top faces of the extruded marks, numerals and hands. Y points to 12
//! o'clock, Z toward the viewer.

use std::f32::consts::TAU;

use glam::Vec2;
use tilt_clock_fonts::StrokeFont;

/// Height of the backdrop plane.
pub const BACKDROP_Z: f32 = -1.0;

const MARKER_RADIUS: f32 = 10.0;
const MARKER_DEPTH: f32 = 0.5;
const MARKER_BEVEL: f32 = 0.02;
const HOUR_MARK: Vec2 = Vec2::new(0.25, 1.0);
const MINUTE_MARK: Vec2 = Vec2::new(0.1, 0.5);

const NUMERAL_RADIUS: f32 = 8.075;
const NUMERAL_SIZE: f32 = 1.5;
const NUMERAL_THICKNESS: f32 = NUMERAL_SIZE / 2.0 * 1.25;

/// A convex outline.
pub type Polygon = Vec<Vec2>;

/// Which hand a [`Hand`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandKind {
    Hour,
    Minute,
    Second,
}

/// A hand pointing at 12 o'clock, pivoting on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    pub kind: HandKind,
    pub outline: Polygon,
    /// Height of the hand's top face.
    pub z: f32,
}

impl Hand {
    fn triangle(kind: HandKind, width: f32, length: f32, z: f32) -> Self {
        Self {
            kind,
            outline: vec![
                Vec2::new(-width / 2.0, 0.0),
                Vec2::new(width / 2.0, 0.0),
                Vec2::new(0.0, length),
            ],
            z,
        }
    }

    fn bar(kind: HandKind, width: f32, length: f32, z: f32) -> Self {
        Self {
            kind,
            outline: vec![
                Vec2::new(-width / 2.0, 0.0),
                Vec2::new(width / 2.0, 0.0),
                Vec2::new(width / 2.0, length),
                Vec2::new(-width / 2.0, length),
            ],
            z,
        }
    }

    /// Outline turned clockwise by `angle` radians.
    ///
    /// The frame is right-handed with Z toward the viewer, so a positive
    /// rotation about Z is counter-clockwise on screen; clockwise is negative.
    pub fn posed(&self, angle: f32) -> Polygon {
        let rotation = Vec2::from_angle(-angle);
        self.outline.iter().map(|p| rotation.rotate(*p)).collect()
    }
}

/// Tick marks, numerals and hands.
#[derive(Debug, Clone, PartialEq)]
pub struct Dial {
    pub markers: Vec<Polygon>,
    pub marker_z: f32,
    /// Empty until a font is available.
    pub numerals: Vec<Polygon>,
    pub numeral_z: f32,
    pub hands: [Hand; 3],
}

impl Default for Dial {
    fn default() -> Self {
        Self::new()
    }
}

impl Dial {
    pub fn new() -> Self {
        Self {
            markers: markers(),
            marker_z: BACKDROP_Z + MARKER_DEPTH + MARKER_BEVEL,
            numerals: Vec::new(),
            numeral_z: BACKDROP_Z + NUMERAL_THICKNESS / 2.0,
            hands: [
                Hand::triangle(HandKind::Hour, 0.6, 4.0, 0.10),
                Hand::triangle(HandKind::Minute, 0.4, 6.0, 0.14),
                Hand::bar(HandKind::Second, 0.1, 7.0, 0.18),
            ],
        }
    }

    /// Lay out numerals 1 to 12 with `font`.
    pub fn set_numerals(&mut self, font: &StrokeFont) {
        if let Some(n) = (1..=12).find(|n: &u32| !font.covers(&n.to_string())) {
            tracing::warn!(numeral = n, "font is missing digits, some numerals are incomplete");
        }
        self.numerals = (1..=12)
            .flat_map(|n| {
                let angle = n as f32 / 12.0 * TAU;
                let center = Vec2::new(angle.sin(), angle.cos()) * NUMERAL_RADIUS;
                font.text_geometry(&n.to_string(), NUMERAL_SIZE)
                    .quads
                    .into_iter()
                    .map(move |quad| quad.iter().map(|p| *p + center).collect::<Polygon>())
            })
            .collect();
    }

    pub fn hand(&self, kind: HandKind) -> &Hand {
        match kind {
            HandKind::Hour => &self.hands[0],
            HandKind::Minute => &self.hands[1],
            HandKind::Second => &self.hands[2],
        }
    }
}

/// Sixty marks around the rim, longer and wider every five minutes.
fn markers() -> Vec<Polygon> {
    (0..60)
        .map(|i| {
            let angle = i as f32 / 60.0 * TAU;
            let size = if i % 5 == 0 { HOUR_MARK } else { MINUTE_MARK };
            let center = Vec2::new(angle.sin(), angle.cos()) * MARKER_RADIUS;
            let rotation = Vec2::from_angle(-angle);
            let half = size / 2.0;
            [
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ]
            .iter()
            .map(|p| center + rotation.rotate(*p))
            .collect::<Polygon>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_sixty_markers_on_rim() {
        let dial = Dial::new();
        assert_eq!(dial.markers.len(), 60);
        for marker in &dial.markers {
            let center = marker.iter().copied().sum::<Vec2>() / marker.len() as f32;
            assert!((center.length() - MARKER_RADIUS).abs() < 1e-4);
        }
    }

    #[test]
    fn test_markers_point_at_center() {
        let dial = Dial::new();
        // The 3 o'clock mark lies along X, so it is long in X.
        let three = &dial.markers[15];
        let xs: Vec<f32> = three.iter().map(|p| p.x).collect();
        let ys: Vec<f32> = three.iter().map(|p| p.y).collect();
        let span = |v: &[f32]| {
            v.iter().cloned().fold(f32::MIN, f32::max) - v.iter().cloned().fold(f32::MAX, f32::min)
        };
        assert!((span(&xs) - 1.0).abs() < 1e-4);
        assert!((span(&ys) - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_hands_turn_clockwise() {
        let dial = Dial::new();
        let hour = dial.hand(HandKind::Hour);
        let tip = hour.posed(FRAC_PI_2)[2];
        assert!((tip - Vec2::new(4.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_hands_stack_second_on_top() {
        let dial = Dial::new();
        let [hour, minute, second] = &dial.hands;
        assert!(hour.z < minute.z && minute.z < second.z);
        assert!(dial.marker_z < hour.z);
        assert!(dial.numeral_z > BACKDROP_Z);
    }

    #[test]
    fn test_numerals_wait_for_font() {
        let mut dial = Dial::new();
        assert!(dial.numerals.is_empty());
        dial.set_numerals(&StrokeFont::builtin());
        assert!(!dial.numerals.is_empty());
        let reach = dial
            .numerals
            .iter()
            .flatten()
            .map(|p| p.length())
            .fold(0.0, f32::max);
        assert!(reach < MARKER_RADIUS);
    }

    #[test]
    fn test_hand_lengths() {
        let dial = Dial::new();
        let reach = |kind| {
            dial.hand(kind)
                .outline
                .iter()
                .map(|p| p.y)
                .fold(f32::MIN, f32::max)
        };
        assert_eq!(reach(HandKind::Hour), 4.0);
        assert_eq!(reach(HandKind::Minute), 6.0);
        assert_eq!(reach(HandKind::Second), 7.0);
    }
}
