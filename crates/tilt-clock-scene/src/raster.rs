//! Pixel buffer, convex polygon fill and half-block presentation.

use glam::Vec2;
use ratatui::{buffer::Buffer, layout::Rect, style::Color};

/// Subsample offsets within a pixel. A pixel is covered when any of them
/// falls inside the polygon, so sub-pixel hands and marks stay visible.
const SUBSAMPLES: [Vec2; 4] = [
    Vec2::new(0.25, 0.25),
    Vec2::new(0.75, 0.25),
    Vec2::new(0.25, 0.75),
    Vec2::new(0.75, 0.75),
];

/// Screen pixels plus a shadow mask. Two pixel rows make one terminal row.
#[derive(Debug, Clone, Default)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    shadow: Vec<bool>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::Reset; width * height],
            shadow: vec![false; width * height],
        }
    }

    /// Resize, discarding contents when the size changes.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            *self = Self::new(width, height);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn clear_shadow(&mut self) {
        self.shadow.fill(false);
    }

    pub fn is_shadowed(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.shadow[y * self.width + x]
    }

    /// Fill a convex polygon given in pixel coordinates.
    pub fn fill_convex(&mut self, points: &[Vec2], color: Color) {
        self.for_covered(points, |pixels, _, idx| pixels[idx] = color);
    }

    /// Fill a convex polygon, using `shadowed` where the mask is set.
    pub fn fill_convex_shaded(&mut self, points: &[Vec2], lit: Color, shadowed: Color) {
        self.for_covered(points, |pixels, shadow, idx| {
            pixels[idx] = if shadow[idx] { shadowed } else { lit };
        });
    }

    /// Mark a convex polygon as lying in shadow.
    pub fn mark_shadow(&mut self, points: &[Vec2]) {
        self.for_covered(points, |_, shadow, idx| shadow[idx] = true);
    }

    fn for_covered(&mut self, points: &[Vec2], mut visit: impl FnMut(&mut [Color], &mut [bool], usize)) {
        if points.len() < 3 || self.width == 0 || self.height == 0 {
            return;
        }
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        if max.x < 0.0 || max.y < 0.0 || min.x >= self.width as f32 || min.y >= self.height as f32 {
            return;
        }
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil() as usize).min(self.width - 1);
        let y1 = (max.y.ceil() as usize).min(self.height - 1);

        let (area, perimeter) = area_and_perimeter(points);
        if area.abs() < f32::EPSILON {
            return;
        }
        // Slivers under a pixel wide would drop out between subsamples.
        let thin = 2.0 * area.abs() / perimeter < 1.0;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let corner = Vec2::new(x as f32, y as f32);
                let covered = if thin {
                    overlaps_pixel(points, area.signum(), corner)
                } else {
                    SUBSAMPLES.iter().any(|s| contains(points, corner + *s))
                };
                if covered {
                    let idx = y * self.width + x;
                    visit(&mut self.pixels, &mut self.shadow, idx);
                }
            }
        }
    }

    /// Draw into a terminal area with upper-half blocks: the foreground is
    /// the even pixel row, the background the odd one.
    pub fn present(&self, buf: &mut Buffer, area: Rect) {
        for row in 0..area.height {
            let top_y = row as usize * 2;
            for col in 0..area.width {
                let x = col as usize;
                let (Some(top), Some(bottom)) = (self.get(x, top_y), self.get(x, top_y + 1)) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('▀').set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

/// Signed shoelace area and perimeter.
fn area_and_perimeter(points: &[Vec2]) -> (f32, f32) {
    let mut area = 0.0;
    let mut perimeter = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        area += a.perp_dot(b);
        perimeter += a.distance(b);
    }
    (area / 2.0, perimeter)
}

/// Separating-axis test between a convex polygon and the unit pixel square
/// at `corner`. `winding` is the sign of the polygon's area.
fn overlaps_pixel(points: &[Vec2], winding: f32, corner: Vec2) -> bool {
    let square = [
        corner,
        corner + Vec2::X,
        corner + Vec2::ONE,
        corner + Vec2::Y,
    ];
    for (i, a) in points.iter().enumerate() {
        let edge = points[(i + 1) % points.len()] - *a;
        if square.iter().all(|c| winding * edge.perp_dot(*c - *a) < 0.0) {
            return false;
        }
    }
    true
}

/// Point-in-convex-polygon test that accepts either winding.
fn contains(points: &[Vec2], p: Vec2) -> bool {
    let mut sign = 0.0_f32;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let cross = (b - *a).perp_dot(p - *a);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}
