//! The clock scene: explicit state, per-frame poses and rendering.

use std::borrow::Cow;
use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use ratatui::{Frame, layout::Rect, style::Color};
use tilt_clock_core::{Extent, HandAngles, SceneTilt, ViewportFrame, ViewportFramer};
use tilt_clock_fonts::StrokeFont;

use crate::assets::{AssetSlot, LoadedAsset};
use crate::color::{hex, present, present_flat};
use crate::dial::{BACKDROP_Z, Dial, HandKind, Polygon};
use crate::lighting::{Lighting, Material};
use crate::raster::PixelBuffer;
use crate::texture::Texture;

const CLEAR_COLOR: u32 = 0xcccccc;
const FALLBACK_BACKDROP: u32 = 0x111122;
const NEAR: f32 = 1.0;
const FAR: f32 = 1000.0;

/// One painter's-order layer of flat geometry.
struct Layer<'a> {
    polygons: Cow<'a, [Polygon]>,
    z: f32,
    material: Material,
}

/// Everything needed to draw the clock, owned in one place.
///
/// The frame loop is the only writer: it poses the scene with
/// [`set_tilt`](Self::set_tilt), [`look_at_origin`](Self::look_at_origin)
/// and [`set_hands`](Self::set_hands), feeds finished loads to
/// [`apply`](Self::apply), then draws.
#[derive(Debug)]
pub struct ClockView {
    framer: ViewportFramer,
    lighting: Lighting,
    dial: Dial,
    viewport: (usize, usize),
    frame: ViewportFrame,
    eye: Vec3,
    view: Mat4,
    scene_tilt: SceneTilt,
    tilt: Quat,
    hands: HandAngles,
    backdrop: AssetSlot<Texture>,
    environment: AssetSlot<Texture>,
    font: AssetSlot<StrokeFont>,
    pixels: PixelBuffer,
}

impl ClockView {
    pub fn new(framer: ViewportFramer) -> Self {
        let frame = framer.frame(1.0, 1.0, false);
        let eye = Vec3::Z * frame.camera_distance;
        Self {
            framer,
            lighting: Lighting::default(),
            dial: Dial::new(),
            viewport: (0, 0),
            frame,
            eye,
            view: Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y),
            scene_tilt: SceneTilt::default(),
            tilt: Quat::IDENTITY,
            hands: HandAngles::default(),
            backdrop: AssetSlot::Pending,
            environment: AssetSlot::Pending,
            font: AssetSlot::Pending,
            pixels: PixelBuffer::default(),
        }
    }

    /// Change the pixel size of the viewport and reframe.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.viewport = (width, height);
        self.pixels.resize(width, height);
        self.refresh_framing();
    }

    /// Reframe for the current viewport and move the camera with it.
    fn refresh_framing(&mut self) {
        let (width, height) = self.viewport;
        self.frame = self
            .framer
            .frame(width as f32, height as f32, self.backdrop.is_ready());
        self.eye = Vec3::Z * self.frame.camera_distance;
        self.look_at_origin();
    }

    pub fn viewport_frame(&self) -> &ViewportFrame {
        &self.frame
    }

    pub fn dial(&self) -> &Dial {
        &self.dial
    }

    pub fn hands(&self) -> HandAngles {
        self.hands
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// The tilt last applied to the clock unit.
    pub fn tilt(&self) -> SceneTilt {
        self.scene_tilt
    }

    /// Rotate the whole clock unit.
    pub fn set_tilt(&mut self, tilt: SceneTilt) {
        self.scene_tilt = tilt;
        self.tilt = Quat::from_euler(EulerRot::XYZ, tilt.x_radians(), tilt.y_radians(), 0.0);
    }

    /// Aim the camera at the center of the face.
    pub fn look_at_origin(&mut self) {
        self.view = Mat4::look_at_rh(self.eye, Vec3::ZERO, Vec3::Y);
    }

    pub fn set_hands(&mut self, angles: HandAngles) {
        self.hands = angles;
    }

    /// Install a finished load. Returns false if that asset was already
    /// settled, in which case nothing changes.
    pub fn apply(&mut self, asset: LoadedAsset) -> bool {
        match asset {
            LoadedAsset::Backdrop(result) => {
                let value = result
                    .inspect_err(|err| {
                        tracing::warn!(error = %err, "backdrop texture unavailable, using fallback color")
                    })
                    .ok();
                let applied = self.backdrop.fill(value);
                if applied && self.backdrop.is_ready() {
                    tracing::info!("backdrop texture loaded");
                    self.refresh_framing();
                }
                applied
            }
            LoadedAsset::Environment(result) => {
                let value = result
                    .inspect_err(|err| {
                        tracing::warn!(error = %err, "environment map unavailable, metal will not reflect")
                    })
                    .ok();
                let applied = self.environment.fill(value);
                if applied && self.environment.is_ready() {
                    tracing::info!("environment map loaded");
                }
                applied
            }
            LoadedAsset::Font(result) => {
                let value = result
                    .inspect_err(|err| {
                        tracing::warn!(error = %err, "numeral font unavailable, numerals omitted")
                    })
                    .ok();
                let applied = self.font.fill(value);
                if applied && let Some(font) = self.font.get() {
                    self.dial.set_numerals(font);
                    tracing::info!("numeral font loaded");
                }
                applied
            }
        }
    }

    /// Render into `area` of the terminal frame.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let size = (area.width as usize, area.height as usize * 2);
        if size != self.viewport {
            self.resize(size.0, size.1);
        }
        self.render();
        self.pixels.present(frame.buffer_mut(), area);
    }

    fn mvp(&self) -> Mat4 {
        let projection = Mat4::perspective_rh_gl(
            self.framer.fov_deg.to_radians(),
            self.frame.aspect,
            NEAR,
            FAR,
        );
        projection * self.view * Mat4::from_quat(self.tilt)
    }

    fn to_screen(&self, mvp: &Mat4, local: Vec3) -> Option<Vec2> {
        let clip = *mvp * local.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let (width, height) = self.viewport;
        Some(Vec2::new(
            (ndc.x + 1.0) / 2.0 * width as f32,
            (1.0 - ndc.y) / 2.0 * height as f32,
        ))
    }

    /// Screen position of a point in the clock unit's frame.
    pub fn project(&self, local: Vec3) -> Option<Vec2> {
        self.to_screen(&self.mvp(), local)
    }

    fn backdrop_hit(&self, inverse_mvp: &Mat4, screen: Vec2) -> Option<Vec2> {
        let (width, height) = self.viewport;
        let ndc_x = screen.x / width as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - screen.y / height as f32 * 2.0;
        let near = inverse_mvp.project_point3(Vec3::new(ndc_x, ndc_y, -1.0));
        let far = inverse_mvp.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        let dir = far - near;
        if dir.z.abs() <= f32::EPSILON {
            return None;
        }
        let t = (BACKDROP_Z - near.z) / dir.z;
        if t < 0.0 {
            return None;
        }
        let hit = (near + dir * t).truncate();
        let half = Vec2::new(self.frame.backdrop.width, self.frame.backdrop.height) / 2.0;
        (hit.x.abs() <= half.x && hit.y.abs() <= half.y).then_some(hit)
    }

    /// Where the ray through a screen point meets the backdrop, if it does.
    pub fn backdrop_point(&self, screen: Vec2) -> Option<Vec2> {
        self.backdrop_hit(&self.mvp().inverse(), screen)
    }

    /// Texture coordinate of a backdrop point: centered, turned a quarter
    /// turn and tiled by the framing's repeat.
    fn backdrop_uv(&self, point: Vec2) -> Vec2 {
        let Extent { width, height } = self.frame.backdrop;
        let centered = Vec2::new(point.x / width, point.y / height);
        let repeat = self.frame.texture_repeat.unwrap_or(Extent {
            width: 1.0,
            height: 1.0,
        });
        Vec2::from_angle(FRAC_PI_2).rotate(centered) * Vec2::new(repeat.width, repeat.height)
            + Vec2::splat(0.5)
    }

    fn layers(&self) -> Vec<Layer<'_>> {
        let silver = Material::silver();
        let mut layers = vec![
            Layer {
                polygons: Cow::Borrowed(&self.dial.numerals),
                z: self.dial.numeral_z,
                material: silver,
            },
            Layer {
                polygons: Cow::Borrowed(&self.dial.markers),
                z: self.dial.marker_z,
                material: silver,
            },
        ];
        for hand in &self.dial.hands {
            let (angle, material) = match hand.kind {
                HandKind::Hour => (self.hands.hours_radians(), silver),
                HandKind::Minute => (self.hands.minutes_radians(), silver),
                HandKind::Second => (self.hands.seconds_radians(), Material::second_hand()),
            };
            layers.push(Layer {
                polygons: Cow::Owned(vec![hand.posed(angle)]),
                z: hand.z,
                material,
            });
        }
        layers.sort_by(|a, b| a.z.total_cmp(&b.z));
        layers
    }

    /// Mark where every part above `receiver_z` shadows the plane at that
    /// height. `light` is in the clock unit's frame.
    fn cast_shadows(
        &self,
        mvp: &Mat4,
        light: Vec3,
        layers: &[Layer<'_>],
        receiver_z: f32,
        mask: &mut PixelBuffer,
    ) {
        mask.clear_shadow();
        if light.z <= 1e-3 {
            return;
        }
        for layer in layers.iter().filter(|layer| layer.z > receiver_z) {
            let offset = light * ((layer.z - receiver_z) / light.z);
            for polygon in layer.polygons.iter() {
                let shadow: Option<Vec<Vec2>> = polygon
                    .iter()
                    .map(|p| self.to_screen(mvp, p.extend(layer.z) - offset))
                    .collect();
                if let Some(shadow) = shadow {
                    mask.mark_shadow(&shadow);
                }
            }
        }
    }

    /// Draw the current pose into the pixel buffer.
    pub fn render(&mut self) -> &PixelBuffer {
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            return &self.pixels;
        }

        let mut pixels = std::mem::take(&mut self.pixels);
        let mvp = self.mvp();
        let inverse_mvp = mvp.inverse();
        let normal = self.tilt * Vec3::Z;
        let layers = self.layers();

        let light = self.tilt.inverse() * self.lighting.direction;
        self.cast_shadows(&mvp, light, &layers, BACKDROP_Z, &mut pixels);

        // Backdrop, one ray per pixel.
        let backdrop_material = Material::backdrop();
        let clear = present_flat(hex(CLEAR_COLOR));
        for y in 0..height {
            for x in 0..width {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let color = match self.backdrop_hit(&inverse_mvp, center) {
                    Some(point) => {
                        let albedo = match &self.backdrop {
                            AssetSlot::Ready(texture) => {
                                backdrop_material.color * texture.sample_repeat(self.backdrop_uv(point))
                            }
                            AssetSlot::Failed => hex(FALLBACK_BACKDROP),
                            AssetSlot::Pending => backdrop_material.color,
                        };
                        let radiance = self.lighting.shade(
                            &backdrop_material,
                            albedo,
                            normal,
                            None,
                            pixels.is_shadowed(x, y),
                        );
                        present(radiance, self.lighting.exposure)
                    }
                    None => clear,
                };
                pixels.set(x, y, color);
            }
        }

        // Flat parts, back to front, each shadowed by the parts above it.
        let environment = self.environment.get();
        for layer in &layers {
            self.cast_shadows(&mvp, light, &layers, layer.z, &mut pixels);
            let [lit, shadowed]: [Color; 2] = [false, true].map(|in_shadow| {
                let radiance = self.lighting.shade(
                    &layer.material,
                    layer.material.color,
                    normal,
                    environment,
                    in_shadow,
                );
                present(radiance, self.lighting.exposure)
            });
            for polygon in layer.polygons.iter() {
                let screen: Option<Vec<Vec2>> = polygon
                    .iter()
                    .map(|p| self.to_screen(&mvp, p.extend(layer.z)))
                    .collect();
                if let Some(screen) = screen {
                    pixels.fill_convex_shaded(&screen, lit, shadowed);
                }
            }
        }

        drop(layers);
        self.pixels = pixels;
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetError;
    use ratatui::{Terminal, backend::TestBackend};
    use chrono::NaiveTime;
    use std::path::PathBuf;
    use tilt_clock_core::FitAxis;

    fn view(width: usize, height: usize) -> ClockView {
        let mut view = ClockView::new(ViewportFramer::default());
        view.resize(width, height);
        view.look_at_origin();
        view
    }

    fn missing_image() -> AssetError {
        AssetError::Image {
            path: PathBuf::from("/nonexistent/wood.jpg"),
            source: image::ImageError::IoError(std::io::Error::from(std::io::ErrorKind::NotFound)),
        }
    }

    fn center(view: &ClockView) -> Vec2 {
        view.project(Vec3::ZERO).unwrap()
    }

    #[test]
    fn test_hour_hand_points_right_at_three() {
        let mut view = view(120, 80);
        let time = NaiveTime::from_hms_opt(3, 0, 0).unwrap();
        view.set_hands(HandAngles::at(&time));
        let hand = view.dial().hand(HandKind::Hour);
        let tip = hand.posed(view.hands().hours_radians())[2];
        let screen = view.project(tip.extend(hand.z)).unwrap();
        let origin = center(&view);
        assert!(screen.x > origin.x + 5.0);
        assert!((screen.y - origin.y).abs() < 1.0);
    }

    #[test]
    fn test_twelve_is_up_on_screen() {
        let view = view(120, 80);
        let twelve = view.project(Vec3::new(0.0, 10.0, BACKDROP_Z)).unwrap();
        assert!(twelve.y < center(&view).y);
    }

    #[test]
    fn test_face_fits_viewport() {
        for (width, height) in [(160, 90), (90, 160), (100, 100)] {
            let view = view(width, height);
            for angle in [0.0_f32, FRAC_PI_2, std::f32::consts::PI, -FRAC_PI_2] {
                let rim = Vec2::from_angle(angle) * 10.5;
                let p = view.project(rim.extend(0.0)).unwrap();
                assert!(p.x >= 0.0 && p.x <= width as f32, "{width}x{height}");
                assert!(p.y >= 0.0 && p.y <= height as f32, "{width}x{height}");
            }
        }
    }

    #[test]
    fn test_backdrop_covers_viewport_at_full_tilt() {
        for (width, height) in [(96, 48), (48, 96)] {
            for (pitch, roll) in [(7.5, 7.5), (-7.5, 7.5), (7.5, -7.5), (-7.5, -7.5)] {
                let mut view = view(width, height);
                view.set_tilt(SceneTilt {
                    pitch_deg: pitch,
                    roll_deg: roll,
                });
                view.look_at_origin();
                for y in 0..height {
                    for x in 0..width {
                        let point = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                        assert!(
                            view.backdrop_point(point).is_some(),
                            "gap at {x},{y} for {width}x{height} tilt {pitch},{roll}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_rotation_keeps_face_geometry() {
        let mut view = view(192, 108);
        let dial_before = view.dial().clone();
        let landscape = *view.viewport_frame();
        view.resize(108, 192);
        let portrait = *view.viewport_frame();
        assert_eq!(landscape.fit, FitAxis::Height);
        assert_eq!(portrait.fit, FitAxis::Width);
        assert_ne!(landscape.backdrop, portrait.backdrop);
        assert_eq!(view.dial(), &dial_before);
    }

    #[test]
    fn test_texture_arrival_sets_repeat_once() {
        let mut view = view(80, 40);
        assert!(view.viewport_frame().texture_repeat.is_none());
        assert!(view.apply(LoadedAsset::Backdrop(Ok(Texture::wood_laminate(32)))));
        assert!(view.viewport_frame().texture_repeat.is_some());
        assert!(!view.apply(LoadedAsset::Backdrop(Err(missing_image()))));
        assert!(view.backdrop.is_ready());
    }

    #[test]
    fn test_failed_backdrop_uses_fallback_color() {
        let mut view = view(40, 20);
        assert!(view.apply(LoadedAsset::Backdrop(Err(missing_image()))));
        assert!(view.viewport_frame().texture_repeat.is_none());
        let pixels = view.render();
        let Some(Color::Rgb(r, g, b)) = pixels.get(0, 0) else {
            panic!("expected an rgb pixel");
        };
        assert!(r < 90 && g < 90 && b < 120);
        assert!(b >= r);
    }

    #[test]
    fn test_font_builds_numerals() {
        let mut view = view(40, 20);
        assert!(view.dial().numerals.is_empty());
        assert!(view.apply(LoadedAsset::Font(Ok(StrokeFont::builtin()))));
        assert!(!view.dial().numerals.is_empty());
        assert!(!view.apply(LoadedAsset::Font(Ok(StrokeFont::builtin()))));
    }

    #[test]
    fn test_missing_font_omits_numerals() {
        let mut view = view(40, 20);
        let err = tilt_clock_fonts::FontError::Empty;
        assert!(view.apply(LoadedAsset::Font(Err(err.into()))));
        assert!(view.dial().numerals.is_empty());
        view.render();
    }

    fn marked(mask: &PixelBuffer) -> Vec<(usize, usize)> {
        (0..mask.height())
            .flat_map(|y| (0..mask.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| mask.is_shadowed(x, y))
            .collect()
    }

    #[test]
    fn test_hands_cast_shadows() {
        let mut view = view(120, 80);
        view.set_hands(HandAngles::at(&NaiveTime::from_hms_opt(10, 10, 30).unwrap()));
        let mvp = view.mvp();
        let layers = view.layers();
        let mut mask = PixelBuffer::new(120, 80);
        view.cast_shadows(&mvp, view.lighting.direction, &layers, BACKDROP_Z, &mut mask);
        assert!(!marked(&mask).is_empty());

        // Nothing sits above the second hand.
        let top = layers.last().unwrap().z;
        view.cast_shadows(&mvp, view.lighting.direction, &layers, top, &mut mask);
        assert!(marked(&mask).is_empty());
    }

    #[test]
    fn test_hands_shadow_numerals() {
        let mut view = view(160, 120);
        assert!(view.apply(LoadedAsset::Font(Ok(StrokeFont::builtin()))));
        // Low light from the left throws the hands' shadows across the 3.
        view.lighting.direction = Vec3::new(-1.0, 0.0, 0.2).normalize();
        view.set_hands(HandAngles::at(&NaiveTime::from_hms_opt(3, 15, 15).unwrap()));

        let mvp = view.mvp();
        let mut numerals = PixelBuffer::new(160, 120);
        for polygon in &view.dial.numerals {
            let screen: Vec<Vec2> = polygon
                .iter()
                .map(|p| view.project(p.extend(view.dial.numeral_z)).unwrap())
                .collect();
            numerals.mark_shadow(&screen);
        }

        let layers = view.layers();
        let mut mask = PixelBuffer::new(160, 120);
        view.cast_shadows(&mvp, view.lighting.direction, &layers, view.dial.numeral_z, &mut mask);
        assert!(
            marked(&mask)
                .into_iter()
                .any(|(x, y)| numerals.is_shadowed(x, y))
        );
        view.render();
    }

    #[test]
    fn test_resize_moves_camera() {
        let mut view = view(48, 96);
        view.resize(96, 48);
        for y in 0..48 {
            for x in 0..96 {
                let point = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                assert!(view.backdrop_point(point).is_some(), "gap at {x},{y}");
            }
        }
        assert_eq!(view.view, Mat4::look_at_rh(view.eye, Vec3::ZERO, Vec3::Y));
    }

    #[test]
    fn test_draw_after_resize_fills_backdrop() {
        let mut view = view(48, 96);
        view.apply(LoadedAsset::Backdrop(Err(missing_image())));
        let mut terminal = Terminal::new(TestBackend::new(96, 24)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.draw(frame, area)
            })
            .unwrap();
        let clear = present_flat(hex(CLEAR_COLOR));
        let pixels = view.pixels();
        assert_eq!((pixels.width(), pixels.height()), (96, 48));
        for y in 0..48 {
            for x in 0..96 {
                assert_ne!(pixels.get(x, y), Some(clear), "clear color at {x},{y}");
            }
        }
    }

    #[test]
    fn test_empty_viewport_renders_nothing() {
        let mut view = ClockView::new(ViewportFramer::default());
        assert_eq!(view.render().width(), 0);
    }
}
