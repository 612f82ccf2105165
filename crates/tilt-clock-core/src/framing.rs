//! Camera distance and backdrop sizing for an arbitrary viewport.
//!
//! Both computations use the pinhole relation: the half-extent visible at
//! distance `d` is `d * tan(fov / 2)`.

/// Width and height in scene units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

/// Which viewport dimension limited the camera distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    Height,
    Width,
}

/// Result of framing one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFrame {
    pub aspect: f32,
    /// Camera position along +Z, looking at the origin.
    pub camera_distance: f32,
    pub fit: FitAxis,
    /// Backdrop plane size including the safety margin.
    pub backdrop: Extent,
    /// Texture repeat per axis, only once a texture exists.
    pub texture_repeat: Option<Extent>,
}

/// Fits a fixed clock face and its backdrop to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFramer {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Diameter of the logical clock face.
    pub face_size: f32,
    /// Z of the backdrop plane; the camera sits on +Z.
    pub backdrop_z: f32,
    /// Enlargement so tilting never exposes an edge. Must exceed 1.
    pub safety_margin: f32,
    /// Scene units covered by one texture tile.
    pub tile_size: f32,
}

impl Default for ViewportFramer {
    fn default() -> Self {
        Self {
            fov_deg: 20.0,
            face_size: 22.0,
            backdrop_z: -1.0,
            safety_margin: 1.2,
            tile_size: 25.0,
        }
    }
}

impl ViewportFramer {
    fn half_fov_tan(&self) -> f32 {
        (self.fov_deg.to_radians() / 2.0).tan()
    }

    /// Distance at which the whole face is visible, and the axis that set it.
    pub fn camera_distance(&self, aspect: f32) -> (f32, FitAxis) {
        let tan = self.half_fov_tan();
        let for_height = (self.face_size / 2.0) / tan;
        let for_width = (self.face_size / aspect / 2.0) / tan;
        if for_width > for_height {
            (for_width, FitAxis::Width)
        } else {
            (for_height, FitAxis::Height)
        }
    }

    /// Backdrop size seen from `camera_distance`, enlarged by the margin.
    pub fn backdrop(&self, camera_distance: f32, aspect: f32) -> Extent {
        let depth = camera_distance - self.backdrop_z;
        let height = 2.0 * self.half_fov_tan() * depth;
        let width = height * aspect;
        Extent {
            width: width * self.safety_margin,
            height: height * self.safety_margin,
        }
    }

    /// Tiles per axis for a backdrop of the given size.
    pub fn texture_repeat(&self, backdrop: Extent) -> Extent {
        Extent {
            width: backdrop.width / self.tile_size,
            height: backdrop.height / self.tile_size,
        }
    }

    /// Frame a viewport of `width` x `height` pixels.
    pub fn frame(&self, width: f32, height: f32, has_texture: bool) -> ViewportFrame {
        let aspect = if height > 0.0 { width / height } else { 1.0 };
        let (camera_distance, fit) = self.camera_distance(aspect);
        let backdrop = self.backdrop(camera_distance, aspect);
        ViewportFrame {
            aspect,
            camera_distance,
            fit,
            backdrop,
            texture_repeat: has_texture.then(|| self.texture_repeat(backdrop)),
        }
    }
}
