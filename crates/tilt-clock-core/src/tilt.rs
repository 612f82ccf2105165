//! Orientation samples to scene tilt.

/// Default clamp for raw pitch and roll, in degrees.
pub const DEFAULT_MAX_TILT_DEG: f32 = 15.0;

/// Default multiplier applied after clamping.
pub const DEFAULT_DAMPING: f32 = 0.5;

/// One reading from an orientation source. Either axis may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationSample {
    /// Front-to-back tilt in degrees.
    pub pitch: Option<f32>,
    /// Left-to-right tilt in degrees.
    pub roll: Option<f32>,
}

impl OrientationSample {
    pub fn new(pitch: f32, roll: f32) -> Self {
        Self {
            pitch: Some(pitch),
            roll: Some(roll),
        }
    }
}

/// Latest raw reading, stored exactly as received.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TiltState {
    pub pitch: f32,
    pub roll: f32,
}

/// Access to orientation samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltPermission {
    /// The host delivers samples without asking.
    NotRequired,
    /// Waiting on the one-time user decision.
    Pending,
    Granted,
    Denied,
}

impl TiltPermission {
    /// Whether samples should reach the filter.
    pub fn accepts_samples(self) -> bool {
        matches!(self, TiltPermission::NotRequired | TiltPermission::Granted)
    }
}

/// Filtered tilt in degrees, ready to rotate the clock unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneTilt {
    /// Rotation about the horizontal (X) axis, driven by pitch.
    pub pitch_deg: f32,
    /// Rotation about the vertical (Y) axis, driven by roll.
    pub roll_deg: f32,
}

impl SceneTilt {
    pub fn x_radians(&self) -> f32 {
        self.pitch_deg.to_radians()
    }

    pub fn y_radians(&self) -> f32 {
        self.roll_deg.to_radians()
    }
}

/// Latches raw orientation samples and bounds them on read.
#[derive(Debug, Clone)]
pub struct TiltFilter {
    state: TiltState,
    permission: TiltPermission,
    max_tilt_deg: f32,
    damping: f32,
}

impl Default for TiltFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TILT_DEG, DEFAULT_DAMPING, false)
    }
}

impl TiltFilter {
    /// Create a filter. With `require_permission` the filter ignores samples
    /// until [`TiltFilter::resolve_permission`] grants access.
    pub fn new(max_tilt_deg: f32, damping: f32, require_permission: bool) -> Self {
        let permission = if require_permission {
            TiltPermission::Pending
        } else {
            TiltPermission::NotRequired
        };
        Self {
            state: TiltState::default(),
            permission,
            max_tilt_deg: max_tilt_deg.abs(),
            damping,
        }
    }

    pub fn permission(&self) -> TiltPermission {
        self.permission
    }

    /// Settle a pending permission request. Returns false if there was
    /// nothing to settle; a decision is never revisited.
    pub fn resolve_permission(&mut self, granted: bool) -> bool {
        if self.permission != TiltPermission::Pending {
            return false;
        }
        self.permission = if granted {
            TiltPermission::Granted
        } else {
            TiltPermission::Denied
        };
        true
    }

    /// Latch a sample. Last write wins; a missing axis reads as level.
    pub fn on_sample(&mut self, sample: OrientationSample) -> bool {
        if !self.permission.accepts_samples() {
            return false;
        }
        self.state = TiltState {
            pitch: sample.pitch.unwrap_or(0.0),
            roll: sample.roll.unwrap_or(0.0),
        };
        true
    }

    /// The raw latched reading.
    pub fn state(&self) -> TiltState {
        self.state
    }

    /// Clamp and damp the latched reading.
    pub fn scene_tilt(&self) -> SceneTilt {
        let limit = self.max_tilt_deg;
        SceneTilt {
            pitch_deg: self.state.pitch.clamp(-limit, limit) * self.damping,
            roll_deg: self.state.roll.clamp(-limit, limit) * self.damping,
        }
    }
}
