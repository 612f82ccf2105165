//! Per-frame pose update.

use chrono::NaiveDateTime;
use tilt_clock_core::{DigitalReadout, HandAngles, SecondGate, TiltFilter, TimeFormat};
use tilt_clock_scene::ClockView;

use crate::sound::TickSound;

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub angles: HandAngles,
    /// The tick sound was restarted this frame.
    pub ticked: bool,
}

/// Poses the scene from the wall clock and the tilt filter, and ticks once
/// per second.
#[derive(Debug)]
pub struct FrameScheduler<S> {
    gate: SecondGate,
    sound: S,
    time_format: TimeFormat,
}

impl<S: TickSound> FrameScheduler<S> {
    pub fn new(sound: S, time_format: TimeFormat) -> Self {
        Self {
            gate: SecondGate::new(),
            sound,
            time_format,
        }
    }

    pub fn set_time_format(&mut self, format: TimeFormat) {
        self.time_format = format;
    }

    /// Advance one frame to `now`: tilt the clock unit, aim the camera, pose
    /// the hands, refresh the readout, then tick on a new second.
    ///
    /// The caller draws the view right after this returns, inside the
    /// terminal's draw closure, which makes rendering the last step of the
    /// frame.
    pub fn advance(
        &mut self,
        now: NaiveDateTime,
        tilt: &TiltFilter,
        view: &mut ClockView,
        readout: Option<&mut DigitalReadout>,
    ) -> FrameReport {
        view.set_tilt(tilt.scene_tilt());
        view.look_at_origin();

        let angles = HandAngles::at(&now);
        view.set_hands(angles);

        if let Some(readout) = readout {
            readout.update(&now, self.time_format);
        }

        let ticked = self.gate.crossed(now.and_utc().timestamp());
        if ticked && let Err(err) = self.sound.restart() {
            tracing::debug!(error = %err, "tick sound failed");
        }

        FrameReport { angles, ticked }
    }
}
