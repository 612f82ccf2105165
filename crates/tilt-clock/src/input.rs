//! Orientation samples from a terminal: the mouse and the arrow keys stand in
//! for a motion sensor.

use crossterm::event::KeyCode;
use tilt_clock_core::OrientationSample;

/// Pose reached with the pointer at the edge of the window.
pub const POINTER_RANGE_DEG: f32 = 45.0;

/// A virtual handheld device whose pose the user steers.
///
/// Poses are raw and unbounded; clamping belongs to the tilt filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualDevice {
    pitch: f32,
    roll: f32,
    step: f32,
}

impl VirtualDevice {
    pub fn new(step_deg: f32) -> Self {
        Self {
            pitch: 0.0,
            roll: 0.0,
            step: step_deg,
        }
    }

    fn sample(&self) -> OrientationSample {
        OrientationSample::new(self.pitch, self.roll)
    }

    /// Nudge the pose with an arrow key. Other keys are ignored.
    pub fn nudge(&mut self, code: KeyCode) -> Option<OrientationSample> {
        match code {
            KeyCode::Up => self.pitch -= self.step,
            KeyCode::Down => self.pitch += self.step,
            KeyCode::Left => self.roll -= self.step,
            KeyCode::Right => self.roll += self.step,
            _ => return None,
        }
        Some(self.sample())
    }

    /// Put the device flat again.
    pub fn level(&mut self) -> OrientationSample {
        self.pitch = 0.0;
        self.roll = 0.0;
        self.sample()
    }

    /// Pose the device from a pointer cell inside a `width`×`height` window.
    ///
    /// The window center is level and each edge is [`POINTER_RANGE_DEG`].
    pub fn point(&mut self, column: u16, row: u16, width: u16, height: u16) -> OrientationSample {
        self.roll = offset(column, width) * POINTER_RANGE_DEG;
        self.pitch = offset(row, height) * POINTER_RANGE_DEG;
        self.sample()
    }
}

/// Cell center position mapped to `[-1, 1]`.
fn offset(cell: u16, cells: u16) -> f32 {
    if cells == 0 {
        return 0.0;
    }
    ((cell as f32 + 0.5) / cells as f32) * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_level() {
        let mut device = VirtualDevice::new(5.0);
        let sample = device.point(40, 12, 81, 25);
        assert_eq!(sample.pitch, Some(0.0));
        assert_eq!(sample.roll, Some(0.0));
    }

    #[test]
    fn test_pointer_range() {
        let mut device = VirtualDevice::new(5.0);
        let sample = device.point(0, 0, 80, 24);
        let (pitch, roll) = (sample.pitch.unwrap(), sample.roll.unwrap());
        assert!(pitch < -40.0 && pitch >= -POINTER_RANGE_DEG);
        assert!(roll < -40.0 && roll >= -POINTER_RANGE_DEG);

        let sample = device.point(79, 23, 80, 24);
        assert!(sample.pitch.unwrap() > 40.0);
        assert!(sample.roll.unwrap() > 40.0);
    }

    #[test]
    fn test_zero_sized_window() {
        let mut device = VirtualDevice::new(5.0);
        let sample = device.point(3, 3, 0, 0);
        assert_eq!(sample, OrientationSample::new(0.0, 0.0));
    }

    #[test]
    fn test_nudge_is_unbounded() {
        let mut device = VirtualDevice::new(5.0);
        let mut last = None;
        for _ in 0..10 {
            last = device.nudge(KeyCode::Right);
        }
        assert_eq!(last, Some(OrientationSample::new(0.0, 50.0)));
        assert_eq!(
            device.nudge(KeyCode::Up),
            Some(OrientationSample::new(-5.0, 50.0))
        );
        assert_eq!(device.nudge(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_level() {
        let mut device = VirtualDevice::new(5.0);
        device.nudge(KeyCode::Down);
        device.nudge(KeyCode::Left);
        assert_eq!(device.level(), OrientationSample::new(0.0, 0.0));
    }
}
