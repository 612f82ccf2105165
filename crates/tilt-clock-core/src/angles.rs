//! Wall-clock time to hand rotation.

use chrono::Timelike;

/// Continuous clock reading on a 12-hour dial.
///
/// Each field carries the fraction of the unit below it, so `minutes` moves
/// a little every frame instead of jumping when the second hand passes 12.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTime {
    /// Hours in `[0, 12)`.
    pub hours: f64,
    /// Minutes in `[0, 60)`.
    pub minutes: f64,
    /// Seconds in `[0, 60)`.
    pub seconds: f64,
}

impl ClockTime {
    /// Read a clock time from anything with a time of day.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // chrono reports a leap second as nanosecond >= 1e9.
        let subsec = (time.nanosecond() as f64 / 1e9).min(0.999_999_999);
        let seconds = time.second() as f64 + subsec;
        let minutes = time.minute() as f64 + seconds / 60.0;
        let hours = (time.hour() % 12) as f64 + minutes / 60.0;
        Self {
            hours,
            minutes,
            seconds,
        }
    }
}

/// Clockwise rotation from 12 o'clock, in degrees `[0, 360)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandAngles {
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl HandAngles {
    /// Compute hand angles for a moment in time.
    pub fn at<T: Timelike>(time: &T) -> Self {
        Self::from(ClockTime::from_time(time))
    }

    pub fn hours_radians(&self) -> f32 {
        self.hours.to_radians() as f32
    }

    pub fn minutes_radians(&self) -> f32 {
        self.minutes.to_radians() as f32
    }

    pub fn seconds_radians(&self) -> f32 {
        self.seconds.to_radians() as f32
    }
}

impl From<ClockTime> for HandAngles {
    fn from(time: ClockTime) -> Self {
        Self {
            hours: time.hours / 12.0 * 360.0,
            minutes: time.minutes / 60.0 * 360.0,
            seconds: time.seconds / 60.0 * 360.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeDelta};

    fn at(h: u32, m: u32, s: u32, ms: u32) -> HandAngles {
        HandAngles::at(&NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_three_oclock() {
        let angles = at(3, 0, 0, 0);
        assert!(close(angles.hours, 90.0));
        assert!(close(angles.minutes, 0.0));
        assert!(close(angles.seconds, 0.0));
    }

    #[test]
    fn test_half_past_six() {
        let angles = at(6, 30, 0, 0);
        assert!(close(angles.hours, 195.0));
        assert!(close(angles.minutes, 180.0));
    }

    #[test]
    fn test_afternoon_wraps_to_dial() {
        assert_eq!(at(15, 0, 0, 0), at(3, 0, 0, 0));
        assert!(close(at(12, 0, 0, 0).hours, 0.0));
    }

    #[test]
    fn test_subsecond_propagates() {
        let angles = at(0, 0, 30, 500);
        assert!(close(angles.seconds, 30.5 / 60.0 * 360.0));
        assert!(close(angles.minutes, 30.5 / 3600.0 * 360.0));
    }

    #[test]
    fn test_angles_in_range() {
        let angles = at(11, 59, 59, 999);
        for a in [angles.hours, angles.minutes, angles.seconds] {
            assert!((0.0..360.0).contains(&a));
        }
    }

    #[test]
    fn test_leap_second_stays_below_full_turn() {
        let time = NaiveTime::from_hms_nano_opt(23, 59, 59, 1_500_000_000).unwrap();
        let angles = HandAngles::at(&time);
        assert!(angles.seconds < 360.0);
        assert!(angles.hours < 360.0);
    }

    #[test]
    fn test_smooth_across_twelve_hours() {
        let start = NaiveDate::from_ymd_opt(2025, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let step = TimeDelta::milliseconds(500);
        let mut prev = HandAngles::at(&start);
        let mut t = start;
        for _ in 0..(12 * 3600 * 2) {
            t += step;
            let next = HandAngles::at(&t);
            for (a, b) in [
                (prev.hours, next.hours),
                (prev.minutes, next.minutes),
                (prev.seconds, next.seconds),
            ] {
                // Forward movement modulo a full turn, never more than one tick mark.
                let delta = (b - a).rem_euclid(360.0);
                assert!(delta <= 6.0 + 1e-9, "jump of {delta} degrees at {t}");
            }
            prev = next;
        }
    }
}
