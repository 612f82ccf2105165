//! Digital date and time text.

use chrono::NaiveDateTime;

use crate::TimeFormat;

/// Text shown in the date and time overlays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitalReadout {
    pub date: String,
    pub time: String,
}

impl DigitalReadout {
    pub fn new(now: &NaiveDateTime, format: TimeFormat) -> Self {
        let mut readout = Self::default();
        readout.update(now, format);
        readout
    }

    /// Refresh both strings for `now`.
    pub fn update(&mut self, now: &NaiveDateTime, format: TimeFormat) {
        self.date = now.format("%m/%d/%y").to_string();
        self.time = now.format(format.pattern()).to_string();
    }
}
