//! Second-boundary detection for the tick sound.

/// Fires once each time the whole-second value changes.
#[derive(Debug, Clone, Default)]
pub struct SecondGate {
    last: Option<i64>,
}

impl SecondGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current whole second. Returns true on the first frame of a
    /// new second and false for every later frame within it.
    pub fn crossed(&mut self, second: i64) -> bool {
        if self.last == Some(second) {
            return false;
        }
        self.last = Some(second);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_crossings(frame_ms: i64, span_ms: i64) -> usize {
        let mut gate = SecondGate::new();
        let mut t = 0;
        let mut ticks = 0;
        while t < span_ms {
            if gate.crossed(t.div_euclid(1000)) {
                ticks += 1;
            }
            t += frame_ms;
        }
        ticks
    }

    #[test]
    fn test_five_seconds_five_ticks_at_any_rate() {
        for frame_ms in [1, 7, 16, 33, 100, 250, 999] {
            assert_eq!(count_crossings(frame_ms, 5000), 5, "frame time {frame_ms}ms");
        }
    }

    #[test]
    fn test_no_retrigger_within_second() {
        let mut gate = SecondGate::new();
        assert!(gate.crossed(42));
        assert!(!gate.crossed(42));
        assert!(!gate.crossed(42));
        assert!(gate.crossed(43));
    }

    #[test]
    fn test_skipped_seconds_tick_once() {
        let mut gate = SecondGate::new();
        assert!(gate.crossed(10));
        assert!(gate.crossed(13));
        assert!(!gate.crossed(13));
    }
}
