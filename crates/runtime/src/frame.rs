use std::time::Duration;

use foundation::time::Time;

pub const MIN_PERIOD: Duration = Duration::from_nanos(1);
pub const MAX_PERIOD: Duration = Duration::from_secs(3600);

/// Deterministic frame metadata.
///
/// This is the timebase of the render loop. It is pure so a sequence of
/// frames can be recorded and compared in tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    /// First frame for a loop paced at `rate_hz`. Non-positive rates fall back to 60 Hz.
    pub fn first(rate_hz: f64) -> Self {
        let rate = if rate_hz.is_finite() && rate_hz > 0.0 {
            rate_hz
        } else {
            60.0
        };
        Self::new(0, 1.0 / rate)
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }

    /// Wall-clock pacing for this frame rate, kept within
    /// [`MIN_PERIOD`, `MAX_PERIOD`] so timers always get a usable interval.
    pub fn period(&self) -> Duration {
        Duration::try_from_secs_f64(self.dt_s)
            .unwrap_or(MAX_PERIOD)
            .clamp(MIN_PERIOD, MAX_PERIOD)
    }
}
