use std::time::Duration;

/// Engine time in seconds.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn as_duration(self) -> Duration {
        Duration::from_secs_f64(self.0.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::Time;
    use std::time::Duration;

    #[test]
    fn negative_time_clamps_to_zero_duration() {
        assert_eq!(Time(-3.0).as_duration(), Duration::ZERO);
        assert_eq!(Time(1.5).as_duration(), Duration::from_millis(1500));
    }
}
