//! Raw GPS input.

use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use foundation::math::GeoPoint;
use thiserror::Error;

/// One raw reading from a positioning source.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GpsReading {
    pub position: GeoPoint,
    /// Horizontal accuracy (meters), when the source reports one.
    pub accuracy_m: Option<f64>,
}

impl GpsReading {
    pub fn new(position: GeoPoint) -> Self {
        Self {
            position,
            accuracy_m: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

/// Producer of raw GPS readings.
pub trait GpsSource {
    fn name(&self) -> &str;

    /// Wait for the next reading; `None` once the source is exhausted.
    fn next_reading(&mut self) -> impl Future<Output = Option<GpsReading>>;
}

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("failed to read track {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("track line {line}: {message}")]
    Line { line: usize, message: String },
    #[error("track has no positions")]
    Empty,
}

/// Replays a fixed list of readings, one per `interval`. The first reading
/// is delivered immediately.
#[derive(Debug, Clone)]
pub struct ReplayTrack {
    name: String,
    readings: VecDeque<GpsReading>,
    interval: Duration,
    started: bool,
}

impl ReplayTrack {
    pub fn new(name: impl Into<String>, readings: Vec<GpsReading>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            readings: readings.into(),
            interval,
            started: false,
        }
    }

    pub fn from_points(name: impl Into<String>, points: &[GeoPoint], interval: Duration) -> Self {
        let readings = points.iter().copied().map(GpsReading::new).collect();
        Self::new(name, readings, interval)
    }

    pub fn from_file(path: &Path, interval: Duration) -> Result<Self, TrackError> {
        let text = std::fs::read_to_string(path).map_err(|source| TrackError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let readings = parse_track(&text)?;
        Ok(Self::new(path.display().to_string(), readings, interval))
    }

    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl GpsSource for ReplayTrack {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_reading(&mut self) -> Option<GpsReading> {
        let reading = self.readings.pop_front()?;
        if self.started {
            tokio::time::sleep(self.interval).await;
        }
        self.started = true;
        Some(reading)
    }
}

/// Parse `lon,lat[,accuracy_m]` lines. Blank lines and `#` comments are skipped.
pub fn parse_track(text: &str) -> Result<Vec<GpsReading>, TrackError> {
    let mut out = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let bad = |message: String| TrackError::Line {
            line: i + 1,
            message,
        };

        let mut fields = line.splitn(3, ',');
        let lon = fields.next().unwrap_or_default();
        let lat = fields.next().ok_or_else(|| bad("expected lon,lat".to_string()))?;
        let position: GeoPoint = format!("{lon},{lat}")
            .parse()
            .map_err(|e| bad(format!("{e}")))?;

        let mut reading = GpsReading::new(position);
        if let Some(acc) = fields.next() {
            let acc: f64 = acc
                .trim()
                .parse()
                .map_err(|e| bad(format!("invalid accuracy {acc:?}: {e}")))?;
            reading = reading.with_accuracy(acc);
        }
        out.push(reading);
    }

    if out.is_empty() {
        return Err(TrackError::Empty);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{GpsSource, ReplayTrack, TrackError, parse_track};
    use foundation::math::GeoPoint;

    #[test]
    fn parses_points_comments_and_accuracy() {
        let text = "# walk\n-1.40,50.90\n\n -1.401 , 50.901 , 12.5\n";
        let readings = parse_track(text).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].position, GeoPoint::new(-1.40, 50.90));
        assert_eq!(readings[0].accuracy_m, None);
        assert_eq!(readings[1].accuracy_m, Some(12.5));
    }

    #[test]
    fn reports_bad_line_numbers() {
        match parse_track("1,2\nnope\n") {
            Err(TrackError::Line { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(parse_track("# only comments\n"), Err(TrackError::Empty)));
        assert!(matches!(parse_track("1,2,far"), Err(TrackError::Line { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn replay_paces_readings() {
        let points = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.001)];
        let mut track = ReplayTrack::from_points("t", &points, Duration::from_secs(2));

        let start = tokio::time::Instant::now();
        assert!(track.next_reading().await.is_some());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(track.next_reading().await.is_some());
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(track.next_reading().await.is_none());
        assert_eq!(track.remaining(), 0);
    }
}
