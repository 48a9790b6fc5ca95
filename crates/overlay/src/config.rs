use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::marker::MarkerStyle;

/// Movement (meters) beyond which a new POI lookup is made.
pub const DEFAULT_FETCH_THRESHOLD_M: f64 = 100.0;
/// Half-width (degrees) of the lookup box around the current fix.
pub const DEFAULT_BBOX_HALF_WIDTH_DEG: f64 = 0.02;
/// Upper bound accepted for `frameRateHz`.
pub const MAX_FRAME_RATE_HZ: f64 = 1000.0;
/// GPS readings less accurate than this (meters) are ignored.
pub const DEFAULT_GPS_MIN_ACCURACY_M: f64 = 1000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        render::aspect_ratio(self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 80.0,
            near: 0.001,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    pub endpoint: String,
    pub fetch_threshold_m: f64,
    pub bbox_half_width_deg: f64,
    /// Raw positions closer than this to the last fix are dropped. Zero keeps all.
    pub gps_min_distance_m: f64,
    pub gps_min_accuracy_m: f64,
    pub frame_rate_hz: f64,
    pub viewport: Viewport,
    pub camera: CameraConfig,
    pub marker: MarkerStyle,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            endpoint: poi::DEFAULT_ENDPOINT.to_string(),
            fetch_threshold_m: DEFAULT_FETCH_THRESHOLD_M,
            bbox_half_width_deg: DEFAULT_BBOX_HALF_WIDTH_DEG,
            gps_min_distance_m: 0.0,
            gps_min_accuracy_m: DEFAULT_GPS_MIN_ACCURACY_M,
            frame_rate_hz: 60.0,
            viewport: Viewport::default(),
            camera: CameraConfig::default(),
            marker: MarkerStyle::default(),
        }
    }
}

impl OverlayConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        };
        if self.endpoint.trim().is_empty() {
            return invalid("endpoint must not be empty");
        }
        if !(self.fetch_threshold_m.is_finite() && self.fetch_threshold_m >= 0.0) {
            return invalid("fetchThresholdM must be a non-negative number");
        }
        if !(self.bbox_half_width_deg.is_finite() && self.bbox_half_width_deg > 0.0) {
            return invalid("bboxHalfWidthDeg must be positive");
        }
        if !(self.gps_min_distance_m.is_finite() && self.gps_min_distance_m >= 0.0) {
            return invalid("gpsMinDistanceM must be a non-negative number");
        }
        if !(self.frame_rate_hz > 0.0 && self.frame_rate_hz <= MAX_FRAME_RATE_HZ) {
            return invalid("frameRateHz must be in (0, 1000]");
        }
        let camera = &self.camera;
        if !(camera.fov_y_deg > 0.0 && camera.fov_y_deg < 180.0) {
            return invalid("camera fovYDeg must be in (0, 180)");
        }
        if !(camera.near.is_finite() && camera.far.is_finite())
            || camera.near <= 0.0
            || camera.far <= camera.near
        {
            return invalid("camera requires finite 0 < near < far");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraConfig, ConfigError, OverlayConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_demo_constants() {
        let config = OverlayConfig::default();
        assert_eq!(config.endpoint, "https://hikar.org/webapp/map");
        assert_eq!(config.fetch_threshold_m, 100.0);
        assert_eq!(config.bbox_half_width_deg, 0.02);
        assert_eq!(config.camera.fov_y_deg, 80.0);
        assert_eq!(config.camera.near, 0.001);
        assert_eq!(config.camera.far, 1000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = OverlayConfig::from_json_str(
            r#"{"fetchThresholdM": 250, "marker": {"color": 255}}"#,
        )
        .unwrap();
        assert_eq!(config.fetch_threshold_m, 250.0);
        assert_eq!(config.marker.color, 255);
        assert_eq!(config.marker.length, 20.0);
        assert_eq!(config.bbox_half_width_deg, 0.02);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = OverlayConfig::from_json_str(r#"{"bboxHalfWidthDeg": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = OverlayConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_unusable_frame_rates() {
        for rate in [0.0, -1.0, 1e10, f64::NAN, f64::INFINITY] {
            let config = OverlayConfig {
                frame_rate_hz: rate,
                ..OverlayConfig::default()
            };
            assert!(config.validate().is_err(), "{rate} accepted");
        }
        let config = OverlayConfig {
            frame_rate_hz: 1000.0,
            ..OverlayConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_camera() {
        let with_camera = |fov_y_deg: f64, near: f64, far: f64| OverlayConfig {
            camera: CameraConfig { fov_y_deg, near, far },
            ..OverlayConfig::default()
        };
        assert!(with_camera(0.0, 0.001, 1000.0).validate().is_err());
        assert!(with_camera(180.0, 0.001, 1000.0).validate().is_err());
        assert!(with_camera(f64::NAN, 0.001, 1000.0).validate().is_err());
        assert!(with_camera(80.0, f64::NAN, 1000.0).validate().is_err());
        assert!(with_camera(80.0, 0.001, f64::NAN).validate().is_err());
        assert!(with_camera(80.0, 0.001, f64::INFINITY).validate().is_err());
        assert!(with_camera(80.0, 0.001, 1000.0).validate().is_ok());
    }
}
