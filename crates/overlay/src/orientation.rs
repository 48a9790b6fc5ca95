//! Device orientation → camera rotation.
//!
//! Readings use the usual device-orientation angles in degrees: `alpha`
//! (compass-style rotation about the vertical, counter-clockwise), `beta`
//! (front-back tilt, 90 when the device is held upright) and `gamma`
//! (left-right tilt). The mapping assumes a portrait device held upright;
//! screen rotation is not compensated.

use tracing::trace;

use crate::SharedCamera;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct DeviceOrientation {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl DeviceOrientation {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Device held upright facing the horizon at heading `alpha`.
    pub fn upright(alpha: f64) -> Self {
        Self::new(alpha, 90.0, 0.0)
    }

    /// Camera (yaw, pitch, roll) in radians.
    pub fn to_camera_angles(self) -> (f64, f64, f64) {
        (
            self.alpha.to_radians(),
            (self.beta - 90.0).to_radians(),
            (-self.gamma).to_radians(),
        )
    }
}

pub trait OrientationSource {
    /// Latest reading, or `None` if the sensor has nothing yet.
    fn read(&mut self) -> Option<DeviceOrientation>;
}

/// Always reports the same reading.
#[derive(Debug, Clone, Copy)]
pub struct FixedOrientation(pub DeviceOrientation);

impl OrientationSource for FixedOrientation {
    fn read(&mut self) -> Option<DeviceOrientation> {
        Some(self.0)
    }
}

/// Upright device turning at a constant rate per read.
#[derive(Debug, Clone, Copy)]
pub struct SpinningOrientation {
    current: DeviceOrientation,
    step_deg: f64,
}

impl SpinningOrientation {
    pub fn new(start_alpha: f64, step_deg: f64) -> Self {
        Self {
            current: DeviceOrientation::upright(start_alpha),
            step_deg,
        }
    }
}

impl OrientationSource for SpinningOrientation {
    fn read(&mut self) -> Option<DeviceOrientation> {
        let reading = self.current;
        self.current.alpha = (self.current.alpha + self.step_deg).rem_euclid(360.0);
        Some(reading)
    }
}

/// Per-frame camera update hook.
pub trait CameraControls {
    fn update(&mut self);
}

pub struct DeviceOrientationControls<O> {
    source: O,
    camera: SharedCamera,
    updates: u64,
    last: Option<DeviceOrientation>,
}

impl<O: OrientationSource> DeviceOrientationControls<O> {
    pub fn new(source: O, camera: SharedCamera) -> Self {
        Self {
            source,
            camera,
            updates: 0,
            last: None,
        }
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn last_reading(&self) -> Option<DeviceOrientation> {
        self.last
    }
}

impl<O: OrientationSource> CameraControls for DeviceOrientationControls<O> {
    fn update(&mut self) {
        self.updates += 1;
        let Some(reading) = self.source.read() else {
            return;
        };
        let (yaw, pitch, roll) = reading.to_camera_angles();
        self.camera.borrow_mut().set_orientation(yaw, pitch, roll);
        trace!(alpha = reading.alpha, beta = reading.beta, gamma = reading.gamma, "orientation");
        self.last = Some(reading);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{
        CameraControls, DeviceOrientation, DeviceOrientationControls, FixedOrientation,
        OrientationSource, SpinningOrientation,
    };
    use render::PerspectiveCamera;

    #[test]
    fn upright_device_looks_at_horizon() {
        let (yaw, pitch, roll) = DeviceOrientation::upright(90.0).to_camera_angles();
        assert!((yaw - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(pitch, 0.0);
        assert_eq!(roll, 0.0);
    }

    #[test]
    fn controls_rotate_shared_camera() {
        let camera = Rc::new(RefCell::new(PerspectiveCamera::new(80.0, 1.0, 0.001, 1000.0)));
        let mut controls = DeviceOrientationControls::new(
            FixedOrientation(DeviceOrientation::new(180.0, 120.0, 10.0)),
            camera.clone(),
        );
        controls.update();

        let cam = camera.borrow();
        assert!((cam.yaw_rad - std::f64::consts::PI).abs() < 1e-12);
        assert!((cam.pitch_rad - 30f64.to_radians()).abs() < 1e-12);
        assert!((cam.roll_rad + 10f64.to_radians()).abs() < 1e-12);
        assert_eq!(controls.updates(), 1);
    }

    #[test]
    fn spinning_source_wraps_heading() {
        let mut source = SpinningOrientation::new(350.0, 20.0);
        assert_eq!(source.read().map(|r| r.alpha), Some(350.0));
        assert_eq!(source.read().map(|r| r.alpha), Some(10.0));
    }
}
