use scene::picking::{PickHit, PickOptions, pick_ray};

use crate::config::Viewport;
use crate::{SharedCamera, SharedScene};

/// Finds the marker under a screen position.
#[derive(Clone)]
pub struct ClickHandler {
    scene: SharedScene,
    camera: SharedCamera,
}

impl ClickHandler {
    pub fn new(scene: SharedScene, camera: SharedCamera) -> Self {
        Self { scene, camera }
    }

    /// Nearest marker hit by the camera ray through `(x, y)` in normalized
    /// device coordinates, within the camera far distance.
    pub fn raycast(&self, x: f64, y: f64) -> Option<PickHit> {
        let camera = self.camera.borrow();
        let ray = camera.ray_through_ndc(x, y);
        pick_ray(
            &self.scene.borrow(),
            ray,
            PickOptions {
                max_distance: camera.far,
            },
        )
    }

    /// Same as [`raycast`](Self::raycast) for a pixel position (origin top-left).
    pub fn raycast_px(&self, x_px: f64, y_px: f64, viewport: Viewport) -> Option<PickHit> {
        let w = viewport.width.max(1) as f64;
        let h = viewport.height.max(1) as f64;
        self.raycast(2.0 * x_px / w - 1.0, 1.0 - 2.0 * y_px / h)
    }
}
