use std::cell::{Cell, RefCell};
use std::rc::Rc;

use poi::PoiSource;
use render::{PerspectiveCamera, Renderer, aspect_ratio};
use runtime::BusError;
use scene::World;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::click::ClickHandler;
use crate::config::{ConfigError, OverlayConfig, Viewport};
use crate::controller::OverlayController;
use crate::feed::CameraFeed;
use crate::location::LocationBased;
use crate::orientation::{CameraControls, DeviceOrientationControls, OrientationSource};
use crate::render_loop::RenderLoop;
use crate::track::GpsSource;
use crate::{SharedCamera, SharedScene};

/// Owns the scene, camera, renderer and location engine, and starts the
/// tasks that connect them. All tasks run on the current `LocalSet`.
pub struct OverlayApp<R> {
    config: OverlayConfig,
    scene: SharedScene,
    camera: SharedCamera,
    renderer: Rc<RefCell<R>>,
    location: Rc<LocationBased>,
    viewport: Cell<Viewport>,
}

impl<R: Renderer + 'static> OverlayApp<R> {
    pub fn bootstrap(config: OverlayConfig, mut renderer: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let viewport = config.viewport;
        let camera = PerspectiveCamera::new(
            config.camera.fov_y_deg,
            viewport.aspect(),
            config.camera.near,
            config.camera.far,
        );
        renderer.set_size(viewport.width, viewport.height);

        let scene = Rc::new(RefCell::new(World::new()));
        let camera = Rc::new(RefCell::new(camera));
        let location = Rc::new(LocationBased::new(
            scene.clone(),
            camera.clone(),
            config.gps_min_distance_m,
            config.gps_min_accuracy_m,
        ));

        info!(
            endpoint = %config.endpoint,
            width = viewport.width,
            height = viewport.height,
            "overlay ready"
        );
        Ok(Self {
            config,
            scene,
            camera,
            renderer: Rc::new(RefCell::new(renderer)),
            location,
            viewport: Cell::new(viewport),
        })
    }

    /// Keep the renderer surface and camera projection in step with the window.
    pub fn resize(&self, width: u32, height: u32) {
        self.viewport.set(Viewport::new(width, height));
        self.renderer.borrow_mut().set_size(width, height);
        let mut camera = self.camera.borrow_mut();
        camera.aspect = aspect_ratio(width, height);
        camera.update_projection_matrix();
        debug!(width, height, aspect = camera.aspect, "resized");
    }

    /// Subscribe a controller backed by `source` to position updates.
    ///
    /// The task ends once updates stop, handing the controller back.
    pub fn spawn_controller<S: PoiSource + 'static>(
        &self,
        source: S,
    ) -> Result<JoinHandle<OverlayController<S>>, BusError> {
        let updates = self.location.on_gps_update()?;
        let controller = OverlayController::new(source, &self.config);
        let sink = self.location.clone();
        Ok(tokio::task::spawn_local(controller.run(updates, sink)))
    }

    pub fn start_gps<G: GpsSource + 'static>(&self, source: G) -> JoinHandle<()> {
        self.location.start_gps(source)
    }

    pub fn orientation_controls<O: OrientationSource>(
        &self,
        source: O,
    ) -> DeviceOrientationControls<O> {
        DeviceOrientationControls::new(source, self.camera.clone())
    }

    pub fn render_loop<F, C>(&self, feed: F, controls: C) -> RenderLoop<F, C, R>
    where
        F: CameraFeed,
        C: CameraControls,
    {
        RenderLoop::new(
            feed,
            controls,
            self.renderer.clone(),
            self.scene.clone(),
            self.camera.clone(),
            self.config.frame_rate_hz,
        )
    }

    pub fn spawn_render_loop<F, C>(&self, feed: F, controls: C) -> JoinHandle<()>
    where
        F: CameraFeed + 'static,
        C: CameraControls + 'static,
    {
        tokio::task::spawn_local(self.render_loop(feed, controls).run())
    }

    pub fn click_handler(&self) -> ClickHandler {
        ClickHandler::new(self.scene.clone(), self.camera.clone())
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }

    pub fn camera(&self) -> &SharedCamera {
        &self.camera
    }

    pub fn renderer(&self) -> &Rc<RefCell<R>> {
        &self.renderer
    }

    pub fn location(&self) -> &Rc<LocationBased> {
        &self.location
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }
}
