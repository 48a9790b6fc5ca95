use std::cell::RefCell;
use std::rc::Rc;

use render::Renderer;
use runtime::Frame;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::feed::CameraFeed;
use crate::orientation::CameraControls;
use crate::{SharedCamera, SharedScene};

/// Frames between "still alive" log lines.
const HEARTBEAT_FRAMES: u64 = 600;

/// Per-frame driver: camera feed, then orientation, then render.
pub struct RenderLoop<F, C, R> {
    feed: F,
    controls: C,
    renderer: Rc<RefCell<R>>,
    scene: SharedScene,
    camera: SharedCamera,
    frame: Frame,
}

impl<F, C, R> RenderLoop<F, C, R>
where
    F: CameraFeed,
    C: CameraControls,
    R: Renderer,
{
    pub fn new(
        feed: F,
        controls: C,
        renderer: Rc<RefCell<R>>,
        scene: SharedScene,
        camera: SharedCamera,
        rate_hz: f64,
    ) -> Self {
        Self {
            feed,
            controls,
            renderer,
            scene,
            camera,
            frame: Frame::first(rate_hz),
        }
    }

    /// Run one frame and return its metadata.
    pub fn tick(&mut self) -> Frame {
        let frame = self.frame;
        self.feed.update();
        self.controls.update();
        self.renderer
            .borrow_mut()
            .render(&self.scene.borrow(), &self.camera.borrow());
        self.frame = frame.next();
        frame
    }

    /// The frame the next `tick` will run.
    pub fn next_frame(&self) -> Frame {
        self.frame
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }

    /// Tick at the configured rate for as long as the task is alive.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.frame.period());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let frame = self.tick();
            if frame.index % HEARTBEAT_FRAMES == 0 {
                debug!(frame = frame.index, time_s = frame.time.0, "render loop running");
            }
        }
    }
}
