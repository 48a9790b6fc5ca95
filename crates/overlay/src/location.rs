//! Location engine: turns raw GPS readings into position fixes and anchors
//! scene objects to geographic coordinates.
//!
//! The first accepted fix becomes the world origin. Everything in the scene
//! is expressed in meters east/up/south of that origin, and the camera is
//! moved to each new fix.

use std::cell::Cell;
use std::rc::Rc;

use foundation::math::{Enu, GeoPoint, geo_to_enu};
use runtime::{BusError, EventBus, Subscription};
use scene::components::{Arrow, GeoAnchor, Transform, enu_to_scene};
use scene::entity::EntityId;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::track::{GpsReading, GpsSource};
use crate::{SharedCamera, SharedScene};

/// An accepted GPS position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionFix {
    pub position: GeoPoint,
    /// Great-circle meters from the previous accepted fix; `f64::MAX` for
    /// the very first fix.
    pub distance_moved_m: f64,
}

/// Where the overlay puts its markers.
pub trait MarkerSink {
    fn add_marker(&self, arrow: Arrow, position: GeoPoint) -> EntityId;
}

pub struct LocationBased {
    scene: SharedScene,
    camera: SharedCamera,
    min_distance_m: f64,
    min_accuracy_m: f64,
    origin: Cell<Option<GeoPoint>>,
    last_fix: Cell<Option<GeoPoint>>,
    fixes: Cell<u64>,
    updates: EventBus<PositionFix>,
}

impl LocationBased {
    pub fn new(
        scene: SharedScene,
        camera: SharedCamera,
        min_distance_m: f64,
        min_accuracy_m: f64,
    ) -> Self {
        Self {
            scene,
            camera,
            min_distance_m,
            min_accuracy_m,
            origin: Cell::new(None),
            last_fix: Cell::new(None),
            fixes: Cell::new(0),
            updates: EventBus::new("gpsupdate"),
        }
    }

    /// Subscribe the single GPS-update handler.
    pub fn on_gps_update(&self) -> Result<Subscription<PositionFix>, BusError> {
        self.updates.subscribe()
    }

    /// Stop publishing fixes once the running source finishes.
    pub fn stop_updates(&self) {
        self.updates.close();
    }

    /// Feed readings from `source` on the current `LocalSet` until it is exhausted.
    pub fn start_gps<G: GpsSource + 'static>(self: &Rc<Self>, mut source: G) -> JoinHandle<()> {
        let engine = Rc::clone(self);
        info!(source = source.name(), "starting GPS");
        tokio::task::spawn_local(async move {
            while let Some(reading) = source.next_reading().await {
                engine.receive(reading);
            }
            debug!(source = source.name(), fixes = engine.fix_count(), "GPS source exhausted");
        })
    }

    /// Inject a position as if the GPS had reported it with perfect accuracy.
    pub fn fake_gps(&self, position: GeoPoint) -> Option<PositionFix> {
        self.receive(GpsReading::new(position))
    }

    /// Filter a raw reading and publish it as a fix if accepted.
    pub fn receive(&self, reading: GpsReading) -> Option<PositionFix> {
        let position = reading.position;
        if !position.is_valid() {
            warn!(%position, "ignoring invalid GPS position");
            return None;
        }
        if let Some(acc) = reading.accuracy_m
            && acc > self.min_accuracy_m
        {
            trace!(accuracy_m = acc, "ignoring inaccurate GPS reading");
            return None;
        }

        let distance_moved_m = match self.last_fix.get() {
            Some(last) => {
                let d = last.distance_to(position);
                if d < self.min_distance_m {
                    trace!(distance_m = d, "GPS reading below minimum distance");
                    return None;
                }
                d
            }
            None => f64::MAX,
        };

        let origin = match self.origin.get() {
            Some(origin) => origin,
            None => {
                info!(%position, "world origin set");
                self.origin.set(Some(position));
                self.place_pending(position);
                position
            }
        };

        let camera_at = ground_position(position, origin);
        {
            let mut camera = self.camera.borrow_mut();
            camera.position.x = camera_at.x;
            camera.position.z = camera_at.z;
        }

        self.last_fix.set(Some(position));
        self.fixes.set(self.fixes.get() + 1);

        let fix = PositionFix {
            position,
            distance_moved_m,
        };
        if !self.updates.emit(fix) {
            trace!("no GPS update handler listening");
        }
        Some(fix)
    }

    /// Anchor `arrow` at (`lon`, `lat`). Placement waits for the first fix.
    pub fn add(&self, arrow: Arrow, lon: f64, lat: f64) -> EntityId {
        let position = GeoPoint::new(lon, lat);
        let mut scene = self.scene.borrow_mut();
        let entity = scene.spawn();
        scene.set_anchor(entity, GeoAnchor::new(position));
        scene.set_arrow(entity, arrow);
        if let Some(origin) = self.origin.get() {
            scene.set_transform(
                entity,
                Transform::translate(ground_position(position, origin)),
            );
        }
        entity
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin.get()
    }

    pub fn last_fix(&self) -> Option<GeoPoint> {
        self.last_fix.get()
    }

    pub fn fix_count(&self) -> u64 {
        self.fixes.get()
    }

    fn place_pending(&self, origin: GeoPoint) {
        let mut scene = self.scene.borrow_mut();
        for (entity, anchor) in scene.unplaced_anchors() {
            scene.set_transform(
                entity,
                Transform::translate(ground_position(anchor.position, origin)),
            );
        }
    }
}

impl MarkerSink for LocationBased {
    fn add_marker(&self, arrow: Arrow, position: GeoPoint) -> EntityId {
        self.add(arrow, position.lon, position.lat)
    }
}

// Anchors carry no elevation; keep them on the ground plane.
fn ground_position(point: GeoPoint, origin: GeoPoint) -> foundation::math::Vec3 {
    let enu = geo_to_enu(point, origin);
    enu_to_scene(Enu::new(enu.east, enu.north, 0.0))
}
