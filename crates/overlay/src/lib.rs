//! Geo-anchored POI overlay.
//!
//! Position fixes from the [`location`] engine drive the
//! [`controller::OverlayController`], which looks up nearby POIs and places
//! one arrow marker per POI into the shared scene. The [`render_loop`] draws
//! that scene every frame, independent of lookups. [`app::OverlayApp`] wires
//! the pieces together on a single-threaded `LocalSet`.

use std::cell::RefCell;
use std::rc::Rc;

use render::PerspectiveCamera;
use scene::World;

pub mod app;
pub mod click;
pub mod config;
pub mod controller;
pub mod dedup;
pub mod feed;
pub mod location;
pub mod marker;
pub mod orientation;
pub mod render_loop;
pub mod track;

#[cfg(test)]
pub(crate) mod testing;

pub use app::OverlayApp;
pub use config::{OverlayConfig, Viewport};
pub use controller::{FixOutcome, OverlayController, PlacementSummary};
pub use location::{LocationBased, MarkerSink, PositionFix};

/// Scene graph shared between the position handler and the render loop.
pub type SharedScene = Rc<RefCell<World>>;
pub type SharedCamera = Rc<RefCell<PerspectiveCamera>>;
