//! Point-of-interest lookup.
//!
//! - [`geojson`]: the feature-collection response model and its conversion
//!   into [`PoiRecord`]s.
//! - [`source`]: the [`PoiSource`] trait the overlay depends on.
//! - [`http`]: the HTTP implementation against a map web service.

pub mod error;
pub mod geojson;
pub mod http;
pub mod source;

pub use error::*;
pub use geojson::{PoiBatch, PoiId, PoiRecord, parse_feature_collection};
pub use http::*;
pub use source::*;
