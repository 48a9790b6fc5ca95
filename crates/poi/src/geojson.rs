//! GeoJSON feature collections as returned by the map service.
//!
//! Only the parts the overlay needs are modelled: a point geometry and an
//! identifier property. Everything else in `properties` is kept untyped.

use std::fmt;

use foundation::math::GeoPoint;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

use crate::error::FetchError;

/// Property holding the stable feature identifier.
pub const ID_PROPERTY: &str = "osm_id";

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

/// External POI identifier.
///
/// Numeric and string identifiers share one key space: `123` and `"123"`
/// name the same POI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoiId(String);

impl PoiId {
    pub fn new(id: impl Into<String>) -> Self {
        PoiId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(PoiId(s.clone())),
            Value::Number(n) => Some(PoiId(number_key(n))),
            _ => None,
        }
    }
}

// `42` and `42.0` are the same identifier.
fn number_key(n: &Number) -> String {
    if let Some(f) = n.as_f64()
        && !n.is_i64()
        && !n.is_u64()
        && f.fract() == 0.0
        && f.abs() < 9.0e15
    {
        return format!("{}", f as i64);
    }
    n.to_string()
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PoiId {
    fn from(s: &str) -> Self {
        PoiId::new(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoiRecord {
    pub id: PoiId,
    pub position: GeoPoint,
    pub name: Option<String>,
}

impl PoiRecord {
    pub fn new(id: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            id: PoiId::new(id),
            position,
            name: None,
        }
    }
}

/// Records of one response, in response order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoiBatch {
    pub records: Vec<PoiRecord>,
    /// Features without a point geometry.
    pub skipped_geometry: usize,
}

pub fn parse_feature_collection(body: &[u8]) -> Result<PoiBatch, FetchError> {
    let collection: FeatureCollection =
        serde_json::from_slice(body).map_err(|e| FetchError::malformed(e.to_string()))?;
    collection_to_batch(collection)
}

pub fn collection_to_batch(collection: FeatureCollection) -> Result<PoiBatch, FetchError> {
    if let Some(kind) = &collection.kind
        && kind != "FeatureCollection"
    {
        return Err(FetchError::malformed(format!(
            "expected a FeatureCollection, got {kind:?}"
        )));
    }

    let mut batch = PoiBatch::default();
    for (i, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.unwrap_or_default();
        let id = properties
            .get(ID_PROPERTY)
            .and_then(PoiId::from_value)
            .ok_or_else(|| FetchError::malformed(format!("feature {i} has no {ID_PROPERTY}")))?;

        let Some(geometry) = feature.geometry.filter(|g| g.kind == "Point") else {
            batch.skipped_geometry += 1;
            continue;
        };
        let position = point_coordinates(&geometry.coordinates)
            .ok_or_else(|| FetchError::malformed(format!("feature {i} ({id}) has bad coordinates")))?;

        let name = properties
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned);

        batch.records.push(PoiRecord { id, position, name });
    }
    Ok(batch)
}

fn point_coordinates(value: &Value) -> Option<GeoPoint> {
    // Extra positions (altitude) are ignored.
    let coords = value.as_array()?;
    let lon = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    Some(GeoPoint::new(lon, lat))
}
