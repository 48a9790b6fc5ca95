use foundation::math::GeoPoint;

/// Geographic position an entity is pinned to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoAnchor {
    pub position: GeoPoint,
}

impl GeoAnchor {
    pub fn new(position: GeoPoint) -> Self {
        Self { position }
    }
}
