use crate::math::GeoPoint;

/// Axis-aligned box in scene space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    /// Smallest box containing both points.
    pub fn from_points(a: [f64; 3], b: [f64; 3]) -> Self {
        Aabb3 {
            min: [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])],
            max: [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])],
        }
    }

    pub fn expand(self, margin: f64) -> Self {
        Aabb3 {
            min: [self.min[0] - margin, self.min[1] - margin, self.min[2] - margin],
            max: [self.max[0] + margin, self.max[1] + margin, self.max[2] + margin],
        }
    }

    pub fn translate(self, offset: [f64; 3]) -> Self {
        Aabb3 {
            min: [
                self.min[0] + offset[0],
                self.min[1] + offset[1],
                self.min[2] + offset[2],
            ],
            max: [
                self.max[0] + offset[0],
                self.max[1] + offset[1],
                self.max[2] + offset[2],
            ],
        }
    }
}

/// Geographic bounding box in WGS84 degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Square box extending `half_width_deg` from `center` in every direction.
    ///
    /// No clamping or antimeridian wrapping is applied.
    pub fn around(center: GeoPoint, half_width_deg: f64) -> Self {
        Self {
            west: center.lon - half_width_deg,
            south: center.lat - half_width_deg,
            east: center.lon + half_width_deg,
            north: center.lat + half_width_deg,
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lon >= self.west
            && point.lon <= self.east
            && point.lat >= self.south
            && point.lat <= self.north
    }

    /// `west,south,east,north` with shortest round-trip float formatting.
    pub fn to_query_value(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}
