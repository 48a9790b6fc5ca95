use super::{Ecef, GeoPoint, Geodetic, geodetic_to_ecef};

/// Local East-North-Up coordinates (meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Enu {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl Enu {
    pub fn new(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }
}

pub fn ecef_to_enu(point: Ecef, origin: Geodetic) -> Enu {
    let origin_ecef = geodetic_to_ecef(origin);
    let dx = point.x - origin_ecef.x;
    let dy = point.y - origin_ecef.y;
    let dz = point.z - origin_ecef.z;

    let sin_lat = origin.lat_rad.sin();
    let cos_lat = origin.lat_rad.cos();
    let sin_lon = origin.lon_rad.sin();
    let cos_lon = origin.lon_rad.cos();

    let east = -sin_lon * dx + cos_lon * dy;
    let north = -sin_lat * cos_lon * dx - sin_lat * sin_lon * dy + cos_lat * dz;
    let up = cos_lat * cos_lon * dx + cos_lat * sin_lon * dy + sin_lat * dz;

    Enu::new(east, north, up)
}

/// Position of `point` in the tangent frame anchored at `origin`.
pub fn geo_to_enu(point: GeoPoint, origin: GeoPoint) -> Enu {
    ecef_to_enu(geodetic_to_ecef(point.to_geodetic()), origin.to_geodetic())
}

#[cfg(test)]
mod tests {
    use super::geo_to_enu;
    use crate::math::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn enu_zero_at_origin() {
        let origin = GeoPoint::new(-1.4, 50.9);
        let enu = geo_to_enu(origin, origin);
        assert_close(enu.east, 0.0, 1e-6);
        assert_close(enu.north, 0.0, 1e-6);
        assert_close(enu.up, 0.0, 1e-6);
    }

    #[test]
    fn small_offsets_map_to_east_and_north() {
        let origin = GeoPoint::new(0.0, 0.0);
        let north = geo_to_enu(GeoPoint::new(0.0, 0.001), origin);
        assert!(north.north > 110.0 && north.north < 112.0, "{north:?}");
        assert_close(north.east, 0.0, 1e-6);

        let east = geo_to_enu(GeoPoint::new(0.001, 0.0), origin);
        assert!(east.east > 110.0 && east.east < 112.0, "{east:?}");
        assert_close(east.north, 0.0, 1e-6);
        // Tangent plane drops away from the curved surface.
        assert!(east.up < 0.0);
    }
}
