use std::fmt;
use std::str::FromStr;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);
/// IUGG mean Earth radius (meters), used for great-circle distances.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Earth-centered, Earth-fixed Cartesian coordinates (meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Geodetic coordinates in radians and meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Geodetic {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_m: f64,
}

impl Geodetic {
    pub fn new(lat_rad: f64, lon_rad: f64, alt_m: f64) -> Self {
        Self {
            lat_rad,
            lon_rad,
            alt_m,
        }
    }
}

pub fn geodetic_to_ecef(geo: Geodetic) -> Ecef {
    let sin_lat = geo.lat_rad.sin();
    let cos_lat = geo.lat_rad.cos();
    let sin_lon = geo.lon_rad.sin();
    let cos_lon = geo.lon_rad.cos();

    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let x = (n + geo.alt_m) * cos_lat * cos_lon;
    let y = (n + geo.alt_m) * cos_lat * sin_lon;
    let z = (n * (1.0 - WGS84_E2) + geo.alt_m) * sin_lat;

    Ecef::new(x, y, z)
}

/// A WGS84 position in degrees, longitude first (GeoJSON order).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Ellipsoid-surface geodetic coordinates.
    pub fn to_geodetic(self) -> Geodetic {
        Geodetic::new(self.lat.to_radians(), self.lon.to_radians(), 0.0)
    }

    /// Great-circle (haversine) distance in meters.
    pub fn distance_to(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * MEAN_EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGeoPointError {
    pub message: String,
}

impl fmt::Display for ParseGeoPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseGeoPointError {}

impl FromStr for GeoPoint {
    type Err = ParseGeoPointError;

    /// Parses `lon,lat`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |message: String| ParseGeoPointError { message };
        let (lon, lat) = s
            .split_once(',')
            .ok_or_else(|| err(format!("expected `lon,lat`, got {s:?}")))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|e| err(format!("invalid longitude {lon:?}: {e}")))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|e| err(format!("invalid latitude {lat:?}: {e}")))?;

        let point = GeoPoint::new(lon, lat);
        if !point.is_valid() {
            return Err(err(format!("coordinate out of range: {point}")));
        }
        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, Geodetic, WGS84_A, geodetic_to_ecef};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn geodetic_to_ecef_equator_prime_meridian() {
        let ecef = geodetic_to_ecef(Geodetic::new(0.0, 0.0, 0.0));
        assert_close(ecef.x, WGS84_A, 1e-6);
        assert_close(ecef.y, 0.0, 1e-6);
        assert_close(ecef.z, 0.0, 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(10.0, 21.0);
        assert_close(a.distance_to(b), 111_195.08, 1.0);
        assert_close(b.distance_to(a), a.distance_to(b), 1e-9);
        assert_eq!(a.distance_to(a), 0.0);
    }

    #[test]
    fn parses_lon_lat_pairs() {
        let p: GeoPoint = " -0.1276, 51.5072 ".parse().unwrap();
        assert_eq!(p, GeoPoint::new(-0.1276, 51.5072));
        assert_eq!(p.to_string(), "-0.1276,51.5072");
    }

    #[test]
    fn rejects_malformed_or_out_of_range() {
        assert!("10.0".parse::<GeoPoint>().is_err());
        assert!("abc,1".parse::<GeoPoint>().is_err());
        assert!("10,95".parse::<GeoPoint>().is_err());
        assert!("200,0".parse::<GeoPoint>().is_err());
    }
}
