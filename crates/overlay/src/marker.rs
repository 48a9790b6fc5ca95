use foundation::math::Vec3;
use poi::PoiRecord;
use scene::components::Arrow;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Visual parameters shared by every POI marker.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Scene-space direction; normalized by the factory.
    pub direction: [f64; 3],
    pub length: f64,
    /// 0xRRGGBB.
    pub color: u32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            direction: [1.0, 2.0, 0.0],
            length: 20.0,
            color: 0xffff00,
        }
    }
}

/// Builds the arrow placed for each POI.
///
/// Every marker uses the same style; POI attributes do not change its look.
#[derive(Debug, Clone)]
pub struct MarkerFactory {
    template: Arrow,
}

impl MarkerFactory {
    pub fn new(style: MarkerStyle) -> Self {
        let [x, y, z] = style.direction;
        // Degenerate directions point straight up.
        let direction = Vec3::new(x, y, z)
            .normalize()
            .unwrap_or(Vec3::new(0.0, 1.0, 0.0));
        Self {
            template: Arrow::new(direction, style.length, style.color),
        }
    }

    pub fn template(&self) -> Arrow {
        self.template
    }

    pub fn build(&self, poi: &PoiRecord) -> Arrow {
        trace!(id = %poi.id, name = poi.name.as_deref().unwrap_or(""), "building marker");
        self.template
    }
}

impl Default for MarkerFactory {
    fn default() -> Self {
        Self::new(MarkerStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerFactory, MarkerStyle};
    use foundation::math::{GeoPoint, Vec3};
    use poi::PoiRecord;

    #[test]
    fn default_marker_is_unit_direction_yellow_arrow() {
        let factory = MarkerFactory::default();
        let arrow = factory.build(&PoiRecord::new("1", GeoPoint::new(0.0, 0.0)));

        let s = 5f64.sqrt();
        assert!((arrow.direction - Vec3::new(1.0 / s, 2.0 / s, 0.0)).length() < 1e-12);
        assert!((arrow.direction.length() - 1.0).abs() < 1e-12);
        assert_eq!(arrow.length, 20.0);
        assert_eq!(arrow.color, 0xffff00);
    }

    #[test]
    fn every_poi_gets_the_same_style() {
        let factory = MarkerFactory::default();
        let a = factory.build(&PoiRecord::new("1", GeoPoint::new(0.0, 0.0)));
        let b = factory.build(&PoiRecord::new("2", GeoPoint::new(5.0, 5.0)));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_direction_points_up() {
        let factory = MarkerFactory::new(MarkerStyle {
            direction: [0.0, 0.0, 0.0],
            ..MarkerStyle::default()
        });
        assert_eq!(factory.template().direction, Vec3::new(0.0, 1.0, 0.0));
    }
}
