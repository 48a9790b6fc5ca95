use foundation::bounds::Aabb3;
use foundation::math::Vec3;

/// Directional arrow drawn from the entity origin.
///
/// Head proportions match the common helper defaults: the head is a fifth of
/// the total length and its width a fifth of the head length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Arrow {
    /// Unit direction in scene space.
    pub direction: Vec3,
    pub length: f64,
    /// 0xRRGGBB.
    pub color: u32,
    pub head_length: f64,
    pub head_width: f64,
}

impl Arrow {
    /// `direction` must already be normalized.
    pub fn new(direction: Vec3, length: f64, color: u32) -> Self {
        let head_length = 0.2 * length;
        Self {
            direction,
            length,
            color,
            head_length,
            head_width: 0.2 * head_length,
        }
    }

    pub fn tip(&self) -> Vec3 {
        self.direction.scale(self.length)
    }

    /// Bounds relative to the arrow origin.
    pub fn local_bounds(&self) -> Aabb3 {
        Aabb3::from_points([0.0; 3], self.tip().as_array()).expand(self.head_width * 0.5)
    }

    pub fn color_hex(&self) -> String {
        format!("#{:06x}", self.color & 0x00ff_ffff)
    }
}
