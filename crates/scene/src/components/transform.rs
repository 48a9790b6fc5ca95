use foundation::math::{Enu, Vec3};

/// Scene-space placement.
///
/// Axes follow the usual right-handed Y-up convention: `x` east, `y` up,
/// `z` south (so north is `-z`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self { position }
    }

    pub fn from_enu(enu: Enu) -> Self {
        Self::translate(enu_to_scene(enu))
    }
}

pub fn enu_to_scene(enu: Enu) -> Vec3 {
    Vec3::new(enu.east, enu.up, -enu.north)
}
