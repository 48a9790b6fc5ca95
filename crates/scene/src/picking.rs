use foundation::bounds::Aabb3;
use foundation::math::Vec3;

use crate::World;
use crate::entity::EntityId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
        }
    }
}

/// Ray picking against placed arrows.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - Equal distances resolve to the lower `EntityId::index()`.
///
/// Arrows are tested by their world-space bounds; unplaced arrows never hit.
pub fn pick_ray(world: &World, ray: Ray, opts: PickOptions) -> Option<PickHit> {
    let dir = ray.dir.normalize()?;
    let origin = ray.origin.as_array();
    let dir_a = dir.as_array();

    let mut best: Option<(f64, EntityId)> = None;
    for (entity, _transform, _arrow) in world.arrows() {
        let Some(bounds) = world.arrow_bounds(entity) else {
            continue;
        };
        let Some(t) = ray_aabb_hit_t(origin, dir_a, bounds, 0.0, opts.max_distance) else {
            continue;
        };

        best = match best {
            None => Some((t, entity)),
            Some((bt, be)) => {
                let ord = t.total_cmp(&bt).then_with(|| entity.index().cmp(&be.index()));
                if ord.is_lt() {
                    Some((t, entity))
                } else {
                    Some((bt, be))
                }
            }
        };
    }

    let (t, entity) = best?;
    Some(PickHit {
        entity,
        distance: t,
        point: ray.origin + dir.scale(t),
    })
}

fn ray_aabb_hit_t(
    origin: [f64; 3],
    dir: [f64; 3],
    bounds: Aabb3,
    mut t_min: f64,
    mut t_max: f64,
) -> Option<f64> {
    // Slabs intersection; returns entry distance.
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (min, max) = (bounds.min[axis], bounds.max[axis]);

        if d.abs() < 1e-12 {
            if o < min || o > max {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (min - o) * inv;
        let mut t2 = (max - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_max < t_min {
            return None;
        }
    }

    Some(t_min.max(0.0))
}
