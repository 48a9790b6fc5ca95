use crate::components::{Arrow, GeoAnchor, Transform};
use crate::entity::EntityId;
use foundation::bounds::Aabb3;
use foundation::handles::Handle;

#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    anchors: Vec<Option<GeoAnchor>>,
    transforms: Vec<Option<Transform>>,
    arrows: Vec<Option<Arrow>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(Handle::new(self.next_index, 0));
        self.next_index += 1;
        self.ensure_capacity(id.index() as usize);
        id
    }

    pub fn entity_count(&self) -> usize {
        self.next_index as usize
    }

    pub fn set_anchor(&mut self, entity: EntityId, anchor: GeoAnchor) {
        self.ensure_capacity(entity.index() as usize);
        self.anchors[entity.index() as usize] = Some(anchor);
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        self.ensure_capacity(entity.index() as usize);
        self.transforms[entity.index() as usize] = Some(transform);
    }

    pub fn set_arrow(&mut self, entity: EntityId, arrow: Arrow) {
        self.ensure_capacity(entity.index() as usize);
        self.arrows[entity.index() as usize] = Some(arrow);
    }

    pub fn anchor(&self, entity: EntityId) -> Option<GeoAnchor> {
        self.anchors.get(entity.index() as usize).and_then(|a| *a)
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.transforms.get(entity.index() as usize).and_then(|t| *t)
    }

    pub fn arrow(&self, entity: EntityId) -> Option<Arrow> {
        self.arrows.get(entity.index() as usize).and_then(|a| *a)
    }

    pub fn arrow_count(&self) -> usize {
        self.arrows.iter().filter(|a| a.is_some()).count()
    }

    /// World-space bounds of a placed arrow.
    pub fn arrow_bounds(&self, entity: EntityId) -> Option<Aabb3> {
        let arrow = self.arrow(entity)?;
        let transform = self.transform(entity)?;
        Some(
            arrow
                .local_bounds()
                .translate(transform.position.as_array()),
        )
    }

    /// Arrows that have a scene placement, in entity order.
    pub fn arrows(&self) -> Vec<(EntityId, Transform, Arrow)> {
        let mut out = Vec::new();
        for (idx, arrow) in self.arrows.iter().enumerate() {
            let Some(arrow) = arrow else { continue };
            let Some(transform) = self.transforms.get(idx).and_then(|t| *t) else {
                continue;
            };
            out.push((EntityId(Handle::new(idx as u32, 0)), transform, *arrow));
        }
        out
    }

    /// Anchored entities still waiting for a scene placement.
    pub fn unplaced_anchors(&self) -> Vec<(EntityId, GeoAnchor)> {
        let mut out = Vec::new();
        for (idx, anchor) in self.anchors.iter().enumerate() {
            let Some(anchor) = anchor else { continue };
            if self.transforms.get(idx).and_then(|t| *t).is_some() {
                continue;
            }
            out.push((EntityId(Handle::new(idx as u32, 0)), *anchor));
        }
        out
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.transforms.len() <= idx {
            let new_len = idx + 1;
            self.anchors.resize(new_len, None);
            self.transforms.resize(new_len, None);
            self.arrows.resize(new_len, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::World;
    use crate::components::{Arrow, GeoAnchor, Transform};
    use foundation::math::{GeoPoint, Vec3};

    fn arrow() -> Arrow {
        Arrow::new(Vec3::new(0.0, 1.0, 0.0), 20.0, 0xffff00)
    }

    #[test]
    fn spawn_and_collect_arrows() {
        let mut world = World::new();
        let entity = world.spawn();
        world.set_transform(entity, Transform::identity());
        world.set_arrow(entity, arrow());

        let arrows = world.arrows();
        assert_eq!(arrows.len(), 1);
        assert_eq!(arrows[0].0, entity);
        assert_eq!(world.arrow_count(), 1);
    }

    #[test]
    fn arrows_without_placement_are_not_collected() {
        let mut world = World::new();
        let entity = world.spawn();
        world.set_anchor(entity, GeoAnchor::new(GeoPoint::new(1.0, 2.0)));
        world.set_arrow(entity, arrow());

        assert!(world.arrows().is_empty());
        assert_eq!(world.arrow_count(), 1);
        assert_eq!(world.unplaced_anchors().len(), 1);

        world.set_transform(entity, Transform::translate(Vec3::new(5.0, 0.0, 0.0)));
        assert!(world.unplaced_anchors().is_empty());
        assert_eq!(world.arrows().len(), 1);
    }

    #[test]
    fn arrow_bounds_follow_transform() {
        let mut world = World::new();
        let entity = world.spawn();
        world.set_arrow(entity, arrow());
        assert!(world.arrow_bounds(entity).is_none());

        world.set_transform(entity, Transform::translate(Vec3::new(10.0, 0.0, 0.0)));
        let b = world.arrow_bounds(entity).unwrap();
        assert!(b.min[0] < 10.0 && b.max[0] > 10.0);
        assert!(b.max[1] > 20.0);
    }
}
