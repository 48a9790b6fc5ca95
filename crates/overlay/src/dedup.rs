use std::collections::HashMap;

use poi::PoiId;
use scene::entity::EntityId;

/// POI id → marker already placed for it.
///
/// Entries are never replaced or removed; the scene owns the markers and the
/// index only keeps their handles.
#[derive(Debug, Default)]
pub struct DedupIndex {
    placed: HashMap<PoiId, EntityId>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &PoiId) -> bool {
        self.placed.contains_key(id)
    }

    pub fn get(&self, id: &PoiId) -> Option<EntityId> {
        self.placed.get(id).copied()
    }

    /// Record `id` → `entity`. Returns `false` and keeps the existing entry
    /// when `id` is already indexed.
    pub fn insert(&mut self, id: PoiId, entity: EntityId) -> bool {
        match self.placed.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(entity);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}
