//! `EntityStore` — slot storage plus a per-world R-tree for radius queries.
//!
//! # Spatial index
//!
//! Every live entity has one point entry in the R-tree of the world it is in
//! (via `rstar`).  Position changes go through [`EntityStore::relocate`],
//! which removes the stale entry and inserts the new one, so the index never
//! lags the slot data.

use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use wg_core::{EntityId, Location, WorldId};

use crate::{Entity, EntityKind};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct EntityEntry {
    point: [f64; 3],
    id:    EntityId,
}

impl RTreeObject for EntityEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

// ── EntityStore ───────────────────────────────────────────────────────────────

/// Owns every entity.  `EntityId` is the slot index; despawned slots stay
/// `None` and are never reused, so a stale id can never alias a new entity.
#[derive(Default)]
pub struct EntityStore {
    slots: Vec<Option<Entity>>,
    index: FxHashMap<WorldId, RTree<EntityEntry>>,
    live:  usize,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities currently present (dead bodies included until
    /// despawned).
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub(crate) fn insert(&mut self, kind: EntityKind, name: String, location: Location) -> EntityId {
        let id = EntityId(self.slots.len() as u32);
        self.index
            .entry(location.world)
            .or_default()
            .insert(EntityEntry { point: location.pos.to_array(), id });
        self.slots.push(Some(Entity::new(id, kind, name, location)));
        self.live += 1;
        id
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.slots.get_mut(id.index())?.take()?;
        if let Some(tree) = self.index.get_mut(&entity.location.world) {
            tree.remove(&EntityEntry { point: entity.location.pos.to_array(), id });
        }
        self.live -= 1;
        Some(entity)
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.index())?.as_ref()
    }

    /// Mutable access for relation fields.  Never change `location` through
    /// this; use [`relocate`](Self::relocate) so the index stays in sync.
    #[inline]
    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Move an entity and update the spatial index.
    pub(crate) fn relocate(&mut self, id: EntityId, to: Location) -> bool {
        let Some(entity) = self.slots.get_mut(id.index()).and_then(Option::as_mut) else {
            return false;
        };
        let from = entity.location;
        entity.location = to;
        if let Some(tree) = self.index.get_mut(&from.world) {
            tree.remove(&EntityEntry { point: from.pos.to_array(), id });
        }
        self.index
            .entry(to.world)
            .or_default()
            .insert(EntityEntry { point: to.pos.to_array(), id });
        true
    }

    /// All entities in the axis-aligned cube of half-extent `half` around
    /// `center`, in ascending id order.
    pub fn within_cube(&self, center: Location, half: f64) -> Vec<EntityId> {
        let Some(tree) = self.index.get(&center.world) else {
            return vec![];
        };
        let c = center.pos.to_array();
        let envelope = AABB::from_corners(
            [c[0] - half, c[1] - half, c[2] - half],
            [c[0] + half, c[1] + half, c[2] + half],
        );
        let mut ids: Vec<EntityId> = tree.locate_in_envelope(&envelope).map(|e| e.id).collect();
        ids.sort_unstable();
        ids
    }

    /// All entities within Euclidean `radius` of `center`, ascending id order.
    pub fn within_radius(&self, center: Location, radius: f64) -> Vec<EntityId> {
        let r2 = radius * radius;
        self.within_cube(center, radius)
            .into_iter()
            .filter(|&id| {
                self.get(id)
                    .is_some_and(|e| e.location.pos.distance_sq(center.pos) <= r2)
            })
            .collect()
    }

    /// Iterator over every present entity.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }
}
