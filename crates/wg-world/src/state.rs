//! `WorldState` — all loaded worlds plus every entity in them.
//!
//! This is the single mutable world the orchestrator drives.  Every method
//! that moves an entity or changes a relation goes through here so the
//! physical rules (see the crate docs) hold no matter who calls.

use rustc_hash::FxHashMap;
use tracing::debug;
use wg_core::{AccountId, EntityId, Location, Position, WorldId};

use crate::{Entity, EntityKind, EntityStore, VoxelWorld, WorldError, WorldResult};

/// A leash stretched past this distance snaps.
pub const LEASH_BREAK_DISTANCE: f64 = 10.0;

#[derive(Default)]
pub struct WorldState {
    worlds:   FxHashMap<WorldId, VoxelWorld>,
    entities: EntityStore,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Worlds ────────────────────────────────────────────────────────────

    /// Register a world, replacing any previous world with the same id.
    pub fn add_world(&mut self, world: VoxelWorld) -> WorldId {
        let id = world.id;
        self.worlds.insert(id, world);
        id
    }

    /// Unload a world.  Entities inside it are left in place; lookups
    /// against the world itself fail from now on.
    pub fn remove_world(&mut self, id: WorldId) -> Option<VoxelWorld> {
        self.worlds.remove(&id)
    }

    #[inline]
    pub fn world(&self, id: WorldId) -> Option<&VoxelWorld> {
        self.worlds.get(&id)
    }

    #[inline]
    pub fn world_mut(&mut self, id: WorldId) -> Option<&mut VoxelWorld> {
        self.worlds.get_mut(&id)
    }

    /// Internal name of a world, or `"unknown"`.
    pub fn world_name(&self, id: WorldId) -> &str {
        self.worlds.get(&id).map_or("unknown", |w| w.name.as_str())
    }

    // ── Entity reads ──────────────────────────────────────────────────────

    #[inline]
    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    #[inline]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    fn require(&self, id: EntityId) -> WorldResult<&Entity> {
        self.entities.get(id).ok_or(WorldError::UnknownEntity(id))
    }

    /// Entities in the cube of half-extent `half` around `center`.
    pub fn nearby(&self, center: Location, half: f64) -> Vec<EntityId> {
        self.entities.within_cube(center, half)
    }

    /// Every entity currently leashed to `holder`, wherever it is.
    pub fn followers_of(&self, holder: EntityId) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.leash_holder == Some(holder))
            .map(|e| e.id)
            .collect()
    }

    // ── Spawning ──────────────────────────────────────────────────────────

    pub fn spawn(
        &mut self,
        kind:     EntityKind,
        name:     impl Into<String>,
        location: Location,
    ) -> WorldResult<EntityId> {
        if !self.worlds.contains_key(&location.world) {
            return Err(WorldError::UnknownWorld(location.world));
        }
        Ok(self.entities.insert(kind, name.into(), location))
    }

    pub fn spawn_player(
        &mut self,
        name:     impl Into<String>,
        account:  AccountId,
        location: Location,
    ) -> WorldResult<EntityId> {
        let id = self.spawn(EntityKind::Player, name, location)?;
        if let Some(e) = self.entities.get_mut(id) {
            e.account = Some(account);
        }
        Ok(id)
    }

    /// Remove an entity entirely (logout, chunk unload).  Its relations are
    /// torn down first: riders are ejected, followers' leashes snap.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.get(id)?;
        self.detach_everything(id);
        self.entities.remove(id)
    }

    /// Mark an entity dead.  The body stays (so ids stay resolvable) but it
    /// drops off its vehicle, ejects riders, and loses every leash.
    pub fn kill(&mut self, id: EntityId) -> WorldResult<()> {
        self.require(id)?;
        self.detach_everything(id);
        if let Some(e) = self.entities.get_mut(id) {
            e.alive = false;
        }
        Ok(())
    }

    fn detach_everything(&mut self, id: EntityId) {
        self.dismount(id);
        let riders = self.entities.get(id).map(|e| e.passengers.clone()).unwrap_or_default();
        for rider in riders {
            self.dismount(rider);
        }
        self.snap_leash(id);
        for follower in self.followers_of(id) {
            self.snap_leash(follower);
        }
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Ordinary in-world movement.  Riders travel with their vehicle.
    pub fn walk(&mut self, id: EntityId, to: Position) -> WorldResult<()> {
        let entity = self.require(id)?;
        if !entity.alive {
            return Err(WorldError::Dead(id));
        }
        let world = entity.location.world;
        let riders = entity.passengers.clone();
        self.entities.relocate(id, Location::new(world, to));
        for rider in riders {
            self.entities.relocate(rider, Location::new(world, to));
        }
        self.enforce_leash_range(id);
        Ok(())
    }

    /// Instantly move one entity, possibly across worlds.
    ///
    /// # Errors
    ///
    /// - [`WorldError::HasPassengers`] if anything is riding it; eject the
    ///   passengers first.
    /// - [`WorldError::UnknownWorld`] if the destination world is not loaded.
    /// - [`WorldError::Dead`] for dead entities.
    ///
    /// A rider is dismounted before the jump.  Leashes that end up stretched
    /// past [`LEASH_BREAK_DISTANCE`] snap.
    pub fn teleport(&mut self, id: EntityId, to: Location) -> WorldResult<()> {
        let entity = self.require(id)?;
        if !entity.alive {
            return Err(WorldError::Dead(id));
        }
        if !entity.passengers.is_empty() {
            return Err(WorldError::HasPassengers(id));
        }
        if !self.worlds.contains_key(&to.world) {
            return Err(WorldError::UnknownWorld(to.world));
        }
        self.dismount(id);
        self.entities.relocate(id, to);
        self.enforce_leash_range(id);
        Ok(())
    }

    fn enforce_leash_range(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(id) else { return };
        let (here, holder) = (entity.location, entity.leash_holder);
        if let Some(holder) = holder {
            if !self.within_leash_range(here, holder) {
                self.snap_leash(id);
            }
        }
        for follower in self.followers_of(id) {
            let Some(f) = self.entities.get(follower) else { continue };
            if f.location.distance(here).is_none_or(|d| d > LEASH_BREAK_DISTANCE) {
                self.snap_leash(follower);
            }
        }
    }

    fn within_leash_range(&self, at: Location, other: EntityId) -> bool {
        self.entities
            .get(other)
            .and_then(|o| o.location.distance(at))
            .is_some_and(|d| d <= LEASH_BREAK_DISTANCE)
    }

    // ── Leashes ───────────────────────────────────────────────────────────

    /// Tie `follower` to `holder`, replacing any existing leash.
    pub fn leash(&mut self, follower: EntityId, holder: EntityId) -> WorldResult<()> {
        if follower == holder {
            return Err(WorldError::SelfReference(follower));
        }
        let f = self.require(follower)?;
        if !f.kind.is_leashable() {
            return Err(WorldError::NotLeashable(follower));
        }
        if !f.alive {
            return Err(WorldError::Dead(follower));
        }
        let h = self.require(holder)?;
        if !h.alive {
            return Err(WorldError::Dead(holder));
        }
        if let Some(e) = self.entities.get_mut(follower) {
            e.leash_holder = Some(holder);
        }
        Ok(())
    }

    /// Remove `follower`'s leash, returning the previous holder.  With
    /// `drop_lead` the lead falls to the ground as an item entity.
    pub fn unleash(&mut self, follower: EntityId, drop_lead: bool) -> Option<EntityId> {
        let entity = self.entities.get_mut(follower)?;
        let holder = entity.leash_holder.take()?;
        let at = entity.location;
        if drop_lead {
            self.entities.insert(EntityKind::DroppedLead, "lead".into(), at);
        }
        Some(holder)
    }

    fn snap_leash(&mut self, follower: EntityId) {
        if let Some(holder) = self.unleash(follower, true) {
            debug!(follower = %follower, holder = %holder, "leash snapped");
        }
    }

    /// Delete dropped lead items within `radius` of `center`.  Returns how
    /// many were removed.
    pub fn remove_dropped_leads(&mut self, center: Location, radius: f64) -> usize {
        let leads: Vec<EntityId> = self
            .entities
            .within_radius(center, radius)
            .into_iter()
            .filter(|&id| {
                self.entities
                    .get(id)
                    .is_some_and(|e| e.kind == EntityKind::DroppedLead)
            })
            .collect();
        for &id in &leads {
            self.entities.remove(id);
        }
        leads.len()
    }

    // ── Riding ────────────────────────────────────────────────────────────

    /// Put `rider` on `vehicle`.  The rider is moved to the vehicle first and
    /// leaves any vehicle it was already on.
    pub fn mount(&mut self, rider: EntityId, vehicle: EntityId) -> WorldResult<()> {
        if rider == vehicle {
            return Err(WorldError::SelfReference(rider));
        }
        let v = self.require(vehicle)?;
        if !v.alive && v.kind.is_living() {
            return Err(WorldError::Dead(vehicle));
        }
        let at = v.location;
        let r = self.require(rider)?;
        if !r.alive {
            return Err(WorldError::Dead(rider));
        }
        if r.vehicle == Some(vehicle) {
            return Ok(());
        }
        self.dismount(rider);
        self.entities.relocate(rider, at);
        if let Some(r) = self.entities.get_mut(rider) {
            r.vehicle = Some(vehicle);
        }
        if let Some(v) = self.entities.get_mut(vehicle) {
            v.passengers.push(rider);
        }
        Ok(())
    }

    /// Take `rider` off whatever it rides.  Returns the vehicle it left.
    pub fn dismount(&mut self, rider: EntityId) -> Option<EntityId> {
        let vehicle = self.entities.get_mut(rider)?.vehicle.take()?;
        if let Some(v) = self.entities.get_mut(vehicle) {
            v.passengers.retain(|&p| p != rider);
        }
        Some(vehicle)
    }
}
