//! Entity records.

use wg_core::{AccountId, EntityId, Location};

/// Broad entity categories.  Only distinctions the convoy logic needs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EntityKind {
    Player,
    /// Any non-rideable mob: wolves, sheep, llamas.
    Creature,
    /// Rideable animal: horses, camels, pigs with saddles.
    Mount,
    /// Floatable vehicle that can carry passengers.
    Boat,
    /// A lead item lying on the ground after a leash snapped or was removed.
    DroppedLead,
}

impl EntityKind {
    /// Mobs and players: things that can die.
    #[inline]
    pub fn is_living(self) -> bool {
        matches!(self, EntityKind::Player | EntityKind::Creature | EntityKind::Mount)
    }

    /// Things a leash can be tied to as the follower.
    #[inline]
    pub fn is_leashable(self) -> bool {
        matches!(self, EntityKind::Creature | EntityKind::Mount | EntityKind::Boat)
    }

    /// Things other entities can ride.
    #[inline]
    pub fn is_vehicle(self) -> bool {
        matches!(self, EntityKind::Mount | EntityKind::Boat)
    }
}

/// One live entity.
///
/// Relations are stored on both ends where the host does: `vehicle` on the
/// rider and `passengers` on the vehicle.  Leashes are stored on the follower
/// only; followers of a holder are found by scanning nearby entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id:           EntityId,
    pub kind:         EntityKind,
    pub name:         String,
    /// Set for players only.
    pub account:      Option<AccountId>,
    pub location:     Location,
    pub alive:        bool,
    pub leash_holder: Option<EntityId>,
    pub vehicle:      Option<EntityId>,
    pub passengers:   Vec<EntityId>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind, name: String, location: Location) -> Self {
        Self {
            id,
            kind,
            name,
            account: None,
            location,
            alive: true,
            leash_holder: None,
            vehicle: None,
            passengers: Vec::new(),
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    #[inline]
    pub fn is_leashed(&self) -> bool {
        self.leash_holder.is_some()
    }
}
