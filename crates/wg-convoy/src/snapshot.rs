use wg_core::{EntityId, TeleportConfig};

/// How far the leash traversal may go.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConvoyPolicy {
    /// Follow leashes of leashed entities (chains) instead of only the
    /// subject's own.
    pub recursive: bool,
    /// Chain depth cap for the recursive walk.
    pub max_depth: u32,
}

impl Default for ConvoyPolicy {
    fn default() -> Self {
        Self { recursive: true, max_depth: 5 }
    }
}

impl From<&TeleportConfig> for ConvoyPolicy {
    fn from(config: &TeleportConfig) -> Self {
        Self {
            recursive: config.recursive_leash,
            max_depth: config.max_leash_depth,
        }
    }
}

/// One leashed entity and the holder it was tied to at snapshot time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConvoyMember {
    pub id:     EntityId,
    pub holder: EntityId,
}

/// The entities that travel with one teleport, frozen at schedule time.
///
/// `members` never contains the subject or its vehicle, and never lists an
/// entity twice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvoySnapshot {
    /// Leashed followers in discovery order (nearest links first).
    pub members: Vec<ConvoyMember>,
    /// What the subject was riding.
    pub vehicle: Option<EntityId>,
    /// A nearby boat marked for transport with its passengers.
    pub boat: Option<EntityId>,
    /// Deepest level the traversal reached (0 = subject only).
    pub max_depth_reached: u32,
    /// The traversal stopped at the depth cap.
    pub depth_capped: bool,
}

impl ConvoySnapshot {
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().map(|m| m.id)
    }
}
