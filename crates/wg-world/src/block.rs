//! Block classification.

use wg_core::Facing;

/// What occupies a voxel.
///
/// Only the distinctions the standability probe and the forward-hint lookup
/// care about are modelled.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum BlockKind {
    #[default]
    Air,
    /// Grass and flowers; no collision.
    Foliage,
    /// Free-standing sign; the facing is the side with text on it.
    Sign(Facing),
    /// Sign mounted on a wall; the facing points away from the wall.
    WallSign(Facing),
    Solid,
    Lava,
    Fire,
    Cactus,
    Magma,
}

impl BlockKind {
    /// `true` if an entity's body can occupy this voxel.
    #[inline]
    pub fn is_passable(self) -> bool {
        matches!(
            self,
            BlockKind::Air | BlockKind::Foliage | BlockKind::Sign(_) | BlockKind::WallSign(_)
        )
    }

    /// `true` if standing on (or in) this block hurts.
    #[inline]
    pub fn is_hazardous(self) -> bool {
        matches!(
            self,
            BlockKind::Lava | BlockKind::Fire | BlockKind::Cactus | BlockKind::Magma
        )
    }

    /// The facing of a sign block, if this is one.
    #[inline]
    pub fn sign_facing(self) -> Option<Facing> {
        match self {
            BlockKind::Sign(f) | BlockKind::WallSign(f) => Some(f),
            _ => None,
        }
    }
}
