//! The World Probe: "can an entity stand in this voxel?"

use wg_core::{BlockPos, Forward};

use crate::BlockSource;

/// `true` iff an entity can stand with its feet in `pos`.
///
/// Requires feet and head voxels to be passable, the voxel below to be
/// solid footing that is not hazardous, and `pos` to sit at least one voxel
/// inside the world's vertical limits.  Any read failure (unloaded chunk,
/// out-of-range coordinate) makes the position non-standable.
pub fn is_standable<W: BlockSource + ?Sized>(world: &W, pos: BlockPos) -> bool {
    if pos.y < world.min_y() + 1 || pos.y > world.max_y() - 2 {
        return false;
    }
    let (Ok(feet), Ok(head), Ok(floor)) = (
        world.block_at(pos),
        world.block_at(pos.above()),
        world.block_at(pos.below()),
    ) else {
        return false;
    };
    feet.is_passable() && head.is_passable() && !floor.is_passable() && !floor.is_hazardous()
}

/// Forward direction of the marker at `pos`: a sign's text side.
///
/// `None` when the block is not a sign or cannot be read.
pub fn forward_hint<W: BlockSource + ?Sized>(world: &W, pos: BlockPos) -> Option<Forward> {
    world
        .block_at(pos)
        .ok()
        .and_then(|b| b.sign_facing())
        .map(|f| f.forward())
}
