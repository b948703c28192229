//! Landing resolver trait and the default layered search.
//!
//! # Pluggability
//!
//! The orchestrator asks for landing points through [`LandingResolver`], so a
//! host can swap in its own search (e.g. one that also avoids water) without
//! touching the teleport state machine.

use tracing::debug;
use wg_core::{BlockPos, Forward, Location, Position};
use wg_world::{BlockSource, WorldState, forward_hint, is_standable};

use crate::scoring::{choose_by_distance, choose_weighted};

/// Chebyshev radius of the local cube scan (5×5×5).
pub const LOCAL_CUBE_RADIUS: i32 = 2;
/// The cube scan stops collecting once it holds this many candidates.
pub const MAX_CANDIDATES: usize = 20;
/// Largest ring radius of the planar scan.
pub const RING_MAX_RADIUS: i32 = 16;
/// Planar scan: how far up each column is probed.
pub const COLUMN_UP: i32 = 10;
/// Planar scan: how far down each column is probed.
pub const COLUMN_DOWN: i32 = 5;

// ── Landing ───────────────────────────────────────────────────────────────────

/// Which search layer produced a landing point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchLayer {
    /// The target voxel was already standable.
    Target,
    /// Local cube scan.
    Cube,
    /// Column / ring scan.
    Ring,
    /// Straight-up scan found a standable voxel.
    Column,
    /// Nothing standable: fixed point just below the ceiling.
    Ceiling,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Landing {
    pub pos:   Position,
    pub layer: SearchLayer,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Pluggable landing search.
///
/// Implementations must always return a point; "no safe spot" degrades to
/// some best effort rather than an error.
pub trait LandingResolver: Send + Sync {
    /// Find a landing point near `target` in `world`.
    fn resolve(&self, world: &dyn BlockSource, target: Position, forward: Option<Forward>) -> Landing;

    /// Resolve against a [`WorldState`], reading the forward hint from the
    /// marker block at `target`.  An unknown world returns `target` as is.
    fn resolve_location(&self, state: &WorldState, target: Location) -> Location {
        let Some(world) = state.world(target.world) else {
            debug!(world = %target.world, "landing target world not loaded; using raw target");
            return target;
        };
        let forward = forward_hint(world, target.block());
        let landing = self.resolve(world, target.pos, forward);
        debug!(
            world = %target.world,
            layer = ?landing.layer,
            x = landing.pos.x, y = landing.pos.y, z = landing.pos.z,
            "landing resolved"
        );
        Location::new(target.world, landing.pos)
    }
}

// ── LayeredResolver ───────────────────────────────────────────────────────────

/// The default search: target, cube, rings, then straight up.
#[derive(Copy, Clone, Debug, Default)]
pub struct LayeredResolver;

impl LandingResolver for LayeredResolver {
    fn resolve(&self, world: &dyn BlockSource, target: Position, forward: Option<Forward>) -> Landing {
        let origin = target.block();

        if is_standable(world, origin) {
            return Landing { pos: target, layer: SearchLayer::Target };
        }
        if let Some(pos) = cube_scan(world, target, forward) {
            return Landing { pos, layer: SearchLayer::Cube };
        }
        debug!(x = origin.x, y = origin.y, z = origin.z, "cube scan empty; trying rings");
        if let Some(pos) = ring_scan(world, origin) {
            return Landing { pos, layer: SearchLayer::Ring };
        }
        debug!(x = origin.x, y = origin.y, z = origin.z, "ring scan empty; scanning upward");
        match scan_up(world, origin) {
            Some(pos) => Landing { pos, layer: SearchLayer::Column },
            None => Landing {
                pos:   BlockPos::new(origin.x, world.max_y() - 2, origin.z).standing_point(),
                layer: SearchLayer::Ceiling,
            },
        }
    }
}

// ── Layers ────────────────────────────────────────────────────────────────────

/// Shells of Chebyshev radius 1..=2 around the target.  Collection stops at
/// [`MAX_CANDIDATES`]; whatever has been gathered by then is scored.
fn cube_scan(world: &dyn BlockSource, target: Position, forward: Option<Forward>) -> Option<Position> {
    let origin = target.block();
    let mut candidates = Vec::with_capacity(MAX_CANDIDATES);

    'shells: for layer in 1..=LOCAL_CUBE_RADIUS {
        for dx in -layer..=layer {
            for dy in -layer..=layer {
                for dz in -layer..=layer {
                    if dx.abs().max(dy.abs()).max(dz.abs()) != layer {
                        continue;
                    }
                    let pos = origin.offset(dx, dy, dz);
                    if is_standable(world, pos) {
                        candidates.push(pos.standing_point());
                        if candidates.len() >= MAX_CANDIDATES {
                            break 'shells;
                        }
                    }
                }
            }
        }
    }

    match forward {
        Some(f) => choose_weighted(target, &candidates, f),
        None => choose_by_distance(target, &candidates),
    }
}

/// The target column first, then the boundary cells of square rings
/// 1..=[`RING_MAX_RADIUS`].  First hit wins.
fn ring_scan(world: &dyn BlockSource, origin: BlockPos) -> Option<Position> {
    if let Some(hit) = probe_column(world, origin) {
        return Some(hit);
    }
    for radius in 1..=RING_MAX_RADIUS {
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                if dx.abs() != radius && dz.abs() != radius {
                    continue;
                }
                if let Some(hit) = probe_column(world, origin.offset(dx, 0, dz)) {
                    return Some(hit);
                }
            }
        }
    }
    None
}

/// Up to [`COLUMN_UP`] voxels upward from `start` (inclusive), then up to
/// [`COLUMN_DOWN`] downward (exclusive of the lower bound).
fn probe_column(world: &dyn BlockSource, start: BlockPos) -> Option<Position> {
    let top = (world.max_y() - 1).min(start.y.saturating_add(COLUMN_UP));
    let bottom = world.min_y().max(start.y.saturating_sub(COLUMN_DOWN));

    let up = (start.y..top).map(|y| BlockPos::new(start.x, y, start.z));
    let down = (bottom + 1..start.y).rev().map(|y| BlockPos::new(start.x, y, start.z));
    up.chain(down)
        .find(|&pos| is_standable(world, pos))
        .map(BlockPos::standing_point)
}

fn scan_up(world: &dyn BlockSource, origin: BlockPos) -> Option<Position> {
    (origin.y..world.max_y() - 1)
        .map(|y| BlockPos::new(origin.x, y, origin.z))
        .find(|&pos| is_standable(world, pos))
        .map(BlockPos::standing_point)
}
