//! Unit tests for wg-landing.

use wg_core::{BlockPos, Facing, Forward, Location, Position, WorldId};
use wg_world::{BlockKind, VoxelWorld, WorldState};

use crate::{LandingResolver, LayeredResolver, SearchLayer};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// All-air world with the chunks around the origin loaded.
fn empty_world(min_y: i32, max_y: i32) -> VoxelWorld {
    let mut w = VoxelWorld::new(WorldId(0), "world", min_y, max_y);
    for cx in -2..=1 {
        for cz in -2..=1 {
            w.load_chunk(cx, cz);
        }
    }
    w
}

fn solid(w: &mut VoxelWorld, a: (i32, i32, i32), b: (i32, i32, i32)) {
    w.fill(BlockPos::new(a.0, a.1, a.2), BlockPos::new(b.0, b.1, b.2), BlockKind::Solid)
        .unwrap();
}

fn air(w: &mut VoxelWorld, a: (i32, i32, i32), b: (i32, i32, i32)) {
    w.fill(BlockPos::new(a.0, a.1, a.2), BlockPos::new(b.0, b.1, b.2), BlockKind::Air)
        .unwrap();
}

/// A target hovering over nothing, with exactly two footholds: one step east
/// and one step west.
fn two_footholds() -> VoxelWorld {
    let mut w = empty_world(-64, 320);
    solid(&mut w, (1, 63, 0), (1, 63, 0));
    solid(&mut w, (-1, 63, 0), (-1, 63, 0));
    w
}

fn centre(x: i32, y: i32, z: i32) -> Position {
    BlockPos::new(x, y, z).standing_point()
}

const TARGET: Position = Position::new(0.5, 64.0, 0.5);

// ── Direct hit ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod target {
    use super::*;

    #[test]
    fn standable_target_returned_unchanged() {
        let mut w = empty_world(-64, 320);
        solid(&mut w, (-3, 63, -3), (3, 63, 3));
        let odd = Position::new(0.31, 64.0, 0.77);
        let landing = LayeredResolver.resolve(&w, odd, None);
        assert_eq!(landing.layer, SearchLayer::Target);
        assert_eq!(landing.pos, odd);
    }

    #[test]
    fn standable_target_ignores_forward_hint() {
        let mut w = empty_world(-64, 320);
        solid(&mut w, (-3, 63, -3), (3, 63, 3));
        let f = Forward::new(1.0, 0.0).unwrap();
        assert_eq!(LayeredResolver.resolve(&w, TARGET, Some(f)).pos, TARGET);
    }
}

// ── Cube scan ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cube {
    use super::*;

    #[test]
    fn forward_hint_prefers_candidate_ahead() {
        let w = two_footholds();
        let east = Forward::new(1.0, 0.0).unwrap();
        let west = Forward::new(-1.0, 0.0).unwrap();

        let l = LayeredResolver.resolve(&w, TARGET, Some(east));
        assert_eq!(l.layer, SearchLayer::Cube);
        assert_eq!(l.pos, centre(1, 64, 0));

        let l = LayeredResolver.resolve(&w, TARGET, Some(west));
        assert_eq!(l.pos, centre(-1, 64, 0));
    }

    #[test]
    fn without_hint_equal_candidates_resolve_by_scan_order() {
        let w = two_footholds();
        let a = LayeredResolver.resolve(&w, TARGET, None);
        let b = LayeredResolver.resolve(&w, TARGET, None);
        assert_eq!(a, b);
        assert_eq!(a.pos, centre(-1, 64, 0));
    }

    #[test]
    fn hovering_target_drops_straight_down() {
        let mut w = empty_world(-64, 320);
        solid(&mut w, (-4, 63, -4), (4, 63, 4));
        let above = Position::new(0.5, 65.0, 0.5);
        assert_eq!(LayeredResolver.resolve(&w, above, None).pos, centre(0, 64, 0));

        let north = Forward::new(0.0, -1.0).unwrap();
        assert_eq!(LayeredResolver.resolve(&w, above, Some(north)).pos, centre(0, 64, 0));
    }

    #[test]
    fn nearest_wins_without_hint() {
        let mut w = empty_world(-64, 320);
        // Foothold two east on the same level, and one diagonally up-west.
        solid(&mut w, (2, 63, 0), (2, 63, 0));
        solid(&mut w, (-1, 64, 0), (-1, 64, 0));
        let l = LayeredResolver.resolve(&w, TARGET, None);
        assert_eq!(l.pos, centre(-1, 65, 0), "dist² 2 beats dist² 4");
    }

    #[test]
    fn marker_axis_wins_over_a_nearer_side_foothold() {
        let mut w = empty_world(-64, 320);
        solid(&mut w, (2, 63, 0), (2, 63, 0));
        solid(&mut w, (0, 63, -1), (0, 63, -1));
        let east = Forward::new(1.0, 0.0).unwrap();
        let l = LayeredResolver.resolve(&w, TARGET, Some(east));
        assert_eq!(l.pos, centre(2, 64, 0));
        assert_eq!(LayeredResolver.resolve(&w, TARGET, None).pos, centre(0, 64, -1));
    }

    #[test]
    fn hazards_are_skipped() {
        let mut w = two_footholds();
        w.set_block(BlockPos::new(1, 63, 0), BlockKind::Magma).unwrap();
        let east = Forward::new(1.0, 0.0).unwrap();
        assert_eq!(LayeredResolver.resolve(&w, TARGET, Some(east)).pos, centre(-1, 64, 0));
    }

    #[test]
    fn never_lands_in_a_low_ceiling_gap() {
        let mut w = two_footholds();
        w.set_block(BlockPos::new(-1, 65, 0), BlockKind::Solid).unwrap();
        let l = LayeredResolver.resolve(&w, TARGET, None);
        assert_eq!(l.pos, centre(1, 64, 0));
    }
}

// ── Ring scan and fallbacks ───────────────────────────────────────────────────

#[cfg(test)]
mod rings {
    use super::*;

    #[test]
    fn enclosed_target_climbs_own_column_first() {
        let mut w = empty_world(-64, 320);
        solid(&mut w, (-8, 50, -8), (8, 90, 8));
        // Shaft above the target opening at y=68, out of cube reach.
        air(&mut w, (0, 68, 0), (0, 90, 0));
        let l = LayeredResolver.resolve(&w, TARGET, None);
        assert_eq!(l.layer, SearchLayer::Ring);
        assert_eq!(l.pos, centre(0, 68, 0));
    }

    #[test]
    fn pocket_found_on_outer_ring() {
        let mut w = empty_world(-64, 320);
        solid(&mut w, (-8, 50, -8), (8, 90, 8));
        air(&mut w, (3, 64, 0), (3, 65, 0));
        let l = LayeredResolver.resolve(&w, TARGET, None);
        assert_eq!(l.layer, SearchLayer::Ring);
        assert_eq!(l.pos, centre(3, 64, 0));
    }

    #[test]
    fn pocket_below_within_five() {
        let mut w = empty_world(-64, 320);
        solid(&mut w, (-8, 40, -8), (8, 90, 8));
        air(&mut w, (4, 60, 4), (4, 61, 4));
        let l = LayeredResolver.resolve(&w, TARGET, None);
        assert_eq!(l.pos, centre(4, 60, 4));
    }

    #[test]
    fn pocket_five_below_is_out_of_window() {
        let mut w = empty_world(-64, 320);
        solid(&mut w, (-20, 0, -20), (20, 100, 20));
        air(&mut w, (4, 59, 4), (4, 60, 4));
        let l = LayeredResolver.resolve(&w, TARGET, None);
        assert_eq!(l.layer, SearchLayer::Column);
        assert_eq!(l.pos, centre(0, 101, 0));
    }

    #[test]
    fn solid_mass_falls_back_to_column_scan() {
        let mut w = empty_world(-64, 128);
        solid(&mut w, (-20, 50, -20), (20, 80, 20));
        let l = LayeredResolver.resolve(&w, TARGET, None);
        assert_eq!(l.layer, SearchLayer::Column);
        assert_eq!(l.pos, centre(0, 81, 0));
    }

    #[test]
    fn nothing_standable_returns_below_ceiling() {
        let mut w = empty_world(0, 32);
        solid(&mut w, (-20, 0, -20), (20, 31, 20));
        let l = LayeredResolver.resolve(&w, Position::new(0.5, 10.0, 0.5), None);
        assert_eq!(l.layer, SearchLayer::Ceiling);
        assert_eq!(l.pos, centre(0, 30, 0));
    }

    #[test]
    fn unloaded_area_degrades_without_panicking() {
        let w = VoxelWorld::new(WorldId(0), "void", 0, 64);
        let l = LayeredResolver.resolve(&w, Position::new(500.5, 10.0, 500.5), None);
        assert_eq!(l.layer, SearchLayer::Ceiling);
        assert_eq!(l.pos, centre(500, 62, 500));
    }

    #[test]
    fn far_away_target_degrades_without_panicking() {
        let w = empty_world(0, 64);
        let l = LayeredResolver.resolve(&w, Position::new(1.0e10, 10.0, 0.5), None);
        assert_eq!(l.layer, SearchLayer::Ceiling);
        assert_eq!(l.pos, centre(i32::MAX, 62, 0));

        let east = Forward::new(1.0, 0.0).unwrap();
        let l = LayeredResolver.resolve(&w, Position::new(-1.0e10, 10.0, 1.0e10), Some(east));
        assert_eq!(l.pos, centre(i32::MIN, 62, i32::MAX));
    }
}

// ── Against WorldState ────────────────────────────────────────────────────────

#[cfg(test)]
mod state {
    use super::*;

    fn state_with(w: VoxelWorld) -> WorldState {
        let mut s = WorldState::new();
        s.add_world(w);
        s
    }

    #[test]
    fn unknown_world_returns_target() {
        let s = state_with(two_footholds());
        let target = Location::new(WorldId(7), TARGET);
        assert_eq!(LayeredResolver.resolve_location(&s, target), target);
    }

    #[test]
    fn wall_sign_at_target_supplies_forward() {
        for (facing, expect) in [(Facing::East, centre(1, 64, 0)), (Facing::West, centre(-1, 64, 0))] {
            let mut w = two_footholds();
            w.set_block(BlockPos::new(0, 64, 0), BlockKind::WallSign(facing)).unwrap();
            let s = state_with(w);
            let got = LayeredResolver.resolve_location(&s, Location::new(WorldId(0), TARGET));
            assert_eq!(got, Location::new(WorldId(0), expect), "{facing:?}");
        }
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scoring {
    use super::*;
    use crate::{choose_by_distance, choose_weighted};

    const BASE: Position = Position::new(0.0, 0.0, 0.0);

    #[test]
    fn empty_candidate_list() {
        let f = Forward::new(0.0, 1.0).unwrap();
        assert!(choose_weighted(BASE, &[], f).is_none());
        assert!(choose_by_distance(BASE, &[]).is_none());
    }

    #[test]
    fn forward_bonus_outweighs_a_little_distance() {
        let east = Forward::new(1.0, 0.0).unwrap();
        let ahead = Position::new(2.0, 0.0, 0.0); // 4 × 0.6 = 2.4
        let side = Position::new(0.0, 0.0, 1.6); // 2.56 × 1.0
        let behind = Position::new(-1.5, 0.0, 0.0); // 2.25 × 1.8
        assert_eq!(choose_weighted(BASE, &[side, behind, ahead], east), Some(ahead));
        assert_eq!(choose_by_distance(BASE, &[side, behind, ahead]), Some(behind));
    }

    #[test]
    fn on_axis_beats_a_cheaper_side_step() {
        let east = Forward::new(1.0, 0.0).unwrap();
        let side = Position::new(0.0, 0.0, 1.0); // lateral 1, cost 1.0
        let ahead = Position::new(2.0, 0.0, 0.0); // lateral 0, cost 4 × 0.6 = 2.4
        assert_eq!(choose_weighted(BASE, &[side, ahead], east), Some(ahead));
        assert_eq!(choose_weighted(BASE, &[ahead, side], east), Some(ahead));
    }

    #[test]
    fn equal_lateral_goes_to_lower_cost() {
        let east = Forward::new(1.0, 0.0).unwrap();
        // Both sit one block off the axis; the diagonal also gains a forward
        // discount (cost ≈ 1.434 against 2.0).
        let diag = Position::new(1.0, 0.0, 1.0);
        let raised_side = Position::new(0.0, 1.0, 1.0);
        assert_eq!(choose_weighted(BASE, &[raised_side, diag], east), Some(diag));

        let near = Position::new(1.0, 0.0, 0.0);
        let far = Position::new(2.0, 0.0, 0.0);
        assert_eq!(choose_weighted(BASE, &[far, near], east), Some(near));
    }

    #[test]
    fn plain_tie_breaks_on_height() {
        let flat = Position::new(1.0, 0.0, 1.0); // dist² 2, dy 0
        let up = Position::new(1.0, 1.0, 0.0); // dist² 2, dy 1
        assert_eq!(choose_by_distance(BASE, &[up, flat]), Some(flat));

        let level = Position::new(2.0, 0.0, 0.0);
        let raised = Position::new(0.0, 2.0, 0.0);
        assert_eq!(choose_by_distance(BASE, &[raised, level]), Some(level));
    }
}
