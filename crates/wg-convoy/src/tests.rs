//! Unit tests for wg-convoy.

use wg_core::{AccountId, BlockPos, EntityId, Location, Position, WorldId};
use wg_world::{BlockKind, EntityKind, VoxelWorld, WorldState};

use crate::{ConvoyPolicy, collect};

// ── Helpers ───────────────────────────────────────────────────────────────────

const W: WorldId = WorldId(0);

fn at(x: f64, z: f64) -> Location {
    Location::new(W, Position::new(x, 64.0, z))
}

fn world() -> WorldState {
    let mut v = VoxelWorld::new(W, "world", -64, 320);
    v.fill(BlockPos::new(-32, 63, -32), BlockPos::new(32, 63, 32), BlockKind::Solid)
        .unwrap();
    let mut s = WorldState::new();
    s.add_world(v);
    s
}

fn player(s: &mut WorldState) -> EntityId {
    s.spawn_player("alex", AccountId(1), at(0.5, 0.5)).unwrap()
}

fn creature(s: &mut WorldState, name: &str, x: f64, z: f64) -> EntityId {
    s.spawn(EntityKind::Creature, name, at(x, z)).unwrap()
}

/// `len` creatures in a line, each leashed to the previous, the first to
/// `head`.
fn chain(s: &mut WorldState, head: EntityId, len: usize) -> Vec<EntityId> {
    let mut out = Vec::with_capacity(len);
    let mut holder = head;
    for i in 0..len {
        let c = creature(s, "goat", 1.5 + i as f64, 0.5);
        s.leash(c, holder).unwrap();
        out.push(c);
        holder = c;
    }
    out
}

fn recursive(max_depth: u32) -> ConvoyPolicy {
    ConvoyPolicy { recursive: true, max_depth }
}

// ── Leash traversal ───────────────────────────────────────────────────────────

#[cfg(test)]
mod leashes {
    use super::*;
    use crate::ConvoyMember;

    #[test]
    fn no_followers_is_empty() {
        let mut s = world();
        let p = player(&mut s);
        let snap = collect(&s, p, &ConvoyPolicy::default()).unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.vehicle, None);
        assert_eq!(snap.boat, None);
        assert!(!snap.depth_capped);
    }

    #[test]
    fn chain_of_six_capped_at_five() {
        let mut s = world();
        let p = player(&mut s);
        let goats = chain(&mut s, p, 6);

        let snap = collect(&s, p, &recursive(5)).unwrap();
        assert_eq!(snap.len(), 5);
        assert!(snap.depth_capped);
        assert_eq!(snap.max_depth_reached, 5);
        assert!(!snap.contains(goats[5]));
        for pair in goats[..5].windows(2) {
            assert!(snap.members.contains(&ConvoyMember { id: pair[1], holder: pair[0] }));
        }
    }

    #[test]
    fn short_chain_is_not_capped() {
        let mut s = world();
        let p = player(&mut s);
        chain(&mut s, p, 3);
        let snap = collect(&s, p, &recursive(5)).unwrap();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.max_depth_reached, 3);
        assert!(!snap.depth_capped);
    }

    #[test]
    fn non_recursive_takes_direct_followers_only() {
        let mut s = world();
        let p = player(&mut s);
        let goats = chain(&mut s, p, 3);
        let wolf = creature(&mut s, "wolf", 0.5, 2.5);
        s.leash(wolf, p).unwrap();

        let policy = ConvoyPolicy { recursive: false, max_depth: 5 };
        let snap = collect(&s, p, &policy).unwrap();
        let mut ids: Vec<_> = snap.member_ids().collect();
        ids.sort();
        assert_eq!(ids, vec![goats[0], wolf]);
        assert!(!snap.depth_capped);
    }

    #[test]
    fn subject_never_listed() {
        let mut s = world();
        let p = player(&mut s);
        chain(&mut s, p, 2);
        let snap = collect(&s, p, &recursive(5)).unwrap();
        assert!(!snap.contains(p));
    }

    #[test]
    fn other_holders_ignored() {
        let mut s = world();
        let p = player(&mut s);
        let q = s.spawn_player("sam", AccountId(2), at(3.5, 3.5)).unwrap();
        let theirs = creature(&mut s, "cat", 4.5, 3.5);
        s.leash(theirs, q).unwrap();
        let snap = collect(&s, p, &recursive(5)).unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn unknown_subject_is_an_error() {
        let s = world();
        assert!(collect(&s, EntityId(42), &ConvoyPolicy::default()).is_err());
    }
}

// ── Mounts ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod mounts {
    use super::*;

    #[test]
    fn followers_of_the_mount_come_along() {
        let mut s = world();
        let p = player(&mut s);
        let horse = s.spawn(EntityKind::Mount, "horse", at(0.5, 0.5)).unwrap();
        s.mount(p, horse).unwrap();
        let mule = creature(&mut s, "mule", 2.5, 0.5);
        s.leash(mule, horse).unwrap();

        let snap = collect(&s, p, &recursive(5)).unwrap();
        assert_eq!(snap.vehicle, Some(horse));
        assert!(snap.contains(mule));
        assert!(!snap.contains(horse));
        assert_eq!(snap.members[0].holder, horse);
    }

    #[test]
    fn mount_in_a_cycle_is_not_a_member() {
        let mut s = world();
        let p = player(&mut s);
        let horse = s.spawn(EntityKind::Mount, "horse", at(0.5, 0.5)).unwrap();
        s.mount(p, horse).unwrap();
        let wolf = creature(&mut s, "wolf", 1.5, 0.5);
        s.leash(wolf, p).unwrap();
        s.leash(horse, wolf).unwrap();

        let snap = collect(&s, p, &recursive(5)).unwrap();
        assert_eq!(snap.member_ids().collect::<Vec<_>>(), vec![wolf]);
    }

    #[test]
    fn non_recursive_includes_mount_followers() {
        let mut s = world();
        let p = player(&mut s);
        let horse = s.spawn(EntityKind::Mount, "horse", at(0.5, 0.5)).unwrap();
        s.mount(p, horse).unwrap();
        let mule = creature(&mut s, "mule", 2.5, 0.5);
        s.leash(mule, horse).unwrap();

        let snap = collect(&s, p, &ConvoyPolicy { recursive: false, max_depth: 5 }).unwrap();
        assert!(snap.contains(mule));
    }
}

// ── Boats ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod boats {
    use super::*;

    fn boat(s: &mut WorldState, x: f64, z: f64) -> EntityId {
        s.spawn(EntityKind::Boat, "boat", at(x, z)).unwrap()
    }

    #[test]
    fn boat_with_creature_passenger_is_marked() {
        let mut s = world();
        let p = player(&mut s);
        let b = boat(&mut s, 3.5, 0.5);
        let sheep = creature(&mut s, "sheep", 3.5, 0.5);
        s.mount(sheep, b).unwrap();

        let snap = collect(&s, p, &ConvoyPolicy::default()).unwrap();
        assert_eq!(snap.boat, Some(b));
    }

    #[test]
    fn empty_or_player_only_boat_is_left() {
        let mut s = world();
        let p = player(&mut s);
        let b1 = boat(&mut s, 3.5, 0.5);
        let _b2 = boat(&mut s, -3.5, 0.5);
        let q = s.spawn_player("sam", AccountId(2), at(3.5, 0.5)).unwrap();
        s.mount(q, b1).unwrap();

        let snap = collect(&s, p, &ConvoyPolicy::default()).unwrap();
        assert_eq!(snap.boat, None);
    }

    #[test]
    fn boat_near_a_follower_is_towed() {
        let mut s = world();
        let p = player(&mut s);
        let wolf = creature(&mut s, "wolf", 2.5, 0.5);
        s.leash(wolf, p).unwrap();
        let b = boat(&mut s, 4.5, 0.5);

        let snap = collect(&s, p, &ConvoyPolicy::default()).unwrap();
        assert_eq!(snap.boat, Some(b));
    }

    #[test]
    fn leashed_boat_is_marked() {
        let mut s = world();
        let p = player(&mut s);
        let b = boat(&mut s, -4.0, 0.5);
        s.leash(b, p).unwrap();

        let snap = collect(&s, p, &ConvoyPolicy::default()).unwrap();
        assert!(snap.contains(b));
        assert_eq!(snap.boat, Some(b));
    }

    #[test]
    fn nearest_qualifying_boat_wins() {
        let mut s = world();
        let p = player(&mut s);
        let far = boat(&mut s, 4.5, 0.5);
        let near = boat(&mut s, -1.5, 0.5);
        for b in [far, near] {
            let c = creature(&mut s, "pig", 0.0, 0.0);
            s.mount(c, b).unwrap();
        }

        let snap = collect(&s, p, &ConvoyPolicy::default()).unwrap();
        assert_eq!(snap.boat, Some(near));
    }

    #[test]
    fn boat_outside_scan_radius_is_ignored() {
        let mut s = world();
        let p = player(&mut s);
        let b = boat(&mut s, 8.5, 0.5);
        let sheep = creature(&mut s, "sheep", 8.5, 0.5);
        s.mount(sheep, b).unwrap();

        let snap = collect(&s, p, &ConvoyPolicy::default()).unwrap();
        assert_eq!(snap.boat, None);
    }
}
