//! Leash-chain traversal and boat detection.
//!
//! # Traversal
//!
//! Breadth-first from the subject (and its vehicle, if mounted).  Each
//! frontier node is a *holder*: every entity within [`LEASH_SCAN_RADIUS`]
//! whose leash holder is that node becomes a member one level deeper.  A
//! `seen` set keeps cycles and diamonds from producing duplicates, and nodes
//! at `max_depth` are recorded but not expanded.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::debug;
use wg_core::EntityId;
use wg_world::{EntityKind, WorldError, WorldResult, WorldState};

use crate::{ConvoyMember, ConvoyPolicy, ConvoySnapshot};

/// Half-extent of the cube searched around each holder for followers.
pub const LEASH_SCAN_RADIUS: f64 = 14.0;
/// Half-extent of the cube searched around the subject for a boat.
pub const BOAT_SCAN_RADIUS: f64 = 5.0;
/// A boat this close to a convoy member counts as being towed.
pub const BOAT_TOW_DISTANCE: f64 = 3.0;

/// Snapshot the convoy of `subject`.
///
/// # Errors
///
/// [`WorldError::UnknownEntity`] if `subject` is not in the world.
pub fn collect(state: &WorldState, subject: EntityId, policy: &ConvoyPolicy) -> WorldResult<ConvoySnapshot> {
    let me = state.entity(subject).ok_or(WorldError::UnknownEntity(subject))?;
    let vehicle = me.vehicle;

    let mut seen: FxHashSet<EntityId> = FxHashSet::default();
    seen.insert(subject);
    seen.extend(vehicle);

    let mut snapshot = ConvoySnapshot { vehicle, ..ConvoySnapshot::default() };

    if policy.recursive {
        walk_chains(state, subject, vehicle, policy.max_depth, &mut seen, &mut snapshot);
    } else {
        for holder in std::iter::once(subject).chain(vehicle) {
            for follower in followers_near(state, holder) {
                if seen.insert(follower) {
                    snapshot.members.push(ConvoyMember { id: follower, holder });
                }
            }
        }
    }

    snapshot.boat = find_boat(state, subject, &snapshot);

    debug!(
        subject = %subject,
        members = snapshot.members.len(),
        depth = snapshot.max_depth_reached,
        capped = snapshot.depth_capped,
        boat = ?snapshot.boat,
        "convoy collected"
    );
    Ok(snapshot)
}

fn walk_chains(
    state:     &WorldState,
    subject:   EntityId,
    vehicle:   Option<EntityId>,
    max_depth: u32,
    seen:      &mut FxHashSet<EntityId>,
    snapshot:  &mut ConvoySnapshot,
) {
    let mut frontier: VecDeque<(EntityId, u32)> = VecDeque::new();
    frontier.push_back((subject, 0));
    if let Some(v) = vehicle {
        frontier.push_back((v, 0));
    }

    while let Some((holder, depth)) = frontier.pop_front() {
        snapshot.max_depth_reached = snapshot.max_depth_reached.max(depth);
        if depth >= max_depth {
            snapshot.depth_capped = true;
            continue;
        }
        for follower in followers_near(state, holder) {
            if seen.insert(follower) {
                snapshot.members.push(ConvoyMember { id: follower, holder });
                frontier.push_back((follower, depth + 1));
            }
        }
    }
}

/// Entities near `holder` currently leashed to it, ascending id order.
fn followers_near(state: &WorldState, holder: EntityId) -> Vec<EntityId> {
    let Some(h) = state.entity(holder) else {
        return vec![];
    };
    state
        .nearby(h.location, LEASH_SCAN_RADIUS)
        .into_iter()
        .filter(|&id| state.entity(id).is_some_and(|e| e.leash_holder == Some(holder)))
        .collect()
}

/// Nearest boat around the subject that is carrying a creature, is part of
/// the convoy, carries a convoy member, or is within towing distance of one.
fn find_boat(state: &WorldState, subject: EntityId, snapshot: &ConvoySnapshot) -> Option<EntityId> {
    let here = state.entity(subject)?.location;

    let qualifies = |id: EntityId| -> bool {
        let Some(boat) = state.entity(id) else { return false };
        let carries_creature = boat
            .passengers
            .iter()
            .any(|&p| state.entity(p).is_some_and(|e| !e.is_player()));
        let carries_member = boat.passengers.iter().any(|&p| snapshot.contains(p));
        let towed = snapshot.members.iter().any(|m| {
            state
                .entity(m.id)
                .and_then(|e| e.location.distance(boat.location))
                .is_some_and(|d| d <= BOAT_TOW_DISTANCE)
        });
        carries_creature || snapshot.contains(id) || carries_member || towed
    };

    let mut best: Option<(EntityId, f64)> = None;
    for id in state.nearby(here, BOAT_SCAN_RADIUS) {
        if Some(id) == snapshot.vehicle {
            continue;
        }
        let Some(e) = state.entity(id) else { continue };
        if e.kind != EntityKind::Boat || !qualifies(id) {
            continue;
        }
        let Some(d) = e.location.distance(here) else { continue };
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((id, d));
        }
    }
    best.map(|(id, _)| id)
}
