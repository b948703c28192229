//! `wg-convoy` — who travels with a teleporting entity.
//!
//! # Crate layout
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | [`snapshot`] | `ConvoySnapshot`, `ConvoyMember`, `ConvoyPolicy`    |
//! | [`collect`]  | `collect` — leash traversal and boat detection      |
//!
//! A convoy is computed once, when a teleport is scheduled, and never
//! updated afterwards.  Entities that wander into a leash chain during the
//! delay stay behind.

pub mod collect;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use collect::{BOAT_SCAN_RADIUS, BOAT_TOW_DISTANCE, LEASH_SCAN_RADIUS, collect};
pub use snapshot::{ConvoyMember, ConvoyPolicy, ConvoySnapshot};
