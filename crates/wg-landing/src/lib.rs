//! `wg-landing` — find a spot where a teleported entity can actually stand.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`resolver`] | `LandingResolver` trait, `LayeredResolver`, `Landing`      |
//! | [`scoring`]  | candidate selection (direction-weighted and plain distance) |
//!
//! # Search layers
//!
//! [`LayeredResolver`] tries, in order, and stops at the first hit:
//!
//! 1. the target voxel itself;
//! 2. a 5×5×5 cube around the target, shell by shell, scoring up to
//!    [`MAX_CANDIDATES`] standable voxels;
//! 3. the target column, then square rings of radius 1..=[`RING_MAX_RADIUS`],
//!    probing a short vertical window in each column;
//! 4. straight up to the ceiling, and failing that a point just below it.
//!
//! The search never fails.  Unreadable voxels (unloaded chunks) count as
//! non-standable, so a partially loaded area simply pushes the search to the
//! next layer.

pub mod resolver;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use resolver::{
    COLUMN_DOWN, COLUMN_UP, LOCAL_CUBE_RADIUS, Landing, LandingResolver, LayeredResolver,
    MAX_CANDIDATES, RING_MAX_RADIUS, SearchLayer,
};
pub use scoring::{BACK_PENALTY, FORWARD_BONUS, MIN_WEIGHT, choose_by_distance, choose_weighted};
