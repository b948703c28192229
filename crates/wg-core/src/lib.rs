//! `wg-core` — foundational types for the `warpgate` teleport framework.
//!
//! This crate is a dependency of every other `wg-*` crate.  It has no `wg-*`
//! dependencies and minimal external ones (`serde`, `serde_json`, `thiserror`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `EntityId`, `AccountId`, `WorldId`                    |
//! | [`geo`]         | `BlockPos`, `Position`, `Location`, `Facing`, `Forward` |
//! | [`time`]        | `Tick`, `GameClock`                                   |
//! | [`anchor`]      | `Anchor`, `WarpLike`                                  |
//! | [`config`]      | `TeleportConfig` and its sub-sections                 |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod anchor;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use anchor::{Anchor, Visibility, WarpLike};
pub use config::{CrossWorldPolicy, ResourceCost, TeleportConfig, world_display_name};
pub use error::{CoreError, CoreResult};
pub use geo::{BlockPos, Facing, Forward, Location, Position};
pub use ids::{AccountId, EntityId, WorldId};
pub use time::{GameClock, Tick};
