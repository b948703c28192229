//! `wg-world` — the slice of world state the teleport core reads and mutates.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`block`]   | `BlockKind` — passable / hazardous classification             |
//! | [`voxel`]   | `VoxelWorld` (16×16 chunk columns), `BlockSource` trait        |
//! | [`probe`]   | `is_standable`, `forward_hint`                                |
//! | [`entity`]  | `Entity`, `EntityKind`                                        |
//! | [`store`]   | `EntityStore` (slot `Vec` + per-world R-tree)                 |
//! | [`state`]   | `WorldState` — worlds + entities + relation bookkeeping       |
//! | [`error`]   | `WorldError`, `WorldResult<T>`                                |
//!
//! # Entity relation rules
//!
//! The mutation API enforces the same physical rules the host game does, so
//! the orchestrator has to deal with them the same way:
//!
//! - an entity carrying passengers cannot be teleported;
//! - teleporting a rider dismounts it;
//! - a leash whose two ends end up more than [`LEASH_BREAK_DISTANCE`] apart
//!   (or in different worlds) snaps and drops a lead item.

pub mod block;
pub mod entity;
pub mod error;
pub mod probe;
pub mod state;
pub mod store;
pub mod voxel;


pub use block::BlockKind;
pub use entity::{Entity, EntityKind};
pub use error::{WorldError, WorldResult};
pub use probe::{forward_hint, is_standable};
pub use state::{LEASH_BREAK_DISTANCE, WorldState};
pub use store::EntityStore;
pub use voxel::{BlockSource, CHUNK_WIDTH, VoxelWorld};
