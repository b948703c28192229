//! `wg-teleport` — delayed, cancellable teleports to named anchors.
//!
//! # Request lifecycle
//!
//! ```text
//! request(subject, "anchor")
//!   validate   — subject, anchor, permission, visibility, cooldown,
//!                destination world, cross-world policy, balance
//!   escrow     — debit the use cost into the escrow ledger
//!   snapshot   — collect the convoy (leash chains, vehicle, boat)
//!   schedule   — arm a Fire task at now + delay
//!
//! each tick, until Fire:
//!   moved / died / disconnected / cancel → refund escrow, disarm timer
//!
//! Fire:
//!   re-check permission and visibility   → refund on failure
//!   resolve landing, move convoy + subject, schedule remount and
//!   leash restore, consume escrow, start cooldown, record history
//! ```
//!
//! # Crate layout
//!
//! | Module           | Contents                                             |
//! |------------------|------------------------------------------------------|
//! | [`orchestrator`] | `Orchestrator` — the tick loop and state machine     |
//! | [`builder`]      | `OrchestratorBuilder`                                |
//! | [`handle`]       | `TeleportHandle`, `Command`, `SubjectEvent`          |
//! | [`pending`]      | `PendingTeleport`, `TeleportState`, `CancelReason`   |
//! | [`queue`]        | `TaskQueue`, `Task`                                  |
//! | [`ledger`]       | `CooldownLedger`, `EscrowLedger`                     |
//! | [`collab`]       | collaborator traits and in-memory implementations   |
//! | [`policy`]       | `AnchorPolicy` — create and destroy gates            |
//! | [`error`]        | `TeleportError`, `TeleportResult`                    |

pub mod builder;
pub mod collab;
pub mod error;
pub mod handle;
pub mod ledger;
pub mod orchestrator;
pub mod pending;
pub mod policy;
pub mod queue;


pub use builder::OrchestratorBuilder;
pub use collab::{
    AnchorDirectory, Feedback, HistoryRecorder, MemoryAnchors, MemoryBank, NoHistory,
    NoopFeedback, PermissionTable, Permissions, ResourceBank,
};
pub use error::{TeleportError, TeleportResult};
pub use handle::{Command, SubjectEvent, TeleportHandle};
pub use ledger::{CooldownLedger, EscrowEntry, EscrowLedger};
pub use orchestrator::{
    LEAD_SWEEP_RADIUS, LEASH_RESTORE_DELAY_TICKS, LEASH_RESTORE_DISTANCE, Orchestrator,
    REMOUNT_DELAY_TICKS,
};
pub use pending::{CancelReason, PendingTeleport, TeleportRecord, TeleportState};
pub use policy::AnchorPolicy;
pub use queue::{Task, TaskQueue};
