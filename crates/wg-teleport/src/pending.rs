//! Per-request records and the state-machine vocabulary.

use std::fmt;

use wg_convoy::ConvoySnapshot;
use wg_core::{AccountId, Anchor, EntityId, Location, Tick};

use crate::EscrowEntry;

/// Where a subject's latest request stands.
///
/// ```text
/// Idle → Requested → Escrowed → Scheduled → { Cancelled | Expired }
/// ```
///
/// `Requested` and `Escrowed` only exist inside one call to
/// `Orchestrator::request`; a rejected request leaves the subject `Idle`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TeleportState {
    Idle,
    Requested,
    Escrowed,
    Scheduled,
    Cancelled,
    Expired,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// The subject left its starting voxel.
    Moved,
    Died,
    Disconnected,
    /// A newer request replaced this one.
    Superseded,
    /// Explicit cancel.
    Requested,
    /// The subject lost access to the anchor during the warm-up.
    AccessRevoked,
    /// The jump itself failed.
    Failed,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CancelReason::Moved         => "moved",
            CancelReason::Died          => "died",
            CancelReason::Disconnected  => "disconnected",
            CancelReason::Superseded    => "superseded by a new request",
            CancelReason::Requested     => "cancelled",
            CancelReason::AccessRevoked => "access revoked",
            CancelReason::Failed        => "teleport failed",
        };
        f.write_str(s)
    }
}

/// A scheduled teleport.  Everything here is frozen at schedule time.
#[derive(Clone, Debug)]
pub struct PendingTeleport {
    pub subject:      EntityId,
    pub account:      AccountId,
    pub subject_name: String,
    /// Copy of the anchor as it was when the request was accepted.
    pub anchor:       Anchor,
    /// Where the subject stood; leaving this voxel cancels.
    pub origin:       Location,
    pub fire_at:      Tick,
    pub escrow:       Option<EscrowEntry>,
    pub convoy:       ConvoySnapshot,
}

impl PendingTeleport {
    #[inline]
    pub fn destination(&self) -> Location {
        self.anchor.location
    }
}

/// What the history collaborator receives for each completed teleport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeleportRecord {
    pub requester:         String,
    pub requester_account: AccountId,
    pub anchor:            String,
    pub from_world:        String,
    pub to_world:          String,
    /// Unix seconds at completion.
    pub at_unix_secs:      i64,
}
