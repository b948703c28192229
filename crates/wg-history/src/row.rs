//! The persisted shape of one completed teleport.

use serde::{Deserialize, Serialize};
use wg_core::AccountId;
use wg_teleport::TeleportRecord;

/// One history entry.  Column order is the CSV header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub requester:         String,
    pub requester_account: u64,
    pub anchor:            String,
    pub from_world:        String,
    pub to_world:          String,
    pub at_unix_secs:      i64,
}

impl HistoryRow {
    #[inline]
    pub fn is_cross_world(&self) -> bool {
        self.from_world != self.to_world
    }

    #[inline]
    pub fn account(&self) -> AccountId {
        AccountId(self.requester_account)
    }
}

impl From<&TeleportRecord> for HistoryRow {
    fn from(r: &TeleportRecord) -> Self {
        Self {
            requester:         r.requester.clone(),
            requester_account: r.requester_account.0,
            anchor:            r.anchor.clone(),
            from_world:        r.from_world.clone(),
            to_world:          r.to_world.clone(),
            at_unix_secs:      r.at_unix_secs,
        }
    }
}

/// An anchor and how often it was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorUses {
    pub anchor: String,
    pub uses:   usize,
}
