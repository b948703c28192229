//! In-memory history with the lookups hosts show to players.

use rustc_hash::FxHashMap;
use wg_core::AccountId;

use crate::writer::HistoryWriter;
use crate::{AnchorUses, HistoryResult, HistoryRow};

/// Rows in arrival order, optionally capped to the newest `capacity`.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    rows:     Vec<HistoryRow>,
    capacity: Option<usize>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` rows, dropping the oldest.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self { rows: Vec::new(), capacity: Some(capacity.max(1)) }
    }

    /// Seed from previously persisted rows (e.g. [`crate::read_csv`]).
    pub fn from_rows(rows: Vec<HistoryRow>) -> Self {
        Self { rows, capacity: None }
    }

    pub fn push(&mut self, row: HistoryRow) {
        self.rows.push(row);
        if let Some(cap) = self.capacity {
            if self.rows.len() > cap {
                let excess = self.rows.len() - cap;
                self.rows.drain(..excess);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The newest `n` rows, newest first.
    pub fn recent(&self, n: usize) -> Vec<HistoryRow> {
        self.rows.iter().rev().take(n).cloned().collect()
    }

    /// Every use of `anchor`, newest first.
    pub fn for_anchor(&self, anchor: &str) -> Vec<HistoryRow> {
        self.rows.iter().rev().filter(|r| r.anchor == anchor).cloned().collect()
    }

    /// Every teleport by `account`, newest first.
    pub fn for_player(&self, account: AccountId) -> Vec<HistoryRow> {
        self.rows
            .iter()
            .rev()
            .filter(|r| r.requester_account == account.0)
            .cloned()
            .collect()
    }

    /// The `n` most used anchors.  Ties go to the alphabetically first name.
    pub fn popular_anchors(&self, n: usize) -> Vec<AnchorUses> {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for r in &self.rows {
            *counts.entry(r.anchor.as_str()).or_default() += 1;
        }
        let mut ranked: Vec<AnchorUses> = counts
            .into_iter()
            .map(|(anchor, uses)| AnchorUses { anchor: anchor.to_owned(), uses })
            .collect();
        ranked.sort_unstable_by(|a, b| b.uses.cmp(&a.uses).then_with(|| a.anchor.cmp(&b.anchor)));
        ranked.truncate(n);
        ranked
    }

    pub fn cross_world_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_cross_world()).count()
    }
}

impl HistoryWriter for MemoryHistory {
    fn append(&mut self, row: &HistoryRow) -> HistoryResult<()> {
        self.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> HistoryResult<()> {
        Ok(())
    }
}
