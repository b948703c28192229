//! Per-subject cooldown and escrow tables.
//!
//! Both are `Arc<Mutex<FxHashMap<..>>>` so a [`TeleportHandle`] on another
//! thread can read them.  Only the orchestrator writes.
//!
//! [`TeleportHandle`]: crate::TeleportHandle

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use wg_core::{EntityId, Tick};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Cooldowns ─────────────────────────────────────────────────────────────────

/// Subject → first tick at which a new request is accepted.
#[derive(Clone, Default)]
pub struct CooldownLedger {
    inner: Arc<Mutex<FxHashMap<EntityId, Tick>>>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, subject: EntityId, until: Tick) {
        lock(&self.inner).insert(subject, until);
    }

    /// Ticks left on `subject`'s cooldown at `now`.  An expired entry is
    /// removed on the spot and reported as `None`.
    pub fn remaining(&self, subject: EntityId, now: Tick) -> Option<u64> {
        let mut map = lock(&self.inner);
        let until = *map.get(&subject)?;
        if until > now {
            Some(until.since(now))
        } else {
            map.remove(&subject);
            None
        }
    }

    /// Like [`remaining`](Self::remaining) but never touches the table, for
    /// readers that are not the orchestrator.
    pub fn peek(&self, subject: EntityId, now: Tick) -> Option<u64> {
        let until = *lock(&self.inner).get(&subject)?;
        (until > now).then(|| until.since(now))
    }

    pub fn clear(&self, subject: EntityId) -> bool {
        lock(&self.inner).remove(&subject).is_some()
    }

    /// Drop every entry that has expired by `now`.  Returns how many went.
    pub fn sweep(&self, now: Tick) -> usize {
        let mut map = lock(&self.inner);
        let before = map.len();
        map.retain(|_, until| *until > now);
        before - map.len()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Escrow ────────────────────────────────────────────────────────────────────

/// A debited amount awaiting settlement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowEntry {
    pub item:   String,
    pub amount: u32,
}

/// Subject → debited-but-unsettled cost.  At most one entry per subject.
#[derive(Clone, Default)]
pub struct EscrowLedger {
    inner: Arc<Mutex<FxHashMap<EntityId, EscrowEntry>>>,
}

impl EscrowLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a debit.  Returns the entry it displaced, which the caller
    /// must settle.
    #[must_use = "a displaced escrow entry has to be refunded"]
    pub fn hold(&self, subject: EntityId, entry: EscrowEntry) -> Option<EscrowEntry> {
        lock(&self.inner).insert(subject, entry)
    }

    /// Remove and return `subject`'s entry, for refund or consumption.
    pub fn take(&self, subject: EntityId) -> Option<EscrowEntry> {
        lock(&self.inner).remove(&subject)
    }

    pub fn get(&self, subject: EntityId) -> Option<EscrowEntry> {
        lock(&self.inner).get(&subject).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
