//! Collaborator interfaces the orchestrator calls out to, plus simple
//! in-memory implementations for hosts that have nothing better and for
//! tests.
//!
//! | Trait              | Role                                             |
//! |--------------------|--------------------------------------------------|
//! | [`AnchorDirectory`]| look anchors up by name, count per owner         |
//! | [`Permissions`]    | capability checks                                |
//! | [`ResourceBank`]   | item balances to debit and credit                |
//! | [`Feedback`]       | fire-and-forget notifications to the subject     |
//! | [`HistoryRecorder`]| one record per completed teleport                |

use std::error::Error;
use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::{FxHashMap, FxHashSet};
use wg_core::{AccountId, Anchor, EntityId, Location, Visibility, WarpLike};

use crate::{CancelReason, TeleportError, TeleportRecord};

// ── Anchors ───────────────────────────────────────────────────────────────────

pub trait AnchorDirectory: Send {
    fn lookup_anchor(&self, name: &str) -> Option<Anchor>;
    fn count_owned_by(&self, owner: AccountId) -> usize;
}

/// Anchors in a shared map.  Clones share the same map, so a host (or a
/// test) can edit anchors while the orchestrator holds another clone.
#[derive(Clone, Default)]
pub struct MemoryAnchors {
    inner: Arc<RwLock<FxHashMap<String, Anchor>>>,
}

impl MemoryAnchors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by name.
    pub fn insert(&self, anchor: Anchor) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(anchor.name.clone(), anchor);
    }

    pub fn remove(&self, name: &str) -> Option<Anchor> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(name)
    }

    /// Flip visibility.  Returns `false` if there is no such anchor.
    pub fn set_visibility(&self, name: &str, visibility: Visibility) -> bool {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match map.get_mut(name) {
            Some(a) => {
                a.visibility = visibility;
                true
            }
            None => false,
        }
    }
}

impl AnchorDirectory for MemoryAnchors {
    fn lookup_anchor(&self, name: &str) -> Option<Anchor> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(name).cloned()
    }

    fn count_owned_by(&self, owner: AccountId) -> usize {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.values().filter(|a| a.owner == owner).count()
    }
}

// ── Permissions ───────────────────────────────────────────────────────────────

pub trait Permissions: Send {
    fn can_create(&self, account: AccountId) -> bool;
    fn can_use(&self, account: AccountId) -> bool;
    fn can_destroy(&self, account: AccountId) -> bool;
    fn is_admin(&self, account: AccountId) -> bool;
    /// Cross-world bypass and unlimited anchors.
    fn is_privileged(&self, account: AccountId) -> bool;

    /// Admin, owner, public, or invited.
    fn can_use_anchor(&self, account: AccountId, anchor: &dyn WarpLike) -> bool {
        self.is_admin(account) || anchor.can_use(account)
    }
}

/// Everyone may create, use, and destroy; nobody is admin or privileged
/// until added.
#[derive(Clone, Debug, Default)]
pub struct PermissionTable {
    pub admins:     FxHashSet<AccountId>,
    pub privileged: FxHashSet<AccountId>,
    pub banned:     FxHashSet<AccountId>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admin(mut self, account: AccountId) -> Self {
        self.admins.insert(account);
        self
    }

    pub fn with_privileged(mut self, account: AccountId) -> Self {
        self.privileged.insert(account);
        self
    }

    /// Deny every capability to `account`.
    pub fn with_banned(mut self, account: AccountId) -> Self {
        self.banned.insert(account);
        self
    }
}

impl Permissions for PermissionTable {
    fn can_create(&self, account: AccountId) -> bool {
        !self.banned.contains(&account)
    }

    fn can_use(&self, account: AccountId) -> bool {
        !self.banned.contains(&account)
    }

    fn can_destroy(&self, account: AccountId) -> bool {
        !self.banned.contains(&account)
    }

    fn is_admin(&self, account: AccountId) -> bool {
        self.admins.contains(&account)
    }

    fn is_privileged(&self, account: AccountId) -> bool {
        self.admins.contains(&account) || self.privileged.contains(&account)
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

pub trait ResourceBank: Send {
    fn balance(&self, holder: EntityId, item: &str) -> u32;

    /// Remove `amount` of `item`.
    ///
    /// # Errors
    ///
    /// [`TeleportError::InsufficientResource`] with nothing removed.
    fn debit(&mut self, holder: EntityId, item: &str, amount: u32) -> Result<(), TeleportError>;

    fn credit(&mut self, holder: EntityId, item: &str, amount: u32);
}

/// Balances in a shared map; clones see the same balances.
#[derive(Clone, Default)]
pub struct MemoryBank {
    inner: Arc<RwLock<FxHashMap<(EntityId, String), u32>>>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&self, holder: EntityId, item: &str, amount: u32) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *map.entry((holder, item.to_owned())).or_default() += amount;
    }
}

impl ResourceBank for MemoryBank {
    fn balance(&self, holder: EntityId, item: &str) -> u32 {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&(holder, item.to_owned())).copied().unwrap_or(0)
    }

    fn debit(&mut self, holder: EntityId, item: &str, amount: u32) -> Result<(), TeleportError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let held = map.get(&(holder, item.to_owned())).copied().unwrap_or(0);
        if held < amount {
            return Err(TeleportError::InsufficientResource {
                item: item.to_owned(),
                required: amount,
                held,
            });
        }
        map.insert((holder, item.to_owned()), held - amount);
        Ok(())
    }

    fn credit(&mut self, holder: EntityId, item: &str, amount: u32) {
        self.deposit(holder, item, amount);
    }
}

// ── Feedback ──────────────────────────────────────────────────────────────────

/// Notifications to the people involved.  Every method defaults to a no-op.
pub trait Feedback: Send {
    fn on_scheduled(&mut self, _subject: EntityId, _anchor: &str, _delay_secs: u64) {}

    fn on_completed(&mut self, _subject: EntityId, _anchor: &str, _landing: Location) {}

    fn on_cancelled(&mut self, _subject: EntityId, _reason: CancelReason) {}

    /// A request that arrived through a [`TeleportHandle`] was refused.
    /// Direct callers of `request` get the error as a return value instead.
    ///
    /// [`TeleportHandle`]: crate::TeleportHandle
    fn on_rejected(&mut self, _subject: EntityId, _error: &TeleportError) {}

    /// The leash chain was cut at `max_depth`; `total` entities come along.
    fn on_leash_depth_warning(&mut self, _subject: EntityId, _max_depth: u32, _total: usize) {}

    /// `follower` could not be re-tied to `holder` after the jump.
    fn on_leash_restore_failed(&mut self, _holder: EntityId, _follower: EntityId) {}
}

pub struct NoopFeedback;

impl Feedback for NoopFeedback {}

// ── History ───────────────────────────────────────────────────────────────────

pub trait HistoryRecorder: Send {
    /// Store one record.  Failures are logged by the orchestrator and never
    /// undo the teleport.
    fn record(&mut self, record: &TeleportRecord) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Discards every record.
pub struct NoHistory;

impl HistoryRecorder for NoHistory {
    fn record(&mut self, _record: &TeleportRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
