//! Teleport anchors and the narrow capability interface used for access checks.
//!
//! Anchors are created, renamed, and deleted by the persistence layer; the
//! teleport core only ever reads them.  A `PendingTeleport` copies the
//! anchor's `Location` at schedule time, so editing an anchor never retargets
//! an in-flight teleport.

use crate::{AccountId, Location};

/// Whether an anchor may be used by anyone or only by its owner and invitees.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A named teleport destination.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    /// Unique name, as written on the portal marker.
    pub name: String,
    /// Where the target marker sits.
    pub location: Location,
    pub visibility: Visibility,
    pub owner: AccountId,
    /// Display name of the owner at creation time.
    pub owner_name: String,
    /// Unix seconds.
    pub created_at: i64,
    /// Accounts allowed to use a private anchor besides its owner.
    pub invited: Vec<AccountId>,
}

impl Anchor {
    pub fn new(name: impl Into<String>, location: Location, owner: AccountId) -> Self {
        Self {
            name: name.into(),
            location,
            visibility: Visibility::Public,
            owner,
            owner_name: String::new(),
            created_at: 0,
            invited: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn invite(&mut self, account: AccountId) {
        if account != self.owner && !self.invited.contains(&account) {
            self.invited.push(account);
        }
    }

    pub fn uninvite(&mut self, account: AccountId) {
        self.invited.retain(|&a| a != account);
    }
}

/// What the permission layer needs to know about something warp-shaped.
///
/// Implemented directly by [`Anchor`]; admin overrides live in the permission
/// collaborator, not here.
pub trait WarpLike {
    fn creator_id(&self) -> AccountId;
    fn is_private(&self) -> bool;
    /// Owner, public, or invited.
    fn can_use(&self, account: AccountId) -> bool;
}

impl WarpLike for Anchor {
    fn creator_id(&self) -> AccountId {
        self.owner
    }

    fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    fn can_use(&self, account: AccountId) -> bool {
        account == self.owner || !self.is_private() || self.invited.contains(&account)
    }
}
