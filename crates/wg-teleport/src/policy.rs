//! Gates for creating and removing anchors.
//!
//! The persistence layer owns anchors; it asks here before writing.

use tracing::debug;
use wg_core::{AccountId, Anchor, EntityId, ResourceCost, TeleportConfig, Visibility};

use crate::{AnchorDirectory, Permissions, ResourceBank, TeleportError, TeleportResult};

/// Creation limits and cost, taken from [`TeleportConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorPolicy {
    pub max_per_owner:        Option<u32>,
    pub privileged_unlimited: bool,
    pub create_cost:          ResourceCost,
    pub default_visibility:   Visibility,
}

impl From<&TeleportConfig> for AnchorPolicy {
    fn from(config: &TeleportConfig) -> Self {
        Self {
            max_per_owner:        config.max_anchors_per_owner,
            privileged_unlimited: config.privileged_unlimited_anchors,
            create_cost:          config.create_cost.clone(),
            default_visibility:   if config.default_private {
                Visibility::Private
            } else {
                Visibility::Public
            },
        }
    }
}

impl AnchorPolicy {
    /// May `account` own one more anchor?
    ///
    /// # Errors
    ///
    /// [`TeleportError::PermissionDenied`] without the create capability,
    /// [`TeleportError::AnchorLimitReached`] at the per-owner limit.
    pub fn can_create_anchor(
        &self,
        account:     AccountId,
        permissions: &dyn Permissions,
        anchors:     &dyn AnchorDirectory,
    ) -> TeleportResult<()> {
        if !permissions.can_create(account) {
            return Err(TeleportError::PermissionDenied);
        }
        let Some(limit) = self.max_per_owner else {
            return Ok(());
        };
        if self.privileged_unlimited && permissions.is_privileged(account) {
            return Ok(());
        }
        if anchors.count_owned_by(account) >= limit as usize {
            return Err(TeleportError::AnchorLimitReached { limit });
        }
        Ok(())
    }

    /// Check [`can_create_anchor`](Self::can_create_anchor), then charge the
    /// creation cost to `payer`.  Nothing is debited when a check fails.
    pub fn authorize_create(
        &self,
        payer:       EntityId,
        account:     AccountId,
        permissions: &dyn Permissions,
        anchors:     &dyn AnchorDirectory,
        bank:        &mut dyn ResourceBank,
    ) -> TeleportResult<()> {
        self.can_create_anchor(account, permissions, anchors)?;
        if let (false, Some(item)) = (self.create_cost.is_free(), &self.create_cost.item) {
            bank.debit(payer, item, self.create_cost.amount)?;
            debug!(payer = %payer, item = %item, amount = self.create_cost.amount, "anchor create cost charged");
        }
        Ok(())
    }

    /// Owners and admins may remove an anchor, given the destroy capability.
    pub fn can_destroy_anchor(&self, account: AccountId, anchor: &Anchor, permissions: &dyn Permissions) -> bool {
        permissions.can_destroy(account) && (permissions.is_admin(account) || anchor.owner == account)
    }
}
