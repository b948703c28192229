//! Teleport policy configuration.
//!
//! Loaded from JSON by the host application.  Every field has a default so a
//! partial (or empty) document is valid; call [`TeleportConfig::validate`]
//! after loading.
//!
//! ```json
//! {
//!   "delay_secs": 5,
//!   "cooldown_secs": 5,
//!   "use_cost": { "item": "ender_pearl", "amount": 1 },
//!   "cross_world": { "enabled": false, "privileged_bypass": true }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Top-level teleport configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Warm-up between request and jump.
    pub delay_secs: u32,

    /// Minimum gap between completed teleports for one subject.
    pub cooldown_secs: u32,

    /// Host update rate used to convert seconds into ticks.
    pub ticks_per_second: u32,

    /// Deepest leash chain followed when collecting the convoy.
    pub max_leash_depth: u32,

    /// Follow leash chains beyond the subject's own followers.
    pub recursive_leash: bool,

    /// Tell the subject when the leash chain was truncated at `max_leash_depth`.
    pub leash_depth_warning: bool,

    /// Detach leashes before the jump and re-attach them afterwards.
    pub preserve_leash_connections: bool,

    pub cross_world: CrossWorldPolicy,

    /// Charged when a teleport is requested; refunded on cancellation.
    pub use_cost: ResourceCost,

    /// Charged when an anchor is created.
    pub create_cost: ResourceCost,

    /// Anchors one owner may hold.  `None` means unlimited.
    pub max_anchors_per_owner: Option<u32>,

    /// Privileged owners ignore `max_anchors_per_owner`.
    pub privileged_unlimited_anchors: bool,

    /// Interval of the expired-cooldown sweep.
    pub cooldown_sweep_secs: u32,

    /// Visibility given to newly created anchors.
    pub default_private: bool,

    /// Friendly names for worlds, keyed by internal world name.
    pub world_display_names: BTreeMap<String, String>,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            delay_secs:                   5,
            cooldown_secs:                5,
            ticks_per_second:             20,
            max_leash_depth:              5,
            recursive_leash:              true,
            leash_depth_warning:          true,
            preserve_leash_connections:   true,
            cross_world:                  CrossWorldPolicy::default(),
            use_cost:                     ResourceCost::free(),
            create_cost:                  ResourceCost::free(),
            max_anchors_per_owner:        Some(10),
            privileged_unlimited_anchors: true,
            cooldown_sweep_secs:          300,
            default_private:              false,
            world_display_names:          BTreeMap::new(),
        }
    }
}

impl TeleportConfig {
    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: TeleportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.ticks_per_second == 0 {
            return Err(CoreError::Config("ticks_per_second must be positive".into()));
        }
        if self.max_leash_depth == 0 {
            return Err(CoreError::Config("max_leash_depth must be at least 1".into()));
        }
        if self.cooldown_sweep_secs == 0 {
            return Err(CoreError::Config("cooldown_sweep_secs must be positive".into()));
        }
        self.use_cost.validate("use_cost")?;
        self.create_cost.validate("create_cost")?;
        Ok(())
    }
}

/// Rules for teleporting into a different world than the subject is in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossWorldPolicy {
    pub enabled: bool,
    /// Privileged subjects may cross even when `enabled` is false.
    pub privileged_bypass: bool,
}

impl Default for CrossWorldPolicy {
    fn default() -> Self {
        Self { enabled: true, privileged_bypass: true }
    }
}

impl CrossWorldPolicy {
    /// Whether a subject may travel between two worlds.
    pub fn allows(&self, same_world: bool, privileged: bool) -> bool {
        same_world || self.enabled || (self.privileged_bypass && privileged)
    }
}

/// An item-denominated cost.  `item: None` means the action is free.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceCost {
    pub item:   Option<String>,
    pub amount: u32,
}

impl ResourceCost {
    pub fn free() -> Self {
        Self::default()
    }

    pub fn of(item: impl Into<String>, amount: u32) -> Self {
        Self { item: Some(item.into()), amount }
    }

    /// `true` if nothing needs to be debited.
    pub fn is_free(&self) -> bool {
        self.item.is_none() || self.amount == 0
    }

    fn validate(&self, field: &str) -> CoreResult<()> {
        match &self.item {
            Some(item) if item.trim().is_empty() => Err(CoreError::Config(format!(
                "{field}.item must be a non-empty item name or null"
            ))),
            _ => Ok(()),
        }
    }
}

/// Friendly name for a world: configured mapping first, then well-known
/// suffixes, then the raw name.
pub fn world_display_name<'a>(config: &'a TeleportConfig, world_name: &'a str) -> &'a str {
    if let Some(name) = config.world_display_names.get(world_name) {
        return name;
    }
    if world_name == "world" || world_name.ends_with("_overworld") {
        "Overworld"
    } else if world_name.ends_with("_nether") {
        "Nether"
    } else if world_name.ends_with("_the_end") {
        "The End"
    } else {
        world_name
    }
}
