//! Fluent builder for constructing an [`Orchestrator`].

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use rustc_hash::FxHashMap;
use wg_core::{CoreResult, GameClock, TeleportConfig};
use wg_landing::{LandingResolver, LayeredResolver};
use wg_world::WorldState;

use crate::{
    AnchorDirectory, CooldownLedger, EscrowLedger, Feedback, HistoryRecorder, MemoryAnchors,
    MemoryBank, NoHistory, NoopFeedback, Orchestrator, PermissionTable, Permissions,
    ResourceBank, Task, TaskQueue, TeleportHandle,
};

/// Fluent builder for [`Orchestrator<R>`].
///
/// # Required inputs
///
/// - [`TeleportConfig`]: delays, cooldowns, costs, leash and world policy
/// - [`WorldState`]: the worlds and entities to operate on
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                          |
/// |----------------------|----------------------------------|
/// | `.anchors(d)`        | empty [`MemoryAnchors`]          |
/// | `.permissions(p)`    | [`PermissionTable::new`]         |
/// | `.bank(b)`           | empty [`MemoryBank`]             |
/// | `.feedback(f)`       | [`NoopFeedback`]                 |
/// | `.history(h)`        | [`NoHistory`]                    |
/// | `.resolver(r)`       | [`LayeredResolver`]              |
/// | `.start_unix_secs(s)`| `0`                              |
///
/// # Example
///
/// ```rust,ignore
/// let anchors = MemoryAnchors::new();
/// anchors.insert(Anchor::new("spawn", loc, owner));
/// let mut orch = OrchestratorBuilder::new(config, world)
///     .anchors(anchors)
///     .build()?;
/// orch.request(player, "spawn")?;
/// orch.run_ticks(100);
/// ```
pub struct OrchestratorBuilder<R: LandingResolver = LayeredResolver> {
    config:          TeleportConfig,
    world:           WorldState,
    resolver:        R,
    anchors:         Box<dyn AnchorDirectory>,
    permissions:     Box<dyn Permissions>,
    bank:            Box<dyn ResourceBank>,
    feedback:        Box<dyn Feedback>,
    history:         Box<dyn HistoryRecorder>,
    start_unix_secs: i64,
}

impl OrchestratorBuilder<LayeredResolver> {
    pub fn new(config: TeleportConfig, world: WorldState) -> Self {
        Self {
            config,
            world,
            resolver:        LayeredResolver,
            anchors:         Box::new(MemoryAnchors::new()),
            permissions:     Box::new(PermissionTable::new()),
            bank:            Box::new(MemoryBank::new()),
            feedback:        Box::new(NoopFeedback),
            history:         Box::new(NoHistory),
            start_unix_secs: 0,
        }
    }
}

impl<R: LandingResolver> OrchestratorBuilder<R> {
    pub fn anchors(mut self, anchors: impl AnchorDirectory + 'static) -> Self {
        self.anchors = Box::new(anchors);
        self
    }

    pub fn permissions(mut self, permissions: impl Permissions + 'static) -> Self {
        self.permissions = Box::new(permissions);
        self
    }

    pub fn bank(mut self, bank: impl ResourceBank + 'static) -> Self {
        self.bank = Box::new(bank);
        self
    }

    pub fn feedback(mut self, feedback: impl Feedback + 'static) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    pub fn history(mut self, history: impl HistoryRecorder + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    /// Swap the landing search.
    pub fn resolver<R2: LandingResolver>(self, resolver: R2) -> OrchestratorBuilder<R2> {
        OrchestratorBuilder {
            config: self.config,
            world: self.world,
            resolver,
            anchors: self.anchors,
            permissions: self.permissions,
            bank: self.bank,
            feedback: self.feedback,
            history: self.history,
            start_unix_secs: self.start_unix_secs,
        }
    }

    /// Wall-clock time of tick 0, used to stamp history records.
    pub fn start_unix_secs(mut self, secs: i64) -> Self {
        self.start_unix_secs = secs;
        self
    }

    /// Validate the config and return a ready-to-tick [`Orchestrator`].
    ///
    /// # Errors
    ///
    /// Whatever [`TeleportConfig::validate`] rejects.
    pub fn build(self) -> CoreResult<Orchestrator<R>> {
        self.config.validate()?;

        let clock = GameClock::new(self.start_unix_secs, self.config.ticks_per_second);
        let cooldowns = CooldownLedger::new();
        let escrow = EscrowLedger::new();
        let now = Arc::new(AtomicU64::new(clock.current_tick.0));
        let (handle, inbox) = TeleportHandle::channel(
            cooldowns.clone(),
            escrow.clone(),
            Arc::clone(&now),
            self.config.ticks_per_second,
        );

        // ── Periodic sweep ────────────────────────────────────────────────
        let mut queue = TaskQueue::new();
        let every = clock.ticks_for_secs(self.config.cooldown_sweep_secs as u64).max(1);
        queue.push(clock.current_tick.offset(every), Task::SweepCooldowns);

        Ok(Orchestrator {
            config: self.config,
            clock,
            world: self.world,
            queue,
            resolver: self.resolver,
            anchors: self.anchors,
            permissions: self.permissions,
            bank: self.bank,
            feedback: self.feedback,
            history: self.history,
            pending: FxHashMap::default(),
            states: FxHashMap::default(),
            cooldowns,
            escrow,
            inbox,
            handle,
            now,
        })
    }
}
