//! The `Orchestrator` and its tick loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};
use wg_convoy::{ConvoyMember, ConvoyPolicy, collect};
use wg_core::{EntityId, GameClock, Location, TeleportConfig, Tick, world_display_name};
use wg_landing::{LandingResolver, LayeredResolver};
use wg_world::{EntityKind, WorldState};

use crate::handle::Inbox;
use crate::{
    AnchorDirectory, AnchorPolicy, CancelReason, Command, CooldownLedger, EscrowEntry,
    EscrowLedger, Feedback, HistoryRecorder, PendingTeleport, Permissions, ResourceBank,
    SubjectEvent, Task, TaskQueue, TeleportError, TeleportHandle, TeleportRecord,
    TeleportResult, TeleportState,
};

/// Ticks between the vehicle's arrival and putting the rider back on.
pub const REMOUNT_DELAY_TICKS: u64 = 5;
/// Ticks between the jump and re-tying detached leashes.
pub const LEASH_RESTORE_DELAY_TICKS: u64 = 3;
/// A detached leash is re-tied only if its ends are at most this far apart.
pub const LEASH_RESTORE_DISTANCE: f64 = 10.0;
/// Dropped leads within this radius of the subject are removed on detach.
pub const LEAD_SWEEP_RADIUS: f64 = 8.0;

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Owns the world and every per-subject teleport table, and drives them one
/// tick at a time.
///
/// Each [`tick`](Self::tick):
///
/// 1. **Inbox**: apply [`Command`]s sent through [`TeleportHandle`]s.
/// 2. **Watch**: cancel pending teleports whose subject moved to another
///    voxel, died, or vanished.
/// 3. **Tasks**: run everything due this tick (jumps, remounts, leash
///    restores, cooldown sweep).
///
/// All world mutation happens inside these calls on one thread.  A jump runs
/// to completion within its tick, so a cancel can never observe a
/// half-moved convoy.
///
/// Create via [`OrchestratorBuilder`][crate::OrchestratorBuilder].
pub struct Orchestrator<R: LandingResolver = LayeredResolver> {
    pub config: TeleportConfig,
    pub clock:  GameClock,
    /// The world being mutated.  Hosts move entities through this between
    /// ticks.
    pub world:  WorldState,
    pub queue:  TaskQueue,

    pub(crate) resolver:    R,
    pub(crate) anchors:     Box<dyn AnchorDirectory>,
    pub(crate) permissions: Box<dyn Permissions>,
    pub(crate) bank:        Box<dyn ResourceBank>,
    pub(crate) feedback:    Box<dyn Feedback>,
    pub(crate) history:     Box<dyn HistoryRecorder>,

    pub(crate) pending:   FxHashMap<EntityId, PendingTeleport>,
    pub(crate) states:    FxHashMap<EntityId, TeleportState>,
    pub(crate) cooldowns: CooldownLedger,
    pub(crate) escrow:    EscrowLedger,

    pub(crate) inbox:  Inbox,
    pub(crate) handle: TeleportHandle,
    pub(crate) now:    Arc<AtomicU64>,
}

impl<R: LandingResolver> Orchestrator<R> {
    // ── Queries ───────────────────────────────────────────────────────────

    /// A new handle for other threads.
    pub fn handle(&self) -> TeleportHandle {
        self.handle.clone()
    }

    pub fn state(&self, subject: EntityId) -> TeleportState {
        self.states.get(&subject).copied().unwrap_or(TeleportState::Idle)
    }

    pub fn pending(&self, subject: EntityId) -> Option<&PendingTeleport> {
        self.pending.get(&subject)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn cooldowns(&self) -> &CooldownLedger {
        &self.cooldowns
    }

    pub fn escrow(&self) -> &EscrowLedger {
        &self.escrow
    }

    /// Whole seconds (rounded up) left on `subject`'s cooldown.
    pub fn cooldown_remaining_secs(&self, subject: EntityId) -> Option<u64> {
        self.cooldowns
            .remaining(subject, self.clock.current_tick)
            .map(|ticks| self.clock.secs_for_ticks(ticks))
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Process the current tick, then advance the clock.
    pub fn tick(&mut self) {
        let now = self.clock.current_tick;
        self.now.store(now.0, Ordering::Release);

        self.drain_inbox();
        self.watch_pending();
        if let Some(tasks) = self.queue.drain_tick(now) {
            for task in tasks {
                self.run_task(task, now);
            }
        }

        self.clock.advance();
        self.now.store(self.clock.current_tick.0, Ordering::Release);
    }

    pub fn run_ticks(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    fn drain_inbox(&mut self) {
        let commands: Vec<Command> = self.inbox.try_iter().collect();
        for command in commands {
            match command {
                Command::Request { subject, anchor } => {
                    if let Err(e) = self.request(subject, &anchor) {
                        self.feedback.on_rejected(subject, &e);
                    }
                }
                Command::Cancel(subject) => {
                    self.cancel(subject);
                }
                Command::Event(event) => self.handle_event(event),
            }
        }
    }

    /// Cancel any pending teleport whose subject has moved, died, or gone.
    fn watch_pending(&mut self) {
        let mut subjects: Vec<EntityId> = self.pending.keys().copied().collect();
        subjects.sort_unstable();
        for subject in subjects {
            let Some(origin) = self.pending.get(&subject).map(|p| p.origin) else {
                continue;
            };
            let reason = match self.world.entity(subject) {
                None => Some(CancelReason::Disconnected),
                Some(e) if !e.alive => Some(CancelReason::Died),
                Some(e) if left_voxel(origin, e.location) => Some(CancelReason::Moved),
                Some(_) => None,
            };
            match reason {
                Some(CancelReason::Disconnected) => self.disconnect(subject),
                Some(reason) => {
                    self.cancel_with(subject, reason);
                }
                None => {}
            }
        }
    }

    fn run_task(&mut self, task: Task, now: Tick) {
        match task {
            Task::Fire { subject } => self.expire(subject, now),
            Task::Remount { rider, vehicle } => self.remount(rider, vehicle),
            Task::RestoreLeashes { requester, links } => self.restore_leashes(requester, &links),
            Task::SweepCooldowns => {
                let swept = self.cooldowns.sweep(now);
                if swept > 0 {
                    debug!(swept, "expired cooldowns swept");
                }
                let every = self.clock.ticks_for_secs(self.config.cooldown_sweep_secs as u64);
                self.queue.push(now.offset(every.max(1)), Task::SweepCooldowns);
            }
        }
    }

    // ── Events ────────────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: SubjectEvent) {
        match event {
            SubjectEvent::Moved { subject, to } => {
                let moved = self.pending.get(&subject).is_some_and(|p| left_voxel(p.origin, to));
                if moved {
                    self.cancel_with(subject, CancelReason::Moved);
                }
            }
            SubjectEvent::Died(subject) => {
                self.cancel_with(subject, CancelReason::Died);
            }
            SubjectEvent::Disconnected(subject) => self.disconnect(subject),
        }
    }

    /// Tear down everything held for `subject`: the pending teleport (with
    /// refund) and its cooldown.
    pub fn disconnect(&mut self, subject: EntityId) {
        self.cancel_with(subject, CancelReason::Disconnected);
        self.refund(subject);
        self.cooldowns.clear(subject);
        self.states.remove(&subject);
        debug!(subject = %subject, "subject state cleared on disconnect");
    }

    // ── Request ───────────────────────────────────────────────────────────

    /// Validate and schedule a teleport of `subject` to the anchor named
    /// `anchor`.  Returns the tick the jump fires at.
    ///
    /// An existing pending teleport for `subject` is cancelled and refunded
    /// first, whether or not this request succeeds.
    ///
    /// # Errors
    ///
    /// Any validation failure, with no resources debited and no timer armed.
    pub fn request(&mut self, subject: EntityId, anchor: &str) -> TeleportResult<Tick> {
        if self.cancel_with(subject, CancelReason::Superseded) {
            debug!(subject = %subject, "previous teleport superseded");
        }
        self.states.insert(subject, TeleportState::Requested);
        let result = self.try_request(subject, anchor);
        if let Err(e) = &result {
            self.states.remove(&subject);
            if e.is_validation() {
                debug!(subject = %subject, anchor, error = %e, "teleport request rejected");
            } else {
                warn!(subject = %subject, anchor, error = %e, "teleport request failed");
            }
        }
        result
    }

    fn try_request(&mut self, subject: EntityId, name: &str) -> TeleportResult<Tick> {
        let now = self.clock.current_tick;

        let me = self
            .world
            .entity(subject)
            .filter(|e| e.alive)
            .ok_or(TeleportError::SubjectUnavailable(subject))?;
        let account = me.account.ok_or(TeleportError::SubjectUnavailable(subject))?;
        let (subject_name, origin) = (me.name.clone(), me.location);
        let on_boat = me
            .vehicle
            .and_then(|v| self.world.entity(v))
            .is_some_and(|v| v.kind == EntityKind::Boat);
        if on_boat {
            return Err(TeleportError::RidingBoat);
        }

        let anchor = self
            .anchors
            .lookup_anchor(name)
            .ok_or_else(|| TeleportError::AnchorNotFound(name.to_owned()))?;
        if !self.permissions.can_use(account) {
            return Err(TeleportError::PermissionDenied);
        }
        if !self.permissions.can_use_anchor(account, &anchor) {
            return Err(TeleportError::PrivateAnchor(anchor.name));
        }

        if let Some(ticks) = self.cooldowns.remaining(subject, now) {
            return Err(TeleportError::CoolingDown {
                remaining_secs: self.clock.secs_for_ticks(ticks),
            });
        }

        let target_world = anchor.location.world;
        if self.world.world(target_world).is_none() {
            return Err(TeleportError::WorldNotFound(target_world));
        }
        let same_world = origin.world == target_world;
        if !self.config.cross_world.allows(same_world, self.permissions.is_privileged(account)) {
            let target = world_display_name(&self.config, self.world.world_name(target_world));
            return Err(TeleportError::CrossWorldDisabled { target: target.to_owned() });
        }

        // ── Escrowed ──────────────────────────────────────────────────────
        let escrow = self.debit_use_cost(subject)?;
        self.states.insert(subject, TeleportState::Escrowed);

        // ── Scheduled ─────────────────────────────────────────────────────
        let convoy = match collect(&self.world, subject, &ConvoyPolicy::from(&self.config)) {
            Ok(c) => c,
            Err(e) => {
                self.refund(subject);
                return Err(e.into());
            }
        };
        if convoy.depth_capped && self.config.recursive_leash && self.config.leash_depth_warning {
            self.feedback
                .on_leash_depth_warning(subject, self.config.max_leash_depth, convoy.len());
        }

        let delay_secs = self.config.delay_secs as u64;
        let fire_at = now.offset(self.clock.ticks_for_secs(delay_secs));
        self.queue.push(fire_at, Task::Fire { subject });

        info!(
            subject = %subject,
            anchor = %anchor.name,
            fire_at = %fire_at,
            convoy = convoy.len(),
            "teleport scheduled"
        );
        self.feedback.on_scheduled(subject, &anchor.name, delay_secs);
        self.pending.insert(subject, PendingTeleport {
            subject,
            account,
            subject_name,
            anchor,
            origin,
            fire_at,
            escrow,
            convoy,
        });
        self.states.insert(subject, TeleportState::Scheduled);
        Ok(fire_at)
    }

    /// Debit the configured use cost into escrow.  A leftover entry from an
    /// earlier request is refunded first.
    fn debit_use_cost(&mut self, subject: EntityId) -> TeleportResult<Option<EscrowEntry>> {
        let cost = &self.config.use_cost;
        let Some(item) = cost.item.as_deref().filter(|_| !cost.is_free()) else {
            return Ok(None);
        };
        let amount = cost.amount;

        let held = self.bank.balance(subject, item);
        if held < amount {
            return Err(TeleportError::InsufficientResource {
                item: item.to_owned(),
                required: amount,
                held,
            });
        }

        if let Some(stale) = self.escrow.take(subject) {
            warn!(subject = %subject, item = %stale.item, amount = stale.amount, "stale escrow force-settled");
            self.bank.credit(subject, &stale.item, stale.amount);
        }
        self.bank.debit(subject, item, amount)?;
        let entry = EscrowEntry { item: item.to_owned(), amount };
        if let Some(displaced) = self.escrow.hold(subject, entry.clone()) {
            warn!(subject = %subject, "escrow entry displaced while debiting");
            self.bank.credit(subject, &displaced.item, displaced.amount);
        }
        Ok(Some(entry))
    }

    // ── Cancel ────────────────────────────────────────────────────────────

    /// Cancel `subject`'s pending teleport, refunding its escrow.  Returns
    /// `false` (and does nothing) if there is none.
    pub fn cancel(&mut self, subject: EntityId) -> bool {
        self.cancel_with(subject, CancelReason::Requested)
    }

    fn cancel_with(&mut self, subject: EntityId, reason: CancelReason) -> bool {
        let Some(p) = self.pending.remove(&subject) else {
            return false;
        };
        self.queue.cancel_fire(p.fire_at, subject);
        self.refund(subject);
        self.states.insert(subject, TeleportState::Cancelled);
        info!(subject = %subject, anchor = %p.anchor.name, reason = %reason, "teleport cancelled");
        self.feedback.on_cancelled(subject, reason);
        true
    }

    fn refund(&mut self, subject: EntityId) {
        if let Some(entry) = self.escrow.take(subject) {
            self.bank.credit(subject, &entry.item, entry.amount);
            debug!(subject = %subject, item = %entry.item, amount = entry.amount, "escrow refunded");
        }
    }

    // ── Expire ────────────────────────────────────────────────────────────

    fn expire(&mut self, subject: EntityId, now: Tick) {
        let Some(p) = self.pending.remove(&subject) else {
            return;
        };

        if !self.still_allowed(&p) {
            self.refund(subject);
            self.states.insert(subject, TeleportState::Cancelled);
            info!(subject = %subject, anchor = %p.anchor.name, "anchor access revoked during warm-up");
            self.feedback.on_cancelled(subject, CancelReason::AccessRevoked);
            return;
        }

        match self.jump(&p, now) {
            Ok(landing) => self.complete(p, landing, now),
            Err(e) => {
                warn!(subject = %subject, anchor = %p.anchor.name, error = %e, "teleport failed");
                self.refund(subject);
                self.states.insert(subject, TeleportState::Cancelled);
                self.feedback.on_cancelled(subject, CancelReason::Failed);
            }
        }
    }

    /// Permission and visibility against the anchor as it is now.  A deleted
    /// anchor is judged by the snapshot.
    fn still_allowed(&self, p: &PendingTeleport) -> bool {
        let live = self.anchors.lookup_anchor(&p.anchor.name);
        let anchor = live.as_ref().unwrap_or(&p.anchor);
        self.permissions.can_use(p.account) && self.permissions.can_use_anchor(p.account, anchor)
    }

    /// Move the convoy and the subject.  Only the subject's own move is
    /// fatal; everything else that fails is logged and left behind.
    fn jump(&mut self, p: &PendingTeleport, now: Tick) -> TeleportResult<Location> {
        let landing = self.resolver.resolve_location(&self.world, p.destination());
        let boat_riders: Vec<EntityId> = p
            .convoy
            .boat
            .and_then(|b| self.world.entity(b))
            .map(|b| b.passengers.clone())
            .unwrap_or_default();

        let mut links = Vec::new();
        if self.config.preserve_leash_connections {
            for m in &p.convoy.members {
                if let Some(holder) = self.world.unleash(m.id, true) {
                    links.push(ConvoyMember { id: m.id, holder });
                }
            }
            let swept = self.world.remove_dropped_leads(p.origin, LEAD_SWEEP_RADIUS);
            debug!(subject = %p.subject, detached = links.len(), swept, "leashes detached");
        }

        for m in &p.convoy.members {
            if Some(m.id) == p.convoy.boat || boat_riders.contains(&m.id) {
                continue;
            }
            if let Err(e) = self.world.teleport(m.id, landing) {
                warn!(subject = %p.subject, member = %m.id, error = %e, "convoy member left behind");
            }
        }

        self.world.teleport(p.subject, landing)?;

        if let Some(vehicle) = p.convoy.vehicle {
            if self.world.entity(vehicle).is_some_and(|v| v.alive) {
                match self.world.teleport(vehicle, landing) {
                    Ok(()) => self.queue.push(
                        now.offset(REMOUNT_DELAY_TICKS),
                        Task::Remount { rider: p.subject, vehicle },
                    ),
                    Err(e) => warn!(subject = %p.subject, vehicle = %vehicle, error = %e, "vehicle left behind"),
                }
            }
        }

        if let Some(boat) = p.convoy.boat {
            self.move_boat(boat, landing);
        }

        if !links.is_empty() {
            self.queue.push(
                now.offset(LEASH_RESTORE_DELAY_TICKS),
                Task::RestoreLeashes { requester: p.subject, links },
            );
        }
        Ok(landing)
    }

    /// Carry a boat and its creature passengers.  Player passengers are
    /// let off where they are.
    fn move_boat(&mut self, boat: EntityId, landing: Location) {
        let riders = self.world.entity(boat).map(|b| b.passengers.clone()).unwrap_or_default();
        let creatures: Vec<EntityId> = riders
            .iter()
            .copied()
            .filter(|&r| self.world.entity(r).is_some_and(|e| !e.is_player()))
            .collect();
        for &r in &riders {
            self.world.dismount(r);
        }
        if let Err(e) = self.world.teleport(boat, landing) {
            warn!(boat = %boat, error = %e, "boat left behind");
            return;
        }
        for c in creatures {
            let moved = self.world.teleport(c, landing).and_then(|()| self.world.mount(c, boat));
            if let Err(e) = moved {
                warn!(boat = %boat, passenger = %c, error = %e, "boat passenger left behind");
            }
        }
    }

    fn complete(&mut self, p: PendingTeleport, landing: Location, now: Tick) {
        let subject = p.subject;
        if let Some(consumed) = self.escrow.take(subject) {
            debug!(subject = %subject, item = %consumed.item, amount = consumed.amount, "escrow consumed");
        }
        let cooldown = self.clock.ticks_for_secs(self.config.cooldown_secs as u64);
        if cooldown > 0 {
            self.cooldowns.set(subject, now.offset(cooldown));
        }

        let record = TeleportRecord {
            requester:         p.subject_name,
            requester_account: p.account,
            anchor:            p.anchor.name,
            from_world:        self.world.world_name(p.origin.world).to_owned(),
            to_world:          self.world.world_name(landing.world).to_owned(),
            at_unix_secs:      self.clock.unix_secs_at(now),
        };
        if let Err(e) = self.history.record(&record) {
            warn!(subject = %subject, error = %e, "teleport history not recorded");
        }

        self.states.insert(subject, TeleportState::Expired);
        info!(
            subject = %subject,
            anchor = %record.anchor,
            from = %record.from_world,
            to = %record.to_world,
            "teleport complete"
        );
        self.feedback.on_completed(subject, &record.anchor, landing);
    }

    // ── Follow-up tasks ───────────────────────────────────────────────────

    fn remount(&mut self, rider: EntityId, vehicle: EntityId) {
        let seated = self.world.entity(rider).is_some_and(|r| r.vehicle == Some(vehicle));
        if seated {
            return;
        }
        if let Err(e) = self.world.mount(rider, vehicle) {
            warn!(rider = %rider, vehicle = %vehicle, error = %e, "remount failed");
        }
    }

    fn restore_leashes(&mut self, requester: EntityId, links: &[ConvoyMember]) {
        for link in links {
            let close_enough = match (self.world.entity(link.id), self.world.entity(link.holder)) {
                (Some(f), Some(h)) if f.alive && h.alive => f
                    .location
                    .distance(h.location)
                    .is_some_and(|d| d <= LEASH_RESTORE_DISTANCE),
                _ => false,
            };
            let restored = close_enough
                && match self.world.leash(link.id, link.holder) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(follower = %link.id, holder = %link.holder, error = %e, "leash restore failed");
                        false
                    }
                };
            if restored {
                continue;
            }
            warn!(follower = %link.id, holder = %link.holder, "leash left detached after teleport");
            if link.holder == requester && self.world.entity(requester).is_some() {
                self.feedback.on_leash_restore_failed(link.holder, link.id);
            }
        }
    }

    // ── Anchors ───────────────────────────────────────────────────────────

    /// Gate and charge anchor creation for the player `subject`.
    ///
    /// # Errors
    ///
    /// See [`AnchorPolicy::authorize_create`].
    pub fn authorize_anchor_create(&mut self, subject: EntityId) -> TeleportResult<()> {
        let account = self
            .world
            .entity(subject)
            .and_then(|e| e.account)
            .ok_or(TeleportError::SubjectUnavailable(subject))?;
        AnchorPolicy::from(&self.config).authorize_create(
            subject,
            account,
            self.permissions.as_ref(),
            self.anchors.as_ref(),
            self.bank.as_mut(),
        )
    }
}

/// Different world, or a different voxel in the same world.
fn left_voxel(origin: Location, now: Location) -> bool {
    origin.world != now.world || origin.block() != now.block()
}
