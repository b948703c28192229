//! `TaskQueue` — sparse per-tick queue of deferred orchestrator work.
//!
//! Delayed jumps, remounts, leash restores, and the periodic cooldown sweep
//! are all entries here.  Each tick the orchestrator drains only the entries
//! due at that tick.
//!
//! `BTreeMap` keeps the due ticks ordered, so [`TaskQueue::next_tick`] is a
//! cheap peek and draining is O(log W) in the number of distinct due ticks.

use std::collections::BTreeMap;

use wg_convoy::ConvoyMember;
use wg_core::{EntityId, Tick};

/// One unit of deferred work.
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    /// The warm-up of `subject`'s pending teleport is over.
    Fire { subject: EntityId },
    /// Put `rider` back on `vehicle` after both have arrived.
    Remount { rider: EntityId, vehicle: EntityId },
    /// Re-tie leashes detached for a jump.
    RestoreLeashes { requester: EntityId, links: Vec<ConvoyMember> },
    /// Drop expired cooldown entries and re-arm.
    SweepCooldowns,
}

#[derive(Default)]
pub struct TaskQueue {
    inner: BTreeMap<Tick, Vec<Task>>,
    total: usize,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tick: Tick, task: Task) {
        self.inner.entry(tick).or_default().push(task);
        self.total += 1;
    }

    /// Remove and return every task due at exactly `tick`, in push order.
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<Task>> {
        let tasks = self.inner.remove(&tick)?;
        self.total -= tasks.len();
        Some(tasks)
    }

    /// Disarm the `Fire` timer of `subject` due at `tick`.  Returns whether
    /// one was found.
    pub fn cancel_fire(&mut self, tick: Tick, subject: EntityId) -> bool {
        let Some(bucket) = self.inner.get_mut(&tick) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|t| !matches!(t, Task::Fire { subject: s } if *s == subject));
        let removed = before - bucket.len();
        if bucket.is_empty() {
            self.inner.remove(&tick);
        }
        self.total -= removed;
        removed > 0
    }

    /// The earliest tick with at least one task.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of `Fire` timers currently armed.
    pub fn armed_timers(&self) -> usize {
        self.inner
            .values()
            .flatten()
            .filter(|t| matches!(t, Task::Fire { .. }))
            .count()
    }
}
