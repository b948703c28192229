//! Thread-safe ingress: other threads talk to the orchestrator by sending
//! [`Command`]s, which the world thread drains at the start of each tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError, unbounded};
use wg_core::{EntityId, Location, Tick};

use crate::{CooldownLedger, EscrowEntry, EscrowLedger};

/// Something that happened to a subject that may cancel its teleport.
#[derive(Clone, Debug, PartialEq)]
pub enum SubjectEvent {
    /// The subject is now at `to`.  Cancels if the voxel changed.
    Moved { subject: EntityId, to: Location },
    Died(EntityId),
    Disconnected(EntityId),
}

impl SubjectEvent {
    pub fn subject(&self) -> EntityId {
        match *self {
            SubjectEvent::Moved { subject, .. } => subject,
            SubjectEvent::Died(s) | SubjectEvent::Disconnected(s) => s,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Request { subject: EntityId, anchor: String },
    Cancel(EntityId),
    Event(SubjectEvent),
}

pub(crate) type Inbox = Receiver<Command>;

/// Cloneable, `Send` handle to a running orchestrator.
#[derive(Clone)]
pub struct TeleportHandle {
    tx:        Sender<Command>,
    cooldowns: CooldownLedger,
    escrow:    EscrowLedger,
    now:       Arc<AtomicU64>,
    tps:       u32,
}

impl TeleportHandle {
    pub(crate) fn channel(
        cooldowns: CooldownLedger,
        escrow:    EscrowLedger,
        now:       Arc<AtomicU64>,
        tps:       u32,
    ) -> (Self, Inbox) {
        let (tx, rx) = unbounded();
        (Self { tx, cooldowns, escrow, now, tps: tps.max(1) }, rx)
    }

    /// Queue a teleport request.  Returns `false` if the orchestrator is gone.
    pub fn request(&self, subject: EntityId, anchor: impl Into<String>) -> bool {
        self.send(Command::Request { subject, anchor: anchor.into() })
    }

    pub fn cancel(&self, subject: EntityId) -> bool {
        self.send(Command::Cancel(subject))
    }

    pub fn notify(&self, event: SubjectEvent) -> bool {
        self.send(Command::Event(event))
    }

    fn send(&self, cmd: Command) -> bool {
        !matches!(self.tx.try_send(cmd), Err(TrySendError::Disconnected(_)))
    }

    /// Whole seconds (rounded up) until `subject` may teleport again.
    pub fn cooldown_remaining_secs(&self, subject: EntityId) -> Option<u64> {
        let now = Tick(self.now.load(Ordering::Acquire));
        self.cooldowns
            .peek(subject, now)
            .map(|ticks| ticks.div_ceil(self.tps as u64))
    }

    /// What `subject` currently has in escrow.
    pub fn escrowed(&self, subject: EntityId) -> Option<EscrowEntry> {
        self.escrow.get(subject)
    }
}
