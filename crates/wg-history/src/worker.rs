//! `BackgroundHistory` — history writes and lookups on their own thread.
//!
//! The world thread only ever sends: a record is a channel push, and a
//! lookup returns a [`Receiver`] that the host polls on a later tick (or
//! blocks on, outside the tick loop).  The worker owns the durable writer
//! plus an in-memory mirror that answers lookups.

use std::error::Error;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use tracing::{debug, info, warn};
use wg_core::AccountId;
use wg_teleport::{HistoryRecorder, TeleportRecord};

use crate::writer::HistoryWriter;
use crate::{AnchorUses, HistoryError, HistoryResult, HistoryRow, MemoryHistory};

/// A lookup the worker can answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryQuery {
    Recent(usize),
    ForAnchor(String),
    ForPlayer(AccountId),
    PopularAnchors(usize),
    CrossWorldCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAnswer {
    Rows(Vec<HistoryRow>),
    Popular(Vec<AnchorUses>),
    Count(usize),
}

enum Job {
    Append(HistoryRow),
    Query(HistoryQuery, Sender<HistoryAnswer>),
    Flush(Sender<HistoryResult<()>>),
    Shutdown,
}

/// Cloneable, read-only access to a running [`BackgroundHistory`].
///
/// Outlives the worker harmlessly: once it stops, every call returns
/// [`HistoryError::WorkerGone`].
#[derive(Clone)]
pub struct HistoryLookup {
    tx: Sender<Job>,
}

impl HistoryLookup {
    fn send(&self, job: Job) -> HistoryResult<()> {
        self.tx.send(job).map_err(|_| HistoryError::WorkerGone)
    }

    /// Ask without waiting.  The answer arrives on the returned receiver
    /// once every earlier append has been applied.
    pub fn query_async(&self, query: HistoryQuery) -> HistoryResult<Receiver<HistoryAnswer>> {
        let (reply, answer) = bounded(1);
        self.send(Job::Query(query, reply))?;
        Ok(answer)
    }

    /// Ask and block for the answer.
    pub fn query(&self, query: HistoryQuery) -> HistoryResult<HistoryAnswer> {
        self.query_async(query)?.recv().map_err(|_| HistoryError::WorkerGone)
    }
}

/// Runs a [`HistoryWriter`] on a dedicated thread.
///
/// Dropping it drains what is queued, flushes the writer, and joins the
/// thread.
pub struct BackgroundHistory {
    lookup: HistoryLookup,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundHistory {
    /// Start the worker with `writer` as the durable sink and `seed` as the
    /// initial contents of the lookup mirror.
    ///
    /// # Errors
    ///
    /// [`HistoryError::Io`] if the thread cannot be spawned.
    pub fn spawn<W: HistoryWriter + 'static>(writer: W, seed: MemoryHistory) -> HistoryResult<Self> {
        let (tx, rx) = unbounded();
        let worker = thread::Builder::new()
            .name("wg-history".into())
            .spawn(move || run(writer, seed, rx))?;
        Ok(Self { lookup: HistoryLookup { tx }, worker: Some(worker) })
    }

    /// A handle for lookups that stays usable after `self` is moved into
    /// an orchestrator.
    pub fn lookup(&self) -> HistoryLookup {
        self.lookup.clone()
    }

    pub fn append(&self, row: HistoryRow) -> HistoryResult<()> {
        self.lookup.send(Job::Append(row))
    }

    pub fn query_async(&self, query: HistoryQuery) -> HistoryResult<Receiver<HistoryAnswer>> {
        self.lookup.query_async(query)
    }

    pub fn query(&self, query: HistoryQuery) -> HistoryResult<HistoryAnswer> {
        self.lookup.query(query)
    }

    /// Block until everything queued so far is written and flushed.
    pub fn flush(&self) -> HistoryResult<()> {
        let (reply, done) = bounded(1);
        self.lookup.send(Job::Flush(reply))?;
        done.recv().map_err(|_| HistoryError::WorkerGone)?
    }
}

impl HistoryRecorder for BackgroundHistory {
    fn record(&mut self, record: &TeleportRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.append(HistoryRow::from(record))?;
        Ok(())
    }
}

impl Drop for BackgroundHistory {
    fn drop(&mut self) {
        if self.lookup.send(Job::Shutdown).is_err() {
            debug!("history worker already gone");
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("history worker panicked");
            }
        }
    }
}

fn run<W: HistoryWriter>(mut writer: W, mut mirror: MemoryHistory, rx: Receiver<Job>) {
    info!(rows = mirror.len(), "history worker started");
    let mut failures = 0usize;
    for job in rx {
        match job {
            Job::Append(row) => {
                if let Err(e) = writer.append(&row) {
                    failures += 1;
                    warn!(anchor = %row.anchor, error = %e, "history row not written");
                }
                mirror.push(row);
            }
            Job::Query(query, reply) => {
                let answer = answer(&mirror, query);
                if reply.send(answer).is_err() {
                    debug!("history lookup abandoned by caller");
                }
            }
            Job::Flush(reply) => {
                let flushed = writer.finish();
                if let Err(e) = &flushed {
                    warn!(error = %e, "history flush failed");
                }
                if reply.send(flushed).is_err() {
                    debug!("history flush abandoned by caller");
                }
            }
            Job::Shutdown => break,
        }
    }
    if let Err(e) = writer.finish() {
        warn!(error = %e, "history flush on shutdown failed");
    }
    info!(rows = mirror.len(), failures, "history worker stopped");
}

fn answer(mirror: &MemoryHistory, query: HistoryQuery) -> HistoryAnswer {
    match query {
        HistoryQuery::Recent(n) => HistoryAnswer::Rows(mirror.recent(n)),
        HistoryQuery::ForAnchor(name) => HistoryAnswer::Rows(mirror.for_anchor(&name)),
        HistoryQuery::ForPlayer(account) => HistoryAnswer::Rows(mirror.for_player(account)),
        HistoryQuery::PopularAnchors(n) => HistoryAnswer::Popular(mirror.popular_anchors(n)),
        HistoryQuery::CrossWorldCount => HistoryAnswer::Count(mirror.cross_world_count()),
    }
}
