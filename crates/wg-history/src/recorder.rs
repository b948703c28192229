//! `HistoryLog<W>` — bridges the orchestrator's `HistoryRecorder` to a
//! `HistoryWriter`.

use std::error::Error;

use wg_teleport::{HistoryRecorder, TeleportRecord};

use crate::writer::HistoryWriter;
use crate::{HistoryResult, HistoryRow};

/// Writes each completed teleport straight to `W` on the calling thread.
///
/// Fine for [`MemoryHistory`][crate::MemoryHistory]; for file or database
/// backends prefer [`BackgroundHistory`][crate::BackgroundHistory] so the
/// world thread never waits on I/O.
pub struct HistoryLog<W: HistoryWriter> {
    writer: W,
}

impl<W: HistoryWriter> HistoryLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> HistoryResult<W> {
        self.writer.finish()?;
        Ok(self.writer)
    }
}

impl<W: HistoryWriter> HistoryRecorder for HistoryLog<W> {
    fn record(&mut self, record: &TeleportRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.writer.append(&HistoryRow::from(record))?;
        Ok(())
    }
}
