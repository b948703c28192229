//! CSV history backend.
//!
//! One file, one row per teleport, header written once.  Opening an existing
//! non-empty file appends below its header.

use std::fs::{File, OpenOptions};
use std::path::Path;

use csv::{Reader, Writer, WriterBuilder};

use crate::writer::HistoryWriter;
use crate::{HistoryResult, HistoryRow};

pub struct CsvHistory {
    writer:   Writer<File>,
    finished: bool,
}

impl CsvHistory {
    /// Open (or create) `path` for appending.
    pub fn open(path: &Path) -> HistoryResult<Self> {
        let existing = std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = WriterBuilder::new().has_headers(!existing).from_writer(file);
        Ok(Self { writer, finished: false })
    }
}

impl HistoryWriter for CsvHistory {
    fn append(&mut self, row: &HistoryRow) -> HistoryResult<()> {
        self.finished = false;
        self.writer.serialize(row)?;
        Ok(())
    }

    fn finish(&mut self) -> HistoryResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}

/// Load every row from a file written by [`CsvHistory`].
pub fn read_csv(path: &Path) -> HistoryResult<Vec<HistoryRow>> {
    let mut rdr = Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
