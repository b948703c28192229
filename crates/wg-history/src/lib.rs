//! `wg-history` — where completed teleports are recorded.
//!
//! Every backend implements [`HistoryWriter`].  The orchestrator talks to a
//! `wg_teleport::HistoryRecorder`, which this crate provides two ways:
//!
//! | Recorder              | Writes on          | Lookups                      |
//! |-----------------------|--------------------|------------------------------|
//! | [`HistoryLog<W>`]     | the world thread   | through the writer           |
//! | [`BackgroundHistory`] | its own thread     | [`HistoryQuery`] over a reply channel |
//!
//! Backends:
//!
//! | Feature   | Backend            | Storage                      |
//! |-----------|--------------------|------------------------------|
//! | *(none)*  | [`MemoryHistory`]  | a `Vec`, optionally capped   |
//! | *(none)*  | [`CsvHistory`]     | one appendable `.csv` file   |
//! | `sqlite`  | `SqliteHistory`    | one `teleport_history` table |
//!
//! # Usage
//!
//! ```rust,ignore
//! let seed = MemoryHistory::from_rows(read_csv(path).unwrap_or_default());
//! let history = BackgroundHistory::spawn(CsvHistory::open(path)?, seed)?;
//! let orch = OrchestratorBuilder::new(config, world).history(history).build()?;
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod recorder;
pub mod row;
pub mod worker;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use crate::csv::{CsvHistory, read_csv};
pub use error::{HistoryError, HistoryResult};
pub use memory::MemoryHistory;
pub use recorder::HistoryLog;
pub use row::{AnchorUses, HistoryRow};
pub use worker::{BackgroundHistory, HistoryAnswer, HistoryLookup, HistoryQuery};
pub use writer::HistoryWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteHistory;
