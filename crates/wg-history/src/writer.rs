//! The `HistoryWriter` trait implemented by every history backend.

use crate::{HistoryResult, HistoryRow};

/// A sink for history rows.
///
/// `Send` so a writer can be handed to
/// [`BackgroundHistory`][crate::BackgroundHistory].
pub trait HistoryWriter: Send {
    fn append(&mut self, row: &HistoryRow) -> HistoryResult<()>;

    /// Flush buffered rows.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> HistoryResult<()>;
}
