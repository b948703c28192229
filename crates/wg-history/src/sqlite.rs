//! SQLite history backend (feature `sqlite`).
//!
//! A single `teleport_history` table, indexed by anchor and by account so
//! the per-anchor and per-player lookups stay cheap on a long-lived server.

use std::path::Path;

use rusqlite::{Connection, Row, params};
use wg_core::AccountId;

use crate::writer::HistoryWriter;
use crate::{AnchorUses, HistoryResult, HistoryRow};

const SCHEMA: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous  = NORMAL;
    CREATE TABLE IF NOT EXISTS teleport_history (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        requester         TEXT    NOT NULL,
        requester_account INTEGER NOT NULL,
        anchor            TEXT    NOT NULL,
        from_world        TEXT    NOT NULL,
        to_world          TEXT    NOT NULL,
        at_unix_secs      INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS teleport_history_anchor  ON teleport_history (anchor);
    CREATE INDEX IF NOT EXISTS teleport_history_account ON teleport_history (requester_account);";

const COLUMNS: &str = "requester, requester_account, anchor, from_world, to_world, at_unix_secs";

pub struct SqliteHistory {
    conn:     Connection,
    finished: bool,
}

impl SqliteHistory {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: &Path) -> HistoryResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// A throwaway database, for tests and dry runs.
    pub fn in_memory() -> HistoryResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> HistoryResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, finished: false })
    }

    fn select(&self, filter: &str, args: impl rusqlite::Params) -> HistoryResult<Vec<HistoryRow>> {
        let sql = format!("SELECT {COLUMNS} FROM teleport_history {filter}");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(args, read_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The newest `n` rows, newest first.
    pub fn recent(&self, n: usize) -> HistoryResult<Vec<HistoryRow>> {
        self.select("ORDER BY id DESC LIMIT ?1", params![n as i64])
    }

    pub fn for_anchor(&self, anchor: &str) -> HistoryResult<Vec<HistoryRow>> {
        self.select("WHERE anchor = ?1 ORDER BY id DESC", params![anchor])
    }

    pub fn for_player(&self, account: AccountId) -> HistoryResult<Vec<HistoryRow>> {
        self.select("WHERE requester_account = ?1 ORDER BY id DESC", params![account.0 as i64])
    }

    /// The `n` most used anchors.  Ties go to the alphabetically first name.
    pub fn popular_anchors(&self, n: usize) -> HistoryResult<Vec<AnchorUses>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT anchor, COUNT(*) AS uses FROM teleport_history \
             GROUP BY anchor ORDER BY uses DESC, anchor ASC LIMIT ?1",
        )?;
        let ranked = stmt
            .query_map(params![n as i64], |r| {
                Ok(AnchorUses { anchor: r.get(0)?, uses: r.get::<_, i64>(1)? as usize })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ranked)
    }

    pub fn cross_world_count(&self) -> HistoryResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM teleport_history WHERE from_world <> to_world",
            [],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }
}

fn read_row(r: &Row<'_>) -> rusqlite::Result<HistoryRow> {
    Ok(HistoryRow {
        requester:         r.get(0)?,
        requester_account: r.get::<_, i64>(1)? as u64,
        anchor:            r.get(2)?,
        from_world:        r.get(3)?,
        to_world:          r.get(4)?,
        at_unix_secs:      r.get(5)?,
    })
}

impl HistoryWriter for SqliteHistory {
    fn append(&mut self, row: &HistoryRow) -> HistoryResult<()> {
        self.finished = false;
        self.conn.execute(
            "INSERT INTO teleport_history \
             (requester, requester_account, anchor, from_world, to_world, at_unix_secs) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.requester,
                row.requester_account as i64,
                row.anchor,
                row.from_world,
                row.to_world,
                row.at_unix_secs,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> HistoryResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
