use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use std::path::Path;

use crate::app::ports::RunStorePort;
use crate::domain::{SequencingRun, Summary};
use crate::error::Result;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = r#"
    PRAGMA foreign_keys=ON;
    CREATE TABLE IF NOT EXISTS sequencing_runs (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        run_id      TEXT NOT NULL,
        run_number  TEXT NOT NULL,
        flowcell    TEXT NOT NULL,
        sequencer   TEXT NOT NULL,
        run_date    TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS run_summaries (
        run_ref             INTEGER NOT NULL REFERENCES sequencing_runs(id),
        yield_total         REAL NOT NULL,
        yield_q30           REAL NOT NULL,
        quality_score_mean  REAL NOT NULL,
        category            TEXT NOT NULL,
        count               INTEGER NOT NULL,
        error_rate          REAL NOT NULL
    );
"#;

/// SQLite-backed store for runs and their summaries
pub struct SqliteRunStore {
    conn: Connection,
}

impl SqliteRunStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::with_connection(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn get_sequencing_run(&self, run_ref: i64) -> Result<Option<SequencingRun>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, run_number, flowcell, sequencer, run_date FROM sequencing_runs WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![run_ref])?;
        if let Some(row) = rows.next()? {
            let date_text: String = row.get(4)?;
            let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
            })?;
            Ok(Some(SequencingRun {
                id: row.get(0)?,
                number: row.get(1)?,
                flowcell: row.get(2)?,
                sequencer: row.get(3)?,
                date,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn get_run_summaries(&self, run_ref: i64) -> Result<Vec<Summary>> {
        let mut stmt = self.conn.prepare(
            "SELECT yield_total, yield_q30, quality_score_mean, category, count, error_rate
             FROM run_summaries WHERE run_ref = ?1",
        )?;
        let summaries = stmt
            .query_map(params![run_ref], |row| {
                Ok(Summary {
                    yield_total: row.get(0)?,
                    yield_q30: row.get(1)?,
                    quality_score_mean: row.get(2)?,
                    category: row.get(3)?,
                    count: row.get(4)?,
                    error_rate: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }
}

impl RunStorePort for SqliteRunStore {
    fn add_sequencing_run(&self, run: &SequencingRun) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sequencing_runs (run_id, run_number, flowcell, sequencer, run_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run.id,
                run.number,
                run.flowcell,
                run.sequencer,
                run.date.format(DATE_FORMAT).to_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn add_run_summary(&self, run_ref: i64, summary: &Summary) -> Result<()> {
        self.conn.execute(
            "INSERT INTO run_summaries
             (run_ref, yield_total, yield_q30, quality_score_mean, category, count, error_rate)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_ref,
                summary.yield_total,
                summary.yield_q30,
                summary.quality_score_mean,
                summary.category,
                summary.count,
                summary.error_rate
            ],
        )?;
        Ok(())
    }
}
