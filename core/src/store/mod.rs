//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The engine never touches it; runners hand it a finished Dataset.

use crate::{
    config::EngineConfig,
    error::SimResult,
    event::{EventLogEntry, PipelineEvent},
};
use rusqlite::{params, Connection, OptionalExtension};

mod dataset;

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_datasets.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        config: &EngineConfig,
        version: &str,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, population, as_of, version)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run_id,
                config.seed.to_string(),
                config.population as i64,
                config.as_of.to_rfc3339(),
                version,
            ],
        )?;
        Ok(())
    }

    /// The master seed recorded for a run, if the run exists.
    pub fn run_seed(&self, run_id: &str) -> SimResult<Option<u64>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT seed FROM run WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            None => Ok(None),
            Some(text) => {
                let seed = text
                    .parse::<u64>()
                    .map_err(|e| anyhow::anyhow!("run {run_id} has malformed seed '{text}': {e}"))?;
                Ok(Some(seed))
            }
        }
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, seq, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![entry.run_id, entry.seq, entry.event_type, entry.payload],
        )?;
        Ok(())
    }

    /// Persist a run's stage events in order.
    pub fn append_events(&self, run_id: &str, events: &[PipelineEvent]) -> SimResult<()> {
        for (seq, event) in events.iter().enumerate() {
            let entry = EventLogEntry {
                id:         None,
                run_id:     run_id.to_string(),
                seq:        seq as u32,
                event_type: event.type_name().to_string(),
                payload:    serde_json::to_string(event)?,
            };
            self.append_event(&entry)?;
        }
        Ok(())
    }

    pub fn events_for_run(&self, run_id: &str) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, seq, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY seq ASC, id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    seq:        row.get(2)?,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Counts ─────────────────────────────────────────────────

    pub fn profile_count(&self, run_id: &str) -> SimResult<i64> {
        self.count("SELECT COUNT(*) FROM customer_profile WHERE run_id = ?1", run_id)
    }

    pub fn interaction_count(&self, run_id: &str) -> SimResult<i64> {
        self.count("SELECT COUNT(*) FROM interaction_event WHERE run_id = ?1", run_id)
    }

    pub fn recommendation_count(&self, run_id: &str) -> SimResult<i64> {
        self.count("SELECT COUNT(*) FROM recommendation WHERE run_id = ?1", run_id)
    }

    pub fn ab_test_count(&self, run_id: &str) -> SimResult<i64> {
        self.count("SELECT COUNT(*) FROM ab_test_result WHERE run_id = ?1", run_id)
    }

    fn count(&self, sql: &str, run_id: &str) -> SimResult<i64> {
        let n = self.conn.query_row(sql, params![run_id], |row| row.get(0))?;
        Ok(n)
    }
}
