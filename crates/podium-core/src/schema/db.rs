use rusqlite::types::Type;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{
    AssignmentLink, AssignmentRaw, Instrument, MatchBranch, Person, PersonName,
};
use crate::report::{ReportKind, ReportTable};

use super::loader::Loader;
use super::migrations::MIGRATIONS;

/// Row counts for each stored relation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub instruments: usize,
    pub persons: usize,
    pub raw_assignments: usize,
    pub links: usize,
}

/// A database connection over the roster relations.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        // Per-connection setting; links must point at stored rows.
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }

    /// Start an all-or-nothing bulk load.
    pub fn begin_load(&mut self) -> Result<Loader<'_>> {
        let tx = self.conn.transaction()?;
        Ok(Loader::new(tx))
    }

    /// Count the rows in every relation.
    pub fn stats(&self) -> Result<StoreStats> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get(0)
                    })?;
            usize::try_from(n).map_err(|_| Error::InvalidData(format!("negative count in {table}")))
        };

        Ok(StoreStats {
            instruments: count("instruments")?,
            persons: count("names")?,
            raw_assignments: count("assignments_by_name")?,
            links: count("assignments")?,
        })
    }
}

// Canonical tables
impl Database {
    /// All canonical persons in id order.
    pub fn list_persons(&self) -> Result<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, middle_name, last_name FROM names ORDER BY id",
        )?;
        let persons = stmt
            .query_map([], |row| {
                Ok(Person::new(
                    row.get(0)?,
                    PersonName::new(row.get(1)?, row.get(2)?, row.get(3)?),
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(persons)
    }

    /// All instruments in id order.
    pub fn list_instruments(&self) -> Result<Vec<Instrument>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, instrument, section FROM instruments ORDER BY id")?;
        let instruments = stmt
            .query_map([], |row| {
                Ok(Instrument {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    section: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(instruments)
    }

    /// All raw assignment rows in load order.
    pub fn list_raw_assignments(&self) -> Result<Vec<AssignmentRaw>> {
        let mut stmt = self.conn.prepare(
            "SELECT instrument, first_name, middle_name, last_name
             FROM assignments_by_name
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(AssignmentRaw::new(
                    row.get::<_, String>(0)?,
                    PersonName::new(row.get(1)?, row.get(2)?, row.get(3)?),
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

// Link table
impl Database {
    /// Replace the whole link table with `links`, atomically.
    pub fn replace_links(&mut self, links: &[AssignmentLink]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM assignments", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO assignments (player_id, instrument_id, matched_on)
                 VALUES (?1, ?2, ?3)",
            )?;
            for link in links {
                stmt.execute(params![
                    link.person_id,
                    link.instrument_id,
                    link.matched_on.as_str()
                ])?;
            }
        }
        tx.commit()?;

        log::debug!(
            "Replaced {} assignment links with {}",
            removed,
            links.len()
        );
        Ok(links.len())
    }

    /// All links in insertion order.
    pub fn list_links(&self) -> Result<Vec<AssignmentLink>> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, instrument_id, matched_on FROM assignments ORDER BY id",
        )?;
        let links = stmt
            .query_map([], |row| {
                let matched_on: String = row.get(2)?;
                let matched_on = MatchBranch::parse(&matched_on).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        Type::Text,
                        Box::new(Error::InvalidData(format!(
                            "unknown match branch: {matched_on}"
                        ))),
                    )
                })?;
                Ok(AssignmentLink {
                    person_id: row.get(0)?,
                    instrument_id: row.get(1)?,
                    matched_on,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(links)
    }
}

// Reports
impl Database {
    /// Read one report view.
    pub fn query_report(&self, kind: ReportKind) -> Result<ReportTable> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {}", kind.view_name()))?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Option<String>>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ReportTable::new(kind, columns, rows))
    }
}
