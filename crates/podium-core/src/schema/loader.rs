//! The record loader: all-or-nothing bulk inserts.
//!
//! A [`Loader`] wraps one SQLite transaction. Every record is validated
//! before it is written; the first violation (or any database error) is
//! returned and, because the loader is dropped without [`Loader::commit`],
//! everything written through it is rolled back.

use rusqlite::{params, Statement, Transaction};

use crate::error::Result;
use crate::model::{AssignmentRaw, InstrumentRecord, PersonName};

/// A record type with a home relation.
pub trait Loadable {
    /// The relation records are inserted into.
    const RELATION: &'static str;

    /// Parameterised `INSERT` for one record.
    const INSERT_SQL: &'static str;

    /// Check required fields before anything is written.
    fn validate(&self) -> Result<()>;

    /// Execute the prepared insert for this record.
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;
}

impl Loadable for InstrumentRecord {
    const RELATION: &'static str = "instruments";
    const INSERT_SQL: &'static str = "INSERT INTO instruments (instrument, section) VALUES (?1, ?2)";

    fn validate(&self) -> Result<()> {
        InstrumentRecord::validate(self)
    }

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.name, self.section])
    }
}

impl Loadable for PersonName {
    const RELATION: &'static str = "names";
    const INSERT_SQL: &'static str =
        "INSERT INTO names (first_name, middle_name, last_name) VALUES (?1, ?2, ?3)";

    fn validate(&self) -> Result<()> {
        PersonName::validate(self)
    }

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.first_name, self.middle_name, self.last_name])
    }
}

impl Loadable for AssignmentRaw {
    const RELATION: &'static str = "assignments_by_name";
    const INSERT_SQL: &'static str = "INSERT INTO assignments_by_name
        (instrument, first_name, middle_name, last_name) VALUES (?1, ?2, ?3, ?4)";

    fn validate(&self) -> Result<()> {
        AssignmentRaw::validate(self)
    }

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.instrument,
            self.name.first_name,
            self.name.middle_name,
            self.name.last_name,
        ])
    }
}

/// A scoped bulk-load session over one transaction.
#[derive(Debug)]
pub struct Loader<'db> {
    tx: Transaction<'db>,
}

impl<'db> Loader<'db> {
    pub(crate) fn new(tx: Transaction<'db>) -> Self {
        Self { tx }
    }

    /// Insert every record into `R::RELATION`, each under a fresh surrogate id.
    ///
    /// Returns the number of rows written.
    pub fn load<R: Loadable>(&self, records: &[R]) -> Result<usize> {
        for record in records {
            record.validate()?;
        }

        let mut stmt = self.tx.prepare(R::INSERT_SQL)?;
        for record in records {
            record.insert(&mut stmt)?;
        }

        log::debug!("Loaded {} rows into {}", records.len(), R::RELATION);
        Ok(records.len())
    }

    /// Make everything loaded through this session durable.
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}
