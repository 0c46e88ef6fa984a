//! Load stage: read the sources, rotate the old store, and bulk-load.
//!
//! Sources are read and parsed in full before the existing database is
//! touched, so a bad input file leaves the previous store in place. The
//! three relations are then written in one transaction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use podium_core::model::{AssignmentRaw, InstrumentRecord, PersonName};
use podium_core::names::parse_name;
use podium_core::schema::Database;
use treadle::{Stage, StageContext, StageOutcome};

use crate::backup::rotate_database;
use crate::error::EtlResult;
use crate::source::{read_table, RawRow, SourcePaths, TableFormat};

/// What a load wrote, plus the rows it could not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Where the previous database was moved, if there was one.
    pub backup: Option<PathBuf>,
    pub instruments: usize,
    pub persons: usize,
    pub raw_assignments: usize,
    /// Canonical names that fit no known shape; these were not loaded.
    pub unparsed_names: Vec<String>,
    /// Assignment names that fit no known shape; loaded with empty name
    /// fields, so they can never be reconciled.
    pub unparsed_assignments: Vec<String>,
}

/// Source rows converted into loadable records.
#[derive(Debug, Clone, Default)]
pub struct PreparedSources {
    pub instruments: Vec<InstrumentRecord>,
    pub persons: Vec<PersonName>,
    pub assignments: Vec<AssignmentRaw>,
    pub unparsed_names: Vec<String>,
    pub unparsed_assignments: Vec<String>,
}

impl PreparedSources {
    /// Read and parse all three sources.
    pub fn read(sources: &SourcePaths) -> EtlResult<Self> {
        let instruments = read_table(&sources.instruments, TableFormat::INSTRUMENTS)?;
        let names = read_table(&sources.names, TableFormat::NAMES)?;
        let assignments = read_table(&sources.assignments, TableFormat::ASSIGNMENTS)?;
        Ok(Self::from_rows(&instruments, &names, &assignments))
    }

    #[must_use]
    pub fn from_rows(instruments: &[RawRow], names: &[RawRow], assignments: &[RawRow]) -> Self {
        let (persons, unparsed_names) = prepare_persons(names);
        let (assignments, unparsed_assignments) = prepare_assignments(assignments);
        Self {
            instruments: prepare_instruments(instruments),
            persons,
            assignments,
            unparsed_names,
            unparsed_assignments,
        }
    }

    /// Write everything into `db` as one all-or-nothing load.
    pub fn load_into(&self, db: &mut Database) -> EtlResult<LoadSummary> {
        let loader = db.begin_load()?;
        let instruments = loader.load(&self.instruments)?;
        let persons = loader.load(&self.persons)?;
        let raw_assignments = loader.load(&self.assignments)?;
        loader.commit()?;

        for name in &self.unparsed_names {
            log::warn!("Skipped unparseable name: {name:?}");
        }
        if !self.unparsed_assignments.is_empty() {
            log::warn!(
                "{} assignment names could not be parsed and will not reconcile",
                self.unparsed_assignments.len()
            );
        }
        log::info!(
            "Loaded {} instruments, {} persons, {} assignments",
            instruments,
            persons,
            raw_assignments
        );

        Ok(LoadSummary {
            backup: None,
            instruments,
            persons,
            raw_assignments,
            unparsed_names: self.unparsed_names.clone(),
            unparsed_assignments: self.unparsed_assignments.clone(),
        })
    }
}

#[must_use]
pub fn prepare_instruments(rows: &[RawRow]) -> Vec<InstrumentRecord> {
    rows.iter()
        .map(|row| InstrumentRecord::new(row.get("instrument"), row.get("section")))
        .collect()
}

/// Parse canonical names; unparseable ones are returned separately.
#[must_use]
pub fn prepare_persons(rows: &[RawRow]) -> (Vec<PersonName>, Vec<String>) {
    let mut persons = Vec::with_capacity(rows.len());
    let mut unparsed = Vec::new();
    for row in rows {
        let raw = row.get("name");
        let parsed = parse_name(raw);
        if parsed.is_parsed() {
            persons.push(parsed.into_person_name());
        } else {
            unparsed.push(raw.to_string());
        }
    }
    (persons, unparsed)
}

/// Parse assignment names. Unparseable names still yield a row (with no
/// name fields) and are also returned separately.
#[must_use]
pub fn prepare_assignments(rows: &[RawRow]) -> (Vec<AssignmentRaw>, Vec<String>) {
    let mut unparsed = Vec::new();
    let assignments = rows
        .iter()
        .map(|row| {
            let raw = row.get("name");
            let parsed = parse_name(raw);
            if !parsed.is_parsed() {
                log::debug!("Unparseable assignment name: {raw:?}");
                unparsed.push(raw.to_string());
            }
            AssignmentRaw::new(row.get("instrument"), parsed.into_person_name())
        })
        .collect();
    (assignments, unparsed)
}

/// Rebuild the database at `db_path` from `sources`.
pub fn rebuild_database(db_path: &std::path::Path, sources: &SourcePaths) -> EtlResult<LoadSummary> {
    let prepared = PreparedSources::read(sources)?;
    let backup = rotate_database(db_path)?;
    let mut db = Database::open(db_path)?;
    let summary = prepared.load_into(&mut db)?;
    Ok(LoadSummary { backup, ..summary })
}

/// The Load stage: rotate the old store and load fresh sources into it.
#[derive(Debug)]
pub struct LoadStage {
    sources: SourcePaths,
    db_path: PathBuf,
}

impl LoadStage {
    #[must_use]
    pub fn new(sources: SourcePaths, db_path: PathBuf) -> Self {
        Self { sources, db_path }
    }
}

#[async_trait::async_trait]
impl Stage for LoadStage {
    fn name(&self) -> &str {
        "load"
    }

    async fn execute(
        &self,
        item: &dyn treadle::WorkItem,
        ctx: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Starting load for {}", item.id());

        let summary = rebuild_database(&self.db_path, &self.sources).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Load failed: {e}"))
        })?;

        let summary_json = serde_json::to_value(&summary).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Failed to serialize load summary: {e}"))
        })?;
        ctx.metadata.insert("load_summary".to_string(), summary_json);

        Ok(StageOutcome::Complete)
    }
}
