//! Reconcile stage: regenerate the person/instrument link table.
//!
//! Reads the complete canonical tables, runs the in-memory reconciler, and
//! swaps the link table in one transaction. Unmatched assignment rows are
//! logged and counted, never treated as failures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use podium_core::model::{AssignmentLink, AssignmentRaw, MatchBranch};
use podium_core::reconcile::{Reconciler, UnmatchedReason};
use podium_core::schema::Database;
use treadle::{Stage, StageContext, StageOutcome};

use crate::error::EtlResult;

/// One assignment row that produced no link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedAssignment {
    pub assignment: AssignmentRaw,
    pub reason: UnmatchedReason,
}

/// Counts from one reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub links: usize,
    pub first_name_links: usize,
    pub middle_name_links: usize,
    pub unmatched: Vec<UnmatchedAssignment>,
}

/// Derive links from the store's current contents without writing them.
pub fn preview_links(db: &Database) -> EtlResult<(Vec<AssignmentLink>, ReconcileSummary)> {
    let persons = db.list_persons()?;
    let instruments = db.list_instruments()?;
    let assignments = db.list_raw_assignments()?;

    let outcome = Reconciler::new(&persons, &instruments).reconcile(&assignments);

    let summary = ReconcileSummary {
        links: outcome.links.len(),
        first_name_links: outcome.count_by_branch(MatchBranch::FirstName),
        middle_name_links: outcome.count_by_branch(MatchBranch::MiddleName),
        unmatched: outcome
            .unmatched
            .iter()
            .map(|u| UnmatchedAssignment {
                assignment: assignments[u.index].clone(),
                reason: u.reason,
            })
            .collect(),
    };

    Ok((outcome.links, summary))
}

/// Regenerate the link table of `db`.
pub fn reconcile_database(db: &mut Database) -> EtlResult<ReconcileSummary> {
    let (links, summary) = preview_links(db)?;
    db.replace_links(&links)?;

    for unmatched in &summary.unmatched {
        log::debug!(
            "No link for {:?} on {} ({:?})",
            unmatched.assignment.name.full_name(),
            unmatched.assignment.instrument,
            unmatched.reason
        );
    }
    if !summary.unmatched.is_empty() {
        log::warn!(
            "{} assignment rows matched no person and were dropped",
            summary.unmatched.len()
        );
    }
    log::info!(
        "Reconciled {} links ({} by first name, {} by middle name)",
        summary.links,
        summary.first_name_links,
        summary.middle_name_links
    );

    Ok(summary)
}

/// The Reconcile stage: link raw assignments to canonical persons.
#[derive(Debug)]
pub struct ReconcileStage {
    db_path: PathBuf,
}

impl ReconcileStage {
    #[must_use]
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

#[async_trait::async_trait]
impl Stage for ReconcileStage {
    fn name(&self) -> &str {
        "reconcile"
    }

    async fn execute(
        &self,
        item: &dyn treadle::WorkItem,
        ctx: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Starting reconciliation for {}", item.id());

        let mut db = Database::open(&self.db_path).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Failed to open database: {e}"))
        })?;

        let summary = reconcile_database(&mut db).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Reconciliation failed: {e}"))
        })?;

        let summary_json = serde_json::to_value(&summary).map_err(|e| {
            treadle::TreadleError::StageExecution(format!(
                "Failed to serialize reconcile summary: {e}"
            ))
        })?;
        ctx.metadata
            .insert("reconcile_summary".to_string(), summary_json);

        Ok(StageOutcome::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_core::model::{InstrumentRecord, PersonName};

    fn name(first: &str, middle: Option<&str>, last: Option<&str>) -> PersonName {
        PersonName::new(
            Some(first.to_string()),
            middle.map(String::from),
            last.map(String::from),
        )
    }

    fn seeded() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        let loader = db.begin_load().unwrap();
        loader
            .load(&[
                InstrumentRecord::new("trombone", "brass"),
                InstrumentRecord::new("piano", "keyboards"),
            ])
            .unwrap();
        loader
            .load(&[
                name("w.", Some("seymour"), Some("skinner")),
                name("homer", Some("j."), Some("simpson")),
            ])
            .unwrap();
        loader
            .load(&[
                AssignmentRaw::new("trombone", name("w.", Some("seymour"), Some("skinner"))),
                AssignmentRaw::new("piano", name("homer", None, Some("simpson"))),
                AssignmentRaw::new("piano", name("moe", None, Some("szyslak"))),
            ])
            .unwrap();
        loader.commit().unwrap();
        db
    }

    #[test]
    fn test_reconcile_database_writes_links() {
        let mut db = seeded();
        let summary = reconcile_database(&mut db).unwrap();

        assert_eq!(summary.links, 2);
        assert_eq!(summary.first_name_links, 1);
        assert_eq!(summary.middle_name_links, 1);
        assert_eq!(summary.unmatched.len(), 1);
        assert_eq!(summary.unmatched[0].reason, UnmatchedReason::NoPerson);
        assert_eq!(db.list_links().unwrap().len(), 2);
    }

    #[test]
    fn test_reconcile_is_regenerated_not_appended() {
        let mut db = seeded();
        reconcile_database(&mut db).unwrap();
        reconcile_database(&mut db).unwrap();
        assert_eq!(db.list_links().unwrap().len(), 2);
    }

    #[test]
    fn test_preview_does_not_write() {
        let db = seeded();
        let (links, summary) = preview_links(&db).unwrap();
        assert_eq!(links.len(), summary.links);
        assert!(db.list_links().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_stage_records_summary() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("test.db");
        {
            let mut db = Database::open(&db_path).unwrap();
            let loader = db.begin_load().unwrap();
            loader
                .load(&[InstrumentRecord::new("piano", "keyboards")])
                .unwrap();
            loader.load(&[PersonName::first_only("bender")]).unwrap();
            loader
                .load(&[AssignmentRaw::new("piano", PersonName::first_only("bender"))])
                .unwrap();
            loader.commit().unwrap();
        }

        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        struct TestItem {
            id: String,
        }

        impl treadle::WorkItem for TestItem {
            fn id(&self) -> &str {
                &self.id
            }
        }

        let stage = ReconcileStage::new(db_path.clone());
        let item = TestItem {
            id: "run-1".to_string(),
        };
        let mut ctx = StageContext::new("reconcile".to_string());

        let outcome = stage.execute(&item, &mut ctx).await.unwrap();
        assert_eq!(outcome, StageOutcome::Complete);

        let summary: ReconcileSummary =
            serde_json::from_value(ctx.metadata.get("reconcile_summary").unwrap().clone())
                .unwrap();
        assert_eq!(summary.links, 1);
        assert!(summary.unmatched.is_empty());

        let db = Database::open(&db_path).unwrap();
        assert_eq!(db.stats().unwrap().links, 1);
    }
}
