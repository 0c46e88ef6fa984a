use std::path::PathBuf;
use treadle::{StageStatus, StateStore, Workflow, WorkItem};

use crate::error::{EtlError, EtlResult};
use crate::source::SourcePaths;
use crate::{LoadStage, ReconcileStage};

/// Build the load + reconcile pipeline.
///
/// Reconcile depends on load: links are only derived once every canonical
/// row is committed.
///
/// # Errors
/// Returns an error if the workflow cannot be built.
pub fn build_pipeline(sources: SourcePaths, db_path: PathBuf) -> treadle::Result<Workflow> {
    let load_stage = LoadStage::new(sources, db_path.clone());
    let reconcile_stage = ReconcileStage::new(db_path);

    Workflow::builder()
        .stage("load", load_stage)
        .stage("reconcile", reconcile_stage)
        .dependency("reconcile", "load")
        .build()
}

/// Build a pipeline that only regenerates links over an existing store.
///
/// # Errors
/// Returns an error if the workflow cannot be built.
pub fn build_reconcile_pipeline(db_path: PathBuf) -> treadle::Result<Workflow> {
    Workflow::builder()
        .stage("reconcile", ReconcileStage::new(db_path))
        .build()
}

/// Advance `item` through `workflow` and require every stage to complete.
///
/// `Workflow::advance` records a stage failure in the store and returns
/// `Ok`, so the outcome is read back from the store afterwards.
///
/// # Errors
/// Returns [`EtlError::StageFailed`] for the first stage (in execution
/// order) that failed or was left unfinished.
pub async fn run_workflow<S: StateStore>(
    workflow: &Workflow,
    item: &dyn WorkItem,
    store: &mut S,
) -> EtlResult<()> {
    workflow.advance(item, store).await?;

    let status = workflow.status(item.id(), &*store).await?;
    if status.is_complete() {
        return Ok(());
    }

    let blocked = status
        .stages
        .iter()
        .find(|entry| entry.status == StageStatus::Failed)
        .or_else(|| {
            status
                .stages
                .iter()
                .find(|entry| entry.status != StageStatus::Complete)
        });

    match blocked {
        Some(entry) => Err(EtlError::StageFailed {
            stage: entry.name.clone(),
            message: entry
                .error
                .clone()
                .unwrap_or_else(|| format!("left in {:?} state", entry.status)),
        }),
        None => Ok(()),
    }
}
