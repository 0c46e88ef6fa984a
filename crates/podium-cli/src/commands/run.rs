use anyhow::{Context, Result};
use podium_etl::{build_pipeline, build_reconcile_pipeline, run_workflow, RosterRun, SourcePaths};
use std::path::{Path, PathBuf};

/// Rebuild the roster database from the source files.
///
/// Steps:
/// 1. Load - read the sources, rotate the old database, load everything
/// 2. Reconcile - link assignments to persons and instruments
pub async fn run_pipeline(sources: SourcePaths, db_path: PathBuf) -> Result<()> {
    println!("\n🎼 Podium Roster Pipeline\n");
    println!("  Instruments: {}", sources.instruments.display());
    println!("  Names: {}", sources.names.display());
    println!("  Assignments: {}", sources.assignments.display());
    println!("  Database: {}", db_path.display());
    println!();

    let workflow =
        build_pipeline(sources, db_path.clone()).context("Failed to build pipeline")?;

    execute(&workflow, &db_path).await?;

    println!("\n✓ Roster pipeline complete!");
    super::show_status(&db_path)?;

    println!("\nNext steps:");
    println!("  - Run 'podium report' to list the available reports");

    Ok(())
}

/// Drive a workflow to completion for a fresh run over `db_path`.
pub(crate) async fn execute(workflow: &treadle::Workflow, db_path: &Path) -> Result<()> {
    let state_path = db_path
        .parent()
        .map_or_else(|| PathBuf::from("pipeline.db"), |parent| parent.join("pipeline.db"));
    let mut store = treadle::SqliteStateStore::open(&state_path)
        .await
        .context("Failed to open pipeline state store")?;

    let work_item = RosterRun::fresh(db_path.to_path_buf());
    log::debug!("Starting run {work_item}");

    // Subscribe to events for progress display
    let mut events = workflow.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                treadle::WorkflowEvent::StageStarted { stage, .. } => {
                    println!("  ⏳ [{stage}] Starting...");
                }
                treadle::WorkflowEvent::StageCompleted { stage, .. } => {
                    println!("  ✓ [{stage}] Complete");
                }
                treadle::WorkflowEvent::StageFailed { stage, error, .. } => {
                    eprintln!("  ✗ [{stage}] FAILED: {error}");
                }
                _ => {}
            }
        }
    });

    run_workflow(workflow, &work_item, &mut store)
        .await
        .context("Pipeline execution failed")?;

    Ok(())
}

/// Workflow containing only the reconcile stage.
pub(crate) fn reconcile_workflow(db_path: &Path) -> Result<treadle::Workflow> {
    build_reconcile_pipeline(db_path.to_path_buf()).context("Failed to build pipeline")
}
