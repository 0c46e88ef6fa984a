use anyhow::Result;
use std::path::PathBuf;

/// Regenerate the links table from the rows already in the database.
pub async fn run_reconcile(db_path: PathBuf) -> Result<()> {
    super::require_database(&db_path)?;

    println!("\n🔗 Reconciling assignments\n");

    let workflow = super::run::reconcile_workflow(&db_path)?;
    super::run::execute(&workflow, &db_path).await?;

    super::show_status(&db_path)?;

    Ok(())
}
