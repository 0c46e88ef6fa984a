pub mod config;
pub mod parse;
pub mod reconcile;
pub mod report;
pub mod run;
pub mod status;

pub use parse::show_parse;
pub use reconcile::run_reconcile;
pub use report::show_report;
pub use run::run_pipeline;
pub use status::show_status;

use anyhow::Result;
use std::path::Path;

/// Fail unless a roster database already exists at `db_path`.
///
/// Opening a missing path would create an empty store.
pub(crate) fn require_database(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database does not exist: {}\n\nRun 'podium run' first.",
            db_path.display()
        );
    }
    Ok(())
}
