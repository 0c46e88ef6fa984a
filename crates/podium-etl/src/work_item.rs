use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use treadle::WorkItem;

/// One load-and-reconcile run over a roster database.
///
/// This is the treadle `WorkItem` that flows through the load → reconcile
/// stages. Each run gets its own id so the pipeline state store never
/// treats a rerun as already complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRun {
    id: String,
    /// The database the run rebuilds.
    pub database_path: PathBuf,
}

impl RosterRun {
    #[must_use]
    pub fn new(id: impl Into<String>, database_path: PathBuf) -> Self {
        Self {
            id: id.into(),
            database_path,
        }
    }

    /// A run with a freshly generated id.
    #[must_use]
    pub fn fresh(database_path: PathBuf) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), database_path)
    }
}

impl WorkItem for RosterRun {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for RosterRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.database_path.display(), self.id)
    }
}
