use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ids::InstrumentId;

/// An instrument from the reference list, before it has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Lowercased instrument name, the key assignments are matched on.
    pub name: String,
    pub section: String,
}

impl InstrumentRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            section: section.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MissingField {
                relation: "instruments",
                field: "instrument",
            });
        }
        if self.section.trim().is_empty() {
            return Err(Error::MissingField {
                relation: "instruments",
                field: "section",
            });
        }
        Ok(())
    }
}

/// An instrument as persisted in the `instruments` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    pub name: String,
    pub section: String,
}
