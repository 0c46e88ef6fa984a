use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::model::ids::{InstrumentId, PersonId};
use crate::model::person::PersonName;

/// An unreconciled claim that somebody plays an instrument.
///
/// The name is whatever the assignment source said, parsed but not yet
/// tied to a canonical person. One row exists per (mention, instrument).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRaw {
    pub instrument: String,
    pub name: PersonName,
}

impl AssignmentRaw {
    #[must_use]
    pub fn new(instrument: impl Into<String>, name: PersonName) -> Self {
        Self {
            instrument: instrument.into(),
            name,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.instrument.trim().is_empty() {
            return Err(Error::MissingField {
                relation: "assignments_by_name",
                field: "instrument",
            });
        }
        Ok(())
    }
}

/// Which person field an assignment's name key was matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchBranch {
    /// The key equalled the person's first name.
    FirstName,
    /// The key equalled the person's middle name.
    MiddleName,
}

impl MatchBranch {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::MiddleName => "middle_name",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "first_name" => Some(Self::FirstName),
            "middle_name" => Some(Self::MiddleName),
            _ => None,
        }
    }
}

impl fmt::Display for MatchBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reconciled (person, instrument) pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentLink {
    pub person_id: PersonId,
    pub instrument_id: InstrumentId,
    pub matched_on: MatchBranch,
}
