use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ids::PersonId;

/// A personal name decomposed into its (first, middle, last) components.
///
/// Components are stored as they were ingested, which for loaded data
/// means trimmed and lowercased. Any component may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonName {
    #[must_use]
    pub fn new(
        first_name: Option<String>,
        middle_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        Self {
            first_name,
            middle_name,
            last_name,
        }
    }

    /// A name with only a first component.
    #[must_use]
    pub fn first_only(first_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.middle_name.is_none() && self.last_name.is_none()
    }

    /// Check the canonical-person invariant: a first or last name is present.
    pub fn validate(&self) -> Result<()> {
        if self.first_name.is_none() && self.last_name.is_none() {
            return Err(Error::MissingField {
                relation: "names",
                field: "first_name",
            });
        }
        Ok(())
    }

    /// The components joined with single spaces in "first middle last" order.
    #[must_use]
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A canonical person as persisted in the `names` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: PersonName,
}

impl Person {
    #[must_use]
    pub fn new(id: PersonId, name: PersonName) -> Self {
        Self { id, name }
    }
}
