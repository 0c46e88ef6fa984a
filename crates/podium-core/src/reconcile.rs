//! Identity reconciliation: tie raw assignment rows to canonical persons.
//!
//! A raw row links to every person whose first name (branch A) or middle
//! name (branch B) equals the row's [`match_key`], whose last name equals
//! the row's last name, and to every instrument with the row's instrument
//! name. Absent last names compare equal to each other. The two branches
//! are a union with duplicates kept: a row that matches one person through
//! both branches produces two links.
//!
//! Rows that produce no link are reported in [`ReconcileOutcome::unmatched`]
//! and otherwise ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{
    AssignmentLink, AssignmentRaw, Instrument, InstrumentId, MatchBranch, Person, PersonId,
};
use crate::names::match_key;

/// Stand-in for an absent last name when comparing.
pub const UNDEFINED_LAST_NAME: &str = "UNDEFINED";

fn last_name_key(last_name: Option<&str>) -> &str {
    last_name.unwrap_or(UNDEFINED_LAST_NAME)
}

/// Name key, then last-name key, to the persons carrying both.
type NameIndex<'a> = HashMap<&'a str, HashMap<&'a str, Vec<PersonId>>>;

/// Why an assignment row produced no link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnmatchedReason {
    /// The row has no first name, or an initial with no middle name.
    NoNameKey,
    /// No stored instrument carries the row's instrument name.
    UnknownInstrument,
    /// No person matches the row under either branch.
    NoPerson,
}

/// An assignment row that produced no link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unmatched {
    /// Position of the row in the input slice.
    pub index: usize,
    pub reason: UnmatchedReason,
}

/// Links derived from one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Branch A links first, then branch B, each in input row order.
    pub links: Vec<AssignmentLink>,
    pub unmatched: Vec<Unmatched>,
}

impl ReconcileOutcome {
    #[must_use]
    pub fn count_by_branch(&self, branch: MatchBranch) -> usize {
        self.links.iter().filter(|l| l.matched_on == branch).count()
    }
}

/// In-memory indexes over the canonical tables.
#[derive(Debug)]
pub struct Reconciler<'a> {
    by_first: NameIndex<'a>,
    by_middle: NameIndex<'a>,
    instruments: HashMap<&'a str, Vec<InstrumentId>>,
}

impl<'a> Reconciler<'a> {
    /// Index `persons` and `instruments`.
    ///
    /// Ids under one key keep the order of the input slices, so callers that
    /// pass rows in id order get links in id order.
    #[must_use]
    pub fn new(persons: &'a [Person], instruments: &'a [Instrument]) -> Self {
        let mut by_first: NameIndex<'a> = HashMap::new();
        let mut by_middle: NameIndex<'a> = HashMap::new();

        for person in persons {
            let last = last_name_key(person.name.last_name.as_deref());
            if let Some(first) = person.name.first_name.as_deref() {
                by_first
                    .entry(first)
                    .or_default()
                    .entry(last)
                    .or_default()
                    .push(person.id);
            }
            if let Some(middle) = person.name.middle_name.as_deref() {
                by_middle
                    .entry(middle)
                    .or_default()
                    .entry(last)
                    .or_default()
                    .push(person.id);
            }
        }

        let mut by_instrument: HashMap<&'a str, Vec<InstrumentId>> = HashMap::new();
        for instrument in instruments {
            by_instrument
                .entry(instrument.name.as_str())
                .or_default()
                .push(instrument.id);
        }

        Self {
            by_first,
            by_middle,
            instruments: by_instrument,
        }
    }

    /// Derive the complete link set for `assignments`.
    #[must_use]
    pub fn reconcile(&self, assignments: &[AssignmentRaw]) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        let mut linked = vec![false; assignments.len()];

        for branch in [MatchBranch::FirstName, MatchBranch::MiddleName] {
            for (row, raw) in assignments.iter().enumerate() {
                let people = self.candidates(branch, raw);
                let instruments = self.instruments_for(raw);
                for &person_id in people {
                    for &instrument_id in instruments {
                        outcome.links.push(AssignmentLink {
                            person_id,
                            instrument_id,
                            matched_on: branch,
                        });
                        linked[row] = true;
                    }
                }
            }
        }

        outcome.unmatched = assignments
            .iter()
            .enumerate()
            .filter(|(row, _)| !linked[*row])
            .map(|(row, raw)| Unmatched {
                index: row,
                reason: self.unmatched_reason(raw),
            })
            .collect();

        outcome
    }

    fn candidates(&self, branch: MatchBranch, raw: &AssignmentRaw) -> &[PersonId] {
        let Some(key) = match_key(&raw.name) else {
            return &[];
        };
        let index = match branch {
            MatchBranch::FirstName => &self.by_first,
            MatchBranch::MiddleName => &self.by_middle,
        };
        let last = last_name_key(raw.name.last_name.as_deref());
        index
            .get(key)
            .and_then(|by_last| by_last.get(last))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn instruments_for(&self, raw: &AssignmentRaw) -> &[InstrumentId] {
        self.instruments
            .get(raw.instrument.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn unmatched_reason(&self, raw: &AssignmentRaw) -> UnmatchedReason {
        if match_key(&raw.name).is_none() {
            UnmatchedReason::NoNameKey
        } else if self.instruments_for(raw).is_empty() {
            UnmatchedReason::UnknownInstrument
        } else {
            UnmatchedReason::NoPerson
        }
    }
}

/// Convenience wrapper: index and reconcile in one call.
#[must_use]
pub fn reconcile(
    persons: &[Person],
    instruments: &[Instrument],
    assignments: &[AssignmentRaw],
) -> ReconcileOutcome {
    Reconciler::new(persons, instruments).reconcile(assignments)
}
