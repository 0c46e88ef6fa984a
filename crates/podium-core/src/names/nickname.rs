//! Initial-form first names.
//!
//! An assignment written as "Skinner, W. Seymour" carries the person's
//! usable given name in the middle position. A first name that is just an
//! initial ("w." or "w") is a placeholder: the matching key for that row is
//! its middle name instead.

use crate::model::PersonName;

/// Whether `first_name` is a lone letter, optionally followed by a period.
#[must_use]
pub fn is_nickname_placeholder(first_name: &str) -> bool {
    let mut chars = first_name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(c), None, None) | (Some(c), Some('.'), None) => c.is_alphabetic(),
        _ => false,
    }
}

/// The name an assignment row is reconciled on.
///
/// This is the first name unless it is a placeholder, in which case it is
/// the middle name. `None` means the row has no usable key and can never
/// match a person.
#[must_use]
pub fn match_key(name: &PersonName) -> Option<&str> {
    let first = name.first_name.as_deref()?;
    if is_nickname_placeholder(first) {
        name.middle_name.as_deref()
    } else {
        Some(first)
    }
}
