//! Classify free-text personal names into one of five supported shapes.
//!
//! Shapes are tried in a fixed order and the first whole-string match wins:
//!
//! | # | shape                | example                     |
//! |---|----------------------|-----------------------------|
//! | 1 | `first last`         | `George Washington`         |
//! | 2 | `first middle last`  | `John Q. Adams`             |
//! | 3 | `first`              | `Prince`                    |
//! | 4 | `last, first`        | `Obama, Barack`             |
//! | 5 | `last, first middle` | `Skinner, W. Seymour`       |
//!
//! Anything else is [`ParsedName::Unparsed`]. Callers decide whether to
//! surface or drop such rows.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::model::PersonName;

/// The recognised name layouts, in match precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameShape {
    FirstLast,
    FirstMiddleLast,
    FirstOnly,
    LastFirst,
    LastFirstMiddle,
}

impl NameShape {
    /// Every shape, in the order they are tried.
    pub const ALL: [Self; 5] = [
        Self::FirstLast,
        Self::FirstMiddleLast,
        Self::FirstOnly,
        Self::LastFirst,
        Self::LastFirstMiddle,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstLast => "first last",
            Self::FirstMiddleLast => "first middle last",
            Self::FirstOnly => "first",
            Self::LastFirst => "last, first",
            Self::LastFirstMiddle => "last, first middle",
        }
    }

    const fn pattern(self) -> &'static str {
        match self {
            Self::FirstLast => r"^\w+ \w+$",
            // The middle token may be an initial ("John Q. Adams").
            Self::FirstMiddleLast => r"^\w+ [\w.]+ \w+$",
            Self::FirstOnly => r"^\w+$",
            Self::LastFirst => r"^\w+, [\w.]+$",
            Self::LastFirstMiddle => r"^\w+, [\w.]+ [\w.]+$",
        }
    }
}

impl fmt::Display for NameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[allow(clippy::expect_used)]
static SHAPE_PATTERNS: LazyLock<Vec<(NameShape, Regex)>> = LazyLock::new(|| {
    NameShape::ALL
        .iter()
        .map(|&shape| {
            let re = Regex::new(shape.pattern()).expect("name shape patterns are valid");
            (shape, re)
        })
        .collect()
});

/// The result of classifying a name string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsedName {
    Unparsed,
    FirstLast {
        first: String,
        last: String,
    },
    FirstMiddleLast {
        first: String,
        middle: String,
        last: String,
    },
    FirstOnly {
        first: String,
    },
    LastFirst {
        last: String,
        first: String,
    },
    LastFirstMiddle {
        last: String,
        first: String,
        middle: String,
    },
}

impl ParsedName {
    #[must_use]
    pub const fn shape(&self) -> Option<NameShape> {
        match self {
            Self::Unparsed => None,
            Self::FirstLast { .. } => Some(NameShape::FirstLast),
            Self::FirstMiddleLast { .. } => Some(NameShape::FirstMiddleLast),
            Self::FirstOnly { .. } => Some(NameShape::FirstOnly),
            Self::LastFirst { .. } => Some(NameShape::LastFirst),
            Self::LastFirstMiddle { .. } => Some(NameShape::LastFirstMiddle),
        }
    }

    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        !matches!(self, Self::Unparsed)
    }

    /// Flatten into optional (first, middle, last) components.
    ///
    /// An unparsed name yields a [`PersonName`] with every field unset.
    #[must_use]
    pub fn into_person_name(self) -> PersonName {
        match self {
            Self::Unparsed => PersonName::default(),
            Self::FirstLast { first, last } | Self::LastFirst { last, first } => {
                PersonName::new(Some(first), None, Some(last))
            }
            Self::FirstMiddleLast {
                first,
                middle,
                last,
            }
            | Self::LastFirstMiddle {
                last,
                first,
                middle,
            } => PersonName::new(Some(first), Some(middle), Some(last)),
            Self::FirstOnly { first } => PersonName::first_only(first),
        }
    }
}

/// Classify `raw` and split it into name components.
///
/// Surrounding whitespace is ignored; inner spacing must be single spaces
/// (and `", "` after the comma in the last-name-first layouts).
#[must_use]
pub fn parse_name(raw: &str) -> ParsedName {
    let input = raw.trim();

    let Some(shape) = SHAPE_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(input))
        .map(|(shape, _)| *shape)
    else {
        return ParsedName::Unparsed;
    };

    extract(shape, input).unwrap_or(ParsedName::Unparsed)
}

fn extract(shape: NameShape, input: &str) -> Option<ParsedName> {
    let token = |s: &str| s.trim().to_string();

    let parsed = match shape {
        NameShape::FirstLast => {
            let (first, last) = input.split_once(' ')?;
            ParsedName::FirstLast {
                first: token(first),
                last: token(last),
            }
        }
        NameShape::FirstMiddleLast => {
            let mut parts = input.split(' ');
            ParsedName::FirstMiddleLast {
                first: token(parts.next()?),
                middle: token(parts.next()?),
                last: token(parts.next()?),
            }
        }
        NameShape::FirstOnly => ParsedName::FirstOnly {
            first: token(input),
        },
        NameShape::LastFirst => {
            let (last, first) = input.split_once(',')?;
            ParsedName::LastFirst {
                last: token(last),
                first: token(first),
            }
        }
        NameShape::LastFirstMiddle => {
            let (last, rest) = input.split_once(',')?;
            let (first, middle) = rest.trim().split_once(' ')?;
            ParsedName::LastFirstMiddle {
                last: token(last),
                first: token(first),
                middle: token(middle),
            }
        }
    };

    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(raw: &str) -> (Option<String>, Option<String>, Option<String>) {
        let name = parse_name(raw).into_person_name();
        (name.first_name, name.middle_name, name.last_name)
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_first_last() {
        assert_eq!(components("Pepe LePew"), (some("Pepe"), None, some("LePew")));
        assert_eq!(parse_name("Pepe LePew").shape(), Some(NameShape::FirstLast));
    }

    #[test]
    fn test_first_middle_last() {
        assert_eq!(
            components("Daffy Sheldon Duck"),
            (some("Daffy"), some("Sheldon"), some("Duck"))
        );
    }

    #[test]
    fn test_first_middle_initial_last() {
        assert_eq!(
            components("homer j. simpson"),
            (some("homer"), some("j."), some("simpson"))
        );
    }

    #[test]
    fn test_first_only() {
        assert_eq!(components("Bender"), (some("Bender"), None, None));
        assert_eq!(parse_name("Bender").shape(), Some(NameShape::FirstOnly));
    }

    #[test]
    fn test_last_first() {
        assert_eq!(components("Simpson, Lisa"), (some("Lisa"), None, some("Simpson")));
        assert_eq!(parse_name("Simpson, Lisa").shape(), Some(NameShape::LastFirst));
    }

    #[test]
    fn test_last_initial() {
        assert_eq!(components("Obama, B."), (some("B."), None, some("Obama")));
    }

    #[test]
    fn test_last_first_middle() {
        assert_eq!(
            components("Burns, Charles Montgomery"),
            (some("Charles"), some("Montgomery"), some("Burns"))
        );
    }

    #[test]
    fn test_last_initial_middle() {
        assert_eq!(
            components("Skinner, W. Seymour"),
            (some("W."), some("Seymour"), some("Skinner"))
        );
        assert_eq!(
            parse_name("Skinner, W. Seymour").shape(),
            Some(NameShape::LastFirstMiddle)
        );
    }

    #[test]
    fn test_last_first_middle_initial() {
        assert_eq!(
            components("Simpson, Homer J."),
            (some("Homer"), some("J."), some("Simpson"))
        );
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(components("  Lisa Simpson\t"), (some("Lisa"), None, some("Simpson")));
    }

    #[test]
    fn test_unparsed_shapes() {
        for raw in [
            "",
            "Lisa  Simpson",
            "Mr. Burns",
            "a b c d",
            "Simpson,Lisa",
            "Simpson, Lisa Marie Jr",
            "Simpson, ",
            "Flanders, Ned, Jr.",
        ] {
            let parsed = parse_name(raw);
            assert_eq!(parsed, ParsedName::Unparsed, "expected {raw:?} to be unparsed");
            assert!(!parsed.is_parsed());
            assert!(parsed.into_person_name().is_empty());
        }
    }

    #[test]
    fn test_first_initial_is_not_a_first_middle_last() {
        // "J. Jonah Jameson" has a period in the first token, which only the
        // middle position allows.
        assert_eq!(parse_name("J. Jonah Jameson"), ParsedName::Unparsed);
    }

    #[test]
    fn test_reparse_of_first_last_is_stable() {
        for raw in ["Pepe LePew", "Simpson, Lisa", "ned flanders"] {
            let name = parse_name(raw).into_person_name();
            let rebuilt = name.full_name();
            assert_eq!(parse_name(&rebuilt).into_person_name(), name);
        }
    }

    #[test]
    fn test_reparse_of_first_middle_last_is_stable() {
        for raw in ["Burns, Charles Montgomery", "Simpson, Homer J.", "Daffy Sheldon Duck"] {
            let name = parse_name(raw).into_person_name();
            let rebuilt = name.full_name();
            assert_eq!(parse_name(&rebuilt).into_person_name(), name);
        }
    }

    #[test]
    fn test_unicode_word_characters() {
        assert_eq!(components("Béla Bartók"), (some("Béla"), None, some("Bartók")));
    }
}
