//! The report views exposed over the roster relations.
//!
//! The views themselves live in the schema; this module names them and
//! turns their rows into display text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    AllMusicians,
    InstrumentsWithoutMusicians,
    MultiInstrumentalists,
    MultiplePlayers,
}

impl ReportKind {
    pub const ALL: [Self; 4] = [
        Self::AllMusicians,
        Self::InstrumentsWithoutMusicians,
        Self::MultiInstrumentalists,
        Self::MultiplePlayers,
    ];

    #[must_use]
    pub const fn view_name(self) -> &'static str {
        match self {
            Self::AllMusicians => "all_musicians",
            Self::InstrumentsWithoutMusicians => "instruments_without_musicians",
            Self::MultiInstrumentalists => "multi_instrumentalists",
            Self::MultiplePlayers => "multiple_players",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::AllMusicians => "Name, instrument, and section for all musicians",
            Self::InstrumentsWithoutMusicians => {
                "Instruments that don't yet have musicians (i.e. no one plays the trumpet), and their sections"
            }
            Self::MultiInstrumentalists => {
                "Any musicians that play two or more instruments, their instrument, and section"
            }
            Self::MultiplePlayers => {
                "Any instruments that are played by multiple musicians, as well as the musician names and sections"
            }
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.view_name())
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    /// Accepts the view name, with either underscores or dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.view_name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::NotFound {
                entity: "report",
                id: s.to_string(),
            })
    }
}

/// The rows of one report view, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub kind: ReportKind,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ReportTable {
    #[must_use]
    pub fn new(kind: ReportKind, columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self {
            kind,
            columns,
            rows,
        }
    }

    /// Rows prepared for people: title-cased, absent values blank.
    #[must_use]
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_deref().map(title_case).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    /// Render as a left-aligned plain-text table with a header rule.
    #[must_use]
    pub fn render_text(&self) -> String {
        let headers: Vec<String> = self.columns.iter().map(|c| header_label(c)).collect();
        let rows = self.display_rows();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn header_label(column: &str) -> String {
    title_case(&column.replace('_', " "))
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
///
/// `"o'brien"` becomes `"O'Brien"` and `"j."` becomes `"J."`.
#[must_use]
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("homer"), "Homer");
        assert_eq!(title_case("j."), "J.");
        assert_eq!(title_case("o'brien"), "O'Brien");
        assert_eq!(title_case("french horn"), "French Horn");
        assert_eq!(title_case("LePew"), "Lepew");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_report_kind_from_str() {
        assert_eq!(
            "all_musicians".parse::<ReportKind>().unwrap(),
            ReportKind::AllMusicians
        );
        assert_eq!(
            "multiple-players".parse::<ReportKind>().unwrap(),
            ReportKind::MultiplePlayers
        );
        assert!("everyone".parse::<ReportKind>().is_err());
    }

    #[test]
    fn test_report_titles() {
        assert_eq!(
            ReportKind::InstrumentsWithoutMusicians.title(),
            "Instruments that don't yet have musicians (i.e. no one plays the trumpet), and their sections"
        );
        assert_eq!(
            ReportKind::MultiInstrumentalists.title(),
            "Any musicians that play two or more instruments, their instrument, and section"
        );
        assert_eq!(
            ReportKind::MultiplePlayers.title(),
            "Any instruments that are played by multiple musicians, as well as the musician names and sections"
        );
    }

    #[test]
    fn test_display_rows_blank_absent_values() {
        let table = ReportTable::new(
            ReportKind::AllMusicians,
            vec!["first_name".to_string(), "instrument".to_string()],
            vec![vec![Some("bender".to_string()), None]],
        );
        assert_eq!(
            table.display_rows(),
            vec![vec!["Bender".to_string(), String::new()]]
        );
    }

    #[test]
    fn test_render_text_aligns_columns() {
        let table = ReportTable::new(
            ReportKind::InstrumentsWithoutMusicians,
            vec!["instrument".to_string(), "section".to_string()],
            vec![
                vec![Some("trumpet".to_string()), Some("brass".to_string())],
                vec![Some("oboe".to_string()), Some("woodwinds".to_string())],
            ],
        );
        let text = table.render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Instrument  Section");
        assert_eq!(lines[1], "----------  ---------");
        assert_eq!(lines[2], "Trumpet     Brass");
        assert_eq!(lines[3], "Oboe        Woodwinds");
    }
}
