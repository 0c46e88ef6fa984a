//! Row-oriented tabular sources.
//!
//! Every source is read into [`RawRow`]s: named, untyped text fields.
//! Header names and values are trimmed and lowercased on the way in, so
//! everything downstream compares case-insensitively.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{EtlError, EtlResult};

/// Where column names come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Headers {
    /// The first row of the file names the columns.
    FirstRow,
    /// The file has no header row; columns are named positionally.
    Named(&'static [&'static str]),
}

/// Layout of one tabular source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: u8,
    pub headers: Headers,
    /// Columns that must be present.
    pub required: &'static [&'static str],
}

impl TableFormat {
    /// The instrument reference list: `instrument,section` with a header row.
    pub const INSTRUMENTS: Self = Self {
        delimiter: b',',
        headers: Headers::FirstRow,
        required: &["instrument", "section"],
    };

    /// The canonical name list: one name per line, tab-separated, no header.
    pub const NAMES: Self = Self {
        delimiter: b'\t',
        headers: Headers::Named(&["name"]),
        required: &["name"],
    };

    /// The assignment list: `name,instrument` with a header row.
    pub const ASSIGNMENTS: Self = Self {
        delimiter: b',',
        headers: Headers::FirstRow,
        required: &["name", "instrument"],
    };
}

/// One record from a tabular source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    fields: BTreeMap<String, String>,
}

impl RawRow {
    #[must_use]
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The value of `column`, or `""` when the row is short.
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }
}

/// The three input files for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePaths {
    pub instruments: PathBuf,
    pub names: PathBuf,
    pub assignments: PathBuf,
}

/// Read every row of `path` according to `format`.
pub fn read_table(path: &Path, format: TableFormat) -> EtlResult<Vec<RawRow>> {
    let csv_err = |source: csv::Error| EtlError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(matches!(format.headers, Headers::FirstRow))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let columns: Vec<String> = match format.headers {
        Headers::FirstRow => reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.to_lowercase())
            .collect(),
        Headers::Named(names) => names.iter().map(|n| (*n).to_string()).collect(),
    };

    for required in format.required {
        if !columns.iter().any(|c| c == required) {
            return Err(EtlError::MissingColumn {
                path: path.to_path_buf(),
                column: (*required).to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row = RawRow::new(
            columns
                .iter()
                .zip(record.iter())
                .map(|(column, value)| (column.clone(), value.to_lowercase())),
        );
        rows.push(row);
    }

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
