// Raw CSV loading.
//
// Reads a headered player-stats CSV into a `RawTable` of optional text
// cells. No typing happens here; the normalizer owns every coercion rule.

use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::error::DatasetError;

/// Untyped table as read from the source file. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a table from string literals. Empty strings become missing cells.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| to_cell(cell)).collect())
                .collect(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn to_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

pub fn load_raw_from_reader<R: Read>(rdr: R) -> Result<RawTable, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        match result {
            Ok(record) => rows.push(record.iter().map(to_cell).collect()),
            Err(e) => {
                // Header is line 1, so data row N sits on line N + 2.
                warn!("skipping malformed row at line {}: {}", line + 2, e);
            }
        }
    }
    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load a raw table from a CSV file.
pub fn load_raw(path: &Path) -> Result<RawTable, DatasetError> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_raw_from_reader(file).map_err(|e| DatasetError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}
