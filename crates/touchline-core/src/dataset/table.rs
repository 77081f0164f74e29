// Canonical player table: schema, records, and borrowed row views.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

pub const PLAYER: &str = "Player";
pub const SQUAD: &str = "Squad";
pub const POS: &str = "Pos";
pub const POS_PRIMARY: &str = "Pos_Primary";
pub const MINUTES: &str = "Min";
pub const AGE: &str = "Age";
pub const SHOTS_PER90: &str = "Shots_per90";

/// Placeholder used for a missing squad or position.
pub const UNKNOWN: &str = "Unknown";

/// Squad label the source uses for a player's combined multi-club row.
pub const TRANSFER_TOTAL_SQUAD: &str = "TOT";

/// Preferred presentation order for primary positions.
pub const POSITION_ORDER: [&str; 5] = ["GK", "DF", "MF", "FW", UNKNOWN];

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Where a column's values live inside a [`PlayerRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnSlot {
    Player,
    Squad,
    Position,
    PrimaryPosition,
    Minutes,
    /// Index into the record's numeric values.
    Numeric(usize),
    /// Index into the record's free-text values.
    Text(usize),
}

impl ColumnSlot {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnSlot::Minutes | ColumnSlot::Numeric(_))
    }
}

/// Column layout of a normalized dataset. Built once by the normalizer and
/// used as the single place where column names are turned into slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<String>,
    slots: HashMap<String, ColumnSlot>,
    numeric: Vec<String>,
}

impl Schema {
    pub(crate) fn new(
        columns: Vec<String>,
        slots: HashMap<String, ColumnSlot>,
        numeric: Vec<String>,
    ) -> Self {
        Schema {
            columns,
            slots,
            numeric,
        }
    }

    /// All column names in table order (source order, `Pos_Primary` last).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Declared numeric columns other than `Min`, in source order.
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric
    }

    pub fn contains(&self, column: &str) -> bool {
        self.slots.contains_key(column)
    }

    pub fn slot(&self, column: &str) -> Option<ColumnSlot> {
        self.slots.get(column).copied()
    }

    /// Look up a column, failing with `MissingColumn` when it is absent.
    pub fn resolve(&self, column: &str) -> Result<ColumnSlot, AnalysisError> {
        self.slot(column)
            .ok_or_else(|| AnalysisError::MissingColumn(column.to_string()))
    }

    /// Look up a column that must hold numbers.
    pub fn resolve_numeric(&self, column: &str) -> Result<ColumnSlot, AnalysisError> {
        let slot = self.resolve(column)?;
        if !slot.is_numeric() {
            return Err(AnalysisError::NotNumeric(column.to_string()));
        }
        Ok(slot)
    }
}

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// A borrowed cell read out of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl Cell<'_> {
    pub fn to_value(self) -> CellValue {
        match self {
            Cell::Number(v) => CellValue::Number(v),
            Cell::Text(s) => CellValue::Text(s.to_string()),
            Cell::Missing => CellValue::Missing,
        }
    }
}

/// An owned cell in a derived output table. Serializes as a bare number,
/// string, or `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Display text with numbers rounded to two decimals.
    pub fn format_2dp(&self) -> String {
        match self {
            CellValue::Number(v) => format!("{v:.2}"),
            other => other.format_plain(),
        }
    }

    /// Display text with numbers in their shortest exact form.
    pub fn format_plain(&self) -> String {
        match self {
            CellValue::Number(v) => format!("{v}"),
            CellValue::Text(s) => s.clone(),
            CellValue::Missing => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One player-season row after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub player: String,
    pub squad: String,
    /// Comma-separated position codes as they appear in the source.
    pub position_raw: Option<String>,
    /// First token of `position_raw`, or `Unknown`.
    pub position_primary: String,
    pub minutes: f64,
    pub(crate) numeric: Vec<f64>,
    pub(crate) text: Vec<Option<String>>,
}

impl PlayerRecord {
    pub fn cell(&self, slot: ColumnSlot) -> Cell<'_> {
        match slot {
            ColumnSlot::Player => Cell::Text(&self.player),
            ColumnSlot::Squad => Cell::Text(&self.squad),
            ColumnSlot::Position => match &self.position_raw {
                Some(pos) => Cell::Text(pos),
                None => Cell::Missing,
            },
            ColumnSlot::PrimaryPosition => Cell::Text(&self.position_primary),
            ColumnSlot::Minutes => Cell::Number(self.minutes),
            ColumnSlot::Numeric(i) => self
                .numeric
                .get(i)
                .map_or(Cell::Missing, |v| Cell::Number(*v)),
            ColumnSlot::Text(i) => match self.text.get(i) {
                Some(Some(s)) => Cell::Text(s),
                _ => Cell::Missing,
            },
        }
    }

    /// Numeric value for a slot; `None` for text slots.
    pub fn number(&self, slot: ColumnSlot) -> Option<f64> {
        match self.cell(slot) {
            Cell::Number(v) => Some(v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset (owned, immutable after load)
// ---------------------------------------------------------------------------

/// The canonical table. Constructed once by the normalizer and only read
/// afterwards; every query produces a new derived view or table.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Schema,
    records: Vec<PlayerRecord>,
}

impl Dataset {
    pub(crate) fn new(schema: Schema, records: Vec<PlayerRecord>) -> Self {
        Dataset { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A view over every row, in table order.
    pub fn view(&self) -> TableView<'_> {
        TableView::new(&self.schema, self.records.iter().collect())
    }

    /// Sorted squad names, excluding the transfer-total and unknown squads.
    pub fn teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = self
            .records
            .iter()
            .map(|r| r.squad.as_str())
            .filter(|s| *s != TRANSFER_TOTAL_SQUAD && *s != UNKNOWN)
            .map(str::to_string)
            .collect();
        teams.sort();
        teams.dedup();
        teams
    }

    /// Distinct primary positions: known positions in `POSITION_ORDER`,
    /// anything else afterwards in first-seen order.
    pub fn positions(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.position_primary.as_str()) {
                seen.push(&record.position_primary);
            }
        }
        let rank = |p: &str| {
            POSITION_ORDER
                .iter()
                .position(|o| *o == p)
                .unwrap_or(POSITION_ORDER.len())
        };
        seen.sort_by_key(|p| rank(*p));
        seen.into_iter().map(str::to_string).collect()
    }

    /// Largest minutes value in the table (0.0 when empty).
    pub fn max_minutes(&self) -> f64 {
        self.records
            .iter()
            .map(|r| r.minutes)
            .fold(0.0, f64::max)
    }
}

// ---------------------------------------------------------------------------
// Borrowed views
// ---------------------------------------------------------------------------

/// An ordered selection of rows borrowed from a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a> {
    schema: &'a Schema,
    rows: Vec<&'a PlayerRecord>,
}

impl<'a> TableView<'a> {
    pub(crate) fn new(schema: &'a Schema, rows: Vec<&'a PlayerRecord>) -> Self {
        TableView { schema, rows }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn rows(&self) -> &[&'a PlayerRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PlayerRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Player names in row order.
    pub fn player_names(&self) -> Vec<&'a str> {
        self.rows.iter().map(|r| r.player.as_str()).collect()
    }

    /// Copy the given columns out into an owned table. Columns the schema
    /// does not have are left out.
    pub fn project(&self, columns: &[&str]) -> DataTable {
        let present: Vec<(&str, ColumnSlot)> = columns
            .iter()
            .filter_map(|c| self.schema.slot(c).map(|slot| (*c, slot)))
            .collect();
        DataTable {
            columns: present.iter().map(|(c, _)| c.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| present.iter().map(|(_, slot)| r.cell(*slot).to_value()).collect())
                .collect(),
        }
    }

    /// Every schema column as an owned table.
    pub fn to_table(&self) -> DataTable {
        let columns: Vec<&str> = self.schema.columns().iter().map(String::as_str).collect();
        self.project(&columns)
    }
}

// ---------------------------------------------------------------------------
// Owned derived tables
// ---------------------------------------------------------------------------

/// A plain rows-by-columns table handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, column: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}
