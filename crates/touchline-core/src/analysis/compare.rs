// Side-by-side comparison of two players.
//
// The two player rows are transposed so each selected column becomes a row
// with one cell per player. Numeric rows carry a max flag per cell; on a tie
// both cells are flagged.

use serde::Serialize;
use tracing::debug;

use crate::catalog::MetricCatalog;
use crate::dataset::table::PLAYER;
use crate::dataset::{CellValue, PlayerRecord, TableView};
use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Source column id.
    pub column: String,
    /// Catalog display name, or the column id for identity columns.
    pub label: String,
    pub values: [CellValue; 2],
    /// Which cell holds the larger value. Always `[false, false]` for
    /// non-numeric rows.
    pub is_max: [bool; 2],
    pub numeric: bool,
}

impl ComparisonRow {
    /// Display text for one cell: numeric rows use two decimals.
    pub fn display(&self, player: usize) -> String {
        let value = &self.values[player];
        if self.numeric {
            value.format_2dp()
        } else {
            value.format_plain()
        }
    }
}

/// Metrics as rows, the two players as columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub players: [String; 2],
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn row(&self, label: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// The single row whose `player` equals `name`.
fn find_unique<'a>(view: &TableView<'a>, name: &str) -> Result<&'a PlayerRecord, AnalysisError> {
    let mut matches = view.iter().filter(|r| r.player == name);
    match (matches.next(), matches.count()) {
        (Some(record), 0) => Ok(record),
        (first, rest) => Err(AnalysisError::AmbiguousOrMissingPlayer {
            name: name.to_string(),
            matches: usize::from(first.is_some()) + rest,
        }),
    }
}

fn max_flags(a: f64, b: f64) -> [bool; 2] {
    [a >= b, b >= a]
}

/// Compare two players of a (filtered) view over `columns`.
///
/// `columns` missing from the schema are dropped. The `Player` column names
/// the output columns and never becomes a row.
pub fn compare(
    view: &TableView<'_>,
    catalog: &MetricCatalog,
    player_a: &str,
    player_b: &str,
    columns: &[&str],
) -> Result<ComparisonTable, AnalysisError> {
    if player_a == player_b {
        return Err(AnalysisError::SamePlayer(player_a.to_string()));
    }
    let a = find_unique(view, player_a)?;
    let b = find_unique(view, player_b)?;
    let schema = view.schema();

    let mut rows = Vec::with_capacity(columns.len());
    for &column in columns {
        if column == PLAYER {
            continue;
        }
        let Some(slot) = schema.slot(column) else {
            debug!("comparison column {} not in data, dropped", column);
            continue;
        };
        let numeric = slot.is_numeric();
        let values = [a.cell(slot).to_value(), b.cell(slot).to_value()];
        let is_max = match (values[0].as_number(), values[1].as_number()) {
            (Some(va), Some(vb)) if numeric => max_flags(va, vb),
            _ => [false, false],
        };
        rows.push(ComparisonRow {
            column: column.to_string(),
            label: catalog.label(column).to_string(),
            values,
            is_max,
            numeric,
        });
    }

    Ok(ComparisonTable {
        players: [a.player.clone(), b.player.clone()],
        rows,
    })
}
