// Opponent roster: every player of one squad, sorted by a threat metric.
//
// Works on the whole dataset, not the filtered view, so scouting an opponent
// is unaffected by the analyst's own minutes/position filters.

use serde::Serialize;
use tracing::debug;

use crate::dataset::normalize::PER90_SUFFIX;
use crate::dataset::{DataTable, Dataset, PlayerRecord, TableView};
use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterTable {
    pub team: String,
    pub sort_column: String,
    /// Display name of `sort_column`. Defaults to the column id.
    pub sort_label: String,
    /// Rows sorted by `sort_column`, descending.
    pub table: DataTable,
}

impl RosterTable {
    pub fn with_sort_label(mut self, label: &str) -> Self {
        self.sort_label = label.to_string();
        self
    }

    /// Cell text for display: per-90 columns use two decimals.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        let per90: Vec<bool> = self
            .table
            .columns
            .iter()
            .map(|c| c.ends_with(PER90_SUFFIX))
            .collect();
        self.table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&per90)
                    .map(|(cell, per90)| {
                        if *per90 {
                            cell.format_2dp()
                        } else {
                            cell.format_plain()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Players of `team` (exact squad match) restricted to `columns`, sorted by
/// `sort_metric` descending with ties in table order.
///
/// The sort happens before column restriction, so `sort_metric` does not
/// have to be one of `columns`.
pub fn roster(
    dataset: &Dataset,
    team: &str,
    sort_metric: &str,
    columns: &[&str],
) -> Result<RosterTable, AnalysisError> {
    let mut rows: Vec<&PlayerRecord> = dataset
        .records()
        .iter()
        .filter(|r| r.squad == team)
        .collect();
    if rows.is_empty() {
        return Err(AnalysisError::UnknownTeam(team.to_string()));
    }

    let slot = dataset.schema().resolve_numeric(sort_metric)?;
    rows.sort_by(|a, b| {
        let va = a.number(slot).unwrap_or(0.0);
        let vb = b.number(slot).unwrap_or(0.0);
        vb.total_cmp(&va)
    });
    debug!("roster for {}: {} players by {}", team, rows.len(), sort_metric);

    let view = TableView::new(dataset.schema(), rows);
    Ok(RosterTable {
        team: team.to_string(),
        sort_column: sort_metric.to_string(),
        sort_label: sort_metric.to_string(),
        table: view.project(columns),
    })
}
