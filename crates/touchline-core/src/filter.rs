// Minutes and position filtering over the canonical table.

use serde::Serialize;
use tracing::debug;

use crate::dataset::TableView;
use crate::error::AnalysisError;

/// Playing-time and position restriction applied before the top-performer
/// and comparison modes. Built per query; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterConfig {
    min_minutes: f64,
    positions: Vec<String>,
}

impl FilterConfig {
    /// Build a filter. `positions` empty means no position restriction;
    /// duplicates are dropped, first occurrence wins.
    pub fn new<I, S>(min_minutes: f64, positions: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !min_minutes.is_finite() || min_minutes < 0.0 {
            return Err(AnalysisError::InvalidFilter(format!(
                "minimum minutes must be a non-negative number, got {min_minutes}"
            )));
        }
        let mut unique: Vec<String> = Vec::new();
        for p in positions {
            let p = p.into();
            if !unique.contains(&p) {
                unique.push(p);
            }
        }
        Ok(FilterConfig {
            min_minutes,
            positions: unique,
        })
    }

    /// No restriction at all.
    pub fn unrestricted() -> Self {
        FilterConfig {
            min_minutes: 0.0,
            positions: Vec::new(),
        }
    }

    pub fn min_minutes(&self) -> f64 {
        self.min_minutes
    }

    pub fn positions(&self) -> &[String] {
        &self.positions
    }

    /// Summary line for the presentation layer.
    pub fn describe(&self) -> String {
        let positions = if self.positions.is_empty() {
            "None".to_string()
        } else {
            self.positions.join(", ")
        };
        format!(
            "Displaying data for players in positions: {} with at least {} minutes played.",
            positions, self.min_minutes
        )
    }

    fn admits(&self, minutes: f64, primary_position: &str) -> bool {
        if minutes < self.min_minutes {
            return false;
        }
        self.positions.is_empty() || self.positions.iter().any(|p| p == primary_position)
    }
}

/// Keep rows meeting the minutes threshold and, when positions are given,
/// whose primary position is one of them. Row order is preserved.
pub fn filter_players<'a>(view: &TableView<'a>, cfg: &FilterConfig) -> TableView<'a> {
    let rows = view
        .iter()
        .filter(|r| cfg.admits(r.minutes, &r.position_primary))
        .collect::<Vec<_>>();
    debug!(
        "filter kept {} of {} rows (min_minutes={}, positions={:?})",
        rows.len(),
        view.len(),
        cfg.min_minutes,
        cfg.positions
    );
    TableView::new(view.schema(), rows)
}

/// Distinct player names of a view in row order.
pub fn player_names<'a>(view: &TableView<'a>) -> Vec<&'a str> {
    let mut names: Vec<&'a str> = Vec::new();
    for name in view.player_names() {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Default comparison pair: the first two names, if there are two.
pub fn default_pair<'a>(names: &[&'a str]) -> Option<(&'a str, &'a str)> {
    match names {
        [first, second, ..] => Some((*first, *second)),
        _ => None,
    }
}
