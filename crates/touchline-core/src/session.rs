// Dashboard session: routes one query to its analysis mode.
//
// A `Dashboard` owns a shared handle to the loaded dataset and the metric
// catalog built from its schema. Each `run` is a pure function of the
// dataset and the query.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{
    compare, roster, top_performers, ComparisonTable, RosterTable, TopPerformersReport,
    TopPerformersSelection,
};
use crate::catalog::MetricCatalog;
use crate::dataset::Dataset;
use crate::error::AnalysisError;
use crate::filter::{default_pair, filter_players, player_names, FilterConfig};

/// Season currently covered by the dataset.
pub const DEFAULT_SEASON: &str = "2022-2023";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    TopPerformers,
    ComparePlayers,
    AnalyzeOpponent,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 3] = [
        AnalysisMode::TopPerformers,
        AnalysisMode::ComparePlayers,
        AnalysisMode::AnalyzeOpponent,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AnalysisMode::TopPerformers => "Identify Top Performers",
            AnalysisMode::ComparePlayers => "Compare Players",
            AnalysisMode::AnalyzeOpponent => "Analyze Opponent",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Mode-specific choices. Unset players/team fall back to the first
/// available entries.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeSelection {
    TopPerformers {
        metrics: TopPerformersSelection,
        top_n: usize,
    },
    ComparePlayers {
        player_a: Option<String>,
        player_b: Option<String>,
    },
    AnalyzeOpponent {
        team: Option<String>,
        threat_metric: String,
    },
}

impl ModeSelection {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            ModeSelection::TopPerformers { .. } => AnalysisMode::TopPerformers,
            ModeSelection::ComparePlayers { .. } => AnalysisMode::ComparePlayers,
            ModeSelection::AnalyzeOpponent { .. } => AnalysisMode::AnalyzeOpponent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardQuery {
    pub season: String,
    pub filter: FilterConfig,
    pub selection: ModeSelection,
}

/// Result of one query, tagged by mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeOutput {
    TopPerformers(TopPerformersReport),
    ComparePlayers(ComparisonTable),
    AnalyzeOpponent(RosterTable),
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    catalog: MetricCatalog,
    seasons: Vec<String>,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>, seasons: Vec<String>) -> Self {
        let catalog = MetricCatalog::from_schema(dataset.schema());
        info!(
            "Dashboard ready: {} players, {} metrics, {} teams",
            dataset.len(),
            catalog.metrics().len(),
            dataset.teams().len()
        );
        Dashboard {
            dataset,
            catalog,
            seasons,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    pub fn seasons(&self) -> &[String] {
        &self.seasons
    }

    pub fn run(&self, query: &DashboardQuery) -> Result<ModeOutput, AnalysisError> {
        if !self.seasons.iter().any(|s| *s == query.season) {
            return Err(AnalysisError::UnknownSeason(query.season.clone()));
        }
        debug!(
            "running {} for season {}",
            query.selection.mode(),
            query.season
        );

        match &query.selection {
            ModeSelection::TopPerformers { metrics, top_n } => {
                let filtered = filter_players(&self.dataset.view(), &query.filter);
                top_performers(&filtered, &self.catalog, metrics, *top_n)
                    .map(ModeOutput::TopPerformers)
            }
            ModeSelection::ComparePlayers { player_a, player_b } => {
                let filtered = filter_players(&self.dataset.view(), &query.filter);
                let names = player_names(&filtered);
                let columns = self.catalog.comparison_columns();
                if let (None, None, Some((a, b))) = (player_a, player_b, default_pair(&names)) {
                    return compare(&filtered, &self.catalog, a, b, &columns)
                        .map(ModeOutput::ComparePlayers);
                }
                let a = match player_a {
                    Some(name) => name.as_str(),
                    None => names.first().copied().ok_or(AnalysisError::NoMatchingPlayers)?,
                };
                let b = match player_b {
                    Some(name) => name.as_str(),
                    None => names
                        .iter()
                        .copied()
                        .find(|n| *n != a)
                        .ok_or_else(|| AnalysisError::OnlyOnePlayer(a.to_string()))?,
                };
                compare(&filtered, &self.catalog, a, b, &columns).map(ModeOutput::ComparePlayers)
            }
            ModeSelection::AnalyzeOpponent {
                team,
                threat_metric,
            } => {
                let teams = self.dataset.teams();
                let team = match team {
                    Some(team) => team.as_str(),
                    None => teams
                        .first()
                        .map(String::as_str)
                        .ok_or(AnalysisError::NoTeams)?,
                };
                let sort_column = self.catalog.resolve(threat_metric)?;
                let columns = self.catalog.opponent_columns();
                roster(&self.dataset, team, sort_column, &columns)
                    .map(|table| table.with_sort_label(self.catalog.label(sort_column)))
                    .map(ModeOutput::AnalyzeOpponent)
            }
        }
    }
}
