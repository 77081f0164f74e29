// Metric catalog: display names <-> dataset column identifiers.
//
// The catalog is the only place where user-facing metric names are turned
// into column ids. It is built once from the loaded schema so optional
// columns only appear when the data has them.

use serde::Serialize;
use std::fmt;

use crate::dataset::table::{AGE, MINUTES, PLAYER, POS, SHOTS_PER90, SQUAD};
use crate::dataset::Schema;
use crate::error::AnalysisError;

/// Selectable performance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Goals,
    Assists,
    ExpectedGoals,
    ExpectedAssists,
    KeyPasses,
    ProgressivePasses,
    SuccessfulDribbles,
    ProgressiveCarries,
    TacklesWon,
    Interceptions,
    ShotCreatingActions,
    GoalCreatingActions,
    PassCompletion,
    ShotsOnTarget,
    /// Only offered when the dataset has a `Shots_per90` column.
    Shots,
}

impl Metric {
    /// Every metric in selector order (`Shots` last).
    pub const ALL: [Metric; 15] = [
        Metric::Goals,
        Metric::Assists,
        Metric::ExpectedGoals,
        Metric::ExpectedAssists,
        Metric::KeyPasses,
        Metric::ProgressivePasses,
        Metric::SuccessfulDribbles,
        Metric::ProgressiveCarries,
        Metric::TacklesWon,
        Metric::Interceptions,
        Metric::ShotCreatingActions,
        Metric::GoalCreatingActions,
        Metric::PassCompletion,
        Metric::ShotsOnTarget,
        Metric::Shots,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Goals => "Goals per 90",
            Metric::Assists => "Assists per 90",
            Metric::ExpectedGoals => "xG per 90",
            Metric::ExpectedAssists => "xA per 90",
            Metric::KeyPasses => "Key Passes per 90",
            Metric::ProgressivePasses => "Prog Passes per 90",
            Metric::SuccessfulDribbles => "Success Dribbles per 90",
            Metric::ProgressiveCarries => "Prog Carries per 90",
            Metric::TacklesWon => "Tackles Won per 90",
            Metric::Interceptions => "Interceptions per 90",
            Metric::ShotCreatingActions => "SCA per 90",
            Metric::GoalCreatingActions => "GCA per 90",
            Metric::PassCompletion => "Pass Comp %",
            Metric::ShotsOnTarget => "Shot Target %",
            Metric::Shots => "Shots per 90",
        }
    }

    pub fn column_id(&self) -> &'static str {
        match self {
            Metric::Goals => "Gls_per90",
            Metric::Assists => "Ast_per90",
            Metric::ExpectedGoals => "xG_per90",
            Metric::ExpectedAssists => "xAG_per90",
            Metric::KeyPasses => "KP_per90",
            Metric::ProgressivePasses => "PrgP_per90",
            Metric::SuccessfulDribbles => "Succ_per90",
            Metric::ProgressiveCarries => "PrgC_per90",
            Metric::TacklesWon => "TklW_per90",
            Metric::Interceptions => "Int_per90",
            Metric::ShotCreatingActions => "SCA_per90",
            Metric::GoalCreatingActions => "GCA_per90",
            Metric::PassCompletion => "Cmp%",
            Metric::ShotsOnTarget => "SoT%",
            Metric::Shots => SHOTS_PER90,
        }
    }

    /// Whether the metric is offered only when its column is loaded.
    pub fn is_optional(&self) -> bool {
        matches!(self, Metric::Shots)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Identity columns shown at the top of a player comparison.
pub const COMPARISON_IDENTITY_COLUMNS: [&str; 5] = [PLAYER, SQUAD, POS, AGE, MINUTES];

/// Identity columns shown at the left of an opponent roster.
pub const OPPONENT_IDENTITY_COLUMNS: [&str; 4] = [PLAYER, POS, AGE, MINUTES];

/// Metrics listed in a player comparison, in row order. `Shots` slots in
/// after the expected-assists row.
const COMPARISON_METRICS: [Metric; 15] = [
    Metric::Goals,
    Metric::Assists,
    Metric::ExpectedGoals,
    Metric::ExpectedAssists,
    Metric::Shots,
    Metric::KeyPasses,
    Metric::ProgressivePasses,
    Metric::SuccessfulDribbles,
    Metric::ProgressiveCarries,
    Metric::TacklesWon,
    Metric::Interceptions,
    Metric::ShotCreatingActions,
    Metric::GoalCreatingActions,
    Metric::PassCompletion,
    Metric::ShotsOnTarget,
];

/// Metrics shown in an opponent roster.
const OPPONENT_METRICS: [Metric; 9] = [
    Metric::Goals,
    Metric::Assists,
    Metric::ExpectedGoals,
    Metric::ExpectedAssists,
    Metric::Shots,
    Metric::KeyPasses,
    Metric::ProgressivePasses,
    Metric::SuccessfulDribbles,
    Metric::TacklesWon,
];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The metrics available for the loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCatalog {
    metrics: Vec<Metric>,
}

impl MetricCatalog {
    /// Build the catalog for a schema. Optional metrics are included only
    /// when their column exists.
    pub fn from_schema(schema: &Schema) -> Self {
        let metrics = Metric::ALL
            .into_iter()
            .filter(|m| !m.is_optional() || schema.contains(m.column_id()))
            .collect();
        MetricCatalog { metrics }
    }

    /// Catalog with every metric, optional ones included.
    pub fn full() -> Self {
        MetricCatalog {
            metrics: Metric::ALL.to_vec(),
        }
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }

    /// Display names in selector order.
    pub fn display_names(&self) -> Vec<&'static str> {
        self.metrics.iter().map(Metric::display_name).collect()
    }

    /// Look up a metric by display name.
    pub fn metric(&self, display_name: &str) -> Result<Metric, AnalysisError> {
        self.metrics
            .iter()
            .copied()
            .find(|m| m.display_name() == display_name)
            .ok_or_else(|| AnalysisError::UnknownMetric(display_name.to_string()))
    }

    /// Display name to column id.
    pub fn resolve(&self, display_name: &str) -> Result<&'static str, AnalysisError> {
        self.metric(display_name).map(|m| m.column_id())
    }

    /// Column id to display name. Inverse of [`resolve`](Self::resolve).
    pub fn reverse(&self, column_id: &str) -> Result<&'static str, AnalysisError> {
        self.metrics
            .iter()
            .find(|m| m.column_id() == column_id)
            .map(Metric::display_name)
            .ok_or_else(|| AnalysisError::UnknownMetric(column_id.to_string()))
    }

    /// Row/column label for any column: metrics get their display name,
    /// everything else keeps its column id.
    pub fn label<'a>(&self, column_id: &'a str) -> &'a str {
        self.reverse(column_id).unwrap_or(column_id)
    }

    /// Columns of a player comparison, `Player` first.
    pub fn comparison_columns(&self) -> Vec<&'static str> {
        COMPARISON_IDENTITY_COLUMNS
            .into_iter()
            .chain(self.listed(&COMPARISON_METRICS))
            .collect()
    }

    /// Columns of an opponent roster, `Player` first.
    pub fn opponent_columns(&self) -> Vec<&'static str> {
        OPPONENT_IDENTITY_COLUMNS
            .into_iter()
            .chain(self.listed(&OPPONENT_METRICS))
            .collect()
    }

    fn listed<'s>(&'s self, metrics: &'s [Metric]) -> impl Iterator<Item = &'static str> + 's {
        metrics
            .iter()
            .filter(|m| self.contains(**m))
            .map(Metric::column_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load::load_raw_from_reader;
    use crate::dataset::normalize;

    fn schema_of(headers: &str) -> Schema {
        let raw = load_raw_from_reader(headers.as_bytes()).unwrap();
        normalize(&raw).unwrap().schema().clone()
    }

    #[test]
    fn shots_only_when_column_present() {
        let without = MetricCatalog::from_schema(&schema_of("Player,Squad,Pos,Min,Gls_per90"));
        assert!(!without.contains(Metric::Shots));
        assert_eq!(without.metrics().len(), 14);
        assert!(matches!(
            without.resolve("Shots per 90"),
            Err(AnalysisError::UnknownMetric(_))
        ));

        let with = MetricCatalog::from_schema(&schema_of("Player,Squad,Pos,Min,Shots_per90"));
        assert!(with.contains(Metric::Shots));
        assert_eq!(with.display_names().last(), Some(&"Shots per 90"));
    }

    #[test]
    fn non_optional_metrics_listed_even_if_column_absent() {
        let catalog = MetricCatalog::from_schema(&schema_of("Player,Squad,Pos,Min"));
        assert_eq!(catalog.resolve("Goals per 90"), Ok("Gls_per90"));
    }

    #[test]
    fn resolve_and_reverse_are_inverse() {
        let catalog = MetricCatalog::full();
        for name in catalog.display_names() {
            let column = catalog.resolve(name).unwrap();
            assert_eq!(catalog.reverse(column), Ok(name));
        }
        for metric in catalog.metrics() {
            let name = catalog.reverse(metric.column_id()).unwrap();
            assert_eq!(catalog.resolve(name), Ok(metric.column_id()));
        }
    }

    #[test]
    fn mapping_is_bijective() {
        let mut names: Vec<&str> = Metric::ALL.iter().map(Metric::display_name).collect();
        let mut columns: Vec<&str> = Metric::ALL.iter().map(Metric::column_id).collect();
        names.sort();
        names.dedup();
        columns.sort();
        columns.dedup();
        assert_eq!(names.len(), Metric::ALL.len());
        assert_eq!(columns.len(), Metric::ALL.len());
    }

    #[test]
    fn unknown_names_rejected() {
        let catalog = MetricCatalog::full();
        assert_eq!(
            catalog.resolve("Goals"),
            Err(AnalysisError::UnknownMetric("Goals".into()))
        );
        assert!(catalog.reverse("Gls").is_err());
    }

    #[test]
    fn labels_fall_back_to_column_id() {
        let catalog = MetricCatalog::full();
        assert_eq!(catalog.label("xAG_per90"), "xA per 90");
        assert_eq!(catalog.label("Squad"), "Squad");
        assert_eq!(catalog.label("Age"), "Age");
    }

    #[test]
    fn comparison_columns_place_shots_after_xa() {
        let catalog = MetricCatalog::full();
        let cols = catalog.comparison_columns();
        assert_eq!(&cols[..5], &["Player", "Squad", "Pos", "Age", "Min"]);
        let xa = cols.iter().position(|c| *c == "xAG_per90").unwrap();
        assert_eq!(cols[xa + 1], "Shots_per90");
        assert_eq!(cols.last(), Some(&"SoT%"));
        assert_eq!(cols.len(), 20);
    }

    #[test]
    fn opponent_columns_follow_catalog() {
        let catalog = MetricCatalog::from_schema(&schema_of("Player,Squad,Pos,Min"));
        assert_eq!(
            catalog.opponent_columns(),
            vec![
                "Player",
                "Pos",
                "Age",
                "Min",
                "Gls_per90",
                "Ast_per90",
                "xG_per90",
                "xAG_per90",
                "KP_per90",
                "PrgP_per90",
                "Succ_per90",
                "TklW_per90",
            ]
        );
    }
}
