// Top performers: ranked top-N bar data and raw scatter pairs.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::MetricCatalog;
use crate::dataset::table::{AGE, SHOTS_PER90};
use crate::dataset::{ColumnSlot, DataTable, PlayerRecord, TableView};
use crate::error::AnalysisError;

/// Number of bars in the top-performers chart.
pub const DEFAULT_TOP_N: usize = 15;

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

fn metric_value(record: &PlayerRecord, slot: ColumnSlot) -> f64 {
    record.number(slot).unwrap_or(0.0)
}

fn by_metric(slot: ColumnSlot) -> impl Fn(&&PlayerRecord, &&PlayerRecord) -> Ordering {
    move |a, b| metric_value(a, slot).total_cmp(&metric_value(b, slot))
}

/// The `n` rows with the largest `metric`, returned in ascending metric
/// order so a horizontal bar chart draws the leader on top.
///
/// Ties keep table order, both when choosing the top `n` and in the output.
/// Fewer than `n` rows yields all of them.
pub fn top_n<'a>(
    view: &TableView<'a>,
    metric: &str,
    n: usize,
) -> Result<TableView<'a>, AnalysisError> {
    let slot = view.schema().resolve_numeric(metric)?;
    let ascending = by_metric(slot);

    let mut rows: Vec<&'a PlayerRecord> = view.rows().to_vec();
    rows.sort_by(|a, b| ascending(b, a));
    rows.truncate(n);
    rows.sort_by(&ascending);

    Ok(TableView::new(view.schema(), rows))
}

// ---------------------------------------------------------------------------
// Output series
// ---------------------------------------------------------------------------

/// One scatter point. `position` is the color key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub player: String,
    pub squad: String,
    pub position: String,
    pub age: Option<f64>,
    pub minutes: f64,
    pub x: f64,
    pub y: f64,
    pub shots: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x_column: String,
    pub x_label: String,
    pub y_column: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarEntry {
    pub player: String,
    pub squad: String,
    pub position: String,
    pub value: f64,
    /// Bar text, two decimals.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub column: String,
    pub label: String,
    /// Ascending by value.
    pub entries: Vec<BarEntry>,
}

/// Raw `(x, y)` pairs for every row of the view, no aggregation.
pub fn scatter_points(
    view: &TableView<'_>,
    x_metric: &str,
    y_metric: &str,
) -> Result<Vec<ScatterPoint>, AnalysisError> {
    let schema = view.schema();
    let x = schema.resolve_numeric(x_metric)?;
    let y = schema.resolve_numeric(y_metric)?;
    let age = schema.slot(AGE);
    let shots = schema.slot(SHOTS_PER90);

    Ok(view
        .iter()
        .map(|r| ScatterPoint {
            player: r.player.clone(),
            squad: r.squad.clone(),
            position: r.position_primary.clone(),
            age: age.and_then(|s| r.number(s)),
            minutes: r.minutes,
            x: metric_value(r, x),
            y: metric_value(r, y),
            shots: shots.and_then(|s| r.number(s)),
        })
        .collect())
}

fn bar_entries(view: &TableView<'_>, metric: &str) -> Result<Vec<BarEntry>, AnalysisError> {
    let slot = view.schema().resolve_numeric(metric)?;
    Ok(view
        .iter()
        .map(|r| {
            let value = metric_value(r, slot);
            BarEntry {
                player: r.player.clone(),
                squad: r.squad.clone(),
                position: r.position_primary.clone(),
                value,
                label: format!("{value:.2}"),
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Mode entry point
// ---------------------------------------------------------------------------

/// Metric display names chosen for the top-performers mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPerformersSelection {
    pub x_metric: String,
    pub y_metric: String,
    pub bar_metric: String,
}

impl Default for TopPerformersSelection {
    fn default() -> Self {
        TopPerformersSelection {
            x_metric: "xG per 90".into(),
            y_metric: "xA per 90".into(),
            bar_metric: "Goals per 90".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformersReport {
    pub filtered: DataTable,
    pub scatter: ScatterSeries,
    pub bar: BarSeries,
}

/// Build the scatter and top-`n` bar data for a filtered view.
///
/// Metric names are resolved through the catalog first, then every chosen
/// column must exist before an empty view is reported.
pub fn top_performers(
    view: &TableView<'_>,
    catalog: &MetricCatalog,
    selection: &TopPerformersSelection,
    n: usize,
) -> Result<TopPerformersReport, AnalysisError> {
    let x = catalog.metric(&selection.x_metric)?;
    let y = catalog.metric(&selection.y_metric)?;
    let bar = catalog.metric(&selection.bar_metric)?;

    for metric in [x, y, bar] {
        view.schema().resolve_numeric(metric.column_id())?;
    }
    if view.is_empty() {
        return Err(AnalysisError::NoMatchingPlayers);
    }

    let points = scatter_points(view, x.column_id(), y.column_id())?;
    let top = top_n(view, bar.column_id(), n)?;
    debug!(
        "top performers: {} scatter points, top {} by {}",
        points.len(),
        top.len(),
        bar.column_id()
    );

    Ok(TopPerformersReport {
        filtered: view.to_table(),
        scatter: ScatterSeries {
            x_column: x.column_id().to_string(),
            x_label: x.display_name().to_string(),
            y_column: y.column_id().to_string(),
            y_label: y.display_name().to_string(),
            points,
        },
        bar: BarSeries {
            column: bar.column_id().to_string(),
            label: bar.display_name().to_string(),
            entries: bar_entries(&top, bar.column_id())?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load::load_raw_from_reader;
    use crate::dataset::{normalize, Dataset};

    fn dataset(csv_data: &str) -> Dataset {
        normalize(&load_raw_from_reader(csv_data.as_bytes()).unwrap()).unwrap()
    }

    fn values(view: &TableView<'_>, column: &str) -> Vec<f64> {
        let slot = view.schema().resolve(column).unwrap();
        view.iter().map(|r| r.number(slot).unwrap()).collect()
    }

    const SAMPLE: &str = "\
Player,Squad,Pos,Age,Min,Gls_per90,xG_per90,xAG_per90
A,X,FW,24,1000,0.5,0.40,0.10
B,X,MF,29,400,0.9,0.30,0.25
C,Y,FW,31,1200,0.3,0.35,0.05
D,Y,DF,22,800,0.1,0.05,0.02
E,Z,FW,27,1500,0.5,0.45,0.15";

    #[test]
    fn top_n_sorted_ascending() {
        let ds = dataset(SAMPLE);
        let top = top_n(&ds.view(), "Gls_per90", 3).unwrap();
        assert_eq!(top.player_names(), vec!["A", "E", "B"]);
        assert_eq!(values(&top, "Gls_per90"), vec![0.5, 0.5, 0.9]);
    }

    #[test]
    fn top_n_ties_keep_table_order() {
        let ds = dataset(SAMPLE);
        // A and E tie at 0.5; only one slot is left after B.
        let top = top_n(&ds.view(), "Gls_per90", 2).unwrap();
        assert_eq!(top.player_names(), vec!["A", "B"]);
    }

    #[test]
    fn top_n_signed_zeros_tie() {
        let ds = dataset(
            "\
Player,Squad,Pos,Min,Gls_per90
A,X,FW,100,-0.0
B,X,FW,100,0.0",
        );
        let top = top_n(&ds.view(), "Gls_per90", 1).unwrap();
        assert_eq!(top.player_names(), vec!["A"]);
        let both = top_n(&ds.view(), "Gls_per90", 2).unwrap();
        assert_eq!(both.player_names(), vec!["A", "B"]);
    }

    #[test]
    fn top_n_with_fewer_rows_returns_all() {
        let ds = dataset(SAMPLE);
        let top = top_n(&ds.view(), "xG_per90", 50).unwrap();
        assert_eq!(top.len(), ds.len());
        assert_eq!(top.player_names(), vec!["D", "B", "C", "A", "E"]);
    }

    #[test]
    fn top_n_matches_true_top_values() {
        let ds = dataset(SAMPLE);
        let mut all = values(&ds.view(), "xAG_per90");
        all.sort_by(|a, b| b.total_cmp(a));
        for n in 0..=6 {
            let top = top_n(&ds.view(), "xAG_per90", n).unwrap();
            let got = values(&top, "xAG_per90");
            assert_eq!(got.len(), n.min(ds.len()));
            assert!(got.windows(2).all(|w| w[0] <= w[1]));
            let mut expected: Vec<f64> = all.iter().take(n).copied().collect();
            expected.reverse();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn top_n_of_empty_view_is_empty() {
        let ds = dataset("Player,Squad,Pos,Min,Gls_per90");
        assert!(top_n(&ds.view(), "Gls_per90", 15).unwrap().is_empty());
    }

    #[test]
    fn top_n_missing_column() {
        let ds = dataset(SAMPLE);
        assert_eq!(
            top_n(&ds.view(), "KP_per90", 3).unwrap_err(),
            AnalysisError::MissingColumn("KP_per90".into())
        );
    }

    #[test]
    fn scatter_passes_through_every_row() {
        let ds = dataset(SAMPLE);
        let points = scatter_points(&ds.view(), "xG_per90", "xAG_per90").unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[1].player, "B");
        assert_eq!(points[1].position, "MF");
        assert_eq!(points[1].x, 0.30);
        assert_eq!(points[1].y, 0.25);
        assert_eq!(points[1].age, Some(29.0));
        assert_eq!(points[1].shots, None);
    }

    #[test]
    fn scatter_validates_columns() {
        let ds = dataset(SAMPLE);
        assert!(matches!(
            scatter_points(&ds.view(), "xG_per90", "Squad"),
            Err(AnalysisError::NotNumeric(_))
        ));
        assert!(matches!(
            scatter_points(&ds.view(), "Shots_per90", "xG_per90"),
            Err(AnalysisError::MissingColumn(_))
        ));
    }

    #[test]
    fn report_resolves_display_names() {
        let ds = dataset(SAMPLE);
        let catalog = MetricCatalog::from_schema(ds.schema());
        let report = top_performers(
            &ds.view(),
            &catalog,
            &TopPerformersSelection::default(),
            2,
        )
        .unwrap();
        assert_eq!(report.scatter.x_label, "xG per 90");
        assert_eq!(report.scatter.y_column, "xAG_per90");
        assert_eq!(report.bar.label, "Goals per 90");
        assert_eq!(report.bar.entries.len(), 2);
        assert_eq!(report.bar.entries[1].player, "B");
        assert_eq!(report.bar.entries[1].label, "0.90");
        assert_eq!(report.filtered.len(), 5);
    }

    #[test]
    fn report_errors() {
        let ds = dataset(SAMPLE);
        let catalog = MetricCatalog::from_schema(ds.schema());

        let mut selection = TopPerformersSelection::default();
        selection.bar_metric = "Goals".into();
        assert_eq!(
            top_performers(&ds.view(), &catalog, &selection, 15).unwrap_err(),
            AnalysisError::UnknownMetric("Goals".into())
        );

        selection.bar_metric = "Key Passes per 90".into();
        assert_eq!(
            top_performers(&ds.view(), &catalog, &selection, 15).unwrap_err(),
            AnalysisError::MissingColumn("KP_per90".into())
        );

        let empty = dataset("Player,Squad,Pos,Min,Gls_per90,xG_per90,xAG_per90");
        assert_eq!(
            top_performers(
                &empty.view(),
                &catalog,
                &TopPerformersSelection::default(),
                15
            )
            .unwrap_err(),
            AnalysisError::NoMatchingPlayers
        );
    }
}
