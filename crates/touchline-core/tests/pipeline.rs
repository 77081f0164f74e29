// Integration tests for the analysis pipeline.
//
// These exercise the public API end-to-end from a CSV fixture: load,
// normalize, filter, and each analysis mode, including the reference
// scenarios the dashboard relies on.

use std::path::PathBuf;
use std::sync::Arc;

use touchline_core::analysis::{compare, roster, top_n, TopPerformersSelection};
use touchline_core::dataset::load::load_raw_from_reader;
use touchline_core::dataset::{normalize, CellValue, Dataset};
use touchline_core::session::DEFAULT_SEASON;
use touchline_core::{
    filter_players, load_dataset, AnalysisError, Dashboard, DashboardQuery, DatasetError,
    FilterConfig, MetricCatalog, ModeOutput, ModeSelection,
};

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn sample() -> Dataset {
    load_dataset(&fixture("laliga_sample.csv")).expect("fixture should load")
}

/// Three-row table from the reference scenarios.
fn scenario_table() -> Dataset {
    let csv_data = "\
Player,Squad,Pos,Min,Gls_per90
A,X,FW,1000,0.5
B,X,MF,400,0.9
C,Y,FW,1200,0.3";
    normalize(&load_raw_from_reader(csv_data.as_bytes()).unwrap()).unwrap()
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn scenario_filter_then_top_one() {
    let t = scenario_table();
    let cfg = FilterConfig::new(500.0, ["FW"]).unwrap();
    let filtered = filter_players(&t.view(), &cfg);
    assert_eq!(filtered.player_names(), vec!["A", "C"]);

    let top = top_n(&filtered, "Gls_per90", 1).unwrap();
    assert_eq!(top.player_names(), vec!["A"]);
}

#[test]
fn scenario_roster_ignores_filters() {
    let t = scenario_table();
    let table = roster(&t, "Y", "Gls_per90", &["Player", "Gls_per90"]).unwrap();
    assert_eq!(table.table.len(), 1);
    assert_eq!(table.table.rows[0][0], CellValue::Text("C".into()));
    assert_eq!(table.table.rows[0][1], CellValue::Number(0.3));
}

#[test]
fn scenario_compare_flags_b() {
    let t = scenario_table();
    let catalog = MetricCatalog::from_schema(t.schema());
    let table = compare(&t.view(), &catalog, "A", "B", &["Player", "Gls_per90"]).unwrap();
    let row = table.row("Goals per 90").expect("goals row");
    assert_eq!((row.display(0).as_str(), row.display(1).as_str()), ("0.50", "0.90"));
    assert_eq!(row.is_max, [false, true]);
}

// ===========================================================================
// Fixture loading
// ===========================================================================

#[test]
fn fixture_normalizes() {
    let ds = sample();
    // The trailing row has no player name and is dropped.
    assert_eq!(ds.len(), 14);

    let names: Vec<&str> = ds.records().iter().map(|r| r.player.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    let en_nesyri = ds
        .records()
        .iter()
        .find(|r| r.player == "Youssef En-Nesyri")
        .unwrap();
    assert_eq!(en_nesyri.squad, "Unknown");

    let cmp = ds.schema().resolve("Cmp%").unwrap();
    let nunez = ds.records().iter().find(|r| r.player == "Unai Núñez").unwrap();
    assert_eq!(nunez.number(cmp), Some(0.0));

    let pedri = ds.records().iter().find(|r| r.player == "Pedri").unwrap();
    assert_eq!(pedri.position_primary, "MF");
}

#[test]
fn fixture_lists_teams_and_positions() {
    let ds = sample();
    assert_eq!(
        ds.teams(),
        vec!["Barcelona", "Betis", "Celta Vigo", "Real Madrid"]
    );
    assert_eq!(ds.positions(), vec!["GK", "DF", "MF", "FW"]);
    assert_eq!(ds.max_minutes(), 3420.0);
}

#[test]
fn catalog_offers_shots_when_present() {
    let ds = sample();
    let catalog = MetricCatalog::from_schema(ds.schema());
    assert_eq!(catalog.resolve("Shots per 90"), Ok("Shots_per90"));
    assert_eq!(catalog.display_names().len(), 15);
}

#[test]
fn missing_identifier_column_is_fatal() {
    let raw = load_raw_from_reader("Player,Pos,Min\nA,FW,100".as_bytes()).unwrap();
    assert!(matches!(
        normalize(&raw),
        Err(DatasetError::DataFormat { missing }) if missing == vec!["Squad".to_string()]
    ));
}

// ===========================================================================
// Dashboard end-to-end
// ===========================================================================

fn dashboard() -> Dashboard {
    Dashboard::new(Arc::new(sample()), vec![DEFAULT_SEASON.to_string()])
}

fn outfield(min_minutes: f64) -> FilterConfig {
    FilterConfig::new(min_minutes, ["FW", "MF", "DF"]).unwrap()
}

#[test]
fn top_performers_end_to_end() {
    let dash = dashboard();
    let query = DashboardQuery {
        season: DEFAULT_SEASON.into(),
        filter: outfield(500.0),
        selection: ModeSelection::TopPerformers {
            metrics: TopPerformersSelection::default(),
            top_n: 3,
        },
    };
    let ModeOutput::TopPerformers(report) = dash.run(&query).unwrap() else {
        panic!("expected top performers");
    };
    // Ceballos (380 min) and ter Stegen (GK) are filtered out.
    assert_eq!(report.filtered.len(), 12);
    assert_eq!(report.scatter.points.len(), 12);
    assert!(report.scatter.points.iter().all(|p| p.shots.is_some()));

    let bars: Vec<&str> = report.bar.entries.iter().map(|e| e.player.as_str()).collect();
    assert_eq!(bars, vec!["Iago Aspas", "Robert Lewandowski", "Karim Benzema"]);
}

#[test]
fn compare_end_to_end() {
    let dash = dashboard();
    let query = DashboardQuery {
        season: DEFAULT_SEASON.into(),
        filter: outfield(500.0),
        selection: ModeSelection::ComparePlayers {
            player_a: Some("Pedri".into()),
            player_b: Some("Federico Valverde".into()),
        },
    };
    let ModeOutput::ComparePlayers(table) = dash.run(&query).unwrap() else {
        panic!("expected comparison");
    };
    // Every comparison column exists in the fixture: 20 columns minus Player.
    assert_eq!(table.rows.len(), 19);
    let labels: Vec<&str> = table.rows.iter().take(6).map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Squad", "Pos", "Age", "Min", "Goals per 90", "Assists per 90"]);

    let prog = table.row("Prog Passes per 90").unwrap();
    assert_eq!(prog.is_max, [true, false]);
    let squad = table.row("Squad").unwrap();
    assert_eq!(squad.display(1), "Real Madrid");
    assert_eq!(squad.is_max, [false, false]);
}

#[test]
fn opponent_end_to_end() {
    let dash = dashboard();
    let query = DashboardQuery {
        season: DEFAULT_SEASON.into(),
        filter: outfield(2000.0),
        selection: ModeSelection::AnalyzeOpponent {
            team: Some("Real Madrid".into()),
            threat_metric: "xG per 90".into(),
        },
    };
    let ModeOutput::AnalyzeOpponent(roster) = dash.run(&query).unwrap() else {
        panic!("expected roster");
    };
    // Ceballos is below the minutes filter but still scouted.
    let players: Vec<String> = roster
        .table
        .column("Player")
        .unwrap()
        .iter()
        .map(|c| c.format_plain())
        .collect();
    assert_eq!(
        players,
        vec!["Karim Benzema", "Vinicius Júnior", "Federico Valverde", "Dani Ceballos"]
    );
    assert_eq!(roster.table.columns.len(), 13);
    assert!(roster.table.column("Shots_per90").is_some());
}

#[test]
fn opponent_with_no_rows_is_advisory() {
    let dash = dashboard();
    let query = DashboardQuery {
        season: DEFAULT_SEASON.into(),
        filter: FilterConfig::unrestricted(),
        selection: ModeSelection::AnalyzeOpponent {
            team: Some("Girona".into()),
            threat_metric: "xG per 90".into(),
        },
    };
    let err = dash.run(&query).unwrap_err();
    assert_eq!(err, AnalysisError::UnknownTeam("Girona".into()));
    assert!(err.is_advisory());
}
