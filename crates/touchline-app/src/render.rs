// Plain-text and JSON rendering of dashboard results.
//
// Text output mirrors the dashboard panels: a header with the season, mode and
// filter summary, then the mode's tables. Max-flagged comparison cells carry a
// trailing `*`.

use touchline_core::analysis::{ComparisonTable, RosterTable, TopPerformersReport};
use touchline_core::{AnalysisError, DashboardQuery, ModeOutput};

/// Marker appended to a comparison cell holding the larger value.
pub const MAX_MARKER: &str = "*";

/// Column separator for text tables.
const GAP: &str = "  ";

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn render_text(query: &DashboardQuery, output: &ModeOutput) -> String {
    let mut out = header(query);
    out.push('\n');
    match output {
        ModeOutput::TopPerformers(report) => out.push_str(&top_performers_text(report)),
        ModeOutput::ComparePlayers(table) => out.push_str(&comparison_text(table)),
        ModeOutput::AnalyzeOpponent(roster) => out.push_str(&roster_text(roster)),
    }
    out
}

pub fn render_json(output: &ModeOutput) -> serde_json::Result<String> {
    serde_json::to_string_pretty(output)
}

/// Text shown for an advisory (empty-result) error.
pub fn render_advisory(err: &AnalysisError) -> String {
    format!("Warning: {err}")
}

fn header(query: &DashboardQuery) -> String {
    format!(
        "La Liga Player Stats ({})\nMode: {}\n{}\n",
        query.season,
        query.selection.mode(),
        query.filter.describe()
    )
}

// ---------------------------------------------------------------------------
// Mode panels
// ---------------------------------------------------------------------------

fn top_performers_text(report: &TopPerformersReport) -> String {
    let scatter = &report.scatter;
    let mut out = format!(
        "Player Performance: {} vs. {}\n",
        scatter.y_label, scatter.x_label
    );
    let headers = vec![
        "Player".to_string(),
        "Squad".to_string(),
        "Pos".to_string(),
        scatter.x_label.clone(),
        scatter.y_label.clone(),
    ];
    let rows: Vec<Vec<String>> = scatter
        .points
        .iter()
        .map(|p| {
            vec![
                p.player.clone(),
                p.squad.clone(),
                p.position.clone(),
                format!("{:.2}", p.x),
                format!("{:.2}", p.y),
            ]
        })
        .collect();
    out.push_str(&format_table(&headers, &rows));

    let bar = &report.bar;
    out.push_str(&format!(
        "\nTop {} Players by {}\n",
        bar.entries.len(),
        bar.label
    ));
    // Entries are stored bottom-to-top; list the leader first.
    let rows: Vec<Vec<String>> = bar
        .entries
        .iter()
        .rev()
        .map(|e| vec![e.player.clone(), e.squad.clone(), e.label.clone()])
        .collect();
    let headers = vec!["Player".to_string(), "Squad".to_string(), bar.label.clone()];
    out.push_str(&format_table(&headers, &rows));
    out
}

fn comparison_text(table: &ComparisonTable) -> String {
    let [a, b] = &table.players;
    let mut out = format!("Comparison: {a} vs. {b}\n");
    let headers = vec!["Metric".to_string(), a.clone(), b.clone()];
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let cell = |i: usize| {
                let mut text = row.display(i);
                if row.is_max[i] {
                    text.push_str(MAX_MARKER);
                }
                text
            };
            vec![row.label.clone(), cell(0), cell(1)]
        })
        .collect();
    out.push_str(&format_table(&headers, &rows));
    out
}

fn roster_text(roster: &RosterTable) -> String {
    let mut out = format!(
        "Player Stats for {}\nHighlighting based on: {}\n",
        roster.team, roster.sort_label
    );
    out.push_str(&format_table(&roster.table.columns, &roster.display_rows()));
    out
}

// ---------------------------------------------------------------------------
// Table layout
// ---------------------------------------------------------------------------

/// Left-aligned columns padded to the widest cell, with a dashed rule under
/// the header.
pub fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        padded.join(GAP).trim_end().to_string()
    };

    let mut out = line(headers);
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join(GAP));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}
