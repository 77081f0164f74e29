// Schema normalization: raw text cells to the canonical player table.
//
// Numeric coercion is deliberately lossy. A declared-numeric cell that is
// empty, unparsable, or non-finite becomes 0.0 rather than failing the load;
// the source export carries blanks for players with no recorded events.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::load::RawTable;
use super::table::{
    ColumnSlot, Dataset, PlayerRecord, Schema, MINUTES, PLAYER, POS, POS_PRIMARY, SQUAD, UNKNOWN,
};
use crate::error::DatasetError;

/// Columns that must be present for the table to be usable at all.
pub const REQUIRED_COLUMNS: [&str; 4] = [PLAYER, SQUAD, POS, MINUTES];

/// Suffix marking a per-90-minutes rate column.
pub const PER90_SUFFIX: &str = "_per90";

/// Non-suffixed columns that are always numeric.
pub const NUMERIC_LITERALS: [&str; 5] = ["Age", "Min", "90s", "SoT%", "Cmp%"];

/// Whether a column name is declared numeric. Identifier columns never are.
pub fn is_declared_numeric(column: &str) -> bool {
    if matches!(column, PLAYER | SQUAD | POS) {
        return false;
    }
    column.ends_with(PER90_SUFFIX) || NUMERIC_LITERALS.contains(&column)
}

/// Parse a numeric cell. Returns `None` for anything that would not be a
/// finite number. `-0.0` comes back as `0.0` so that ordering by
/// `total_cmp` treats the two zeros as equal.
fn coerce_numeric(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v + 0.0)
}

/// First comma-separated token of a position list, trimmed.
pub fn primary_position(position_raw: Option<&str>) -> String {
    match position_raw {
        Some(raw) => raw.split(',').next().unwrap_or(raw).trim().to_string(),
        None => UNKNOWN.to_string(),
    }
}

fn canonical_squad(cell: Option<&str>) -> String {
    match cell {
        Some(s) if s != "nan" => s.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

struct Layout {
    schema: Schema,
    /// (source index, slot) for every column read from the raw table.
    sources: Vec<(usize, ColumnSlot)>,
    numeric_count: usize,
    text_count: usize,
}

fn classify(headers: &[String]) -> Result<Layout, DatasetError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::DataFormat { missing });
    }

    let mut columns = Vec::with_capacity(headers.len() + 1);
    let mut slots = HashMap::with_capacity(headers.len() + 1);
    let mut numeric = Vec::new();
    let mut sources = Vec::with_capacity(headers.len());
    let mut text_count = 0;

    for (idx, name) in headers.iter().enumerate() {
        if name == POS_PRIMARY {
            debug!("ignoring source column {POS_PRIMARY}; it is always derived");
            continue;
        }
        if slots.contains_key(name) {
            warn!("duplicate column '{}' at position {}, keeping the first", name, idx);
            continue;
        }
        let slot = match name.as_str() {
            PLAYER => ColumnSlot::Player,
            SQUAD => ColumnSlot::Squad,
            POS => ColumnSlot::Position,
            MINUTES => ColumnSlot::Minutes,
            n if is_declared_numeric(n) => {
                numeric.push(name.clone());
                ColumnSlot::Numeric(numeric.len() - 1)
            }
            _ => {
                text_count += 1;
                ColumnSlot::Text(text_count - 1)
            }
        };
        columns.push(name.clone());
        slots.insert(name.clone(), slot);
        sources.push((idx, slot));
    }

    columns.push(POS_PRIMARY.to_string());
    slots.insert(POS_PRIMARY.to_string(), ColumnSlot::PrimaryPosition);

    let numeric_count = numeric.len();
    Ok(Layout {
        schema: Schema::new(columns, slots, numeric),
        sources,
        numeric_count,
        text_count,
    })
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Turn a raw table into the canonical dataset.
///
/// Fails only when a required identifier column is absent. Rows with no
/// player name are skipped. The result is sorted by player name (stable, so
/// rows sharing a name keep their source order).
pub fn normalize(raw: &RawTable) -> Result<Dataset, DatasetError> {
    let layout = classify(&raw.headers)?;
    let mut zero_filled: HashMap<ColumnSlot, usize> = HashMap::new();
    let mut records = Vec::with_capacity(raw.rows.len());

    for (row_idx, row) in raw.rows.iter().enumerate() {
        let mut player = None;
        let mut squad = None;
        let mut position_raw = None;
        let mut minutes = 0.0;
        let mut numeric = vec![0.0; layout.numeric_count];
        let mut text = vec![None; layout.text_count];

        for &(src, slot) in &layout.sources {
            let cell = row.get(src).and_then(|c| c.as_deref());
            match slot {
                ColumnSlot::Player => player = cell,
                ColumnSlot::Squad => squad = cell,
                ColumnSlot::Position => position_raw = cell,
                ColumnSlot::Minutes | ColumnSlot::Numeric(_) => {
                    let value = coerce_numeric(cell).unwrap_or_else(|| {
                        *zero_filled.entry(slot).or_insert(0) += 1;
                        0.0
                    });
                    match slot {
                        ColumnSlot::Numeric(i) => numeric[i] = value,
                        _ => minutes = value,
                    }
                }
                ColumnSlot::Text(i) => text[i] = cell.map(str::to_string),
                ColumnSlot::PrimaryPosition => {}
            }
        }

        let Some(player) = player else {
            warn!("skipping row {}: no player name", row_idx + 1);
            continue;
        };

        records.push(PlayerRecord {
            player: player.to_string(),
            squad: canonical_squad(squad),
            position_primary: primary_position(position_raw),
            position_raw: position_raw.map(str::to_string),
            minutes,
            numeric,
            text,
        });
    }

    for &(src, slot) in &layout.sources {
        if let Some(count) = zero_filled.get(&slot) {
            debug!(
                "zero-filled {} non-numeric cell(s) in column {}",
                count, raw.headers[src]
            );
        }
    }

    records.sort_by(|a, b| a.player.cmp(&b.player));

    Ok(Dataset::new(layout.schema, records))
}
