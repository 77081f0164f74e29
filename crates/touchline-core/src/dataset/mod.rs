// Player dataset: CSV loading, normalization, and the canonical table.

pub mod cache;
pub mod load;
pub mod normalize;
pub mod table;

use std::path::Path;

use tracing::info;

use crate::error::DatasetError;

pub use cache::DatasetCache;
pub use load::RawTable;
pub use normalize::normalize;
pub use table::{
    Cell, CellValue, ColumnSlot, DataTable, Dataset, PlayerRecord, Schema, TableView,
};

/// Load and normalize a player-stats CSV.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let raw = load::load_raw(path)?;
    let dataset = normalize(&raw)?;
    info!(
        "Loaded {} players ({} columns) from {}",
        dataset.len(),
        dataset.schema().columns().len(),
        path.display()
    );
    Ok(dataset)
}
