// Load-once dataset cache keyed on source path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::{load_dataset, Dataset};
use crate::error::DatasetError;

/// Memoizes loaded datasets. The table never mutates after load, so a
/// cached handle stays valid for the life of the process.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, DatasetError> {
        if let Some(dataset) = self.entries.get(path) {
            debug!("dataset cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_dataset(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
