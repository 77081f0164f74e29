// Library root for the player-stats analysis core.
//
// Pipeline: CSV -> `dataset::normalize` -> `filter` -> one of the
// `analysis` modes, with `catalog` resolving metric names and `session`
// routing a dashboard query to its mode.

pub mod analysis;
pub mod catalog;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod session;

pub use catalog::{Metric, MetricCatalog};
pub use dataset::{load_dataset, Dataset, DatasetCache};
pub use error::{AnalysisError, DatasetError};
pub use filter::{filter_players, FilterConfig};
pub use session::{AnalysisMode, Dashboard, DashboardQuery, ModeOutput, ModeSelection};
