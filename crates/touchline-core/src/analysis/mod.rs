// Analysis modes: top performers, player comparison, opponent roster.

pub mod compare;
pub mod roster;
pub mod top;

pub use compare::{compare, ComparisonRow, ComparisonTable};
pub use roster::{roster, RosterTable};
pub use top::{
    scatter_points, top_n, top_performers, BarEntry, BarSeries, ScatterPoint, ScatterSeries,
    TopPerformersReport, TopPerformersSelection, DEFAULT_TOP_N,
};
