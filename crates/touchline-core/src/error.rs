// Error types shared by the dataset pipeline and the analysis modes.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset errors (fatal at startup)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("dataset is missing required column(s): {}", missing.join(", "))]
    DataFormat { missing: Vec<String> },
}

// ---------------------------------------------------------------------------
// Analysis errors (reported to the caller, recoverable)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("unknown metric `{0}`")]
    UnknownMetric(String),

    #[error("column `{0}` not found in the data")]
    MissingColumn(String),

    #[error("column `{0}` is not numeric")]
    NotNumeric(String),

    #[error("player `{name}` matched {matches} rows, expected exactly one")]
    AmbiguousOrMissingPlayer { name: String, matches: usize },

    #[error("cannot compare `{0}` with itself")]
    SamePlayer(String),

    #[error("no data found for team: {0}")]
    UnknownTeam(String),

    #[error("no players match the current filter criteria")]
    NoMatchingPlayers,

    #[error("the dataset lists no teams to analyze")]
    NoTeams,

    #[error("only {0} matches the current filters; adjust filters to compare")]
    OnlyOnePlayer(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("unknown season `{0}`")]
    UnknownSeason(String),
}

impl AnalysisError {
    /// Whether this error is an empty-result advisory rather than a caller
    /// mistake. Advisories are shown as warnings by the presentation layer.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            AnalysisError::UnknownTeam(_)
                | AnalysisError::NoMatchingPlayers
                | AnalysisError::NoTeams
                | AnalysisError::OnlyOnePlayer(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_format_lists_missing_columns() {
        let err = DatasetError::DataFormat {
            missing: vec!["Squad".into(), "Min".into()],
        };
        assert_eq!(
            err.to_string(),
            "dataset is missing required column(s): Squad, Min"
        );
    }

    #[test]
    fn advisories_are_empty_results_only() {
        assert!(AnalysisError::UnknownTeam("X".into()).is_advisory());
        assert!(AnalysisError::NoMatchingPlayers.is_advisory());
        assert!(AnalysisError::NoTeams.is_advisory());
        assert!(AnalysisError::OnlyOnePlayer("A".into()).is_advisory());
        assert!(!AnalysisError::MissingColumn("Gls_per90".into()).is_advisory());
        assert!(!AnalysisError::UnknownMetric("Goals".into()).is_advisory());
    }
}
