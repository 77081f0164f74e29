// Configuration loading and parsing (dashboard.toml).

use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use touchline_core::analysis::{TopPerformersSelection, DEFAULT_TOP_N};
use touchline_core::session::DEFAULT_SEASON;
use touchline_core::{AnalysisError, AnalysisMode, DashboardQuery, FilterConfig, ModeSelection};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub filters: FiltersConfig,
    pub analysis: AnalysisConfig,
    pub top_performers: TopPerformersSelection,
    pub compare: CompareConfig,
    pub opponent: OpponentConfig,
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire dashboard.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    dataset: DatasetConfig,
    filters: FiltersConfig,
    analysis: AnalysisConfig,
    #[serde(default)]
    top_performers: TopPerformersSelection,
    #[serde(default)]
    compare: CompareConfig,
    opponent: OpponentConfig,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub path: String,
    #[serde(default = "default_seasons")]
    pub seasons: Vec<String>,
    #[serde(default = "default_season")]
    pub season: String,
}

fn default_seasons() -> Vec<String> {
    vec![DEFAULT_SEASON.to_string()]
}

fn default_season() -> String {
    DEFAULT_SEASON.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiltersConfig {
    /// Primary positions to keep. Empty keeps every position.
    #[serde(default)]
    pub positions: Vec<String>,
    pub min_minutes: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub mode: AnalysisMode,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// Players to compare. Unset entries fall back to the first filtered players.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareConfig {
    pub player_a: Option<String>,
    pub player_b: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpponentConfig {
    /// Squad to scout. Unset picks the first team alphabetically.
    #[serde(default)]
    pub team: Option<String>,
    pub threat_metric: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    pub fn filter(&self) -> Result<FilterConfig, AnalysisError> {
        FilterConfig::new(self.filters.min_minutes, self.filters.positions.iter().cloned())
    }

    /// Build the dashboard query for the configured mode.
    pub fn query(&self) -> Result<DashboardQuery, AnalysisError> {
        let selection = match self.analysis.mode {
            AnalysisMode::TopPerformers => ModeSelection::TopPerformers {
                metrics: self.top_performers.clone(),
                top_n: self.analysis.top_n,
            },
            AnalysisMode::ComparePlayers => ModeSelection::ComparePlayers {
                player_a: self.compare.player_a.clone(),
                player_b: self.compare.player_b.clone(),
            },
            AnalysisMode::AnalyzeOpponent => ModeSelection::AnalyzeOpponent {
                team: self.opponent.team.clone(),
                threat_metric: self.opponent.threat_metric.clone(),
            },
        };
        Ok(DashboardQuery {
            season: self.dataset.season.clone(),
            filter: self.filter()?,
            selection,
        })
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/dashboard.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("dashboard.toml");
    let text = read_file(&path)?;
    let file: DashboardFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        dataset: file.dataset,
        filters: file.filters,
        analysis: file.analysis,
        top_performers: file.top_performers,
        compare: file.compare,
        opponent: file.opponent,
        output: file.output,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy any `defaults/` file missing from `config/` and return the copied
/// paths. Files ending in `.example` stay behind, and an existing config file
/// is never touched.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            debug!("no defaults/ in {}, using config/ as is", base_dir.display());
            return Ok(Vec::new());
        }
        return Err(copy_error(format!(
            "neither defaults/ nor config/ found in {}",
            base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_error(format!("cannot create {}: {e}", config_dir.display())))?;

    let mut sources: Vec<PathBuf> = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_error(format!("cannot list {}: {e}", defaults_dir.display())))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && !is_example(path))
        .collect();
    sources.sort();

    let mut copied = Vec::new();
    for source in sources {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if copy_if_absent(&source, &target)? {
            info!("created {} from defaults", target.display());
            copied.push(target);
        }
    }
    Ok(copied)
}

fn is_example(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "example")
}

/// Write `source` to `target` unless `target` already exists. Returns whether
/// a copy was made.
fn copy_if_absent(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(copy_error(format!("cannot create {}: {e}", target.display()))),
    };
    let content = std::fs::read(source)
        .map_err(|e| copy_error(format!("cannot read {}: {e}", source.display())))?;
    dest.write_all(&content)
        .map_err(|e| copy_error(format!("cannot write {}: {e}", target.display())))?;
    Ok(true)
}

fn copy_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.dataset.path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "dataset.path".into(),
            message: "must not be empty".into(),
        });
    }

    if !config.dataset.seasons.contains(&config.dataset.season) {
        return Err(ConfigError::ValidationError {
            field: "dataset.season".into(),
            message: format!(
                "`{}` is not one of the configured seasons {:?}",
                config.dataset.season, config.dataset.seasons
            ),
        });
    }

    let min = config.filters.min_minutes;
    if !min.is_finite() || min < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "filters.min_minutes".into(),
            message: format!("must be a non-negative number, got {min}"),
        });
    }

    if config.analysis.top_n == 0 {
        return Err(ConfigError::ValidationError {
            field: "analysis.top_n".into(),
            message: "must be > 0".into(),
        });
    }

    let metric_fields = [
        ("top_performers.x_metric", config.top_performers.x_metric.as_str()),
        ("top_performers.y_metric", config.top_performers.y_metric.as_str()),
        ("top_performers.bar_metric", config.top_performers.bar_metric.as_str()),
        ("opponent.threat_metric", config.opponent.threat_metric.as_str()),
    ];
    for (name, val) in metric_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must name a metric".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
