// Touchline entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load and normalize the player dataset
// 4. Build the dashboard and run the configured query
// 5. Print the result (advisories print as warnings)

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use touchline::config::{self, OutputFormat};
use touchline::render;
use touchline_core::{Dashboard, DatasetCache};

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Touchline starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: season={}, mode={}, data={}",
        config.dataset.season, config.analysis.mode, config.dataset.path
    );

    // 3. Load dataset
    let mut cache = DatasetCache::new();
    let dataset = cache
        .get_or_load(Path::new(&config.dataset.path))
        .with_context(|| format!("failed to load dataset {}", config.dataset.path))?;

    // 4. Run the query
    let dashboard = Dashboard::new(Arc::clone(&dataset), config.dataset.seasons.clone());
    let query = config.query().context("invalid filter configuration")?;

    let output = match dashboard.run(&query) {
        Ok(output) => output,
        Err(e) if e.is_advisory() => {
            warn!("{}", e);
            println!("{}", render::render_advisory(&e));
            return Ok(());
        }
        Err(e) => return Err(e).context("analysis failed"),
    };

    // 5. Print
    let text = match config.output.format {
        OutputFormat::Text => render::render_text(&query, &output),
        OutputFormat::Json => render::render_json(&output).context("failed to encode output")?,
    };
    println!("{text}");

    info!("Touchline finished");
    Ok(())
}

/// Log file under the working directory. Stdout carries only the report.
const LOG_PATH: [&str; 2] = ["logs", "touchline.log"];

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "touchline=info,touchline_core=info,warn";

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let [dir, file] = LOG_PATH;
    let log_dir = std::env::current_dir()
        .context("cannot resolve working directory")?
        .join(dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("cannot create {}", log_dir.display()))?;
    let log_path = log_dir.join(file);
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("cannot create {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
