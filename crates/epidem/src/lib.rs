//! Support code for the `epidem` inspector binary: logging, config loading
//! and summary rendering.

use std::path::Path;

use color_eyre::eyre::WrapErr;
use epidem_core::{IndexConfig, SweepSummary};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr.
///
/// The level can be controlled via the `level` parameter or the `RUST_LOG`
/// environment variable.
pub fn init_logging(level: &str) {
    let default_filter = format!("epidem={level},epidem_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();
}

/// Load index options from a YAML file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> color_eyre::Result<IndexConfig> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading config {}", path.display()))?;
    parse_config(&text).wrap_err_with(|| format!("parsing config {}", path.display()))
}

pub fn parse_config(text: &str) -> color_eyre::Result<IndexConfig> {
    Ok(serde_saphyr::from_str(text)?)
}

/// Output format for `inspect`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render_summary(summary: &SweepSummary, format: OutputFormat) -> color_eyre::Result<String> {
    Ok(match format {
        OutputFormat::Text => summary.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(summary)?,
    })
}
