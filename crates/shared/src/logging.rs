//! Logging setup for the theme scraper.
//!
//! Progress goes to the console by default. Unattended runs can add a
//! daily-rotated file under `logging.log_dir`, plain or JSON.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Prefix of the rotated log files
pub const LOG_FILE_PREFIX: &str = "theme-scraper";

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Resolved logging settings for one run
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub level: Level,
    pub console: bool,
    pub file: bool,
    pub json_format: bool,
}

impl LogConfig {
    /// Resolve the `[logging]` table; `verbose` forces DEBUG
    pub fn from_settings(settings: &LoggingConfig, verbose: bool) -> Self {
        let level = if verbose {
            Level::DEBUG
        } else {
            settings.default_level.parse().unwrap_or(Level::INFO)
        };

        Self {
            log_dir: PathBuf::from(&settings.log_dir),
            level,
            console: settings.console,
            file: settings.file,
            json_format: settings.json_format,
        }
    }
}

/// Default filter: our crates at `level`, HTTP and HTML parser internals at warn
pub fn filter_directive(level: Level) -> String {
    format!(
        "theme_scraper={level},shared={level},\
         hyper=warn,reqwest=warn,h2=warn,html5ever=warn,selectors=warn"
    )
}

fn console_layer() -> BoxedLayer {
    fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stdout)
        .boxed()
}

fn file_layer(config: &LogConfig) -> Result<BoxedLayer> {
    std::fs::create_dir_all(&config.log_dir).with_context(|| {
        format!("Failed to create log directory: {}", config.log_dir.display())
    })?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);

    let layer = if config.json_format {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(appender)
            .boxed()
    } else {
        fmt::layer()
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(appender)
            .boxed()
    };

    Ok(layer)
}

/// Install the global subscriber. `RUST_LOG` overrides the level.
pub fn init(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config.level)));

    let mut layers = Vec::new();
    if config.console {
        layers.push(console_layer());
    }
    if config.file {
        layers.push(file_layer(config)?);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        level = %config.level,
        file = config.file,
        log_dir = %config.log_dir.display(),
        "Logging initialized"
    );

    Ok(())
}
