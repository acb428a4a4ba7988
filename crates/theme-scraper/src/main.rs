//! Theme scraper CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use shared::{Config, LogConfig};
use std::path::PathBuf;
use theme_scraper::{OutputWriter, ThemeScraper, WikiClient};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output file, overrides the configured path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    shared::logging::init(&LogConfig::from_settings(&config.logging, args.verbose))?;

    if args.init_config {
        config
            .save(&args.config)
            .with_context(|| format!("Failed to write config to {}", args.config.display()))?;
        println!("Configuration written to {}", args.config.display());
        return Ok(());
    }

    info!("Theme scraper starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    let client = WikiClient::new(&config.wiki).context("Failed to create wiki client")?;
    let scraper = ThemeScraper::new(client, config.wiki.index_page.clone())
        .with_fail_fast(config.wiki.fail_fast);

    let output = scraper.run().await.context("Scraper failed")?;

    let path = args.output.unwrap_or_else(|| config.output_path());
    let writer = OutputWriter::new(&path, args.pretty || config.output.pretty);
    let written = writer.write(&output.animes).context("Failed to write output")?;

    let stats = &output.stats;
    info!("=== Scraping Complete ===");
    info!("Years discovered: {}", stats.years_discovered);
    info!("Years scraped: {}", stats.years_scraped);
    info!("Years failed: {}", stats.years_failed);
    info!(
        "Themes: {} ({} openings, {} endings)",
        stats.total_themes, stats.openings, stats.endings
    );
    info!("Anime without themes: {}", stats.anime_without_themes);

    println!("Parsed {} anime. Written to {}", written, writer.path().display());

    Ok(())
}
