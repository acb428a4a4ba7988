//! Main scraper orchestrator.
//!
//! Coordinates the whole run: read the year index, fetch every year page
//! concurrently, and collect the parsed series in index order.

use crate::api::WikiSource;
use crate::parser;
use anyhow::{Context, Result};
use futures::future::join_all;
use shared::Anime;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

/// Statistics for a scraping session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScraperStats {
    pub years_discovered: usize,
    pub years_scraped: usize,
    pub years_failed: usize,
    pub total_anime: usize,
    pub total_themes: usize,
    pub openings: usize,
    pub endings: usize,
    pub anime_without_themes: usize,
}

impl ScraperStats {
    fn record(&mut self, animes: &[Anime]) {
        self.years_scraped += 1;
        self.total_anime += animes.len();
        for anime in animes {
            self.total_themes += anime.theme_count();
            self.openings += anime.openings().count();
            self.endings += anime.endings().count();
            if anime.themes.is_empty() {
                self.anime_without_themes += 1;
            }
        }
    }
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct ScrapeOutput {
    pub animes: Vec<Anime>,
    pub stats: ScraperStats,
}

/// Main scraper coordinator
pub struct ThemeScraper<S> {
    source: S,
    index_page: String,
    fail_fast: bool,
}

impl<S: WikiSource> ThemeScraper<S> {
    /// Create a new scraper reading from `source`, starting at `index_page`
    pub fn new(source: S, index_page: impl Into<String>) -> Self {
        Self {
            source,
            index_page: index_page.into(),
            fail_fast: false,
        }
    }

    /// Abort the run on the first failed year instead of skipping it
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Fetch the index page and list the year pages it links to.
    ///
    /// Years keep their index order; repeated links are dropped.
    pub async fn discover_years(&self) -> Result<Vec<String>> {
        info!(page = %self.index_page, "Fetching year index");

        let content = self
            .source
            .fetch_content_html(&self.index_page)
            .await
            .with_context(|| format!("Failed to fetch index page {}", self.index_page))?;

        let mut seen = HashSet::new();
        let years: Vec<String> = parser::parse_year_links(&content)?
            .into_iter()
            .filter(|year| {
                let fresh = seen.insert(year.clone());
                if !fresh {
                    warn!(year = %year, "Year listed more than once, skipping duplicate");
                }
                fresh
            })
            .collect();

        info!(years = years.len(), "Discovered year pages");
        Ok(years)
    }

    /// Fetch and parse every series on one year page
    pub async fn fetch_year(&self, year: &str) -> Result<Vec<Anime>> {
        debug!(year = %year, "Fetching year page");

        let content = self
            .source
            .fetch_content_html(year)
            .await
            .with_context(|| format!("Failed to fetch year page {}", year))?;

        let animes = parser::parse_year_page(&content, year)
            .with_context(|| format!("Failed to parse year page {}", year))?;

        info!(year = %year, anime = animes.len(), "Parsed year page");
        Ok(animes)
    }

    /// Run the complete scraping process
    ///
    /// All year pages are requested at once. Every request resolves, so a
    /// failed year is either skipped (and counted) or, with fail-fast on,
    /// turned into the run's error.
    pub async fn run(&self) -> Result<ScrapeOutput> {
        info!("Starting theme scraper");

        let mut stats = ScraperStats::default();

        let years = self
            .discover_years()
            .await
            .context("Failed to discover year pages")?;
        stats.years_discovered = years.len();

        let results = join_all(years.iter().map(|year| async move {
            (year, self.fetch_year(year).await)
        }))
        .await;

        let mut animes = Vec::new();
        for (year, result) in results {
            match result {
                Ok(year_animes) => {
                    stats.record(&year_animes);
                    animes.extend(year_animes);
                }
                Err(e) if self.fail_fast => {
                    return Err(e.context(format!("Aborting run: year {} failed", year)));
                }
                Err(e) => {
                    error!(year = %year, error = %format!("{:#}", e), "Failed to scrape year");
                    stats.years_failed += 1;
                }
            }
        }

        info!(
            years_discovered = stats.years_discovered,
            years_scraped = stats.years_scraped,
            years_failed = stats.years_failed,
            anime = stats.total_anime,
            themes = stats.total_themes,
            "Theme scraper complete"
        );

        Ok(ScrapeOutput { animes, stats })
    }
}
