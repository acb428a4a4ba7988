//! Theme scraper library for the r/AnimeThemes wiki.
//!
//! This library fetches the wiki's year index and year pages through the
//! JSON API, extracts every series with its opening and ending themes, and
//! writes the result as a single JSON array.

pub mod api;
pub mod output;
pub mod parser;
pub mod scraper;

pub use api::{FetchError, WikiClient, WikiSource};
pub use output::OutputWriter;
pub use scraper::{ScrapeOutput, ScraperStats, ThemeScraper};
