//! Shared library for the AnimeThemes wiki scraper.
//!
//! This crate provides common functionality used by the scraper crate:
//! - Configuration management
//! - Theme and anime records
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
