//! Wiki JSON API client.
//!
//! Wiki pages are served as JSON documents whose `content_html` field holds
//! the rendered page with entity-escaped tags.

pub mod client;
pub mod types;

pub use client::{FetchError, WikiClient, WikiSource};
pub use types::*;
