//! Wiki API response types.

use serde::{Deserialize, Serialize};

/// Envelope returned by `{wiki}/{page}.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiPageResponse {
    #[serde(default)]
    pub kind: Option<String>,
    pub data: WikiPageData,
}

/// Rendered wiki page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiPageData {
    /// Page HTML with `<` and `>` escaped as entities
    pub content_html: String,
    #[serde(default)]
    pub content_md: Option<String>,
    #[serde(default)]
    pub revision_date: Option<f64>,
}
