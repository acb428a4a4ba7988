//! Data models for the project.
//!
//! This module defines the records produced by the scraper: one `Anime` per
//! series heading on a year page, each carrying its ordered `Theme` rows.

use serde::{Deserialize, Serialize};

/// Theme song kind, derived from the theme name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ThemeType {
    Opening,
    Ending,
}

impl ThemeType {
    /// Classify a theme by its name.
    ///
    /// Names starting with `OP` are openings, everything else is an ending.
    pub fn from_name(name: &str) -> Self {
        if name.starts_with("OP") {
            ThemeType::Opening
        } else {
            ThemeType::Ending
        }
    }
}

/// One opening or ending song entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Theme {
    /// Song type, number and title, e.g. `OP1 "sister's noise"`
    pub name: String,

    /// Link to the hosted video; absent when the row has no anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(rename = "type")]
    pub theme_type: ThemeType,

    /// Episodes using this theme (free text)
    pub episodes: String,

    /// Additional notes such as NSFW or spoiler markers (free text)
    pub notes: String,
}

impl Theme {
    /// Build a theme, deriving its type from the name
    pub fn new(
        name: impl Into<String>,
        link: Option<String>,
        episodes: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let theme_type = ThemeType::from_name(&name);
        Self {
            name,
            link,
            theme_type,
            episodes: episodes.into(),
            notes: notes.into(),
        }
    }
}

/// One series listed on a year page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Anime {
    pub id: String,           // MyAnimeList ID, empty if the link was unexpected
    pub title: String,        // Usually romaji
    pub year: String,         // Year or decade label of the page it came from
    pub themes: Vec<Theme>,   // Source table row order
}

impl Anime {
    pub fn theme_count(&self) -> usize {
        self.themes.len()
    }

    pub fn openings(&self) -> impl Iterator<Item = &Theme> {
        self.themes
            .iter()
            .filter(|t| t.theme_type == ThemeType::Opening)
    }

    pub fn endings(&self) -> impl Iterator<Item = &Theme> {
        self.themes
            .iter()
            .filter(|t| t.theme_type == ThemeType::Ending)
    }
}
