//! JSON output sink.

use anyhow::{Context, Result};
use shared::Anime;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the aggregate anime list as one JSON array
#[derive(Debug, Clone)]
pub struct OutputWriter {
    path: PathBuf,
    pretty: bool,
}

impl OutputWriter {
    pub fn new(path: impl AsRef<Path>, pretty: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `animes` and replace the output file. Returns the record count.
    pub fn write(&self, animes: &[Anime]) -> Result<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }

        let content = if self.pretty {
            serde_json::to_string_pretty(animes)
        } else {
            serde_json::to_string(animes)
        }
        .context("Failed to serialize anime list")?;

        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write output file: {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            anime = animes.len(),
            "Output written"
        );

        Ok(animes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Theme;
    use tempfile::TempDir;

    fn sample() -> Vec<Anime> {
        vec![Anime {
            id: "6213".to_string(),
            title: "Toaru Kagaku no Railgun".to_string(),
            year: "2009".to_string(),
            themes: vec![
                Theme::new(
                    "OP1 \"only my railgun\"",
                    Some("https://v/OP1.webm".into()),
                    "1-14",
                    "",
                ),
                Theme::new("ED1 \"Dear My Friend\"", None, "2-12", "Spoiler"),
            ],
        }]
    }

    #[test]
    fn test_write_compact() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("out").join("output.json");

        let written = OutputWriter::new(&path, false).write(&sample())?;
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&path)?;
        assert!(!content.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&content)?;
        assert_eq!(value[0]["id"], "6213");
        assert_eq!(value[0]["themes"][0]["type"], "opening");
        assert_eq!(value[0]["themes"][1]["type"], "ending");
        assert!(value[0]["themes"][1].get("link").is_none());
        Ok(())
    }

    #[test]
    fn test_write_pretty_and_reload() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("output.json");

        OutputWriter::new(&path, true).write(&sample())?;

        let content = std::fs::read_to_string(&path)?;
        assert!(content.contains('\n'));
        let reloaded: Vec<Anime> = serde_json::from_str(&content)?;
        assert_eq!(reloaded, sample());
        Ok(())
    }

    #[test]
    fn test_write_empty_list() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("output.json");

        assert_eq!(OutputWriter::new(&path, false).write(&[])?, 0);
        assert_eq!(std::fs::read_to_string(&path)?, "[]");
        Ok(())
    }
}
