use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use nangman_core::news::NewsArchive;
use std::path::{Path, PathBuf};

/// The collector's `collected_news.json`.
#[derive(Debug, Clone)]
pub struct NewsStore {
    path: PathBuf,
}

impl NewsStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// No file yet means nothing was collected.
    pub fn load(&self) -> anyhow::Result<NewsArchive> {
        if !self.path.exists() {
            log::warn!("news: {} not found", self.path.display());
            return Ok(NewsArchive::empty());
        }

        let raw = std::fs::read(&self.path)
            .with_context(|| format!("failed to read news: {}", self.path.display()))?;
        let mut archive: NewsArchive = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse news: {}", self.path.display()))?;
        archive.total_count = archive.news.len();
        Ok(archive)
    }

    pub fn save(&self, archive: &NewsArchive) -> anyhow::Result<()> {
        crate::files::write_json_atomic(&self.path, archive)
            .with_context(|| format!("failed to save news: {}", self.path.display()))
    }

    /// Rewrites the archive keeping only items inside the recency window, newest first.
    ///
    /// Returns the archive that was written.
    pub fn prune(&self, now: &DateTime<Local>, hours: i64) -> anyhow::Result<NewsArchive> {
        let mut archive = self.load()?;
        let before = archive.news.len();
        archive.retain_recent(now.with_timezone(&Utc), hours);

        let pruned = NewsArchive::new(archive.news, now.fixed_offset());
        self.save(&pruned)?;
        log::info!(
            "news: kept {} of {before} item(s) from the last {hours}h",
            pruned.news.len()
        );
        Ok(pruned)
    }
}
