use anyhow::Context;
use nangman_core::config::AppConfig;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<AppConfig> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read config: {}", self.path.display()))?;
        let cfg: AppConfig = serde_json::from_slice(&bytes).context("decode config JSON")?;
        Ok(cfg)
    }

    /// A missing file yields defaults; a malformed one is still an error.
    pub fn load_or_default(&self) -> anyhow::Result<AppConfig> {
        if !self.path.exists() {
            log::info!(
                "config: {} not found, using defaults",
                self.path.display()
            );
            return Ok(AppConfig::default());
        }
        self.load()
    }

    pub fn save(&self, cfg: &AppConfig) -> anyhow::Result<()> {
        crate::files::write_json_atomic(&self.path, cfg)
            .with_context(|| format!("save config: {}", self.path.display()))
    }

    /// Writes the default config. An existing file is only replaced when `overwrite` is set.
    pub fn init(&self, overwrite: bool) -> anyhow::Result<AppConfig> {
        if self.path.exists() && !overwrite {
            return Err(anyhow::anyhow!(
                "{} already exists (use --force to overwrite)",
                self.path.display()
            ));
        }
        let cfg = AppConfig::default();
        self.save(&cfg)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nangman_core::types::BriefingFormat;

    #[test]
    fn round_trips_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("nested").join("config.json"));

        let mut cfg = AppConfig::default();
        cfg.telegram.enabled = true;
        cfg.telegram.chat_id = "-100123".into();
        cfg.notification.format = BriefingFormat::Simple;
        cfg.content.character_reference_url = Some("https://cdn.example/ref.png".into());

        store.save(&cfg).unwrap();
        assert_eq!(store.load().unwrap(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("config.json"));
        assert_eq!(store.load_or_default().unwrap(), AppConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(ConfigStore::at_path(path).load_or_default().is_err());
    }

    #[test]
    fn init_refuses_to_clobber_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::at_path(&path);

        assert_eq!(store.init(false).unwrap(), AppConfig::default());
        assert_eq!(store.load().unwrap(), AppConfig::default());

        std::fs::write(&path, "{ not json").unwrap();
        let err = store.init(false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");

        store.init(true).unwrap();
        assert_eq!(store.load().unwrap(), AppConfig::default());
    }
}
