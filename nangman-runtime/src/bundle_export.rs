use anyhow::Context;
use chrono::{DateTime, Local};
use nangman_core::bundle::{ContentBundle, export_file_name, render_bundle_export};
use std::path::{Path, PathBuf};

/// Writes the bundle as a timestamped text file under `dir` and returns its path.
pub fn export_bundle(
    dir: &Path,
    bundle: &ContentBundle,
    now: &DateTime<Local>,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export directory: {}", dir.display()))?;
    let path = dir.join(export_file_name(now));
    std::fs::write(&path, render_bundle_export(bundle, now))
        .with_context(|| format!("write export: {}", path.display()))?;
    log::info!("export: wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn writes_named_export() {
        let dir = tempfile::tempdir().unwrap();
        let now = Local.with_ymd_and_hms(2024, 5, 2, 21, 0, 0).unwrap();
        let bundle = ContentBundle {
            topic: "노을".into(),
            title: "노을이 안아주는 저녁".into(),
            title_candidates: "1. 노을이 안아주는 저녁".into(),
            script: "[도입]\n오늘도".into(),
            prompts: "Studio Ghibli style, dusk".into(),
            narration_path: Some("/tmp/n.mp3".into()),
        };

        let path = export_bundle(dir.path(), &bundle, &now).unwrap();
        assert!(path.ends_with("nangman_shorts_20240502_210000.txt"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("노을이 안아주는 저녁"));
        assert!(text.contains("/tmp/n.mp3"));
    }
}
