use crate::domain::constants::SETTINGS_FILE;
use crate::domain::models::Settings;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("settings file not found: {0}")]
    NotFound(PathBuf),
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn settings_path(root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => root.join(SETTINGS_FILE),
    }
}

/// `envstamp.toml` at the project root is optional; an explicit
/// `--config` path must exist.
pub fn load_settings(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let path = settings_path(root, explicit);
    if !path.exists() {
        if explicit.is_some() {
            return Err(SettingsError::NotFound(path).into());
        }
        return Ok(Settings::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    toml::from_str(&raw).map_err(|source| SettingsError::Parse { path, source }.into())
}

pub fn save_settings(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(settings)?)?;
    Ok(())
}
