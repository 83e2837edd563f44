use crate::domain::constants::{RELEASE_HISTORY_CSV_PATH, RELEASE_HISTORY_PATH};
use crate::domain::models::{ConfigEnvironmentRecord, IdentityRecord, ReleaseMetadata};
use serde::Serialize;
use std::path::{Path, PathBuf};

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut raw = serde_json::to_string_pretty(value)?;
    raw.push('\n');
    std::fs::write(path, raw)?;
    Ok(())
}

/// Overwrites any previous record; this is last-known state, not a log.
pub fn save_identity_record(path: &Path, record: &IdentityRecord) -> anyhow::Result<()> {
    write_json(path, record)
}

pub fn load_identity_record(path: &Path) -> anyhow::Result<Option<IdentityRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn save_config_record(path: &Path, record: &ConfigEnvironmentRecord) -> anyhow::Result<()> {
    write_json(path, record)
}

pub fn release_history_path(root: &Path) -> PathBuf {
    root.join(RELEASE_HISTORY_PATH)
}

pub fn load_release_history(root: &Path) -> anyhow::Result<Vec<ReleaseMetadata>> {
    let p = release_history_path(root);
    if !p.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(p)?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&raw)?)
}

pub fn append_release_history(root: &Path, entry: ReleaseMetadata) -> anyhow::Result<usize> {
    let mut history = load_release_history(root)?;
    history.push(entry);
    write_json(&release_history_path(root), &history)?;
    Ok(history.len())
}

/// One row per release; the header is written only when the file is new.
pub fn append_release_csv(root: &Path, entry: &ReleaseMetadata) -> anyhow::Result<PathBuf> {
    let path = root.join(RELEASE_HISTORY_CSV_PATH);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let fresh = std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(fresh)
        .from_writer(file);
    writer.serialize(entry)?;
    writer.flush()?;
    Ok(path)
}

pub fn save_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    write_json(path, value)
}
