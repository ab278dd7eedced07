use super::SkillsManifest;
use anyhow::Context;
use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write a JSON document as pretty-printed text
///
/// # Errors
///
/// Returns an error if:
/// - Unable to create parent directories
/// - Unable to serialize the document
/// - Unable to write to the file
pub fn write_document<P: AsRef<Path>>(path: P, document: &Value) -> anyhow::Result<()> {
    write_json(path.as_ref(), document)
}

/// Write a skills manifest
///
/// # Errors
///
/// Returns an error if:
/// - Unable to create parent directories
/// - Unable to serialize the manifest
/// - Unable to write to the file
pub fn write_manifest<P: AsRef<Path>>(path: P, manifest: &SkillsManifest) -> anyhow::Result<()> {
    write_json(path.as_ref(), manifest)
}

/// Create a backup of a file with timestamp
///
/// # Errors
///
/// Returns an error if unable to copy the file
pub fn backup_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Option<PathBuf>> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Ok(None);
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = path_ref.with_file_name(format!(
        "{}.backup.{}",
        path_ref.file_name().and_then(|n| n.to_str()).unwrap_or("settings.json"),
        timestamp
    ));

    fs::copy(path_ref, &backup_path)
        .with_context(|| format!("Failed to back up {}", path_ref.display()))?;

    Ok(Some(backup_path))
}

// Writes go through a temp file in the destination directory so a failed write
// never leaves a truncated document behind.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');

    let mut file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
