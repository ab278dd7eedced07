use super::{validate_package_name, SkillConfig, SkillsManifest};
use crate::UninstallError;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a JSON document, treating a missing file as `None`
///
/// # Errors
///
/// Returns an error if:
/// - Unable to read the file (when it exists)
/// - Unable to parse the JSON content
pub fn read_document<P: AsRef<Path>>(path: P) -> anyhow::Result<Option<Value>> {
    read_json(path.as_ref())
}

/// Read the skill package descriptor
///
/// # Errors
///
/// Returns an error if:
/// - Unable to read the file (when it exists)
/// - Unable to parse the JSON content
/// - The descriptor's `name` does not map to a single directory (empty, `.`/`..`, extra separators)
pub fn read_skill_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Option<SkillConfig>> {
    let path_ref = path.as_ref();
    let Some(config) = read_json::<SkillConfig>(path_ref)? else {
        return Ok(None);
    };

    validate_package_name(&config.name)
        .with_context(|| format!("Invalid skill descriptor {}", path_ref.display()))?;

    Ok(Some(config))
}

/// Read a skills manifest
///
/// # Errors
///
/// Returns an error if:
/// - Unable to read the file (when it exists)
/// - Unable to parse the JSON content
pub fn read_manifest<P: AsRef<Path>>(path: P) -> anyhow::Result<Option<SkillsManifest>> {
    read_json(path.as_ref())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(UninstallError::Io(e))
                .with_context(|| format!("Failed to read {}", path.display()));
        },
    };

    let parsed = serde_json::from_str(&content)
        .map_err(UninstallError::Json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(Some(parsed))
}
