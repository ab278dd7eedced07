use crate::config::{reader, writer, SkillConfig, TargetConfig};
use crate::json_equality::values_equal;
use crate::json_remove::remove_json_value;
use crate::target_paths::{
    manifest_path_for, resolve_base, settings_path_for, BaseCandidate, PathContext,
};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Run-wide options, built once from the command line and passed down explicitly.
#[derive(Debug, Clone)]
pub struct UninstallOptions {
    /// Prefer home-directory install locations (npm global install).
    pub global: bool,
    pub dry_run: bool,
    pub backup: bool,
    pub paths: PathContext,
}

/// What happened to a target's skills manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestCleanup {
    Missing,
    NotListed,
    Updated,
    Failed(String),
}

/// What happened to a target's settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCleanup {
    /// The descriptor carries no `settings` fragment.
    NotConfigured,
    Missing,
    Unchanged,
    Updated,
    Failed(String),
}

/// Details of a target that was processed without a hard failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: String,
    pub base: PathBuf,
    pub removed_paths: Vec<PathBuf>,
    pub manifest: ManifestCleanup,
    pub settings: SettingsCleanup,
}

impl TargetReport {
    pub fn was_installed(&self) -> bool {
        !self.removed_paths.is_empty()
    }
}

#[derive(Debug)]
pub enum TargetOutcome {
    Uninstalled(TargetReport),
    NotInstalled(TargetReport),
    Failed { target: String, error: anyhow::Error },
}

impl TargetOutcome {
    pub fn target(&self) -> &str {
        match self {
            Self::Uninstalled(report) | Self::NotInstalled(report) => &report.target,
            Self::Failed { target, .. } => target,
        }
    }
}

/// Outcomes of a full uninstall run, in target order.
#[derive(Debug, Default)]
pub struct UninstallReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl UninstallReport {
    pub fn uninstalled_from(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, TargetOutcome::Uninstalled(_)))
            .map(TargetOutcome::target)
            .collect()
    }

    pub fn failures(&self) -> Vec<(&str, &anyhow::Error)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                TargetOutcome::Failed { target, error } => Some((target.as_str(), error)),
                _ => None,
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|outcome| matches!(outcome, TargetOutcome::Failed { .. }))
    }
}

/// Uninstall the skill from every enabled target.
///
/// Targets are processed in order; a failing target is recorded and the run
/// moves on to the next one.
pub fn uninstall_skill(config: &SkillConfig, options: &UninstallOptions) -> UninstallReport {
    let targets = config.enabled_targets();
    info!("Uninstalling {} from {} target(s)", config.name, targets.len());

    let outcomes = targets
        .iter()
        .map(|target| match uninstall_from_target(target, config, options) {
            Ok(report) if report.was_installed() => TargetOutcome::Uninstalled(report),
            Ok(report) => TargetOutcome::NotInstalled(report),
            Err(error) => {
                warn!("Failed to uninstall from {}: {error:#}", target.name);
                TargetOutcome::Failed { target: target.name.clone(), error }
            },
        })
        .collect();

    UninstallReport { outcomes }
}

/// Uninstall the skill from a single target.
///
/// Removes the installed skill directories, drops the package from the target's
/// manifest and strips the descriptor's `settings` fragment from the settings
/// document beside the base directory. Manifest and settings problems are
/// reported in the returned [`TargetReport`] rather than failing the target.
///
/// # Errors
///
/// Returns an error if:
/// - The target declares no candidate paths
/// - The package name would resolve to the base directory itself or outside it
/// - An installed skill directory cannot be removed
pub fn uninstall_from_target(
    target: &TargetConfig,
    config: &SkillConfig,
    options: &UninstallOptions,
) -> Result<TargetReport> {
    let candidates: Vec<BaseCandidate> =
        target.paths.iter().map(|raw| BaseCandidate::expand(raw, &options.paths)).collect();
    let base = resolve_base(&candidates, options.global)
        .ok_or_else(|| anyhow::anyhow!("Target {} declares no install paths", target.name))?;
    debug!("Resolved base directory for {}: {}", target.name, base.display());

    let removed_paths = remove_skill_dirs(&base, config, options.dry_run)?;

    let manifest = cleanup_manifest(&manifest_path_for(&base), &config.name, options);

    let settings = config.settings.as_ref().map_or(SettingsCleanup::NotConfigured, |pattern| {
        remove_settings(&settings_path_for(&base), pattern, options)
    });

    Ok(TargetReport { target: target.name.clone(), base, removed_paths, manifest, settings })
}

fn remove_skill_dirs(base: &Path, config: &SkillConfig, dry_run: bool) -> Result<Vec<PathBuf>> {
    let skill_dir = base.join(config.skill_name());
    let package_dir = base.join(&config.name);

    let mut candidates = vec![skill_dir];
    if package_dir != candidates[0] {
        candidates.push(package_dir);
    }

    let mut removed = Vec::new();
    for path in candidates {
        ensure_strict_child(base, &path)?;
        if fs::symlink_metadata(&path).is_err() {
            continue;
        }

        if dry_run {
            info!("Would remove {}", path.display());
        } else {
            remove_path(&path)?;
            info!("Removed {}", path.display());
        }
        removed.push(path);
    }

    Ok(removed)
}

// Only ever delete something strictly below the base directory.
fn ensure_strict_child(base: &Path, path: &Path) -> Result<()> {
    let relative = path.strip_prefix(base).map_err(|_| {
        anyhow::anyhow!("Refusing to remove {}: outside {}", path.display(), base.display())
    })?;

    let mut components = relative.components().peekable();
    if components.peek().is_none()
        || !components.all(|component| matches!(component, Component::Normal(_)))
    {
        anyhow::bail!(
            "Refusing to remove {}: not a directory below {}",
            path.display(),
            base.display()
        );
    }

    Ok(())
}

fn remove_path(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;

    let removal = if metadata.is_dir() { fs::remove_dir_all(path) } else { fs::remove_file(path) };
    removal.with_context(|| format!("Failed to remove {}", path.display()))
}

fn cleanup_manifest(
    manifest_path: &Path,
    package_name: &str,
    options: &UninstallOptions,
) -> ManifestCleanup {
    match try_cleanup_manifest(manifest_path, package_name, options) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Could not update manifest {}: {e:#}", manifest_path.display());
            ManifestCleanup::Failed(format!("{e:#}"))
        },
    }
}

fn try_cleanup_manifest(
    manifest_path: &Path,
    package_name: &str,
    options: &UninstallOptions,
) -> Result<ManifestCleanup> {
    let Some(mut manifest) = reader::read_manifest(manifest_path)? else {
        return Ok(ManifestCleanup::Missing);
    };

    if !manifest.remove_skill(package_name) {
        debug!("{package_name} not listed in {}", manifest_path.display());
        return Ok(ManifestCleanup::NotListed);
    }

    if options.dry_run {
        info!("Would drop {package_name} from {}", manifest_path.display());
        return Ok(ManifestCleanup::Updated);
    }

    backup_if_requested(manifest_path, options)?;
    writer::write_manifest(manifest_path, &manifest)?;
    Ok(ManifestCleanup::Updated)
}

/// Strip `pattern` from the settings document at `settings_path`.
///
/// A missing file is skipped; read, parse and write problems are logged and
/// reported as [`SettingsCleanup::Failed`]. The file is only rewritten when the
/// cleaned document differs from what is on disk.
pub fn remove_settings(
    settings_path: &Path,
    pattern: &Value,
    options: &UninstallOptions,
) -> SettingsCleanup {
    match try_remove_settings(settings_path, pattern, options) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Could not update {}: {e:#}", settings_path.display());
            SettingsCleanup::Failed(format!("{e:#}"))
        },
    }
}

fn try_remove_settings(
    settings_path: &Path,
    pattern: &Value,
    options: &UninstallOptions,
) -> Result<SettingsCleanup> {
    let Some(existing) = reader::read_document(settings_path)? else {
        debug!("No settings file at {}, skipping cleanup", settings_path.display());
        return Ok(SettingsCleanup::Missing);
    };

    let cleaned = remove_json_value(&existing, pattern);
    if values_equal(&cleaned, &existing) {
        return Ok(SettingsCleanup::Unchanged);
    }

    if options.dry_run {
        info!("Would update {}", settings_path.display());
        debug!("Cleaned settings: {cleaned}");
        return Ok(SettingsCleanup::Updated);
    }

    backup_if_requested(settings_path, options)?;
    writer::write_document(settings_path, &cleaned)?;
    info!("Updated {}", settings_path.display());
    Ok(SettingsCleanup::Updated)
}

fn backup_if_requested(path: &Path, options: &UninstallOptions) -> Result<()> {
    if !options.backup {
        return Ok(());
    }

    if let Some(backup_path) = writer::backup_file(path)? {
        debug!("Backup created: {}", backup_path.display());
    }
    Ok(())
}
