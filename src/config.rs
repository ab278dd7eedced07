#![allow(clippy::self_named_module_files)]

use crate::UninstallError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod reader;
pub mod writer;

/// File name of the skill package descriptor.
pub const SKILL_CONFIG_FILE_NAME: &str = ".claude-skill.json";

/// Name of the per-target manifest listing installed skills.
pub const MANIFEST_FILE_NAME: &str = ".skills-manifest.json";

/// Name of the settings document that lives next to a target's base directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

const DEFAULT_TARGET_NAME: &str = "claude-code";
const DEFAULT_TARGET_PATHS: [&str; 2] = [".claude/skills", "~/.claude/skills"];

/// Skill package descriptor (`.claude-skill.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillConfig {
    /// Package name, possibly npm-scoped (`@scope/name`).
    pub name: String,

    /// Settings fragment the installer merged into each target's settings document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetConfig>,

    // Catch-all for unknown fields to preserve them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetConfig {
    pub name: String,

    /// Candidate base directories, most preferred first.
    #[serde(default)]
    pub paths: Vec<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl TargetConfig {
    /// The target used when the descriptor declares none.
    #[must_use]
    pub fn default_claude_code() -> Self {
        Self {
            name: DEFAULT_TARGET_NAME.to_string(),
            paths: DEFAULT_TARGET_PATHS.iter().map(ToString::to_string).collect(),
            enabled: true,
        }
    }
}

impl SkillConfig {
    /// Skill name with any npm scope prefix stripped.
    #[must_use]
    pub fn skill_name(&self) -> &str {
        extract_skill_name(&self.name)
    }

    /// Enabled targets in declaration order, or the default Claude Code target when
    /// the descriptor lists no targets at all.
    #[must_use]
    pub fn enabled_targets(&self) -> Vec<TargetConfig> {
        if self.targets.is_empty() {
            return vec![TargetConfig::default_claude_code()];
        }

        self.targets.iter().filter(|target| target.enabled).cloned().collect()
    }
}

/// Check that a package name maps to a single directory below a target's base.
///
/// Accepts `name` or `@scope/name`, where each part is a non-empty path
/// component other than `.` or `..` and contains no path separators.
///
/// # Errors
///
/// Returns [`UninstallError::Config`] describing the first offending part.
pub fn validate_package_name(package_name: &str) -> Result<(), UninstallError> {
    let invalid = |reason: &str| {
        Err(UninstallError::Config(format!("invalid package name {package_name:?}: {reason}")))
    };

    if package_name.trim().is_empty() {
        return invalid("must not be empty");
    }

    let (scope, name) = match package_name.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, name)) => (Some(scope), name),
            None => return invalid("scoped names must look like @scope/name"),
        },
        None => (None, package_name),
    };

    if let Some(scope) = scope {
        if !is_plain_component(scope) {
            return invalid("scope must be a single path component");
        }
    }
    if !is_plain_component(name) {
        return invalid("skill name must be a single path component");
    }

    Ok(())
}

fn is_plain_component(part: &str) -> bool {
    !part.trim().is_empty() && part != "." && part != ".." && !part.contains(['/', '\\'])
}

/// `@scope/name` → `name`; anything else is returned unchanged.
#[must_use]
pub fn extract_skill_name(package_name: &str) -> &str {
    package_name
        .strip_prefix('@')
        .and_then(|scoped| scoped.split_once('/'))
        .map_or(package_name, |(_, name)| name)
}

/// Manifest of skills installed into one target base directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillsManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl SkillsManifest {
    /// Drop `package_name` from the skill listing. Returns whether an entry was removed.
    pub fn remove_skill(&mut self, package_name: &str) -> bool {
        self.skills.as_mut().is_some_and(|skills| skills.shift_remove(package_name).is_some())
    }
}
