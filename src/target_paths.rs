use crate::config::{MANIFEST_FILE_NAME, SETTINGS_FILE_NAME};
use std::path::{Path, PathBuf};

/// Directories that relative candidate paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    pub project_dir: PathBuf,
    pub home_dir: Option<PathBuf>,
}

impl PathContext {
    /// Context for `project_dir` with the current user's home directory.
    #[must_use]
    pub fn from_environment(project_dir: PathBuf) -> Self {
        let home_dir = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Self { project_dir, home_dir }
    }
}

/// A candidate base directory for one install target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCandidate {
    pub path: PathBuf,
    /// Whether the candidate lives under the user's home rather than the project.
    pub global: bool,
}

impl BaseCandidate {
    /// Expand a raw candidate from the skill descriptor.
    ///
    /// `~` and `~/...` expand against the home directory; absolute paths are kept
    /// as given; anything else is taken relative to the project directory.
    #[must_use]
    pub fn expand(raw: &str, context: &PathContext) -> Self {
        let home_relative = if raw == "~" {
            Some("")
        } else {
            raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\"))
        };

        if let (Some(rest), Some(home)) = (home_relative, context.home_dir.as_ref()) {
            let path = if rest.is_empty() { home.clone() } else { home.join(rest) };
            return Self { path, global: true };
        }

        let raw_path = Path::new(raw);
        if raw_path.is_absolute() {
            let global = context.home_dir.as_ref().is_some_and(|home| raw_path.starts_with(home));
            return Self { path: raw_path.to_path_buf(), global };
        }

        Self { path: context.project_dir.join(raw_path), global: false }
    }
}

/// Pick the base directory actually used by a target.
///
/// With `prefer_global`, home-directory candidates are tried before project-local
/// ones; otherwise the declared order is kept. The first candidate that exists on
/// disk wins, falling back to the first candidate. Returns `None` only when there
/// are no candidates.
#[must_use]
pub fn resolve_base(candidates: &[BaseCandidate], prefer_global: bool) -> Option<PathBuf> {
    let mut ordered: Vec<&BaseCandidate> = candidates.iter().collect();
    if prefer_global {
        ordered.sort_by_key(|candidate| !candidate.global);
    }

    ordered
        .iter()
        .find(|candidate| candidate.path.exists())
        .or_else(|| ordered.first())
        .map(|candidate| candidate.path.clone())
}

/// Settings document that sits beside the skills directory (`<base>/../settings.json`).
#[must_use]
pub fn settings_path_for(base: &Path) -> PathBuf {
    base.parent().map_or_else(|| base.join(".."), Path::to_path_buf).join(SETTINGS_FILE_NAME)
}

#[must_use]
pub fn manifest_path_for(base: &Path) -> PathBuf {
    base.join(MANIFEST_FILE_NAME)
}
