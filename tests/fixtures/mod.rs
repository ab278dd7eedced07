#![allow(dead_code)]

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Test fixture for a project directory and a fake home directory
pub struct TestFixture {
    /// Temporary directory that will be cleaned up on drop
    pub temp: TempDir,
    /// Path to the test project directory
    pub project: PathBuf,
    /// Path used as `$HOME` for the binary under test
    pub home: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directories
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempdir()?;
        let project_dir = temp_dir.path().join("project");
        let home_dir = temp_dir.path().join("home");

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&home_dir)?;

        Ok(Self { temp: temp_dir, project: project_dir, home: home_dir })
    }

    /// Write `.claude-skill.json` into the project directory
    pub fn with_skill_config(&self, content: &str) -> std::io::Result<&Self> {
        fs::write(self.project.join(".claude-skill.json"), content)?;
        Ok(self)
    }

    /// Create an installed skill directory (with a SKILL.md) under `base`
    pub fn with_installed_skill(&self, base: &Path, dir_name: &str) -> std::io::Result<&Self> {
        let skill_dir = base.join(dir_name);
        fs::create_dir_all(&skill_dir)?;
        fs::write(skill_dir.join("SKILL.md"), "# Skill")?;
        Ok(self)
    }

    /// Write a file relative to the project directory, creating parents
    pub fn write_project_file(&self, relative: &str, content: &str) -> std::io::Result<&Self> {
        let path = self.project.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(self)
    }

    /// Project-local skills directory (`.claude/skills`)
    pub fn project_skills(&self) -> PathBuf {
        self.project.join(".claude").join("skills")
    }

    /// Home-directory skills directory (`~/.claude/skills`)
    pub fn home_skills(&self) -> PathBuf {
        self.home.join(".claude").join("skills")
    }

    /// Check if a file exists in the project directory
    pub fn project_file_exists(&self, relative: &str) -> bool {
        self.project.join(relative).exists()
    }

    /// Read and parse a JSON file
    pub fn read_json(path: &Path) -> anyhow::Result<Value> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}
