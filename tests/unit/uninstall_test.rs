use anyhow::Result;
use serde_json::{json, Value};
use skill_uninstall::{
    config::SkillConfig,
    target_paths::PathContext,
    uninstall::{
        uninstall_from_target, uninstall_skill, ManifestCleanup, SettingsCleanup, TargetOutcome,
        UninstallOptions,
    },
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(root: &Path) -> UninstallOptions {
        UninstallOptions {
            global: false,
            dry_run: false,
            backup: false,
            paths: PathContext {
                project_dir: root.join("project"),
                home_dir: Some(root.join("home")),
            },
        }
    }

    fn skill_config(value: Value) -> SkillConfig {
        serde_json::from_value(value).expect("valid skill config")
    }

    fn write_json(path: &Path, value: &Value) {
        fs::create_dir_all(path.parent().expect("path has a parent")).expect("create parent");
        fs::write(path, serde_json::to_string_pretty(value).expect("serialize")).expect("write");
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).expect("read")).expect("parse")
    }

    #[test]
    fn test_uninstall_from_project_target() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path().join("project/.claude/skills");
        fs::create_dir_all(base.join("demo"))?;
        fs::write(base.join("demo/SKILL.md"), "# Demo")?;
        write_json(
            &base.join(".skills-manifest.json"),
            &json!({"skills": {"@acme/demo": {"version": "1.0.0"}, "other": {}}}),
        );
        write_json(
            &temp_dir.path().join("project/.claude/settings.json"),
            &json!({"theme": "dark", "permissions": {"allow": ["Bash(demo:*)"]}}),
        );

        let config = skill_config(json!({
            "name": "@acme/demo",
            "settings": {"permissions": {"allow": ["Bash(demo:*)"]}}
        }));
        let target = config.enabled_targets().remove(0);

        let report = uninstall_from_target(&target, &config, &options(temp_dir.path()))?;

        assert_eq!(report.base, base);
        assert_eq!(report.removed_paths, vec![base.join("demo")]);
        assert_eq!(report.manifest, ManifestCleanup::Updated);
        assert_eq!(report.settings, SettingsCleanup::Updated);
        assert!(!base.join("demo").exists());
        assert_eq!(read_json(&base.join(".skills-manifest.json")), json!({"skills": {"other": {}}}));
        assert_eq!(
            read_json(&temp_dir.path().join("project/.claude/settings.json")),
            json!({"theme": "dark"})
        );
        Ok(())
    }

    #[test]
    fn test_global_prefers_home_location() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let project_base = temp_dir.path().join("project/.claude/skills");
        let home_base = temp_dir.path().join("home/.claude/skills");
        fs::create_dir_all(project_base.join("demo"))?;
        fs::create_dir_all(home_base.join("demo"))?;

        let config = skill_config(json!({"name": "demo"}));
        let target = config.enabled_targets().remove(0);
        let opts = UninstallOptions { global: true, ..options(temp_dir.path()) };

        let report = uninstall_from_target(&target, &config, &opts)?;

        assert_eq!(report.base, home_base);
        assert!(!home_base.join("demo").exists());
        assert!(project_base.join("demo").exists());
        assert_eq!(report.settings, SettingsCleanup::NotConfigured);
        assert_eq!(report.manifest, ManifestCleanup::Missing);
        Ok(())
    }

    #[test]
    fn test_dry_run_writes_nothing() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path().join("project/.claude/skills");
        fs::create_dir_all(base.join("demo"))?;
        let settings_path = temp_dir.path().join("project/.claude/settings.json");
        let settings = json!({"env": {"DEMO": "1"}});
        write_json(&settings_path, &settings);

        let config = skill_config(json!({"name": "demo", "settings": {"env": {"DEMO": "1"}}}));
        let opts = UninstallOptions { dry_run: true, ..options(temp_dir.path()) };

        let report = uninstall_skill(&config, &opts);

        assert_eq!(report.uninstalled_from(), vec!["claude-code"]);
        assert!(base.join("demo").exists());
        assert_eq!(read_json(&settings_path), settings);
        Ok(())
    }

    #[test]
    fn test_failed_target_does_not_stop_others() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path().join("project/.codex/skills");
        fs::create_dir_all(base.join("demo"))?;

        let config = skill_config(json!({
            "name": "demo",
            "targets": [
                {"name": "broken", "paths": []},
                {"name": "disabled", "paths": [".cursor/skills"], "enabled": false},
                {"name": "missing", "paths": [".claude/skills"]},
                {"name": "codex", "paths": [".codex/skills"]}
            ]
        }));

        let report = uninstall_skill(&config, &options(temp_dir.path()));

        let targets: Vec<&str> = report.outcomes.iter().map(TargetOutcome::target).collect();
        assert_eq!(targets, vec!["broken", "missing", "codex"]);
        assert!(matches!(report.outcomes[0], TargetOutcome::Failed { .. }));
        assert!(matches!(report.outcomes[1], TargetOutcome::NotInstalled(_)));
        assert!(matches!(report.outcomes[2], TargetOutcome::Uninstalled(_)));
        assert!(report.has_failures());
        assert_eq!(report.uninstalled_from(), vec!["codex"]);
        assert!(!base.join("demo").exists());
        Ok(())
    }

    #[test]
    fn test_malformed_settings_is_reported_not_fatal() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path().join("project/.claude/skills");
        fs::create_dir_all(base.join("demo"))?;
        fs::write(temp_dir.path().join("project/.claude/settings.json"), "{ broken")?;

        let config = skill_config(json!({"name": "demo", "settings": {"a": 1}}));
        let report = uninstall_skill(&config, &options(temp_dir.path()));

        let [TargetOutcome::Uninstalled(target_report)] = report.outcomes.as_slice() else {
            panic!("expected a single uninstalled target, got {:?}", report.outcomes);
        };
        assert!(matches!(target_report.settings, SettingsCleanup::Failed(_)));
        assert!(!report.has_failures());
        Ok(())
    }

    #[test]
    fn test_settings_cleaned_even_when_not_installed() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let settings_path = temp_dir.path().join("project/.claude/settings.json");
        write_json(&settings_path, &json!({"hooks": {"Stop": [{"command": "demo"}]}, "x": 1}));

        let config = skill_config(json!({
            "name": "demo",
            "settings": {"hooks": {"Stop": [{"command": "demo"}]}}
        }));
        let report = uninstall_skill(&config, &options(temp_dir.path()));

        assert!(matches!(report.outcomes[0], TargetOutcome::NotInstalled(_)));
        assert_eq!(read_json(&settings_path), json!({"x": 1}));
        Ok(())
    }
}
