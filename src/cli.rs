use crate::config::SKILL_CONFIG_FILE_NAME;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "skill-uninstall",
    about = "Uninstall a Claude skill package - remove installed files and reverse settings edits",
    long_about = "skill-uninstall removes a previously installed skill package from every enabled target.

For each target it:
  • Removes the installed skill directory (<base>/<skill> and <base>/<@scope/skill>)
  • Drops the package from <base>/.skills-manifest.json
  • Strips the settings the installer added from <base>/../settings.json

Settings removal is best-effort: only values that still match what the skill
recorded in its descriptor are removed, and a failing target never stops the
remaining targets from being processed.

Examples:
  # Uninstall using ./.claude-skill.json
  skill-uninstall

  # Preview what would be removed
  skill-uninstall --dry-run

  # Uninstall a global (npm -g) installation, backing up edited files
  skill-uninstall --global --backup",
    version,
    author
)]
pub struct Cli {
    /// Path to the skill descriptor
    #[arg(
        short,
        long,
        env = "SKILL_UNINSTALL_CONFIG",
        default_value = SKILL_CONFIG_FILE_NAME,
        value_hint = clap::ValueHint::FilePath
    )]
    pub config: PathBuf,

    /// Project directory that project-local target paths are relative to (defaults to the current directory)
    #[arg(short, long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub project: Option<PathBuf>,

    /// Prefer home-directory install locations over project-local ones
    #[arg(
        short,
        long,
        env = "npm_config_global",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub global: bool,

    /// Preview changes without writing them
    #[arg(short, long)]
    pub dry_run: bool,

    /// Create timestamped backups of manifests and settings before rewriting them
    #[arg(short, long)]
    pub backup: bool,

    /// Exit with a non-zero status when any target fails
    #[arg(long)]
    pub strict: bool,

    /// Enable debug output (shows INFO and DEBUG messages)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable trace output (shows all log messages including TRACE)
    #[arg(short = 't', long, global = true)]
    pub trace: bool,
}
