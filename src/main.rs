#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use skill_uninstall::{
    cli::Cli,
    config::{reader, SkillConfig},
    target_paths::PathContext,
    uninstall::{
        uninstall_skill, ManifestCleanup, SettingsCleanup, TargetOutcome, TargetReport,
        UninstallOptions, UninstallReport,
    },
};
use tracing::{debug, error, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const RULE_WIDTH: usize = 60;

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(cli.debug, cli.trace);

    let options = build_options(&cli)?;
    debug!("Uninstall options: {options:?}");

    let config = match reader::read_skill_config(&cli.config) {
        Ok(Some(config)) => config,
        Ok(None) => {
            warn!("{} not found, skipping cleanup", cli.config.display());
            return Ok(());
        },
        Err(e) => {
            error!("Failed to load skill descriptor: {e:#}");
            if cli.strict {
                std::process::exit(1);
            }
            return Ok(());
        },
    };

    let report = run_uninstall(&config, &options);

    if cli.strict && report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing with the specified debug/trace flags
fn initialize_tracing(debug: bool, trace: bool) {
    let log_level = if trace {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(log_level.into()).from_env_lossy())
        .init();
}

fn build_options(cli: &Cli) -> Result<UninstallOptions> {
    let project_dir = match &cli.project {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    Ok(UninstallOptions {
        global: cli.global,
        dry_run: cli.dry_run,
        backup: cli.backup,
        paths: PathContext::from_environment(project_dir),
    })
}

fn run_uninstall(config: &SkillConfig, options: &UninstallOptions) -> UninstallReport {
    let targets = config.enabled_targets();
    let mode = if options.dry_run { " (dry run)" } else { "" };

    println!("Uninstalling skill \"{}\" from {} target(s){mode}:", config.name, targets.len());
    for target in &targets {
        println!("  • {}", target.name);
    }

    let report = uninstall_skill(config, options);

    for outcome in &report.outcomes {
        print_outcome(outcome, &config.name, options.dry_run);
    }
    print_summary(&report);

    report
}

fn print_outcome(outcome: &TargetOutcome, package_name: &str, dry_run: bool) {
    println!();
    println!("{}:", outcome.target());
    match outcome {
        TargetOutcome::Uninstalled(report) => {
            print_details(report, package_name, dry_run);
            println!("  Uninstalled from {}", report.target);
        },
        TargetOutcome::NotInstalled(report) => {
            print_details(report, package_name, dry_run);
            println!("  Skill was not installed in {}", report.target);
        },
        TargetOutcome::Failed { target, error } => {
            eprintln!("  Failed to uninstall from {target}: {error:#}");
        },
    }
}

fn print_details(report: &TargetReport, package_name: &str, dry_run: bool) {
    let (remove_verb, update_verb) =
        if dry_run { ("Would remove", "Would update") } else { ("Removed", "Updated") };

    for path in &report.removed_paths {
        println!("  {remove_verb} {}", path.display());
    }

    match &report.manifest {
        ManifestCleanup::Updated => println!("  {update_verb} manifest"),
        ManifestCleanup::Failed(reason) => println!("  Warning: could not update manifest: {reason}"),
        ManifestCleanup::Missing | ManifestCleanup::NotListed => {},
    }

    match &report.settings {
        SettingsCleanup::Updated => {
            println!("  {update_verb} settings.json (removed {package_name} config)");
        },
        SettingsCleanup::Unchanged => println!("  settings.json already clean"),
        SettingsCleanup::Missing => println!("  No settings.json found, skipping cleanup"),
        SettingsCleanup::Failed(reason) => {
            println!("  Warning: could not update settings.json: {reason}");
        },
        SettingsCleanup::NotConfigured => {},
    }
}

fn print_summary(report: &UninstallReport) {
    let rule = "=".repeat(RULE_WIDTH);
    let uninstalled = report.uninstalled_from();

    println!();
    println!("{rule}");
    if uninstalled.is_empty() {
        println!("Skill was not installed");
        println!("{rule}");
    } else {
        println!("Uninstallation complete!");
        println!("{rule}");
        println!();
        println!("Uninstalled from:");
        for target in uninstalled {
            println!("  • {target}");
        }
    }

    let failures = report.failures();
    if !failures.is_empty() {
        println!();
        println!("Failed targets:");
        for (target, _) in failures {
            println!("  • {target}");
        }
    }
}
