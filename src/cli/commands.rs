//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::cli::progress::{
    format_duration_ms, print_divider, print_error, print_header, print_info, print_step,
    print_success, print_warning, HashProgress,
};
use crate::cli::{Args, Commands, DestructiveArgs};
use crate::core::config::{init_config, Config};
use crate::takeout::{run, IndexSource, PhaseReport, RunOptions, RunSummary};
use anyhow::{Context, Result};
use dialoguer::Confirm;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Phases a destructive command runs
#[derive(Debug, Clone, Copy)]
struct Phases {
    purge: bool,
    merge: bool,
}

/// Run the appropriate command based on CLI arguments
pub fn run_command(args: &Args, config: &Config) -> Result<()> {
    match &args.command {
        Commands::Run {
            target,
            skip_purge,
            skip_merge,
        } => {
            let phases = Phases {
                purge: !skip_purge,
                merge: !skip_merge,
            };
            dedup(args, config, target, phases)?;
        }
        Commands::Purge { target } => {
            let phases = Phases {
                purge: true,
                merge: false,
            };
            dedup(args, config, target, phases)?;
        }
        Commands::Merge { target } => {
            let phases = Phases {
                purge: false,
                merge: true,
            };
            dedup(args, config, target, phases)?;
        }
        Commands::Index { root } => {
            index_only(args, config, root)?;
        }
        Commands::ShowConfig => {
            show_config(config);
        }
        Commands::GenerateConfig { output } => {
            generate_config_file(output.clone())?;
        }
    }

    Ok(())
}

fn dedup(args: &Args, config: &Config, target: &DestructiveArgs, phases: Phases) -> Result<()> {
    if !phases.purge && !phases.merge {
        print_warning("Both phases are skipped, only the index will be built");
    }

    if !target.dry_run && !target.yes && !confirm(&target.root, phases)? {
        print_warning("Aborted, nothing was changed");
        return Ok(());
    }

    let options = RunOptions {
        dry_run: target.dry_run,
        purge: phases.purge,
        merge: phases.merge,
        use_snapshot: !args.no_snapshot,
        rehash: target.rehash,
    };

    let start_time = Instant::now();
    let summary = execute(&target.root, config, &options)?;
    print_summary(&summary, start_time.elapsed().as_millis() as u64);
    Ok(())
}

fn index_only(args: &Args, config: &Config, root: &Path) -> Result<()> {
    let options = RunOptions {
        dry_run: false,
        purge: false,
        merge: false,
        use_snapshot: !args.no_snapshot,
        rehash: true,
    };

    let start_time = Instant::now();
    let summary = execute(root, config, &options)?;
    print_summary(&summary, start_time.elapsed().as_millis() as u64);

    if options.use_snapshot && config.index.snapshot_enabled {
        print_success(&format!(
            "Snapshot: {}",
            config.index.snapshot_file.display()
        ));
    } else {
        print_info("Snapshots are disabled, the index was not saved");
    }
    Ok(())
}

fn confirm(root: &Path, phases: Phases) -> Result<bool> {
    let what = match (phases.purge, phases.merge) {
        (true, true) => "delete duplicates and move shared album files",
        (true, false) => "delete non-album duplicates",
        (false, true) => "move shared album files and delete their copies",
        (false, false) => return Ok(true),
    };

    Confirm::new()
        .with_prompt(format!("This will {} under {}. Continue?", what, root.display()))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

fn execute(root: &Path, config: &Config, options: &RunOptions) -> Result<RunSummary> {
    info!("Takeout: {}", root.display());
    if options.dry_run {
        info!("Dry run: nothing will be deleted or moved");
    }

    let mut progress = HashProgress::new();
    let summary = run(root, config, options, |p| progress.update(&p))?;
    Ok(summary)
}

/// Print the end-of-run summary
fn print_summary(summary: &RunSummary, elapsed_ms: u64) {
    let title = if summary.dry_run {
        "Dry Run Summary"
    } else {
        "Takeout Dedup Summary"
    };
    print_header(title);

    let total_steps =
        1 + usize::from(summary.purge.is_some()) + usize::from(summary.merge.is_some());
    let mut step = 1;

    let source = match &summary.index_source {
        IndexSource::Built => "hashed".to_string(),
        IndexSource::Snapshot(path) => format!("loaded from {}", path.display()),
    };
    print_step(step, total_steps, &format!("Index ({})", source));
    print_info(&format!(
        "{} album(s), {} merged, {} non-album directories",
        summary.albums, summary.merged_dirs, summary.non_albums
    ));
    let stats = &summary.index_stats;
    print_info(&format!(
        "{} files, {} unique, {} redundant copies in {} groups",
        stats.total_items, stats.unique_hashes, stats.duplicate_items, stats.duplicate_groups
    ));
    if summary.hash_errors > 0 {
        print_warning(&format!("{} file(s) could not be read", summary.hash_errors));
    }

    if let Some(report) = &summary.purge {
        step += 1;
        print_step(step, total_steps, "Purge outside albums");
        print_info(&format!("{} file(s) examined", report.examined));
        print_success(&format!(
            "{} duplicate(s) deleted, {} with sidecar",
            report.deleted(),
            report.sidecars()
        ));
        print_failures(report);
    }

    if let Some(report) = &summary.merge {
        step += 1;
        print_step(step, total_steps, "Merge across albums");
        print_info(&format!("{} shared digest(s)", report.examined));
        print_success(&format!(
            "{} moved, {} deleted, {} multi-album folder(s) created",
            report.moved(),
            report.deleted(),
            report.created_dirs()
        ));
        print_failures(report);
    }

    print_divider();
    if summary.dry_run {
        print_info("Dry run: no file was changed");
    }
    if summary.is_clean() {
        print_success(&format!("Done in {}", format_duration_ms(elapsed_ms)));
    } else {
        print_warning(&format!(
            "Done in {} with {} problem(s), see the log above",
            format_duration_ms(elapsed_ms),
            summary.failure_count()
        ));
    }
}

fn print_failures(report: &PhaseReport) {
    for failure in &report.failures {
        print_error(&failure.to_string());
    }
}

/// Generate a configuration file at the specified or default location
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let output_path = match output {
        Some(path) => {
            fs::write(&path, Config::generate_default_config())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path
        }
        None => init_config()?,
    };

    info!("Configuration file: {}", output_path.display());
    info!("Edit this file to customize the deduplication settings.");
    Ok(())
}

/// Show the current configuration settings
pub fn show_config(config: &Config) {
    let config_path = Config::get_active_config_path();
    info!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        info!("(Using default settings - no config file found)");
    }
    info!("");
    info!("Current Configuration:");
    info!("----------------------");
    info!("[takeout]");
    info!("  non_album_prefix = {:?}", config.takeout.non_album_prefix);
    info!("  sidecar_suffix = {:?}", config.takeout.sidecar_suffix);
    info!("  merge_separator = {:?}", config.takeout.merge_separator);
    info!("");
    info!("[index]");
    info!("  snapshot_enabled = {}", config.index.snapshot_enabled);
    info!(
        "  snapshot_file = \"{}\"",
        config.index.snapshot_file.display()
    );
    info!("  block_size = {}", config.index.block_size);
    info!("");
    info!("[logging]");
    info!("  level = \"{}\"", config.logging.level);
    info!("  log_to_file = {}", config.logging.log_to_file);
    info!("  log_file = \"{}\"", config.logging.log_file.display());
}
