//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Remove duplicate photos and videos from an exported photo takeout
#[derive(Parser, Debug)]
#[command(name = "takeout-dedup")]
#[command(version)]
#[command(
    about = "Deduplicate a photo takeout: purge unfiled copies of album media and merge media shared by several albums",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Snapshot file for the album index (overrides config)
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "no_snapshot")]
    pub snapshot: Option<PathBuf>,

    /// Neither load nor save the index snapshot
    #[arg(long, global = true)]
    pub no_snapshot: bool,
}

/// Options shared by the commands that change the takeout
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DestructiveArgs {
    /// Takeout directory containing the album folders
    pub root: PathBuf,

    /// Only report what would be deleted or moved
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Hash the albums again even if a snapshot exists
    #[arg(long)]
    pub rehash: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index the albums, purge unfiled duplicates and merge shared media
    Run {
        #[command(flatten)]
        target: DestructiveArgs,

        /// Leave the non-album directories alone
        #[arg(long)]
        skip_purge: bool,

        /// Leave the albums alone
        #[arg(long)]
        skip_merge: bool,
    },

    /// Hash the albums and save the snapshot without changing anything
    Index {
        /// Takeout directory containing the album folders
        root: PathBuf,
    },

    /// Delete non-album files whose content is already in an album
    Purge {
        #[command(flatten)]
        target: DestructiveArgs,
    },

    /// Move media shared by several albums into multi-album folders
    Merge {
        #[command(flatten)]
        target: DestructiveArgs,
    },

    /// Show current configuration
    ShowConfig,

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
