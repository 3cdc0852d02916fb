//! Takeout Dedup Library
//!
//! Removes duplicate photos and videos from an exported photo takeout. The
//! same file is often exported into several album folders and again into
//! date-named dumps such as `Photos from 2020`. A run has three phases:
//!
//! 1. **Index** - every album file is hashed (MD5) into a
//!    [`DuplicateIndex`](duplicate::DuplicateIndex), or the index is loaded
//!    from a JSON snapshot written by an earlier run.
//! 2. **Purge** - files in the dumps whose content is already filed in an
//!    album are deleted together with their `.json` sidecar.
//! 3. **Merge** - content found in several albums is moved once into a
//!    multi-album folder named after those albums (`A _, B`) and the other
//!    copies are deleted.
//!
//! # Architecture
//!
//! - [`core`] - Configuration and error types
//! - [`duplicate`] - Content hashing, the duplicate index and its snapshot
//! - [`takeout`] - Directory classification and the purge / merge phases
//! - [`cli`] - Command-line interface (only used by the binary)
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use takeout_dedup::core::config::Config;
//! use takeout_dedup::takeout::{run, RunOptions};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default()?;
//!
//!     // Report what would happen without changing anything
//!     let options = RunOptions {
//!         dry_run: true,
//!         ..RunOptions::default()
//!     };
//!
//!     let summary = run(Path::new("Takeout"), &config, &options, |_| {})?;
//!     if let Some(merge) = &summary.merge {
//!         for action in &merge.actions {
//!             println!("{}", action);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Dry Run** - Every phase can be simulated and reports the same actions
//! - **Sidecar Aware** - `.json` metadata travels with its media file
//! - **Resumable** - Merge folders are marked, so re-runs finish interrupted merges
//! - **Snapshots** - The album index can be saved and reused to skip hashing

pub mod cli;
pub mod core;
pub mod duplicate;
pub mod takeout;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
