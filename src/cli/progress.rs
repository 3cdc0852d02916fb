//! Progress bar utilities for CLI output
//!
//! Key features:
//! - A hashing progress bar that only appears once hashing actually starts
//! - Consistent visual styling across all output
//! - A writer teeing log output to the console and a log file

use crate::takeout::IndexProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::{Duration, Instant};

// ============================================================================
// Styles - Consistent visual appearance
// ============================================================================

/// Get the progress bar style for hashing
fn progress_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  {spinner:.green} [{bar:40.cyan/dim}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╾─")
}

/// Get the style for completed progress bars
fn completed_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  ✓ [{bar:40.green/dim}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━━")
}

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 4);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║{}║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a section divider
pub fn print_divider() {
    println!();
    println!("{}", "─".repeat(60));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("  ✗ {}", msg);
}

/// Print a step in a process
pub fn print_step(step: usize, total: usize, msg: &str) {
    println!("  [{}/{}] {}", step, total, msg);
}

// ============================================================================
// Hashing progress
// ============================================================================

/// Progress bar fed by the indexer's progress callback
///
/// Nothing is drawn when the index comes from a snapshot.
pub struct HashProgress {
    bar: Option<ProgressBar>,
    start_time: Instant,
}

impl HashProgress {
    pub fn new() -> Self {
        Self {
            bar: None,
            start_time: Instant::now(),
        }
    }

    /// Handle one progress update
    pub fn update(&mut self, progress: &IndexProgress) {
        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(progress.total as u64);
            bar.set_style(progress_bar_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        bar.set_position(progress.current as u64);
        if progress.current_file.is_some() {
            bar.set_message(progress.album.clone());
        } else {
            self.finish(progress.current, progress.errors);
        }
    }

    fn finish(&mut self, hashed: usize, errors: usize) {
        if let Some(bar) = self.bar.take() {
            bar.set_style(completed_style());
            let note = if errors > 0 {
                format!(" ({} unreadable)", errors)
            } else {
                String::new()
            };
            bar.finish_with_message(format!(
                "Hashed {} files in {:.1}s{}",
                hashed,
                self.start_time.elapsed().as_secs_f64(),
                note
            ));
        }
    }
}

impl Default for HashProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HashProgress {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Format a millisecond duration for summaries
pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Writer that sends log output to both stderr and a log file
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        // console output is best effort, the file is the record
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================
