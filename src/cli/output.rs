use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use super::args::OutputFormat;
use crate::archive::{ArchiveEntry, BuildState, ProgressObserver, SavedArchive};
use crate::common::config::{self, Config};
use crate::common::format::{self, format_path, format_size, format_size_colored};
use crate::notify::{Notice, NoticeLevel, Notifier};
use crate::staging::StagedFile;

/// The command-line flag wins, then the config file
pub fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.unwrap_or(match config.output_format {
        config::OutputFormat::Human => OutputFormat::Human,
        config::OutputFormat::Json => OutputFormat::Json,
        config::OutputFormat::Quiet => OutputFormat::Quiet,
    })
}

/// Prints notices the way the UI would toast them
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    /// Success and info notices are only printed in human mode
    pub chatty: bool,
}

impl ConsoleNotifier {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self {
            chatty: format == OutputFormat::Human && !quiet,
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level() {
            NoticeLevel::Success if self.chatty => {
                println!("  {} {}", "✓".green(), notice.message())
            }
            NoticeLevel::Info if self.chatty => {
                println!("  {} {}", "ℹ".cyan(), notice.message())
            }
            NoticeLevel::Error => eprintln!("  {} {}", "✗".red(), notice.message()),
            _ => {}
        }
    }
}

/// Drives an indicatif bar from builder progress; one bar per build
#[derive(Default)]
pub struct BarObserver {
    bar: Option<ProgressBar>,
}

impl BarObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressObserver for BarObserver {
    fn on_progress(&mut self, state: BuildState, percent: f32) {
        match state {
            BuildState::Building => {
                let bar = self.bar.get_or_insert_with(|| {
                    let pb = ProgressBar::new(100);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("━━░"),
                    );
                    pb
                });
                bar.set_message(if percent < 75.0 {
                    "Adding files..."
                } else {
                    "Compressing..."
                });
                bar.set_position(percent.round() as u64);
            }
            BuildState::Idle => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }
}

/// Print the staging list in human-readable form
pub fn print_staged_files(files: &[StagedFile], total_size: u64) {
    println!();
    println!("{}  Staged files", "📦");
    println!("{}", "─".repeat(60).dimmed());

    if files.is_empty() {
        println!("  Nothing staged yet.");
    }

    for staged in files {
        println!("{}", staged_line(staged));
    }

    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {}  •  {} total",
        format::format_count(files.len()),
        format_size_colored(total_size)
    );
    println!();
}

/// One line describing a staged file
pub fn staged_line(staged: &StagedFile) -> String {
    let preview = if staged.preview.is_some() {
        format!(" {}", "[preview]".magenta())
    } else {
        String::new()
    };
    format!(
        "  {}  {:<32} {:>10}  {}{}",
        staged.id.dimmed(),
        format::truncate(staged.name(), 32),
        format_size(staged.size()),
        staged.file.mime_type.dimmed(),
        preview
    )
}

/// Staging list as JSON
pub fn print_staged_json(files: &[StagedFile], total_size: u64) -> anyhow::Result<()> {
    let json = serde_json::json!({
        "files": files.iter().map(|f| f.summary()).collect::<Vec<_>>(),
        "count": files.len(),
        "total_size": total_size,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Print a freshly saved archive
pub fn print_saved_archive(saved: &SavedArchive, elapsed: std::time::Duration) {
    println!();
    println!("  {} {}", "🗜️", saved.filename.bold());
    println!(
        "  {} in {}  •  {} → {} ({} smaller)",
        format::format_count(saved.entries),
        format::format_duration(elapsed).cyan(),
        format_size(saved.original_bytes),
        format_size_colored(saved.archive_bytes),
        format::format_savings(saved.original_bytes, saved.archive_bytes)
    );
    println!("  Saved to {}", format_path(&saved.location).cyan());
    println!();
}

/// Print the entries of an archive
pub fn print_entries(entries: &[ArchiveEntry]) {
    println!();
    for entry in entries {
        println!(
            "  {:<40} {:>10} {:>10}  {}",
            format::truncate(&entry.name, 40),
            format_size(entry.size),
            format_size(entry.compressed_size).dimmed(),
            entry.method.dimmed()
        );
    }
    let total: u64 = entries.iter().map(|e| e.size).sum();
    let packed: u64 = entries.iter().map(|e| e.compressed_size).sum();
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {}  •  {} → {}",
        format::format_count(entries.len()),
        format_size(total),
        format_size_colored(packed)
    );
    println!();
}
