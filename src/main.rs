use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use file_fling::archive::{self, ArchiveBuilder, ArchiveOptions, BuildOutcome, DirectorySink};
use file_fling::cli::args::{Cli, Commands, CompletionShell, ConfigAction, OutputFormat};
use file_fling::cli::output::{self, BarObserver, ConsoleNotifier};
use file_fling::cli::shell::Shell;
use file_fling::common::config::Config;
use file_fling::common::format;
use file_fling::notify::Notifier;
use file_fling::staging::{RawFile, StagingList};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let _log_guard = init_logging(&cli);

    match cli.command {
        Commands::Pack {
            ref files,
            ref output,
            level,
            ref prefix,
        } => cmd_pack(&cli, files, output.clone(), level, prefix.clone()),

        Commands::List { ref files } => cmd_list(&cli, files),

        Commands::Shell {
            ref files,
            ref output,
        } => cmd_shell(&cli, files, output.clone()),

        Commands::Inspect { ref archive } => cmd_inspect(&cli, archive),

        Commands::Config { ref action } => cmd_config(action),

        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                CompletionShell::Bash => clap_complete::Shell::Bash,
                CompletionShell::Zsh => clap_complete::Shell::Zsh,
                CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "file-fling", &mut std::io::stdout());
            Ok(())
        }
    }
}

// ─── Logging ──────────────────────────────────────────────────────────────────

/// Stderr logging with `--verbose` (or `RUST_LOG`), plus an optional daily file.
/// The returned guard flushes the file writer on drop.
fn init_logging(cli: &Cli) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let stderr_filter = if cli.verbose {
        Some(EnvFilter::new("file_fling=debug"))
    } else {
        EnvFilter::try_from_default_env().ok()
    };
    let stderr_layer =
        stderr_filter.map(|filter| fmt::layer().with_writer(std::io::stderr).with_filter(filter));

    let mut guard = None;
    let file_layer = if cli.log_file {
        match Config::init_dirs() {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(Config::logs_dir(), "file-fling.log");
                let (writer, worker_guard) = tracing_appender::non_blocking(appender);
                guard = Some(worker_guard);
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer)
                        .with_filter(EnvFilter::new("file_fling=debug")),
                )
            }
            Err(e) => {
                eprintln!("  {} Log file disabled: {:#}", "⚠".yellow(), e);
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

// ─── Shared setup ─────────────────────────────────────────────────────────────

fn read_files(paths: &[PathBuf]) -> Result<Vec<RawFile>> {
    paths
        .iter()
        .map(|path| {
            RawFile::from_path(path).with_context(|| format!("Cannot stage {}", path.display()))
        })
        .collect()
}

fn make_builder(
    config: &Config,
    options: ArchiveOptions,
    output_dir: Option<PathBuf>,
    notifier: Arc<dyn Notifier>,
    show_progress: bool,
) -> ArchiveBuilder {
    let dir = output_dir.unwrap_or_else(|| config.resolved_output_dir());
    let builder = ArchiveBuilder::new(options, Box::new(DirectorySink::new(dir)), notifier);
    if show_progress {
        builder.with_observer(Box::new(BarObserver::new()))
    } else {
        builder
    }
}

// ─── Pack ─────────────────────────────────────────────────────────────────────

fn cmd_pack(
    cli: &Cli,
    files: &[PathBuf],
    output_dir: Option<PathBuf>,
    level: Option<i64>,
    prefix: Option<String>,
) -> Result<()> {
    let config = Config::load()?;
    let format = output::resolve_format(cli.format, &config);
    let show_progress = !cli.quiet && format == OutputFormat::Human;

    let mut options = ArchiveOptions::from_config(&config);
    if let Some(level) = level {
        options.compression_level = level;
    }
    if let Some(prefix) = prefix {
        options.prefix = prefix;
    }
    options.validate()?;

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier::new(format, cli.quiet));
    let mut staging = StagingList::new(notifier.clone());
    staging.add(read_files(files)?);

    let mut builder = make_builder(&config, options, output_dir, notifier, show_progress);

    let start = Instant::now();
    let outcome = builder.build(staging.files());
    let elapsed = start.elapsed();

    match outcome {
        BuildOutcome::Saved(saved) => {
            match format {
                OutputFormat::Human if !cli.quiet => output::print_saved_archive(&saved, elapsed),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&saved)?),
                _ => println!("{}", saved.location.display()),
            }
            Ok(())
        }
        BuildOutcome::NoFiles => anyhow::bail!("No files to pack"),
        BuildOutcome::Failed { reason } => anyhow::bail!("Failed to create archive: {}", reason),
    }
}

// ─── List ─────────────────────────────────────────────────────────────────────

fn cmd_list(cli: &Cli, files: &[PathBuf]) -> Result<()> {
    let config = Config::load()?;
    let format = output::resolve_format(cli.format, &config);

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier::new(format, true));
    let mut staging = StagingList::new(notifier);
    staging.add(read_files(files)?);

    match format {
        OutputFormat::Human => output::print_staged_files(staging.files(), staging.total_size()),
        OutputFormat::Json => output::print_staged_json(staging.files(), staging.total_size())?,
        OutputFormat::Quiet => {
            for staged in staging.files() {
                println!("{}  {}  {}", staged.id, staged.size(), staged.name());
            }
        }
    }

    Ok(())
}

// ─── Shell ────────────────────────────────────────────────────────────────────

fn cmd_shell(cli: &Cli, files: &[PathBuf], output_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let format = output::resolve_format(cli.format, &config);
    let interactive = std::io::stdin().is_terminal();

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier::new(format, cli.quiet));
    let staging = StagingList::new(notifier.clone());
    let options = ArchiveOptions::from_config(&config);
    let builder = make_builder(&config, options, output_dir, notifier, interactive && !cli.quiet);

    let mut shell = Shell::new(staging, builder, config.thumbnail_size);
    let mut stdout = std::io::stdout();

    if interactive && !cli.quiet {
        println!();
        println!("  {} file-fling session, type {} for commands", "📦", "help".cyan());
        println!();
    }

    shell.add_paths(files, &mut stdout)?;
    shell.run(std::io::stdin().lock(), &mut stdout, interactive)?;
    Ok(())
}

// ─── Inspect ──────────────────────────────────────────────────────────────────

fn cmd_inspect(cli: &Cli, path: &Path) -> Result<()> {
    let config = Config::load()?;
    let entries = archive::list_entries(path)
        .with_context(|| format!("Cannot read archive {}", path.display()))?;

    match output::resolve_format(cli.format, &config) {
        OutputFormat::Human => output::print_entries(&entries),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Quiet => {
            for entry in &entries {
                println!("{}  {}", entry.size, entry.name);
            }
        }
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::init_dirs()?;
            let config = Config::default();
            config.save()?;
            println!("  {} file-fling initialized at ~/.file-fling", "✓".green());
            println!("  Created: config.toml, logs/");
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            println!(
                "# archives are saved to {}",
                format::format_path(&config.resolved_output_dir())
            );
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}
