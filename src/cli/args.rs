use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// file-fling: stage files and fling them into one zip
#[derive(Parser, Debug)]
#[command(
    name = "file-fling",
    version,
    about = "Stage files and bundle them into a single zip archive",
    long_about = "file-fling stages the files you pick, shows what you are about to send,\n\
                   and bundles them into one timestamped zip archive.",
    after_help = "EXAMPLES:\n  \
        file-fling pack notes.txt photo.png       Zip two files into ~/Downloads\n  \
        file-fling pack *.log -o /tmp --level 9   Maximum compression into /tmp\n  \
        file-fling list ~/Pictures/*.jpg          Review files without archiving\n  \
        file-fling shell                          Interactive staging session\n  \
        file-fling inspect file-fling-*.zip       List entries of an archive\n  \
        file-fling config show                    Show current configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (defaults to `output_format` from the config file)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Also write logs to a daily file under ~/.file-fling/logs
    #[arg(long, global = true)]
    pub log_file: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage files and build an archive from them
    Pack {
        /// Files to bundle, in archive order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory to save the archive in
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Deflate level (1-9)
        #[arg(long)]
        level: Option<i64>,

        /// Archive name prefix
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Stage files and show them without archiving
    List {
        /// Files to review
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Interactive staging session (reads commands from stdin)
    Shell {
        /// Files to stage before the prompt opens
        files: Vec<PathBuf>,

        /// Directory to save archives in
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List the entries of a zip archive
    Inspect {
        /// Archive to read
        archive: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Initialize file-fling directories and default config
    Init,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
