use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::common::config::OutputFormat;
use crate::linker::LinkStrategy;

/// duplink: reclaim space by replacing duplicate files with links
#[derive(Parser, Debug)]
#[command(
    name = "duplink",
    version,
    about = "Find duplicate files and replace them with links",
    long_about = "duplink scans a directory tree for files with identical content and\n\
                   replaces redundant copies with links to a single retained copy.\n\
                   Soft (relative) links are used on Unix, hard links on Windows.",
    after_help = "EXAMPLES:\n  \
        duplink dedupe ~/Music                          Interactive deduplication\n  \
        duplink dedupe ~/Music --dry-run                Show what would be linked\n  \
        duplink dedupe ./data --yes                     Link without prompting\n  \
        duplink dedupe ./data --exclude 1.2,3.1 --yes   Keep selected copies\n  \
        duplink dedupe C:\\Tools --exclude-executables   Skip .exe/.dll under hard links\n  \
        duplink dedupe ./data --report dupes.txt        Write a report, change nothing\n  \
        duplink config show                             Print the active configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (defaults to the configured format)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Config file to use instead of ~/.duplink/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose logging (-v info, -vv debug)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find duplicates and replace them with links
    Dedupe(DedupeArgs),

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

#[derive(Args, Debug)]
pub struct DedupeArgs {
    /// Directory to scan for duplicates
    pub path: PathBuf,

    /// Show what would be done without making any changes
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation and exclusion prompts
    #[arg(long, short = 'y', alias = "auto-confirm")]
    pub yes: bool,

    /// Never replace executables (.exe, .dll, ...) when hard links are used
    #[arg(long)]
    pub exclude_executables: bool,

    /// Write a report of duplicates to FILE instead of processing
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Duplicates to keep, as GROUP.INDEX pairs (e.g. 1.2,3.1)
    #[arg(long, value_name = "LIST")]
    pub exclude: Option<String>,

    /// Link kind (defaults to the platform's)
    #[arg(long, value_enum)]
    pub link_kind: Option<LinkStrategy>,

    /// Hash files on a worker pool
    #[arg(long)]
    pub parallel: bool,

    /// Worker pool size (0 = all CPUs)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Minimum file size to consider (in bytes)
    #[arg(long, value_name = "BYTES")]
    pub min_size: Option<u64>,

    /// Bytes read per hashing step
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Show individual files in each group
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write a default config file if none exists
    Init,

    /// Reset to default configuration
    Reset,

    /// Print the config file location
    Path,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
