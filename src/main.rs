use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use duplink::cli::args::{Cli, Commands, CompletionShell, ConfigAction, DedupeArgs};
use duplink::cli::{output, prompt};
use duplink::common::config::{Config, OutputFormat};
use duplink::common::{format, logging};
use duplink::duplicates::{self, ScanOptions};
use duplink::engine::{self, RunMode, RunOptions};
use duplink::linker::{FsLinker, LinkStrategy};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let _log_guard = logging::init(cli.verbose, cli.quiet, cli.log_file.as_deref());

    match cli.command {
        Commands::Dedupe(ref args) => cmd_dedupe(&cli, args),
        Commands::Config { ref action } => cmd_config(&cli, action),
        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                CompletionShell::Bash => clap_complete::Shell::Bash,
                CompletionShell::Zsh => clap_complete::Shell::Zsh,
                CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "duplink", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Config::config_path)
}

// ─── Dedupe ───────────────────────────────────────────────────────────────────

fn cmd_dedupe(cli: &Cli, args: &DedupeArgs) -> Result<()> {
    let DedupeArgs {
        ref path,
        dry_run,
        yes,
        exclude_executables,
        ref report,
        ref exclude,
        link_kind,
        parallel,
        threads,
        min_size,
        chunk_size,
        detailed,
    } = *args;

    let config = Config::load_from(&config_path(cli))?;
    let output_format = cli.format.unwrap_or(config.output_format);
    let human = output_format == OutputFormat::Human;

    let root = expand_home(path);

    let mut scan_options = ScanOptions::from_config(&config);
    scan_options.parallel |= parallel;
    if let Some(n) = threads {
        scan_options.threads = n;
    }
    if let Some(n) = min_size {
        scan_options.min_size = n;
    }
    if let Some(n) = chunk_size.filter(|n| *n > 0) {
        scan_options.chunk_size = n;
    }
    scan_options.show_progress = human && !cli.quiet;

    let strategy = LinkStrategy::from_setting(link_kind.or(config.link_kind));

    let mut options = RunOptions::new(strategy);
    options.exclude_executables = exclude_executables;
    options.dry_run = dry_run;
    options.report_path = report.clone();
    options.executable_extensions = config.executable_extensions.clone();

    if human && !cli.quiet {
        println!();
        println!(
            "  {} Scanning for duplicates in: {}",
            "🔍",
            format::format_path(&root).cyan()
        );
        if dry_run {
            println!("  {} Dry run — no files will be modified", "ℹ️");
        }
    }

    let scan = duplicates::scan(&root, &scan_options, |p| config.is_excluded(p))
        .with_context(|| format!("Cannot scan {}", root.display()))?;

    let preview = engine::plan(&scan, &options);
    if human && !cli.quiet {
        output::print_groups(&preview, detailed || !yes);
    }

    let interactive = human && !yes && std::io::stdin().is_terminal();

    if let Some(list) = exclude {
        let selection = prompt::parse_exclusions(list, &preview.groups);
        report_invalid(&selection.invalid);
        options.exclusions = selection.excluded;
    } else if interactive && options.mode() == RunMode::Live && !preview.groups.is_empty() {
        let stdin = std::io::stdin();
        let selection = prompt::read_exclusions(&mut stdin.lock(), &mut std::io::stdout(), &preview.groups)?;
        report_invalid(&selection.invalid);
        options.exclusions = selection.excluded;
    }

    let planned = engine::plan(&scan, &options);

    if options.mode() == RunMode::Live && planned.candidates > 0 && !yes {
        // JSON and quiet output own stdout
        let mut term: Box<dyn Write> = if human {
            Box::new(std::io::stdout())
        } else {
            Box::new(std::io::stderr())
        };
        writeln!(term, "{}", "=".repeat(60))?;
        writeln!(term, "  Files to link: {}", planned.candidates)?;
        writeln!(
            term,
            "  Potential space savings: {}",
            format::format_size(planned.potential_savings)
        )?;
        writeln!(term, "{}", "=".repeat(60))?;

        let stdin = std::io::stdin();
        let proceed = prompt::confirm(&mut stdin.lock(), &mut term, "\n  Proceed with deduplication?")?;
        if !proceed {
            writeln!(term, "  {} Cancelled", "✗".red())?;
            return Ok(());
        }
    }

    let result = engine::run_with(&scan, &options, &FsLinker::new(strategy))?;

    match output_format {
        OutputFormat::Human => output::print_run_report(&result),
        OutputFormat::Json => output::print_run_json(&result),
        OutputFormat::Quiet => output::print_run_quiet(&result),
    }

    Ok(())
}

fn report_invalid(invalid: &[String]) {
    for item in invalid {
        eprintln!("  {} Invalid entry: {}", "⚠".yellow(), item);
    }
}

/// Expand a leading ~ to the home directory
fn expand_home(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if s == "~" || s.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(s.trim_start_matches('~').trim_start_matches('/'));
        }
    }
    path.to_path_buf()
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    let path = config_path(cli);
    match action {
        ConfigAction::Show => {
            let config = Config::load_from(&path)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Init => {
            if path.exists() {
                println!("  {} Config already exists at {}", "ℹ️", path.display());
                return Ok(());
            }
            Config::default().save_to(&path)?;
            println!("  {} Created {}", "✓".green(), path.display());
            Ok(())
        }
        ConfigAction::Reset => {
            Config::default().save_to(&path)?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
