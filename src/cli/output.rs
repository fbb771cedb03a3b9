use colored::*;

use crate::common::format::{self, format_path, format_size, format_size_colored};
use crate::engine::{DuplicateAction, ExclusionReason, RunMode, RunResult};

/// Print the duplicate groups found by a scan, numbered for exclusion entry
pub fn print_groups(result: &RunResult, detailed: bool) {
    println!();
    println!("  {} duplink Duplicate Scan", "👯");
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  Scanned {} files in {}  •  {}",
        result.files_scanned.to_string().cyan(),
        format::format_duration(result.duration_secs).cyan(),
        format_path(&result.root).dimmed()
    );
    println!("  Link type: {}", result.strategy.to_string().cyan());
    println!("{}", "─".repeat(60).dimmed());
    println!();

    if result.groups.is_empty() {
        println!("  {} No duplicates found!", "✨");
        println!();
        return;
    }

    for (i, group) in result.groups.iter().enumerate() {
        println!(
            "    Group {} — {} files, {} wasted  {}",
            (i + 1).to_string().bold(),
            group.duplicates.len() + 1,
            format_size(group.duplicates.iter().map(|d| d.size).sum()),
            format!("(hash: {})", format::short_digest(&group.digest)).dimmed(),
        );

        if detailed {
            println!(
                "      {} {} {}",
                "[0]".dimmed(),
                format_path(&group.original).green(),
                "(KEEP)".green().bold()
            );
            for (j, dup) in group.duplicates.iter().enumerate() {
                let note = match dup.action {
                    DuplicateAction::Excluded(ExclusionReason::Executable) => {
                        " executable, excluded".yellow().to_string()
                    }
                    DuplicateAction::Excluded(ExclusionReason::Selected) => {
                        " excluded".yellow().to_string()
                    }
                    _ => String::new(),
                };
                println!(
                    "      {} {} ({}){}",
                    format!("[{}]", j + 1).dimmed(),
                    format_path(&dup.path).dimmed(),
                    format_size(dup.size),
                    note,
                );
            }
            println!();
        }
    }

    if !detailed {
        println!();
        println!("      Run with {} to see file paths", "--detailed".cyan());
    }
    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} {} duplicate files, {} potential savings",
        "💾",
        result.total_duplicates.to_string().cyan(),
        format_size_colored(result.potential_savings),
    );
    if result.excluded > 0 {
        println!(
            "  {} {} excluded from linking",
            "⏭".dimmed(),
            result.excluded.to_string().yellow()
        );
    }
    println!();
}

/// Print the summary of a finished run
pub fn print_run_report(result: &RunResult) {
    println!();
    match result.mode {
        RunMode::DryRun => {
            for dup in result
                .groups
                .iter()
                .flat_map(|g| g.duplicates.iter())
                .filter(|d| d.action == DuplicateAction::WouldLink)
            {
                println!(
                    "  Would replace: {} ({})",
                    format_path(&dup.path),
                    format_size(dup.size)
                );
            }
            println!();
            println!(
                "  {} Dry run — would link {} ({}). No files modified.",
                "ℹ️",
                format::format_files(result.candidates),
                format_size_colored(result.potential_savings)
            );
        }
        RunMode::Report => {
            let path = result
                .report_path
                .as_deref()
                .map(format_path)
                .unwrap_or_default();
            println!(
                "  {} Report written to {} — {} duplicate files, {} potential savings",
                "📄",
                path.cyan(),
                result.total_duplicates,
                format_size_colored(result.potential_savings)
            );
        }
        RunMode::Live => {
            println!(
                "  {} {} — {} files, {} saved",
                "✓".green(),
                "Deduplication complete".bold(),
                result.stats.files_processed.to_string().cyan(),
                format_size_colored(result.stats.bytes_saved),
            );
            if result.failures > 0 {
                println!(
                    "  {} {} links failed",
                    "✗".red(),
                    result.failures.to_string().red()
                );
            }
        }
    }

    if !result.errors.is_empty() {
        println!();
        println!("  {} {} errors:", "⚠".yellow(), result.errors.len());
        for (i, err) in result.errors.iter().enumerate().take(10) {
            println!(
                "    {} {}",
                format!("{}.", i + 1).dimmed(),
                err.to_string().dimmed()
            );
        }
        if result.errors.len() > 10 {
            println!(
                "    ... and {} more",
                (result.errors.len() - 10).to_string().dimmed()
            );
        }
    }
    println!();
}

/// Print the run result as JSON
pub fn print_run_json(result: &RunResult) {
    match serde_json::to_string_pretty(result) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error serializing: {}", e),
    }
}

/// One line: groups, duplicates, processed, bytes saved (or potential)
pub fn print_run_quiet(result: &RunResult) {
    let bytes = match result.mode {
        RunMode::Live => result.stats.bytes_saved,
        _ => result.potential_savings,
    };
    println!(
        "{}  {}  {}  {}",
        result.total_groups,
        result.total_duplicates,
        result.stats.files_processed,
        format_size(bytes)
    );
}
