use serde::Serialize;
use std::path::{Path, PathBuf};

use super::report;
use crate::common::errors::{RecoveredError, Result};
use crate::duplicates::filter::{is_executable, ExclusionSet};
use crate::duplicates::scanner::{self, ScanOptions, ScanResult};
use crate::duplicates::selector;
use crate::linker::{FsLinker, LinkStrategy, Linker};

/// What a run is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Replace duplicates with links
    Live,
    /// Compute everything, mutate nothing
    DryRun,
    /// Write a text report, mutate nothing
    Report,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Live => write!(f, "live"),
            RunMode::DryRun => write!(f, "dry_run"),
            RunMode::Report => write!(f, "report"),
        }
    }
}

/// Policy for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub strategy: LinkStrategy,
    /// Keep executables out of hard-link replacement
    pub exclude_executables: bool,
    pub dry_run: bool,
    /// Write a report here instead of mutating
    pub report_path: Option<PathBuf>,
    /// Duplicates the operator chose to keep as-is
    pub exclusions: ExclusionSet,
    /// Extensions matched by the executable filter
    pub executable_extensions: Vec<String>,
}

impl RunOptions {
    pub fn new(strategy: LinkStrategy) -> Self {
        Self {
            strategy,
            exclude_executables: false,
            dry_run: false,
            report_path: None,
            exclusions: ExclusionSet::new(),
            executable_extensions: crate::common::config::Config::default().executable_extensions,
        }
    }

    /// A report path takes precedence over dry-run
    pub fn mode(&self) -> RunMode {
        if self.report_path.is_some() {
            RunMode::Report
        } else if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Live
        }
    }
}

/// Why a duplicate was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Listed in the run's exclusion set
    Selected,
    /// Matched the executable filter under hard links
    Executable,
}

/// What happened (or would happen) to one duplicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "detail", rename_all = "snake_case")]
pub enum DuplicateAction {
    /// Replaced by a link
    Linked,
    /// Would be replaced (dry run / report, or not executed yet)
    WouldLink,
    Excluded(ExclusionReason),
    /// Link replacement failed; message names the cause
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateOutcome {
    pub path: PathBuf,
    pub size: u64,
    pub action: DuplicateAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupOutcome {
    pub digest: String,
    pub original: PathBuf,
    pub original_size: u64,
    pub duplicates: Vec<DuplicateOutcome>,
}

/// Totals accumulated as links succeed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files_processed: usize,
    pub bytes_saved: u64,
}

/// Everything a run computed and did
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub root: PathBuf,
    pub mode: RunMode,
    pub strategy: LinkStrategy,
    pub groups: Vec<GroupOutcome>,
    pub files_scanned: usize,
    pub total_groups: usize,
    /// All duplicates, excluded ones included
    pub total_duplicates: usize,
    /// Bytes held by all duplicates, excluded ones included
    pub total_wasted: u64,
    /// Duplicates eligible for linking
    pub candidates: usize,
    /// Bytes reclaimable by linking every candidate
    pub potential_savings: u64,
    pub excluded: usize,
    pub failures: usize,
    pub stats: RunStats,
    pub report_path: Option<PathBuf>,
    /// Recovered scan and link errors
    pub errors: Vec<RecoveredError>,
    pub duration_secs: f64,
}

impl RunResult {
    /// Paths that are (or would be) handed to the linker
    pub fn candidate_paths(&self) -> Vec<&Path> {
        self.groups
            .iter()
            .flat_map(|g| g.duplicates.iter())
            .filter(|d| !matches!(d.action, DuplicateAction::Excluded(_)))
            .map(|d| d.path.as_path())
            .collect()
    }
}

/// Scan `root` and apply `options`.
///
/// Only an invalid root or an unwritable report are fatal; unreadable
/// files and failed links are collected in [`RunResult::errors`].
pub fn run<F>(
    root: &Path,
    scan_options: &ScanOptions,
    exclude: F,
    options: &RunOptions,
) -> Result<RunResult>
where
    F: Fn(&Path) -> bool,
{
    let scan = scanner::scan(root, scan_options, exclude)?;
    run_with(&scan, options, &FsLinker::new(options.strategy))
}

/// Apply `options` to an existing scan using `linker` for live runs
pub fn run_with<L>(scan: &ScanResult, options: &RunOptions, linker: &L) -> Result<RunResult>
where
    L: Linker + ?Sized,
{
    let start = std::time::Instant::now();
    let mut result = plan(scan, options);

    match result.mode {
        RunMode::Report => {
            if let Some(ref path) = options.report_path {
                report::write_report(path, &result)?;
                tracing::info!("Report written to {}", path.display());
            }
        }
        RunMode::DryRun => {
            tracing::info!(
                "Dry run: {} files would be linked, {} bytes reclaimable",
                result.candidates,
                result.potential_savings
            );
        }
        RunMode::Live => execute(&mut result, linker),
    }

    result.duration_secs = scan.duration_secs + start.elapsed().as_secs_f64();
    Ok(result)
}

/// Select originals and apply exclusions. Performs no filesystem calls.
///
/// Every duplicate ends up as either `WouldLink` or `Excluded`; the
/// candidate set and potential savings are the same for every mode.
pub fn plan(scan: &ScanResult, options: &RunOptions) -> RunResult {
    let guard_executables = options.exclude_executables && options.strategy.guards_executables();
    if options.exclude_executables && !guard_executables {
        tracing::debug!("Executable filter ignored: {} are in use", options.strategy);
    }

    let mut groups = Vec::with_capacity(scan.groups.len());
    let mut total_duplicates = 0usize;
    let mut total_wasted = 0u64;
    let mut candidates = 0usize;
    let mut potential_savings = 0u64;
    let mut excluded = 0usize;

    for resolution in selector::select_all(&scan.groups) {
        let mut duplicates = Vec::with_capacity(resolution.duplicates.len());
        // Nothing may become a hard link to an executable original.
        let executable_original = guard_executables
            && is_executable(&resolution.original.path, &options.executable_extensions);

        for dup in &resolution.duplicates {
            total_duplicates += 1;
            total_wasted += dup.size;

            let action = if options.exclusions.contains(&dup.path) {
                DuplicateAction::Excluded(ExclusionReason::Selected)
            } else if executable_original
                || (guard_executables && is_executable(&dup.path, &options.executable_extensions))
            {
                DuplicateAction::Excluded(ExclusionReason::Executable)
            } else {
                DuplicateAction::WouldLink
            };

            match &action {
                DuplicateAction::Excluded(reason) => {
                    excluded += 1;
                    tracing::info!("Excluded ({:?}): {}", reason, dup.path.display());
                }
                _ => {
                    candidates += 1;
                    potential_savings += dup.size;
                }
            }

            duplicates.push(DuplicateOutcome {
                path: dup.path.clone(),
                size: dup.size,
                action,
            });
        }

        groups.push(GroupOutcome {
            digest: resolution.digest,
            original: resolution.original.path,
            original_size: resolution.original.size,
            duplicates,
        });
    }

    RunResult {
        root: scan.root.clone(),
        mode: options.mode(),
        strategy: options.strategy,
        total_groups: groups.len(),
        groups,
        files_scanned: scan.files_scanned,
        total_duplicates,
        total_wasted,
        candidates,
        potential_savings,
        excluded,
        failures: 0,
        stats: RunStats::default(),
        report_path: options.report_path.clone(),
        errors: scan.errors.clone(),
        duration_secs: scan.duration_secs,
    }
}

/// Hand each `WouldLink` duplicate to `linker`, one path at a time.
///
/// A failure is recorded against its duplicate and the run continues.
pub fn execute<L>(result: &mut RunResult, linker: &L)
where
    L: Linker + ?Sized,
{
    let mut stats = RunStats::default();
    let mut failures = 0usize;
    let mut errors = Vec::new();

    for group in &mut result.groups {
        for dup in &mut group.duplicates {
            if dup.action != DuplicateAction::WouldLink {
                continue;
            }
            match linker.replace_with_link(&group.original, &dup.path) {
                Ok(_) => {
                    dup.action = DuplicateAction::Linked;
                    stats.files_processed += 1;
                    stats.bytes_saved += dup.size;
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    failures += 1;
                    errors.push(RecoveredError::from(&e));
                    dup.action = DuplicateAction::Failed(e.to_string());
                }
            }
        }
    }

    tracing::info!(
        "Linked {} files, saved {} bytes, {} failures",
        stats.files_processed,
        stats.bytes_saved,
        failures
    );

    result.stats = stats;
    result.failures = failures;
    result.errors.extend(errors);
}
