use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::Path;

use super::orchestrator::{DuplicateAction, RunResult};
use crate::common::errors::{DupError, Result};
use crate::common::format::format_size;

const RULE_WIDTH: usize = 70;

/// Write the duplicate report for `result` to `path`
pub fn write_report(path: &Path, result: &RunResult) -> Result<()> {
    let text = render_report(result, Local::now());
    std::fs::write(path, text).map_err(|source| DupError::Report {
        path: path.to_path_buf(),
        source,
    })
}

/// Render the report as text. Index 0 in each group is the kept original.
pub fn render_report(result: &RunResult, generated: DateTime<Local>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "DUPLICATE FILES REPORT");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated: {}", generated.to_rfc3339());
    let _ = writeln!(out, "Root: {}", result.root.display());
    let _ = writeln!(out, "Total duplicate file groups: {}", result.total_groups);
    let _ = writeln!(out, "Total duplicate files: {}", result.total_duplicates);
    let _ = writeln!(
        out,
        "Potential space savings: {}",
        format_size(result.potential_savings)
    );
    if result.excluded > 0 {
        let _ = writeln!(out, "Excluded files: {}", result.excluded);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);

    for (i, group) in result.groups.iter().enumerate() {
        let _ = writeln!(out, "Group {} (hash: {})", i + 1, group.digest);
        let _ = writeln!(out, "  [0] {} (KEEP)", group.original.display());
        for (j, dup) in group.duplicates.iter().enumerate() {
            let marker = match dup.action {
                DuplicateAction::Excluded(_) => " (EXCLUDED)",
                _ => "",
            };
            let _ = writeln!(
                out,
                "  [{}] {} ({}){}",
                j + 1,
                dup.path.display(),
                format_size(dup.size),
                marker
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "End of report");
    out
}
