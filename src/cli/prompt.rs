use std::io::{self, BufRead, Write};

use crate::duplicates::ExclusionSet;
use crate::engine::GroupOutcome;

/// Result of parsing a `GROUP.INDEX` exclusion list
#[derive(Debug, Default)]
pub struct ExclusionSelection {
    pub excluded: ExclusionSet,
    /// Entries that did not name an existing duplicate
    pub invalid: Vec<String>,
}

/// Parse a comma-separated list of `GROUP.INDEX` entries.
///
/// Groups are numbered from 1 in display order. Index 0 is the kept
/// original and cannot be excluded; duplicates are numbered from 1.
pub fn parse_exclusions(input: &str, groups: &[GroupOutcome]) -> ExclusionSelection {
    let mut selection = ExclusionSelection::default();

    for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match resolve_entry(item, groups) {
            Some(path) => {
                selection.excluded.insert(path);
            }
            None => selection.invalid.push(item.to_string()),
        }
    }

    selection
}

fn resolve_entry(item: &str, groups: &[GroupOutcome]) -> Option<std::path::PathBuf> {
    let (g, i) = item.split_once('.')?;
    let group_idx: usize = g.trim().parse().ok()?;
    let file_idx: usize = i.trim().parse().ok()?;

    let group = groups.get(group_idx.checked_sub(1)?)?;
    let dup = group.duplicates.get(file_idx.checked_sub(1)?)?;
    Some(dup.path.clone())
}

/// Ask a yes/no question until answered. End of input counts as "no".
pub fn confirm<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, question: &str) -> io::Result<bool> {
    loop {
        write!(writer, "{} [y/N] ", question)?;
        writer.flush()?;

        let mut input = String::new();
        if reader.read_line(&mut input)? == 0 {
            return Ok(false);
        }
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => writeln!(writer, "  Please enter 'y' or 'n'")?,
        }
    }
}

/// Prompt for an exclusion list; an empty line selects nothing
pub fn read_exclusions<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    groups: &[GroupOutcome],
) -> io::Result<ExclusionSelection> {
    writeln!(writer)?;
    writeln!(writer, "  Enter files to keep as GROUP.INDEX (e.g. 1.2,3.1), or press Enter to continue.")?;
    write!(writer, "  Exclude: ")?;
    writer.flush()?;

    let mut input = String::new();
    reader.read_line(&mut input)?;
    Ok(parse_exclusions(&input, groups))
}
