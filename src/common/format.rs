use colored::*;
use std::path::Path;

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Digest characters shown in group headers
const SHORT_DIGEST_LEN: usize = 16;

/// Two decimals in the largest binary unit below 1024, capped at PB
/// (`10.00 B`, `1.50 KB`).
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// Savings figure, highlighted once it is worth noticing
pub fn format_size_colored(bytes: u64) -> ColoredString {
    let text = format_size(bytes);
    match bytes {
        0 => text.dimmed(),
        b if b >= 1 << 30 => text.green().bold(),
        b if b >= 100 << 20 => text.green(),
        _ => text.white(),
    }
}

/// "1 file", "3 files"
pub fn format_files(count: usize) -> String {
    match count {
        1 => "1 file".to_string(),
        n => format!("{} files", n),
    }
}

/// Path with the home directory collapsed to ~
pub fn format_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| path.strip_prefix(home).ok().map(|rest| rest.to_path_buf()))
        .map(|rest| format!("~/{}", rest.display()))
        .unwrap_or_else(|| path.display().to_string())
}

/// Elapsed scan time: milliseconds, seconds, or minutes and seconds
pub fn format_duration(secs: f64) -> String {
    match secs {
        s if s < 1.0 => format!("{:.0}ms", s * 1000.0),
        s if s < 60.0 => format!("{:.1}s", s),
        s => {
            let whole = s.round() as u64;
            format!("{}m {}s", whole / 60, whole % 60)
        }
    }
}

/// Leading hex characters of a digest, marked as shortened
pub fn short_digest(digest: &str) -> String {
    match digest.get(..SHORT_DIGEST_LEN) {
        Some(head) if digest.len() > SHORT_DIGEST_LEN + 3 => format!("{}...", head),
        _ => digest.to_string(),
    }
}
