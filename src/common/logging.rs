//! Logging setup for the duplink binary.
//!
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `-v` / `-vv` (info / debug)
//! 3. Default: warn level, so recovered errors are still visible
//!
//! Console output goes to stderr. An optional log file receives the same
//! events without ANSI colors through a non-blocking writer.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held
/// for as long as logging is needed.
pub fn init(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(verbose, quiet)));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "duplink.log".into());
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    // A subscriber may already be installed (tests); that's not an error.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init();

    guard
}

/// Map CLI verbosity flags to a filter directive
fn level_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "duplink=error"
    } else {
        match verbose {
            0 => "duplink=warn",
            1 => "duplink=info",
            _ => "duplink=debug",
        }
    }
}
