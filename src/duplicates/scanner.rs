use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::hasher;
use crate::common::config::{Config, DEFAULT_CHUNK_SIZE};
use crate::common::errors::{DupError, RecoveredError, Result};

/// A hashed regular file found during the scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub digest: String,
}

/// Files sharing one digest, in traversal order. Always 2+ members.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub digest: String,
    pub members: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Bytes held by every member but one
    pub fn wasted_bytes(&self) -> u64 {
        self.members.iter().skip(1).map(|m| m.size).sum()
    }
}

/// Configuration for a scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Bytes read per hashing step
    pub chunk_size: usize,
    /// Minimum file size to consider
    pub min_size: u64,
    /// Hash on a bounded rayon pool instead of the calling thread
    pub parallel: bool,
    /// Pool size (0 = number of logical CPUs)
    pub threads: usize,
    /// Show a spinner while walking and hashing
    pub show_progress: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            min_size: 0,
            parallel: false,
            threads: 0,
            show_progress: false,
        }
    }
}

impl ScanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.chunk_size,
            min_size: config.min_size,
            parallel: config.parallel,
            threads: config.threads,
            show_progress: false,
        }
    }
}

/// Complete results from a scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Canonical root that was walked
    pub root: PathBuf,
    /// Duplicate groups in first-seen order
    pub groups: Vec<DuplicateGroup>,
    /// Regular files accepted as candidates
    pub files_scanned: usize,
    /// Candidates that hashed successfully
    pub files_hashed: usize,
    /// Walk and hash failures that were skipped
    pub errors: Vec<RecoveredError>,
    pub duration_secs: f64,
}

impl ScanResult {
    pub fn total_duplicates(&self) -> usize {
        self.groups.iter().map(|g| g.members.len() - 1).sum()
    }

    pub fn total_wasted(&self) -> u64 {
        self.groups.iter().map(|g| g.wasted_bytes()).sum()
    }
}

/// Candidate file before hashing
#[derive(Debug, Clone)]
struct Candidate {
    path: PathBuf,
    size: u64,
}

/// Check that `root` exists and is a directory, returning its canonical form
pub fn validate_root(root: &Path) -> Result<PathBuf> {
    let invalid = |reason: &str| DupError::InvalidRoot {
        path: root.to_path_buf(),
        reason: reason.to_string(),
    };

    let meta = std::fs::metadata(root).map_err(|e| invalid(&e.to_string()))?;
    if !meta.is_dir() {
        return Err(invalid("not a directory"));
    }
    std::fs::canonicalize(root).map_err(|e| invalid(&e.to_string()))
}

/// Walk `root`, hash every candidate file and group paths by digest.
///
/// Symbolic links are never followed or hashed. Entries for which
/// `exclude` returns true are skipped before hashing. Unreadable files
/// and unreadable directories are recorded in [`ScanResult::errors`]
/// and the walk continues. Only digests shared by two or more files
/// are returned.
pub fn scan<F>(root: &Path, options: &ScanOptions, exclude: F) -> Result<ScanResult>
where
    F: Fn(&Path) -> bool,
{
    let start = std::time::Instant::now();
    let root = validate_root(root)?;
    let mut errors = Vec::new();

    let pb = make_spinner(options.show_progress, "Collecting files...");
    let candidates = collect_candidates(&root, options.min_size, &exclude, &mut errors);
    finish_spinner(pb, &format!("Found {} candidate files", candidates.len()));

    let pb = make_spinner(options.show_progress, "Hashing files...");
    let hashed = hash_candidates(&candidates, options);
    finish_spinner(pb, &format!("Hashed {} files", candidates.len()));

    // Collector: the only place the digest map is mutated.
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut files_hashed = 0usize;

    for (candidate, outcome) in candidates.iter().zip(hashed) {
        match outcome {
            Ok(digest) => {
                files_hashed += 1;
                let record = FileRecord {
                    path: candidate.path.clone(),
                    size: candidate.size,
                    digest: digest.clone(),
                };
                match index.get(&digest) {
                    Some(&i) => groups[i].members.push(record),
                    None => {
                        index.insert(digest.clone(), groups.len());
                        groups.push(DuplicateGroup {
                            digest,
                            members: vec![record],
                        });
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Skipping unhashable file: {}", e);
                errors.push(RecoveredError::from(&e));
            }
        }
    }

    // Singleton digests are not duplicates
    groups.retain(|g| g.members.len() > 1);

    tracing::info!(
        "Scanned {} files under {}: {} duplicate groups",
        candidates.len(),
        root.display(),
        groups.len()
    );

    Ok(ScanResult {
        root,
        groups,
        files_scanned: candidates.len(),
        files_hashed,
        errors,
        duration_secs: start.elapsed().as_secs_f64(),
    })
}

/// Collect all regular, non-excluded files under `root`
fn collect_candidates<F>(
    root: &Path,
    min_size: u64,
    exclude: &F,
    errors: &mut Vec<RecoveredError>,
) -> Vec<Candidate>
where
    F: Fn(&Path) -> bool,
{
    let mut files = Vec::new();
    let mut identities = IdentityTracker::default();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                tracing::warn!("Cannot read {}: {}", path.display(), e);
                errors.push(RecoveredError::new(path, e.to_string()));
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            tracing::debug!("Skipping symlink: {}", entry.path().display());
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let path = entry.path();
        if exclude(path) {
            tracing::debug!("Excluded by filter: {}", path.display());
            continue;
        }

        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Cannot stat {}: {}", path.display(), e);
                errors.push(RecoveredError::new(path, e.to_string()));
                continue;
            }
        };

        if meta.len() < min_size {
            continue;
        }

        if !identities.first_visit(path, &meta) {
            tracing::debug!("Already linked to a visited file: {}", path.display());
            continue;
        }

        files.push(Candidate {
            path: path.to_path_buf(),
            size: meta.len(),
        });
    }

    files
}

/// Hash candidates in input order, sequentially or on a bounded pool.
///
/// Workers only return values; a failure in one file does not affect
/// the others.
fn hash_candidates(candidates: &[Candidate], options: &ScanOptions) -> Vec<Result<String>> {
    let chunk = options.chunk_size;

    if options.parallel {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
        {
            Ok(pool) => {
                return pool.install(|| {
                    candidates
                        .par_iter()
                        .map(|c| hasher::hash_file(&c.path, chunk))
                        .collect()
                });
            }
            Err(e) => {
                tracing::warn!("Cannot start hashing pool, hashing sequentially: {}", e);
            }
        }
    }

    candidates
        .iter()
        .map(|c| hasher::hash_file(&c.path, chunk))
        .collect()
}

/// Remembers storage identities so extra hard links to one file are
/// visited once.
#[derive(Debug, Default)]
struct IdentityTracker {
    seen: HashSet<(u64, u64)>,
}

impl IdentityTracker {
    /// Returns false if this file's storage was already visited
    fn first_visit(&mut self, path: &Path, meta: &Metadata) -> bool {
        match file_identity(path, meta) {
            Some(key) => self.seen.insert(key),
            None => true,
        }
    }
}

#[cfg(unix)]
fn file_identity(_path: &Path, meta: &Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    // Single-link files can't alias anything.
    if meta.nlink() <= 1 {
        return None;
    }
    Some((meta.dev(), meta.ino()))
}

/// Volume serial and file index; std metadata carries neither, so the
/// file is opened and queried.
#[cfg(windows)]
fn file_identity(path: &Path, _meta: &Metadata) -> Option<(u64, u64)> {
    use std::os::windows::io::AsRawHandle;
    use winapi::um::fileapi::{GetFileInformationByHandle, BY_HANDLE_FILE_INFORMATION};

    let file = std::fs::File::open(path).ok()?;
    // SAFETY: the handle stays open for the call because `file` owns it,
    // and the info struct is plain data written by the call.
    let info = unsafe {
        let mut info: BY_HANDLE_FILE_INFORMATION = std::mem::zeroed();
        if GetFileInformationByHandle(file.as_raw_handle() as _, &mut info) == 0 {
            return None;
        }
        info
    };

    if info.nNumberOfLinks <= 1 {
        return None;
    }
    let index = (u64::from(info.nFileIndexHigh) << 32) | u64::from(info.nFileIndexLow);
    Some((u64::from(info.dwVolumeSerialNumber), index))
}

#[cfg(not(any(unix, windows)))]
fn file_identity(_path: &Path, _meta: &Metadata) -> Option<(u64, u64)> {
    None
}

// ── Progress helpers ──────────────────────────────────────────────────────────

fn make_spinner(show: bool, msg: &str) -> Option<ProgressBar> {
    if show {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        Some(pb)
    } else {
        None
    }
}

fn finish_spinner(pb: Option<ProgressBar>, msg: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(msg.to_string());
    }
}
