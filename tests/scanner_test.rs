use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use duplink::common::errors::DupError;
use duplink::duplicates::{scan, ScanOptions, ScanResult};

fn write(dir: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn scan_all(root: &Path) -> ScanResult {
    scan(root, &ScanOptions::default(), |_| false).unwrap()
}

/// Group membership as sets of paths relative to the scan root
fn group_sets(result: &ScanResult) -> BTreeSet<BTreeSet<PathBuf>> {
    result
        .groups
        .iter()
        .map(|g| {
            g.members
                .iter()
                .map(|m| m.path.strip_prefix(&result.root).unwrap().to_path_buf())
                .collect()
        })
        .collect()
}

#[test]
fn test_identical_files_grouped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"XXXXXXXXXX");
    write(dir.path(), "dir/b.txt", b"XXXXXXXXXX");
    write(dir.path(), "c.txt", b"YYYYYYYYYY");

    let result = scan_all(dir.path());

    assert_eq!(result.files_scanned, 3);
    assert_eq!(result.files_hashed, 3);
    assert_eq!(result.groups.len(), 1, "Only the X files form a group");

    let group = &result.groups[0];
    assert_eq!(group.members.len(), 2);
    assert!(group.members.iter().all(|m| m.digest == group.digest));
    assert!(group.members.iter().all(|m| m.size == 10));
    assert_eq!(group.wasted_bytes(), 10);
    assert_eq!(result.total_duplicates(), 1);
}

#[test]
fn test_paths_are_absolute() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a", b"same");
    write(dir.path(), "b", b"same");

    let result = scan_all(dir.path());
    assert!(result.root.is_absolute());
    for m in &result.groups[0].members {
        assert!(m.path.is_absolute());
        assert!(m.path.starts_with(&result.root));
    }
}

#[test]
fn test_no_duplicates_means_no_groups() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"a");
    write(dir.path(), "b.txt", b"bb");
    write(dir.path(), "c/d.txt", b"ccc");

    let result = scan_all(dir.path());
    assert_eq!(result.files_scanned, 3);
    assert!(result.groups.is_empty(), "Singleton digests are discarded");
}

#[test]
fn test_multiple_groups_in_traversal_order() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a1", b"first");
    write(dir.path(), "b1", b"second");
    write(dir.path(), "c/a2", b"first");
    write(dir.path(), "c/b2", b"second");
    write(dir.path(), "c/b3", b"second");

    let result = scan_all(dir.path());
    assert_eq!(result.groups.len(), 2);

    // Walk is sorted by name, so "a1" is seen before "b1"
    let first: Vec<_> = result.groups[0]
        .members
        .iter()
        .map(|m| m.path.file_name().unwrap().to_owned())
        .collect();
    assert_eq!(first, vec!["a1", "a2"]);
    assert_eq!(result.groups[1].members.len(), 3);
}

#[test]
fn test_exclude_predicate_skips_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "keep/a.txt", b"dup");
    write(dir.path(), "skip/a.txt", b"dup");
    write(dir.path(), "keep/b.txt", b"dup");

    let result = scan(dir.path(), &ScanOptions::default(), |p| {
        p.components().any(|c| c.as_os_str() == "skip")
    })
    .unwrap();

    assert_eq!(result.files_scanned, 2);
    let expected: BTreeSet<BTreeSet<PathBuf>> = [["keep/a.txt", "keep/b.txt"]
        .iter()
        .map(PathBuf::from)
        .collect()]
    .into_iter()
    .collect();
    assert_eq!(group_sets(&result), expected);
}

#[test]
fn test_min_size_filters_small_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "small1", b"x");
    write(dir.path(), "small2", b"x");
    write(dir.path(), "big1", &[7u8; 2048]);
    write(dir.path(), "big2", &[7u8; 2048]);

    let options = ScanOptions {
        min_size: 1024,
        ..ScanOptions::default()
    };
    let result = scan(dir.path(), &options, |_| false).unwrap();

    assert_eq!(result.files_scanned, 2);
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].members[0].size, 2048);
}

#[test]
fn test_parallel_scan_finds_same_groups() {
    let dir = TempDir::new().unwrap();
    for i in 0..20 {
        let content = format!("content-{}", i % 5);
        write(dir.path(), &format!("d{}/f{}.txt", i % 3, i), content.as_bytes());
    }

    let sequential = scan_all(dir.path());
    let options = ScanOptions {
        parallel: true,
        threads: 4,
        ..ScanOptions::default()
    };
    let parallel = scan(dir.path(), &options, |_| false).unwrap();

    assert_eq!(parallel.files_hashed, 20);
    assert_eq!(group_sets(&sequential), group_sets(&parallel));
    assert_eq!(parallel.groups.len(), 5);
}

#[test]
fn test_invalid_root_missing() {
    let err = scan(
        Path::new("/nonexistent/duplink/root"),
        &ScanOptions::default(),
        |_| false,
    )
    .unwrap_err();
    assert!(matches!(err, DupError::InvalidRoot { .. }));
}

#[test]
fn test_invalid_root_is_file() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "plain.txt", b"not a dir");

    let err = scan(&file, &ScanOptions::default(), |_| false).unwrap_err();
    match err {
        DupError::InvalidRoot { reason, .. } => assert_eq!(reason, "not a directory"),
        other => panic!("expected InvalidRoot, got {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_never_hashed() {
    let dir = TempDir::new().unwrap();
    let original = write(dir.path(), "original.txt", b"content");
    std::os::unix::fs::symlink(&original, dir.path().join("alias.txt")).unwrap();
    std::os::unix::fs::symlink("missing-target", dir.path().join("dangling")).unwrap();

    let result = scan_all(dir.path());
    assert_eq!(result.files_scanned, 1, "Only the regular file is a candidate");
    assert!(result.groups.is_empty());
    assert!(result.errors.is_empty(), "Dangling links are skipped, not errors");
}

#[cfg(unix)]
#[test]
fn test_symlinked_directories_not_followed() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "real/a.txt", b"same");
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("loop")).unwrap();

    let result = scan_all(dir.path());
    assert_eq!(result.files_scanned, 1);
    assert!(result.groups.is_empty());
}

#[test]
fn test_hard_linked_paths_are_one_file() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.txt", b"shared storage");
    std::fs::hard_link(&a, dir.path().join("b.txt")).unwrap();

    let result = scan_all(dir.path());
    assert_eq!(result.files_scanned, 1);
    assert!(result.groups.is_empty(), "Hard links to one file are not duplicates");
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_and_recorded() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"same bytes");
    write(dir.path(), "b.txt", b"same bytes");
    let locked = write(dir.path(), "c.txt", b"same bytes");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through mode bits; nothing to observe then
    if std::fs::File::open(&locked).is_ok() {
        return;
    }

    let result = scan_all(dir.path());
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(result.files_scanned, 3);
    assert_eq!(result.files_hashed, result.files_scanned - 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, result.root.join("c.txt"));

    let expected: BTreeSet<BTreeSet<PathBuf>> =
        [["a.txt", "b.txt"].iter().map(PathBuf::from).collect()]
            .into_iter()
            .collect();
    assert_eq!(group_sets(&result), expected);
}
