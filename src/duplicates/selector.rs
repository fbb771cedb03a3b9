use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;

use super::scanner::{DuplicateGroup, FileRecord};

/// Which member of a group is kept, and which get replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub digest: String,
    /// The retained file; every link points here
    pub original: FileRecord,
    /// Remaining members, shortest path first
    pub duplicates: Vec<FileRecord>,
}

impl Resolution {
    /// Bytes reclaimed if every duplicate were replaced
    pub fn potential_savings(&self) -> u64 {
        self.duplicates.iter().map(|d| d.size).sum()
    }
}

/// Ordering used to pick the original: path length, then path order
pub fn path_order(a: &Path, b: &Path) -> Ordering {
    a.as_os_str()
        .len()
        .cmp(&b.as_os_str().len())
        .then_with(|| a.cmp(b))
}

/// Pick the retained file of a group.
///
/// Members are sorted by [`path_order`]; the first becomes the original
/// and the rest become duplicates in that order. Independent of traversal
/// order and timestamps. Returns `None` for an empty group.
pub fn select(group: &DuplicateGroup) -> Option<Resolution> {
    let mut members = group.members.clone();
    members.sort_by(|a, b| path_order(&a.path, &b.path));

    let mut iter = members.into_iter();
    let original = iter.next()?;

    Some(Resolution {
        digest: group.digest.clone(),
        original,
        duplicates: iter.collect(),
    })
}

/// Resolve all groups, preserving group order
pub fn select_all(groups: &[DuplicateGroup]) -> Vec<Resolution> {
    groups.iter().filter_map(select).collect()
}
