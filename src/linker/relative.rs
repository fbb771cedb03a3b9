use std::path::{Component, Path, PathBuf};

/// Path that leads from directory `from_dir` to `target`.
///
/// Both paths must be absolute and free of `..` components. Returns
/// `None` when no relative path exists (e.g. different Windows drives).
pub fn relative_path(from_dir: &Path, target: &Path) -> Option<PathBuf> {
    if !from_dir.is_absolute() || !target.is_absolute() {
        return None;
    }

    let from = normal_components(from_dir)?;
    let to = normal_components(target)?;

    // Root and prefix components must match exactly
    match (from.first(), to.first()) {
        (Some(a), Some(b)) if a == b => {}
        _ => return None,
    }

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for comp in &to[common..] {
        rel.push(comp.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}

fn normal_components(path: &Path) -> Option<Vec<Component<'_>>> {
    let mut out = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => return None,
            other => out.push(other),
        }
    }
    Some(out)
}
