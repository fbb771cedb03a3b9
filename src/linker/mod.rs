//! Replacing duplicate files with links to their original.
//!
//! The mutating step sits behind the [`Linker`] trait so the run engine
//! never touches the filesystem directly. [`FsLinker`] is the real
//! implementation; it removes the duplicate and creates either a hard link
//! or a relative symbolic link in its place, depending on its
//! [`LinkStrategy`].

pub mod relative;
pub mod strategy;

use std::io;
use std::path::{Path, PathBuf};

use crate::common::errors::{DupError, LinkStage, Result};

pub use relative::relative_path;
pub use strategy::{LinkKindSetting, LinkStrategy};

/// Replaces one duplicate with a link. Failures are per pair.
pub trait Linker {
    /// Strategy this linker applies
    fn strategy(&self) -> LinkStrategy;

    /// Remove `duplicate` and put a link to `original` at the same path.
    ///
    /// Returns the link target that was written (the original's path for
    /// hard links, the relative path for soft links).
    fn replace_with_link(&self, original: &Path, duplicate: &Path) -> Result<PathBuf>;
}

/// Linker that mutates the real filesystem
#[derive(Debug, Clone, Copy)]
pub struct FsLinker {
    strategy: LinkStrategy,
}

impl FsLinker {
    pub fn new(strategy: LinkStrategy) -> Self {
        Self { strategy }
    }
}

impl Linker for FsLinker {
    fn strategy(&self) -> LinkStrategy {
        self.strategy
    }

    fn replace_with_link(&self, original: &Path, duplicate: &Path) -> Result<PathBuf> {
        let fail = |stage, source| DupError::LinkFailure {
            original: original.to_path_buf(),
            duplicate: duplicate.to_path_buf(),
            stage,
            source,
        };

        // Work out the target before anything is removed.
        let target = match self.strategy {
            LinkStrategy::HardLink => original.to_path_buf(),
            LinkStrategy::SoftLink => soft_link_target(original, duplicate).ok_or_else(|| {
                fail(
                    LinkStage::RelativePath,
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "no relative path between duplicate and original",
                    ),
                )
            })?,
        };

        std::fs::remove_file(duplicate).map_err(|e| fail(LinkStage::Remove, e))?;

        let created = match self.strategy {
            LinkStrategy::HardLink => std::fs::hard_link(original, duplicate),
            LinkStrategy::SoftLink => create_symlink(&target, duplicate),
        };

        if let Err(e) = created {
            restore_copy(original, duplicate);
            return Err(fail(LinkStage::CreateLink, e));
        }

        tracing::info!(
            "Linked {} -> {} ({})",
            duplicate.display(),
            target.display(),
            self.strategy
        );
        Ok(target)
    }
}

/// Relative target from the duplicate's directory to the original
fn soft_link_target(original: &Path, duplicate: &Path) -> Option<PathBuf> {
    let dir = duplicate.parent()?;
    relative_path(dir, original)
}

/// Put the content back at `duplicate` after a failed link creation.
///
/// Content is identical to the original, so a copy restores the file.
fn restore_copy(original: &Path, duplicate: &Path) {
    match std::fs::copy(original, duplicate) {
        Ok(_) => tracing::warn!("Link failed, restored copy at {}", duplicate.display()),
        Err(e) => tracing::error!(
            "Link failed and copy could not be restored at {}: {}",
            duplicate.display(),
            e
        ),
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Requires Developer Mode or elevated privileges on Windows
#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Symbolic links are not supported on this platform",
    ))
}
