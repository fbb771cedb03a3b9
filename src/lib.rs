//! # duplink
//!
//! Finds files with identical content in a directory tree and reclaims
//! space by replacing redundant copies with links to one retained copy.
//!
//! - **Hasher**: streaming SHA-256 of each file in bounded chunks
//! - **Scanner**: walks the tree (never following symlinks) and groups paths by digest
//! - **Selector**: keeps the shortest path of each group, deterministically
//! - **Linker**: swaps a duplicate for a hard link or a relative symlink
//! - **Engine**: applies exclusions, dry-run and report modes, and totals the savings

pub mod cli;
pub mod common;
pub mod duplicates;
pub mod engine;
pub mod linker;

pub use common::errors::{DupError, Result};
