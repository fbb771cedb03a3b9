pub mod filter;
pub mod hasher;
pub mod scanner;
pub mod selector;

pub use filter::{is_executable, ExclusionSet};
pub use scanner::{scan, validate_root, DuplicateGroup, FileRecord, ScanOptions, ScanResult};
pub use selector::{select, select_all, Resolution};
