pub mod config;
pub mod errors;
pub mod format;
pub mod logging;

pub use errors::{DupError, LinkStage, RecoveredError, Result};
