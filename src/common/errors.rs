use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for duplink operations.
/// We use `anyhow` at the top level for CLI error handling,
/// but these typed errors allow modules to be precise about failures.
#[derive(Debug, Error)]
pub enum DupError {
    /// File could not be opened or read while hashing
    #[error("cannot read '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a duplicate or creating its link failed
    #[error("{stage} failed for '{}' -> '{}': {source}", duplicate.display(), original.display())]
    LinkFailure {
        original: PathBuf,
        duplicate: PathBuf,
        stage: LinkStage,
        #[source]
        source: std::io::Error,
    },

    /// Root directory is missing or not a directory
    #[error("'{}' is not a valid directory: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// Report destination could not be written
    #[error("cannot write report to '{}': {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is invalid
    #[error("config error in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },
}

/// Step of a link replacement that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStage {
    /// The duplicate file could not be removed
    Remove,
    /// The link could not be created after removal
    CreateLink,
    /// No relative path exists between duplicate and original
    RelativePath,
}

impl std::fmt::Display for LinkStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStage::Remove => write!(f, "remove"),
            LinkStage::CreateLink => write!(f, "link creation"),
            LinkStage::RelativePath => write!(f, "relative path"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DupError>;

/// An error that was recovered from locally and did not stop the run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecoveredError {
    pub path: PathBuf,
    pub message: String,
}

impl RecoveredError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<&DupError> for RecoveredError {
    fn from(e: &DupError) -> Self {
        let path = match e {
            DupError::Unreadable { path, .. }
            | DupError::InvalidRoot { path, .. }
            | DupError::Report { path, .. }
            | DupError::Config { path, .. } => path.clone(),
            DupError::LinkFailure { duplicate, .. } => duplicate.clone(),
        };
        Self {
            path,
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for RecoveredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_failure_display_names_stage_and_paths() {
        let err = DupError::LinkFailure {
            original: PathBuf::from("/a/keep.txt"),
            duplicate: PathBuf::from("/a/b/dup.txt"),
            stage: LinkStage::Remove,
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("remove failed"));
        assert!(msg.contains("/a/b/dup.txt"));
        assert!(msg.contains("/a/keep.txt"));
    }

    #[test]
    fn test_recovered_error_uses_duplicate_path() {
        let err = DupError::LinkFailure {
            original: PathBuf::from("keep"),
            duplicate: PathBuf::from("dup"),
            stage: LinkStage::CreateLink,
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists"),
        };
        let recovered = RecoveredError::from(&err);
        assert_eq!(recovered.path, PathBuf::from("dup"));
        assert!(recovered.message.contains("link creation"));
    }
}
