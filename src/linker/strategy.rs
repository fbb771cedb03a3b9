use serde::{Deserialize, Serialize};

/// How a duplicate is turned into a link to its original.
///
/// Selected once at startup and handed to the linker; nothing else in
/// the call chain branches on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum LinkStrategy {
    /// New directory entry sharing the original's storage
    #[serde(rename = "hard")]
    #[value(name = "hard")]
    HardLink,
    /// Symbolic link holding a path relative to the duplicate's directory
    #[serde(rename = "soft")]
    #[value(name = "soft")]
    SoftLink,
}

/// Link kind as written in config files and on the command line
pub type LinkKindSetting = LinkStrategy;

impl LinkStrategy {
    /// Hard links on Windows, where symlinks need extra privilege;
    /// relative symlinks everywhere else.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            LinkStrategy::HardLink
        } else {
            LinkStrategy::SoftLink
        }
    }

    /// Explicit setting if present, otherwise the platform default
    pub fn from_setting(setting: Option<LinkKindSetting>) -> Self {
        setting.unwrap_or_else(Self::platform_default)
    }

    /// Whether the executable filter applies under this strategy
    pub fn guards_executables(self) -> bool {
        self == LinkStrategy::HardLink
    }
}

impl std::fmt::Display for LinkStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStrategy::HardLink => write!(f, "hard links"),
            LinkStrategy::SoftLink => write!(f, "soft links"),
        }
    }
}
