use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::{DupError, Result};
use crate::linker::LinkKindSetting;

/// Default read chunk for content hashing
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Global duplink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bytes read per hashing step
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Hash files on a bounded worker pool
    #[serde(default)]
    pub parallel: bool,

    /// Worker pool size (0 = number of logical CPUs)
    #[serde(default)]
    pub threads: usize,

    /// Files smaller than this are never candidates
    #[serde(default)]
    pub min_size: u64,

    /// Paths to exclude from scanning (substring match)
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Extensions treated as executables by the executable filter
    #[serde(default = "default_executable_extensions")]
    pub executable_extensions: Vec<String>,

    /// Link kind override; absent means the platform default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_kind: Option<LinkKindSetting>,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_executable_extensions() -> Vec<String> {
    ["exe", "dll", "sys", "com", "bat", "cmd", "msi", "scr"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            parallel: false,
            threads: 0,
            min_size: 0,
            exclude_paths: Vec::new(),
            executable_extensions: default_executable_extensions(),
            link_kind: None,
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the duplink data directory (~/.duplink)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".duplink")
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load config from a file, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| DupError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config: Config = toml::from_str(&contents).map_err(|e| DupError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.normalize();
        Ok(config)
    }

    /// Save config to the given file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_err = |message: String| DupError::Config {
            path: path.to_path_buf(),
            message,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| config_err(format!("failed to create {}: {}", dir.display(), e)))?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| config_err(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| config_err(e.to_string()))?;
        Ok(())
    }

    /// Check if a path should be excluded from scanning
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.display().to_string();
        self.exclude_paths.iter().any(|p| path_str.contains(p))
    }

    fn normalize(&mut self) {
        if self.chunk_size == 0 {
            tracing::warn!(
                "chunk_size = 0 is invalid, using {}",
                DEFAULT_CHUNK_SIZE
            );
            self.chunk_size = DEFAULT_CHUNK_SIZE;
        }
        for ext in &mut self.executable_extensions {
            *ext = ext.trim_start_matches('.').to_ascii_lowercase();
        }
    }
}
