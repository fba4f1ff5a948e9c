// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiler configuration (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading compiler configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Tunables shared by every compiler.
///
/// ```toml
/// priority_step = 10
/// intermediate_dir = "_intermediate"
/// progressive_format = "EXR"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Priority drop between successive sample chunks
    pub priority_step: i32,
    /// Name of the intermediate directory, created next to the render output
    pub intermediate_dir: String,
    /// Output format progressive renders must use (compared case-insensitively)
    pub progressive_format: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            priority_step: 10,
            intermediate_dir: "_intermediate".to_string(),
            progressive_format: "EXR".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Parse and validate configuration. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Merges sit one below their chunk's renders, above the next chunk
        if self.priority_step < 2 {
            return Err(invalid("priority_step", "must be at least 2"));
        }
        let dir = self.intermediate_dir.as_str();
        if dir.is_empty() || dir == "." || dir == ".." || dir.contains(['/', '\\']) {
            return Err(invalid(
                "intermediate_dir",
                "must be a single path component",
            ));
        }
        if self.progressive_format.trim().is_empty() {
            return Err(invalid("progressive_format", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
