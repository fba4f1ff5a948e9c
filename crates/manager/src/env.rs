// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the manager crate.

use crate::error::ManagerError;
use rf_compiler::CompilerConfig;
use std::path::PathBuf;

/// Path of the compiler configuration file, if `RF_COMPILER_CONFIG` is set.
pub fn compiler_config_path() -> Option<PathBuf> {
    compiler_config_path_from(|key| std::env::var(key).ok())
}

/// Resolve state directory: RF_STATE_DIR > XDG_STATE_HOME/rf > ~/.local/state/rf
pub fn state_dir() -> Option<PathBuf> {
    state_dir_from(|key| std::env::var(key).ok())
}

/// Where the manager keeps its snapshot.
pub fn snapshot_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("snapshot.json"))
}

/// Load compiler configuration from `RF_COMPILER_CONFIG`, or use defaults.
pub fn load_compiler_config() -> Result<CompilerConfig, ManagerError> {
    load_compiler_config_from(|key| std::env::var(key).ok())
}

fn load_compiler_config_from(var: impl Fn(&str) -> Option<String>) -> Result<CompilerConfig, ManagerError> {
    match compiler_config_path_from(var) {
        Some(path) => Ok(CompilerConfig::load(&path)?),
        None => Ok(CompilerConfig::default()),
    }
}

fn compiler_config_path_from(var: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    var("RF_COMPILER_CONFIG")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

fn state_dir_from(var: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(dir) = var("RF_STATE_DIR").filter(|s| !s.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    if let Some(xdg) = var("XDG_STATE_HOME").filter(|s| !s.is_empty()) {
        return Some(PathBuf::from(xdg).join("rf"));
    }
    var("HOME").map(|home| PathBuf::from(home).join(".local/state/rf"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
