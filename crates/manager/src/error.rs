// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the job manager

use rf_compiler::{CompileError, ConfigError};
use rf_core::{JobId, TransitionRejected, WorkerId};
use rf_storage::SnapshotError;
use thiserror::Error;

/// Errors that can occur in the job manager
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("job not found: {0}")]
    JobNotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("worker not found: {0}")]
    WorkerNotFound(String),
    #[error("job {0} is already compiled")]
    AlreadyCompiled(JobId),
    #[error("worker {0} cannot take a task")]
    WorkerUnavailable(WorkerId),
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Transition(#[from] TransitionRejected),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
