// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for job compilation

use rf_core::{JobId, JobSettingError, TaskId};
use thiserror::Error;

/// Structural problems with a task graph.
///
/// A correct compiler never produces these; they abort the whole compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("task {task:?} references unknown parent {parent}")]
    UnknownParent { task: String, parent: TaskId },

    #[error("task {task:?} references parent {parent} of job {parent_job}, not {job}")]
    ForeignParent {
        task: String,
        parent: TaskId,
        parent_job: JobId,
        job: JobId,
    },

    #[error("task {task:?} lists parent {parent} twice")]
    DuplicateParent { task: String, parent: TaskId },

    #[error("batch of {tasks} tasks given {parents} parents")]
    ParentCountMismatch { tasks: usize, parents: usize },

    #[error("task graph of job {job} has a cycle through {task}")]
    Cycle { job: JobId, task: TaskId },
}

/// Errors that can occur while compiling a job
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("no compiler registered for job type {0:?}")]
    UnknownJobType(String),

    #[error(transparent)]
    JobSetting(#[from] JobSettingError),

    #[error("task graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("invalid compiler config: {0}")]
    Config(String),
}
