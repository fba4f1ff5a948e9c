// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task identifier and record.
//!
//! A task is the unit of dispatch and failure: its commands run in order on
//! one worker, and it becomes dispatchable once every parent completed.

use crate::command::Command;
use crate::job::JobId;
use crate::status::TaskStatus;
use crate::worker::WorkerId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a task, farm-wide.
    pub struct TaskId;
}

/// A node of a job's task graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub job_id: JobId,
    pub name: String,
    pub commands: Vec<Command>,
    /// Tasks that must complete before this one may run
    #[serde(default)]
    pub parents: Vec<TaskId>,
    /// Higher runs earlier; fixed at creation
    pub priority: i32,
    pub status: TaskStatus,
    /// Worker the task is claimed by or running on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<WorkerId>,
}

impl Task {
    pub fn new(
        id: TaskId,
        job_id: JobId,
        name: impl Into<String>,
        commands: Vec<Command>,
        parents: Vec<TaskId>,
        priority: i32,
    ) -> Self {
        Self {
            id,
            job_id,
            name: name.into(),
            commands,
            parents,
            priority,
            status: TaskStatus::Queued,
            worker: None,
        }
    }

    pub fn has_parent(&self, id: &TaskId) -> bool {
        self.parents.contains(id)
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
