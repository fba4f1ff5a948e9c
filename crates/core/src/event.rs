// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types for the render farm.
//!
//! State is only ever changed by applying one of these events, which keeps
//! the manager's decisions separate from the bookkeeping and lets a state be
//! rebuilt by replaying them.

use crate::job::JobId;
use crate::settings::JobSettings;
use crate::status::{JobStatus, TaskStatus};
use crate::task::{Task, TaskId};
use crate::worker::{Connection, WorkerId, WorkerStatus};
use serde::{Deserialize, Serialize};

/// Events that trigger state transitions.
///
/// Serializes with `{"type": "event:name", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // -- job --
    #[serde(rename = "job:created")]
    JobCreated {
        id: JobId,
        job_type: String,
        name: String,
        settings: JobSettings,
        #[serde(default)]
        priority: i32,
        created_at_ms: u64,
    },

    /// The complete task graph of a job, committed in one step.
    #[serde(rename = "job:compiled")]
    JobCompiled { id: JobId, tasks: Vec<Task> },

    #[serde(rename = "job:compile_failed")]
    JobCompileFailed { id: JobId, error: String },

    /// Accepted job status change. Cancel requests cascade to the tasks,
    /// requeues reset them.
    #[serde(rename = "job:status")]
    JobStatusChanged { id: JobId, status: JobStatus },

    // -- task --
    #[serde(rename = "task:status")]
    TaskStatusChanged { id: TaskId, status: TaskStatus },

    #[serde(rename = "task:claimed")]
    TaskClaimed { id: TaskId, worker_id: WorkerId },

    // -- worker --
    #[serde(rename = "worker:registered")]
    WorkerRegistered { id: WorkerId, hostname: String },

    #[serde(rename = "worker:status")]
    WorkerStatusChanged { id: WorkerId, status: WorkerStatus },

    #[serde(rename = "worker:connection")]
    WorkerConnectionChanged {
        id: WorkerId,
        connection: Connection,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::JobCreated { .. } => "job:created",
            Event::JobCompiled { .. } => "job:compiled",
            Event::JobCompileFailed { .. } => "job:compile_failed",
            Event::JobStatusChanged { .. } => "job:status",
            Event::TaskStatusChanged { .. } => "task:status",
            Event::TaskClaimed { .. } => "task:claimed",
            Event::WorkerRegistered { .. } => "worker:registered",
            Event::WorkerStatusChanged { .. } => "worker:status",
            Event::WorkerConnectionChanged { .. } => "worker:connection",
        }
    }

    /// One-line summary for logs.
    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            Event::JobCreated { id, job_type, .. } => format!("{t} id={id} type={job_type}"),
            Event::JobCompiled { id, tasks } => format!("{t} id={id} tasks={}", tasks.len()),
            Event::JobCompileFailed { id, .. } => format!("{t} id={id}"),
            Event::JobStatusChanged { id, status } => format!("{t} id={id} status={status}"),
            Event::TaskStatusChanged { id, status } => {
                format!("{t} id={} status={status}", id.short(8))
            }
            Event::TaskClaimed { id, worker_id } => {
                format!("{t} id={} worker={worker_id}", id.short(8))
            }
            Event::WorkerRegistered { id, hostname } => format!("{t} id={id} host={hostname}"),
            Event::WorkerStatusChanged { id, status } => format!("{t} id={id} status={status}"),
            Event::WorkerConnectionChanged { id, connection } => {
                format!("{t} id={id} connection={connection}")
            }
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
