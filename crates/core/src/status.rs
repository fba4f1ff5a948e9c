// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job and task status state machine.
//!
//! Holds the legal transitions for jobs and tasks, the subsets of job
//! statuses a client may request, and the derivation of a job's aggregate
//! status from the statuses of its tasks. The job status is never patched
//! incrementally: every task status change recomputes it from the full
//! multiset of task statuses via [`resolve_job_status`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    /// Created, graph not yet committed
    UnderConstruction,
    /// Graph committed, waiting for dispatch
    Queued,
    /// At least one task claimed or running, or partially done
    Active,
    Completed,
    Failed,
    Canceled,
    /// Pending request; the dispatcher cascades it to the tasks
    CancelRequested,
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Queued,
    /// Handed to a worker, not started yet
    Claimed,
    Active,
    Completed,
    Failed,
    Canceled,
    /// Pending request; the worker-side agent stops the task
    CancelRequested,
}

/// Job statuses a client (web interface) may request.
pub const WEB_SETTABLE_JOB_STATUSES: &[JobStatus] = &[JobStatus::Queued, JobStatus::CancelRequested];

/// Job statuses from which a cancel request is accepted.
pub const CANCELABLE_JOB_STATUSES: &[JobStatus] = &[JobStatus::Queued, JobStatus::Active];

/// Job statuses from which a requeue request is accepted.
pub const REQUEUEABLE_JOB_STATUSES: &[JobStatus] =
    &[JobStatus::Completed, JobStatus::Failed, JobStatus::Canceled];

/// Task statuses that need no further work.
pub const TERMINAL_TASK_STATUSES: &[TaskStatus] =
    &[TaskStatus::Completed, TaskStatus::Failed, TaskStatus::Canceled];

/// A status change that the state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot change status from {from} to {requested}: {reason}")]
pub struct TransitionRejected {
    pub from: String,
    pub requested: String,
    pub reason: String,
}

impl TransitionRejected {
    pub fn new(from: impl fmt::Display, requested: impl fmt::Display, reason: &str) -> Self {
        Self {
            from: from.to_string(),
            requested: requested.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Status string that matches no known status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl JobStatus {
    pub const ALL: [JobStatus; 7] = [
        JobStatus::UnderConstruction,
        JobStatus::Queued,
        JobStatus::Active,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Canceled,
        JobStatus::CancelRequested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::UnderConstruction => "under-construction",
            JobStatus::Queued => "queued",
            JobStatus::Active => "active",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
            JobStatus::CancelRequested => "cancel-requested",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Canceled
        )
    }

    pub fn is_web_settable(&self) -> bool {
        WEB_SETTABLE_JOB_STATUSES.contains(self)
    }

    pub fn is_cancelable(&self) -> bool {
        CANCELABLE_JOB_STATUSES.contains(self)
    }

    pub fn is_requeueable(&self) -> bool {
        REQUEUEABLE_JOB_STATUSES.contains(self)
    }

    /// Tasks of a job in this status may be handed to workers.
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Active)
    }

    /// Legal internal transitions, used by dispatch logic.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        match (self, next) {
            (a, b) if *a == b => true,
            (UnderConstruction, Queued) => true,
            (Queued | Active, Active | Completed | Failed | Canceled | CancelRequested) => true,
            (Active, Queued) => true,
            (CancelRequested, Canceled) => true,
            (Completed | Failed | Canceled, Queued) => true,
            _ => false,
        }
    }
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 7] = [
        TaskStatus::Queued,
        TaskStatus::Claimed,
        TaskStatus::Active,
        TaskStatus::Completed,
        TaskStatus::Failed,
        TaskStatus::Canceled,
        TaskStatus::CancelRequested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Claimed => "claimed",
            TaskStatus::Active => "active",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Canceled => "canceled",
            TaskStatus::CancelRequested => "cancel-requested",
        }
    }

    pub fn is_terminal(&self) -> bool {
        TERMINAL_TASK_STATUSES.contains(self)
    }

    /// Claimed by or running on a worker.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            TaskStatus::Claimed | TaskStatus::Active | TaskStatus::CancelRequested
        )
    }

    /// Legal internal transitions, used by dispatch logic and workers.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        match (self, next) {
            (a, b) if *a == b => true,
            (Queued, Claimed | Active | Canceled) => true,
            (Claimed, Queued | Active | Failed | Canceled | CancelRequested) => true,
            (Active, Completed | Failed | Canceled | CancelRequested) => true,
            (CancelRequested, Canceled | Completed | Failed) => true,
            (Completed | Failed | Canceled, Queued) => true,
            _ => false,
        }
    }

    /// Display category for the dependency graph.
    pub fn color(&self) -> &'static str {
        match self {
            TaskStatus::Queued => "#b4bbaa",
            TaskStatus::Claimed => "#d1c5d3",
            TaskStatus::Active => "#ffbe00",
            TaskStatus::Completed => "#bbe151",
            TaskStatus::Failed => "#ff8080",
            TaskStatus::Canceled => "#999999",
            TaskStatus::CancelRequested => "#d0c1a1",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Check a client-requested job status change.
///
/// Only `queued` and `cancel-requested` may be requested. A cancel needs the
/// job in a cancelable status, a requeue needs it in a requeueable one.
pub fn check_web_request(current: JobStatus, requested: JobStatus) -> Result<(), TransitionRejected> {
    if !requested.is_web_settable() {
        return Err(TransitionRejected::new(
            current,
            requested,
            "status may not be set from the web interface",
        ));
    }
    match requested {
        JobStatus::CancelRequested if !current.is_cancelable() => Err(TransitionRejected::new(
            current,
            requested,
            "job is not in a cancelable status",
        )),
        JobStatus::Queued if !current.is_requeueable() => Err(TransitionRejected::new(
            current,
            requested,
            "job is not in a requeueable status",
        )),
        _ => Ok(()),
    }
}

/// Derive a job's status from the statuses of all of its tasks.
///
/// Pure and order-independent. A job without tasks has nothing left to do
/// and counts as completed.
pub fn aggregate_job_status<I>(statuses: I) -> JobStatus
where
    I: IntoIterator<Item = TaskStatus>,
{
    let mut total = 0usize;
    let mut queued = 0usize;
    let mut completed = 0usize;
    let mut running = 0usize;
    let mut failed = 0usize;
    let mut canceled = 0usize;

    for status in statuses {
        total += 1;
        match status {
            TaskStatus::Queued => queued += 1,
            TaskStatus::Completed => completed += 1,
            TaskStatus::Failed => failed += 1,
            TaskStatus::Canceled => canceled += 1,
            TaskStatus::Claimed | TaskStatus::Active | TaskStatus::CancelRequested => running += 1,
        }
    }

    if failed > 0 {
        JobStatus::Failed
    } else if completed == total {
        JobStatus::Completed
    } else if running > 0 {
        JobStatus::Active
    } else if canceled > 0 {
        JobStatus::Canceled
    } else if queued == total {
        JobStatus::Queued
    } else {
        // some completed, the rest still queued
        JobStatus::Active
    }
}

/// Recompute a job's status after one of its tasks changed.
///
/// `under-construction` is kept until the graph is committed. A pending
/// cancel request holds until every task is terminal and then becomes
/// `canceled`. In every other case the aggregate wins.
pub fn resolve_job_status<I>(current: JobStatus, statuses: I) -> JobStatus
where
    I: IntoIterator<Item = TaskStatus>,
{
    match current {
        JobStatus::UnderConstruction => JobStatus::UnderConstruction,
        JobStatus::CancelRequested => {
            let mut statuses = statuses.into_iter();
            if statuses.all(|s| s.is_terminal()) {
                JobStatus::Canceled
            } else {
                JobStatus::CancelRequested
            }
        }
        _ => aggregate_job_status(statuses),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
