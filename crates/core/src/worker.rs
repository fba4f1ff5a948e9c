// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identifier and record.
//!
//! A worker's declared status is set by operators. Its connection state comes
//! from an external liveness poller and is only reported, never derived here.

use crate::task::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for a worker instance.
    pub struct WorkerId;
}

/// Operator-declared worker status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    #[default]
    Enabled,
    Disabled,
}

/// Observed connection state, fed by the liveness poller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    Online,
    #[default]
    Offline,
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerStatus::Enabled => write!(f, "enabled"),
            WorkerStatus::Disabled => write!(f, "disabled"),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Online => write!(f, "online"),
            Connection::Offline => write!(f, "offline"),
        }
    }
}

/// A render node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub hostname: String,
    #[serde(default)]
    pub status: WorkerStatus,
    #[serde(default)]
    pub connection: Connection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<TaskId>,
}

impl Worker {
    /// Newly registered workers are enabled and online.
    pub fn new(id: WorkerId, hostname: impl Into<String>) -> Self {
        Self {
            id,
            hostname: hostname.into(),
            status: WorkerStatus::Enabled,
            connection: Connection::Online,
            current_task: None,
        }
    }

    /// Enabled, online and not busy.
    pub fn can_take_task(&self) -> bool {
        self.status == WorkerStatus::Enabled
            && self.connection == Connection::Online
            && self.current_task.is_none()
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
