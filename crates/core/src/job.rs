// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and record.

use crate::settings::JobSettings;
use crate::status::JobStatus;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a job.
    ///
    /// Every task of a job carries this id; the compiler never creates tasks
    /// for more than one job at a time.
    pub struct JobId;
}

/// Configuration for creating a new job
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub id: JobId,
    /// Wire tag of the job type, e.g. `blender-render-progressive`
    pub job_type: String,
    pub name: String,
    pub settings: JobSettings,
    /// Base priority, propagated to the job's tasks
    pub priority: i32,
    pub created_at_ms: u64,
}

/// A render job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub job_type: String,
    pub name: String,
    pub settings: JobSettings,
    pub status: JobStatus,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub created_at_ms: u64,
    /// Why the last compile attempt failed, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// A job starts out under construction; compilation makes it dispatchable.
    pub fn new(config: JobConfig) -> Self {
        Self {
            id: config.id,
            job_type: config.job_type,
            name: config.name,
            settings: config.settings,
            status: JobStatus::UnderConstruction,
            priority: config.priority,
            created_at_ms: config.created_at_ms,
            error: None,
        }
    }

    pub fn is_compiled(&self) -> bool {
        self.status != JobStatus::UnderConstruction
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Test builder for [`Job`].
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone)]
pub struct JobBuilder {
    job: Job,
}

#[cfg(any(test, feature = "test-support"))]
impl JobBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.job.id = JobId::new(id);
        self
    }
    pub fn job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job.job_type = job_type.into();
        self
    }
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.job.name = name.into();
        self
    }
    pub fn settings(mut self, settings: JobSettings) -> Self {
        self.job.settings = settings;
        self
    }
    pub fn setting(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.job.settings.insert(key, value);
        self
    }
    pub fn priority(mut self, priority: i32) -> Self {
        self.job.priority = priority;
        self
    }
    pub fn status(mut self, status: JobStatus) -> Self {
        self.job.status = status;
        self
    }
    pub fn build(self) -> Job {
        self.job
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Job {
    /// Create a builder with test defaults.
    pub fn builder() -> JobBuilder {
        JobBuilder {
            job: Job::new(JobConfig {
                id: JobId::new("job-1"),
                job_type: "blender-render".to_string(),
                name: "test job".to_string(),
                settings: JobSettings::new(),
                priority: 0,
                created_at_ms: 1_000_000,
            }),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
