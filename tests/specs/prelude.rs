//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL around `JobManager` for driving a farm in tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

pub use rf_compiler::CompilerConfig;
pub use rf_core::test_support::{progressive_settings, render_settings, RENDER_OUTPUT};
pub use rf_core::{JobId, JobSettings, JobStatus, Task, TaskStatus, WorkerId};
pub use rf_manager::{JobManager, ManagerError};

use rf_core::SequentialIdGen;

/// A manager with default compiler settings and predictable ids.
pub fn farm() -> Farm {
    farm_with(CompilerConfig::default())
}

pub fn farm_with(config: CompilerConfig) -> Farm {
    Farm {
        manager: JobManager::new(config).with_id_gen(SequentialIdGen::new("f")),
    }
}

pub struct Farm {
    pub manager: JobManager,
}

impl Farm {
    pub fn render(&self, frames: &str, chunk_size: i64) -> JobId {
        self.manager
            .create_job("blender-render", "shot-010", render_settings(frames, chunk_size), 50)
            .unwrap()
    }

    pub fn progressive(&self, frames: &str, chunk_size: i64, samples: i64, chunks: i64) -> JobId {
        self.manager
            .create_job(
                "blender-render-progressive",
                "shot-010",
                progressive_settings(frames, chunk_size, samples, chunks),
                50,
            )
            .unwrap()
    }

    pub fn tasks(&self, job: &JobId) -> Vec<Task> {
        self.manager.tasks_for_job(job)
    }

    pub fn task_names(&self, job: &JobId) -> Vec<String> {
        self.tasks(job).into_iter().map(|t| t.name).collect()
    }

    pub fn task(&self, job: &JobId, name: &str) -> Task {
        self.tasks(job)
            .into_iter()
            .find(|t| t.name == name)
            .unwrap_or_else(|| panic!("job {job} has no task {name}: {:?}", self.task_names(job)))
    }

    pub fn status(&self, job: &JobId) -> JobStatus {
        self.manager.job(job.as_str()).unwrap().status
    }

    pub fn task_status(&self, task: &Task) -> TaskStatus {
        self.manager.task(task.id.as_str()).unwrap().status
    }

    /// Claim the next task and take it through active to `outcome`.
    pub fn run_next(&self, worker: &WorkerId, outcome: TaskStatus) -> Option<Task> {
        let task = self.manager.claim_task(worker).unwrap()?;
        self.manager.update_task_status(&task.id, TaskStatus::Active).unwrap();
        self.manager.update_task_status(&task.id, outcome).unwrap();
        Some(task)
    }

    /// Run every dispatchable task to completion; returns names in run order.
    pub fn run_all(&self, worker: &WorkerId) -> Vec<String> {
        let mut names = Vec::new();
        while let Some(task) = self.run_next(worker, TaskStatus::Completed) {
            names.push(task.name);
        }
        names
    }
}

/// Parameter `key` of command `index` as a string.
pub fn param(task: &Task, index: usize, key: &str) -> String {
    task.commands[index]
        .get(key)
        .unwrap_or_else(|| panic!("task {} command {index} has no {key}", task.name))
        .to_string()
}

/// Names of `task`'s parents within `farm`.
pub fn parent_names(farm: &Farm, task: &Task) -> Vec<String> {
    task.parents
        .iter()
        .map(|p| farm.manager.task(p.as_str()).unwrap().name)
        .collect()
}
