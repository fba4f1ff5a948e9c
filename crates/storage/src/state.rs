// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state built from events

use indexmap::IndexMap;
use rf_core::{
    resolve_job_status, Event, Job, JobConfig, JobId, JobStatus, Task, TaskId, TaskStatus, Worker,
    WorkerId,
};
use serde::{Deserialize, Serialize};

/// Jobs, tasks and workers, in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializedState {
    pub jobs: IndexMap<JobId, Job>,
    #[serde(default)]
    pub tasks: IndexMap<TaskId, Task>,
    #[serde(default)]
    pub workers: IndexMap<WorkerId, Worker>,
}

impl MaterializedState {
    /// Get a job by ID or unique prefix (like git commit hashes)
    pub fn get_job(&self, id: &str) -> Option<&Job> {
        if let Some(job) = self.jobs.get(id) {
            return Some(job);
        }
        let mut matches = self.jobs.iter().filter(|(k, _)| k.as_str().starts_with(id));
        match (matches.next(), matches.next()) {
            (Some((_, job)), None) => Some(job),
            _ => None,
        }
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_worker(&self, id: &str) -> Option<&Worker> {
        self.workers.get(id)
    }

    /// Tasks of a job in creation order.
    pub fn tasks_for_job(&self, job_id: &JobId) -> impl Iterator<Item = &Task> + '_ {
        let job_id = job_id.clone();
        self.tasks.values().filter(move |t| t.job_id == job_id)
    }

    /// Tasks a worker may claim right now.
    ///
    /// A task qualifies when it is queued, its job is queued or active, and
    /// every parent has completed. Higher priority first; ties keep creation
    /// order.
    pub fn dispatchable_tasks(&self) -> Vec<&Task> {
        let mut ready: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Queued)
            .filter(|t| {
                self.jobs
                    .get(&t.job_id)
                    .is_some_and(|job| job.status.is_dispatchable())
            })
            .filter(|t| self.parents_completed(t))
            .collect();
        ready.sort_by(|a, b| b.priority.cmp(&a.priority));
        ready
    }

    fn parents_completed(&self, task: &Task) -> bool {
        task.parents.iter().all(|p| {
            self.tasks
                .get(p)
                .is_some_and(|parent| parent.status == TaskStatus::Completed)
        })
    }

    /// Apply an event to derive state changes.
    ///
    /// Events describe decisions already taken; applying one never fails.
    /// Events naming unknown records are ignored.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::JobCreated {
                id,
                job_type,
                name,
                settings,
                priority,
                created_at_ms,
            } => {
                self.jobs.entry(id.clone()).or_insert_with(|| {
                    Job::new(JobConfig {
                        id: id.clone(),
                        job_type: job_type.clone(),
                        name: name.clone(),
                        settings: settings.clone(),
                        priority: *priority,
                        created_at_ms: *created_at_ms,
                    })
                });
            }

            Event::JobCompiled { id, tasks } => {
                let Some(job) = self.jobs.get_mut(id) else {
                    return;
                };
                // Compiling twice would duplicate the graph
                if job.status != JobStatus::UnderConstruction {
                    tracing::warn!(job_id = %id, status = %job.status, "ignoring graph for compiled job");
                    return;
                }
                job.status = JobStatus::Queued;
                job.error = None;
                for task in tasks {
                    self.tasks.insert(task.id.clone(), task.clone());
                }
                self.refresh_job(id);
            }

            Event::JobCompileFailed { id, error } => {
                if let Some(job) = self.jobs.get_mut(id) {
                    job.error = Some(error.clone());
                }
            }

            Event::JobStatusChanged { id, status } => {
                let Some(job) = self.jobs.get_mut(id) else {
                    return;
                };
                let previous = job.status;
                job.status = *status;
                match status {
                    JobStatus::CancelRequested => {
                        self.cancel_tasks(id);
                        self.refresh_job(id);
                    }
                    JobStatus::Queued if previous.is_requeueable() => {
                        self.requeue_tasks(id, previous == JobStatus::Completed);
                    }
                    _ => {}
                }
            }

            Event::TaskStatusChanged { id, status } => {
                let Some(task) = self.tasks.get_mut(id) else {
                    return;
                };
                task.status = *status;
                if !status.is_running() {
                    if let Some(worker_id) = task.worker.take() {
                        release_worker(&mut self.workers, &worker_id, id);
                    }
                }
                let job_id = task.job_id.clone();
                self.refresh_job(&job_id);
            }

            Event::TaskClaimed { id, worker_id } => {
                let Some(task) = self.tasks.get_mut(id) else {
                    return;
                };
                task.status = TaskStatus::Claimed;
                task.worker = Some(worker_id.clone());
                let job_id = task.job_id.clone();
                if let Some(worker) = self.workers.get_mut(worker_id) {
                    worker.current_task = Some(id.clone());
                }
                self.refresh_job(&job_id);
            }

            Event::WorkerRegistered { id, hostname } => {
                let worker = self
                    .workers
                    .entry(id.clone())
                    .or_insert_with(|| Worker::new(id.clone(), hostname.clone()));
                worker.hostname = hostname.clone();
            }

            Event::WorkerStatusChanged { id, status } => {
                if let Some(worker) = self.workers.get_mut(id) {
                    worker.status = *status;
                }
            }

            Event::WorkerConnectionChanged { id, connection } => {
                if let Some(worker) = self.workers.get_mut(id) {
                    worker.connection = *connection;
                }
            }
        }
    }

    /// Cancel cascade: waiting tasks are canceled, running ones are asked to stop.
    fn cancel_tasks(&mut self, job_id: &JobId) {
        for task in self.tasks.values_mut().filter(|t| &t.job_id == job_id) {
            match task.status {
                TaskStatus::Queued | TaskStatus::Claimed => {
                    task.status = TaskStatus::Canceled;
                    if let Some(worker_id) = task.worker.take() {
                        release_worker(&mut self.workers, &worker_id, &task.id);
                    }
                }
                TaskStatus::Active => task.status = TaskStatus::CancelRequested,
                _ => {}
            }
        }
    }

    /// Requeue a job's unfinished tasks, or all of them after completion.
    fn requeue_tasks(&mut self, job_id: &JobId, all: bool) {
        for task in self.tasks.values_mut().filter(|t| &t.job_id == job_id) {
            if all || task.status != TaskStatus::Completed {
                task.status = TaskStatus::Queued;
                if let Some(worker_id) = task.worker.take() {
                    release_worker(&mut self.workers, &worker_id, &task.id);
                }
            }
        }
    }

    /// Recompute a job's status from its tasks.
    fn refresh_job(&mut self, job_id: &JobId) {
        let statuses: Vec<TaskStatus> = self.tasks_for_job(job_id).map(|t| t.status).collect();
        let Some(job) = self.jobs.get_mut(job_id) else {
            return;
        };
        let next = resolve_job_status(job.status, statuses);
        if next != job.status {
            tracing::debug!(job_id = %job_id, from = %job.status, to = %next, "job status recomputed");
            job.status = next;
        }
    }
}

fn release_worker(workers: &mut IndexMap<WorkerId, Worker>, worker_id: &WorkerId, task_id: &TaskId) {
    if let Some(worker) = workers.get_mut(worker_id) {
        if worker.current_task.as_ref() == Some(task_id) {
            worker.current_task = None;
        }
    }
}

#[cfg(test)]
#[path = "state_tests/mod.rs"]
mod tests;
