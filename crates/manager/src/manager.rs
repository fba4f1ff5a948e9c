// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job manager: the entry point for submitting, compiling and steering jobs.
//!
//! All state lives in one [`MaterializedState`] behind a mutex and changes
//! only through [`Event`]s. Compilation runs outside the lock on a private
//! graph builder, so compiles of different jobs proceed in parallel and a
//! failed compile never leaves tasks behind.

use crate::env;
use crate::error::ManagerError;
use parking_lot::Mutex;
use rf_compiler::{CompilerConfig, CompilerRegistry};
use rf_core::{
    check_web_request, Connection, Event, IdGen, Job, JobId, JobSettings, JobStatus, Task, TaskId,
    TaskStatus, TransitionRejected, UuidIdGen, Worker, WorkerId, WorkerStatus,
};
use rf_storage::{DepsGraph, MaterializedState, Snapshot};
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn epoch_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[derive(Clone)]
pub struct JobManager {
    state: Arc<Mutex<MaterializedState>>,
    ids: Arc<dyn IdGen>,
    registry: Arc<CompilerRegistry>,
    config: Arc<CompilerConfig>,
}

impl JobManager {
    /// Manager with every built-in compiler and UUID identifiers.
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_state(MaterializedState::default(), config)
    }

    /// Resume from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot, config: CompilerConfig) -> Self {
        Self::with_state(snapshot.state, config)
    }

    /// Resume from the snapshot at `path`, or start empty if there is none.
    pub fn open(path: &Path, config: CompilerConfig) -> Result<Self, ManagerError> {
        let state = Snapshot::load(path)?.map(|s| s.state).unwrap_or_default();
        tracing::info!(
            path = %path.display(),
            jobs = state.jobs.len(),
            tasks = state.tasks.len(),
            "opened job state"
        );
        Ok(Self::with_state(state, config))
    }

    /// Open with the compiler config and snapshot named by the environment.
    pub fn from_env() -> Result<Self, ManagerError> {
        let config = env::load_compiler_config()?;
        match env::snapshot_path() {
            Some(path) => Self::open(&path, config),
            None => Ok(Self::new(config)),
        }
    }

    fn with_state(state: MaterializedState, config: CompilerConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            ids: Arc::new(UuidIdGen),
            registry: Arc::new(CompilerRegistry::with_defaults()),
            config: Arc::new(config),
        }
    }

    /// Replace the identifier generator.
    pub fn with_id_gen(mut self, ids: impl IdGen + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Replace the compiler registry.
    pub fn with_registry(mut self, registry: CompilerRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    fn apply(state: &mut MaterializedState, event: Event) {
        tracing::debug!(event = %event.log_summary(), "apply");
        state.apply_event(&event);
    }

    // -- jobs --

    /// Record a new job. It stays under construction until compiled.
    pub fn submit_job(
        &self,
        job_type: &str,
        name: &str,
        settings: JobSettings,
        priority: i32,
    ) -> JobId {
        let id = JobId::new(self.ids.next());
        let mut state = self.state.lock();
        Self::apply(
            &mut state,
            Event::JobCreated {
                id: id.clone(),
                job_type: job_type.to_string(),
                name: name.to_string(),
                settings,
                priority,
                created_at_ms: epoch_ms_now(),
            },
        );
        tracing::info!(job_id = %id, job_type, name, "job submitted");
        id
    }

    /// Compile a submitted job and commit its task graph.
    ///
    /// Returns the number of tasks created. On failure the job stays under
    /// construction with the error recorded, and no task exists.
    pub fn compile(&self, job_id: &JobId) -> Result<usize, ManagerError> {
        let job = self.job_under_construction(job_id)?;
        tracing::info!(job_id = %job.id, job_type = %job.job_type, "compiling job");

        let graph = match self.registry.compile(&job, self.ids.as_ref(), &self.config) {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!(job_id = %job.id, error = %e, "job compile failed");
                let mut state = self.state.lock();
                Self::apply(
                    &mut state,
                    Event::JobCompileFailed {
                        id: job.id.clone(),
                        error: e.to_string(),
                    },
                );
                return Err(e.into());
            }
        };

        let count = graph.len();
        let mut state = self.state.lock();
        // Another caller may have compiled the job meanwhile
        match state.jobs.get(job_id) {
            Some(current) if current.status == JobStatus::UnderConstruction => {}
            Some(_) => return Err(ManagerError::AlreadyCompiled(job_id.clone())),
            None => return Err(ManagerError::JobNotFound(job_id.to_string())),
        }
        Self::apply(
            &mut state,
            Event::JobCompiled {
                id: job_id.clone(),
                tasks: graph.into_tasks(),
            },
        );
        tracing::info!(job_id = %job_id, tasks = count, "job compiled");
        Ok(count)
    }

    fn job_under_construction(&self, job_id: &JobId) -> Result<Job, ManagerError> {
        let state = self.state.lock();
        let job = state
            .jobs
            .get(job_id)
            .ok_or_else(|| ManagerError::JobNotFound(job_id.to_string()))?;
        if job.status != JobStatus::UnderConstruction {
            return Err(ManagerError::AlreadyCompiled(job_id.clone()));
        }
        Ok(job.clone())
    }

    /// Submit and compile in one step.
    pub fn create_job(
        &self,
        job_type: &str,
        name: &str,
        settings: JobSettings,
        priority: i32,
    ) -> Result<JobId, ManagerError> {
        let id = self.submit_job(job_type, name, settings, priority);
        self.compile(&id)?;
        Ok(id)
    }

    /// Apply a client-requested status change.
    ///
    /// Only `queued` (requeue) and `cancel-requested` may be asked for, each
    /// from its allowed statuses. Every request is logged with its actor.
    pub fn web_set_job_status(
        &self,
        job_id: &JobId,
        requested: JobStatus,
        actor: &str,
    ) -> Result<(), ManagerError> {
        let mut state = self.state.lock();
        let current = state
            .jobs
            .get(job_id)
            .map(|job| job.status)
            .ok_or_else(|| ManagerError::JobNotFound(job_id.to_string()))?;

        if let Err(e) = check_web_request(current, requested) {
            tracing::warn!(
                actor,
                job_id = %job_id,
                from = %current,
                requested = %requested,
                reason = %e.reason,
                "rejected job status request"
            );
            return Err(e.into());
        }

        tracing::info!(actor, job_id = %job_id, from = %current, to = %requested, "job status set");
        Self::apply(
            &mut state,
            Event::JobStatusChanged {
                id: job_id.clone(),
                status: requested,
            },
        );
        Ok(())
    }

    /// Internal status change along a legal transition.
    pub fn set_job_status(&self, job_id: &JobId, status: JobStatus) -> Result<(), ManagerError> {
        let mut state = self.state.lock();
        let current = state
            .jobs
            .get(job_id)
            .map(|job| job.status)
            .ok_or_else(|| ManagerError::JobNotFound(job_id.to_string()))?;
        if !current.can_transition_to(status) {
            return Err(TransitionRejected::new(current, status, "illegal job transition").into());
        }
        Self::apply(
            &mut state,
            Event::JobStatusChanged {
                id: job_id.clone(),
                status,
            },
        );
        Ok(())
    }

    pub fn job(&self, job_id: &str) -> Option<Job> {
        self.state.lock().get_job(job_id).cloned()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.state.lock().jobs.values().cloned().collect()
    }

    pub fn depsgraph(&self, job_id: &JobId) -> Result<DepsGraph, ManagerError> {
        self.state
            .lock()
            .depsgraph(job_id)
            .ok_or_else(|| ManagerError::JobNotFound(job_id.to_string()))
    }

    // -- tasks --

    pub fn task(&self, task_id: &str) -> Option<Task> {
        self.state.lock().get_task(task_id).cloned()
    }

    /// Tasks of a job in creation order.
    pub fn tasks_for_job(&self, job_id: &JobId) -> Vec<Task> {
        self.state.lock().tasks_for_job(job_id).cloned().collect()
    }

    pub fn dispatchable_tasks(&self) -> Vec<Task> {
        self.state
            .lock()
            .dispatchable_tasks()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Task status reported by dispatch or a worker. The job's status is
    /// recomputed from its tasks.
    pub fn update_task_status(&self, task_id: &TaskId, status: TaskStatus) -> Result<(), ManagerError> {
        let mut state = self.state.lock();
        let current = state
            .get_task(task_id.as_str())
            .map(|task| task.status)
            .ok_or_else(|| ManagerError::TaskNotFound(task_id.to_string()))?;
        if !current.can_transition_to(status) {
            return Err(TransitionRejected::new(current, status, "illegal task transition").into());
        }
        Self::apply(
            &mut state,
            Event::TaskStatusChanged {
                id: task_id.clone(),
                status,
            },
        );
        Ok(())
    }

    /// Hand the best dispatchable task to a worker.
    ///
    /// Returns `Ok(None)` when nothing is ready to run.
    pub fn claim_task(&self, worker_id: &WorkerId) -> Result<Option<Task>, ManagerError> {
        let mut state = self.state.lock();
        let worker = state
            .get_worker(worker_id.as_str())
            .ok_or_else(|| ManagerError::WorkerNotFound(worker_id.to_string()))?;
        if !worker.can_take_task() {
            return Err(ManagerError::WorkerUnavailable(worker_id.clone()));
        }
        let Some(task_id) = state.dispatchable_tasks().first().map(|t| t.id.clone()) else {
            return Ok(None);
        };
        Self::apply(
            &mut state,
            Event::TaskClaimed {
                id: task_id.clone(),
                worker_id: worker_id.clone(),
            },
        );
        tracing::info!(task_id = %task_id, worker_id = %worker_id, "task claimed");
        Ok(state.get_task(task_id.as_str()).cloned())
    }

    // -- workers --

    pub fn register_worker(&self, hostname: &str) -> WorkerId {
        let id = WorkerId::new(self.ids.next());
        let mut state = self.state.lock();
        Self::apply(
            &mut state,
            Event::WorkerRegistered {
                id: id.clone(),
                hostname: hostname.to_string(),
            },
        );
        tracing::info!(worker_id = %id, hostname, "worker registered");
        id
    }

    pub fn worker(&self, worker_id: &str) -> Option<Worker> {
        self.state.lock().get_worker(worker_id).cloned()
    }

    pub fn set_worker_status(&self, worker_id: &WorkerId, status: WorkerStatus) -> Result<(), ManagerError> {
        let mut state = self.state.lock();
        if state.get_worker(worker_id.as_str()).is_none() {
            return Err(ManagerError::WorkerNotFound(worker_id.to_string()));
        }
        Self::apply(
            &mut state,
            Event::WorkerStatusChanged {
                id: worker_id.clone(),
                status,
            },
        );
        Ok(())
    }

    /// Record the liveness poller's view of a worker.
    pub fn set_worker_connection(
        &self,
        worker_id: &WorkerId,
        connection: Connection,
    ) -> Result<(), ManagerError> {
        let mut state = self.state.lock();
        if state.get_worker(worker_id.as_str()).is_none() {
            return Err(ManagerError::WorkerNotFound(worker_id.to_string()));
        }
        Self::apply(
            &mut state,
            Event::WorkerConnectionChanged {
                id: worker_id.clone(),
                connection,
            },
        );
        Ok(())
    }

    // -- persistence --

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.state.lock().clone())
    }

    pub fn save_snapshot(&self, path: &Path) -> Result<(), ManagerError> {
        let snapshot = self.snapshot();
        snapshot.save(path)?;
        tracing::debug!(path = %path.display(), jobs = snapshot.state.jobs.len(), "saved snapshot");
        Ok(())
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
