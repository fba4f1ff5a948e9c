// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod cancel;
mod dispatch;
mod workers;

use super::*;
use rf_core::test_support::render_settings;

fn job_create_event(id: &str) -> Event {
    Event::JobCreated {
        id: JobId::new(id),
        job_type: "blender-render".to_string(),
        name: format!("{id} name"),
        settings: render_settings("1-4", 2),
        priority: 0,
        created_at_ms: 1_000_000,
    }
}

fn task(id: &str, job_id: &str, parents: &[&str], priority: i32) -> Task {
    Task::new(
        TaskId::new(id),
        JobId::new(job_id),
        id,
        vec![],
        parents.iter().map(|p| TaskId::new(*p)).collect(),
        priority,
    )
}

/// A compiled job `job_id` with tasks `{job_id}-a` <- `{job_id}-b`, `{job_id}-c`.
fn compiled_state(job_id: &str) -> MaterializedState {
    let mut state = MaterializedState::default();
    add_compiled_job(&mut state, job_id);
    state
}

fn add_compiled_job(state: &mut MaterializedState, job_id: &str) {
    let a = format!("{job_id}-a");
    state.apply_event(&job_create_event(job_id));
    state.apply_event(&Event::JobCompiled {
        id: JobId::new(job_id),
        tasks: vec![
            task(&a, job_id, &[], 10),
            task(&format!("{job_id}-b"), job_id, &[a.as_str()], 5),
            task(&format!("{job_id}-c"), job_id, &[a.as_str()], 8),
        ],
    });
}

fn task_status(id: &str, status: TaskStatus) -> Event {
    Event::TaskStatusChanged {
        id: TaskId::new(id),
        status,
    }
}

fn job_status(id: &str, status: JobStatus) -> Event {
    Event::JobStatusChanged {
        id: JobId::new(id),
        status,
    }
}

fn register_worker(id: &str) -> Event {
    Event::WorkerRegistered {
        id: WorkerId::new(id),
        hostname: format!("{id}.farm"),
    }
}

fn claim(task: &str, worker: &str) -> Event {
    Event::TaskClaimed {
        id: TaskId::new(task),
        worker_id: WorkerId::new(worker),
    }
}

// -- job lifecycle --

#[test]
fn job_created_is_under_construction() {
    let mut state = MaterializedState::default();
    state.apply_event(&job_create_event("job-1"));

    let job = &state.jobs["job-1"];
    assert_eq!(job.status, JobStatus::UnderConstruction);
    assert_eq!(job.name, "job-1 name");
    assert_eq!(state.tasks_for_job(&job.id).count(), 0);
}

#[test]
fn job_created_is_idempotent() {
    let mut state = MaterializedState::default();
    state.apply_event(&job_create_event("job-1"));
    state.apply_event(&job_status("job-1", JobStatus::Failed));
    state.apply_event(&job_create_event("job-1"));
    assert_eq!(state.jobs["job-1"].status, JobStatus::Failed);
}

#[test]
fn job_compiled_commits_tasks_and_queues_job() {
    let state = compiled_state("job-1");

    assert_eq!(state.jobs["job-1"].status, JobStatus::Queued);
    let names: Vec<&str> = state
        .tasks_for_job(&JobId::new("job-1"))
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, ["job-1-a", "job-1-b", "job-1-c"]);
    assert!(state.tasks.values().all(|t| t.status == TaskStatus::Queued));
}

#[test]
fn job_compiled_twice_keeps_first_graph() {
    let mut state = compiled_state("job-1");
    state.apply_event(&Event::JobCompiled {
        id: JobId::new("job-1"),
        tasks: vec![task("other", "job-1", &[], 0)],
    });
    assert_eq!(state.tasks.len(), 3);
    assert!(state.get_task("other").is_none());
}

#[test]
fn job_compiled_for_unknown_job_is_ignored() {
    let mut state = MaterializedState::default();
    state.apply_event(&Event::JobCompiled {
        id: JobId::new("ghost"),
        tasks: vec![task("t", "ghost", &[], 0)],
    });
    assert!(state.tasks.is_empty());
}

#[test]
fn compile_failure_records_error_and_keeps_status() {
    let mut state = MaterializedState::default();
    state.apply_event(&job_create_event("job-1"));
    state.apply_event(&Event::JobCompileFailed {
        id: JobId::new("job-1"),
        error: "job setting \"frames\": missing required setting".to_string(),
    });

    let job = &state.jobs["job-1"];
    assert_eq!(job.status, JobStatus::UnderConstruction);
    assert!(job.error.as_deref().unwrap().contains("frames"));
    assert!(state.tasks.is_empty());
}

#[test]
fn get_job_by_unique_prefix() {
    let mut state = MaterializedState::default();
    state.apply_event(&job_create_event("abc-123"));
    state.apply_event(&job_create_event("abd-456"));

    assert_eq!(state.get_job("abc").unwrap().id, "abc-123");
    assert!(state.get_job("ab").is_none());
    assert!(state.get_job("zzz").is_none());
    assert_eq!(state.get_job("abd-456").unwrap().id, "abd-456");
}

// -- aggregate status --

#[yare::parameterized(
    one_active     = { &[TaskStatus::Active], JobStatus::Active },
    one_completed  = { &[TaskStatus::Completed], JobStatus::Active },
    one_failed     = { &[TaskStatus::Completed, TaskStatus::Failed], JobStatus::Failed },
    all_completed  = { &[TaskStatus::Completed, TaskStatus::Completed, TaskStatus::Completed], JobStatus::Completed },
    one_canceled   = { &[TaskStatus::Completed, TaskStatus::Canceled], JobStatus::Canceled },
)]
fn job_status_follows_tasks(changes: &[TaskStatus], expected: JobStatus) {
    let mut state = compiled_state("job-1");
    for (status, id) in changes.iter().zip(["job-1-a", "job-1-b", "job-1-c"]) {
        state.apply_event(&task_status(id, *status));
    }
    assert_eq!(state.jobs["job-1"].status, expected);
}

#[test]
fn job_returns_to_queued_when_task_is_put_back() {
    let mut state = compiled_state("job-1");
    state.apply_event(&task_status("job-1-a", TaskStatus::Active));
    assert_eq!(state.jobs["job-1"].status, JobStatus::Active);

    state.apply_event(&task_status("job-1-a", TaskStatus::Queued));
    assert_eq!(state.jobs["job-1"].status, JobStatus::Queued);
}

#[test]
fn recompute_only_touches_owning_job() {
    let mut state = compiled_state("job-1");
    add_compiled_job(&mut state, "job-2");

    state.apply_event(&task_status("job-1-a", TaskStatus::Failed));

    assert_eq!(state.jobs["job-1"].status, JobStatus::Failed);
    assert_eq!(state.jobs["job-2"].status, JobStatus::Queued);
}

#[test]
fn tasks_for_job_borrows_only_state() {
    let state = compiled_state("job-1");
    let tasks: Vec<&Task> = {
        let id = JobId::new("job-1");
        state.tasks_for_job(&id).collect()
    };
    assert_eq!(tasks.len(), 3);
}
