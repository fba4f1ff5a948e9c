// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rf_core::{Connection, WorkerStatus};

#[test]
fn registered_worker_is_enabled_and_online() {
    let mut state = MaterializedState::default();
    state.apply_event(&register_worker("w-1"));

    let worker = &state.workers["w-1"];
    assert_eq!(worker.hostname, "w-1.farm");
    assert_eq!(worker.status, WorkerStatus::Enabled);
    assert_eq!(worker.connection, Connection::Online);
    assert!(worker.can_take_task());
}

#[test]
fn re_registering_updates_hostname_only() {
    let mut state = MaterializedState::default();
    state.apply_event(&register_worker("w-1"));
    state.apply_event(&Event::WorkerStatusChanged {
        id: WorkerId::new("w-1"),
        status: WorkerStatus::Disabled,
    });
    state.apply_event(&Event::WorkerRegistered {
        id: WorkerId::new("w-1"),
        hostname: "render-07".to_string(),
    });

    let worker = &state.workers["w-1"];
    assert_eq!(worker.hostname, "render-07");
    assert_eq!(worker.status, WorkerStatus::Disabled);
}

#[test]
fn connection_changes_are_recorded() {
    let mut state = MaterializedState::default();
    state.apply_event(&register_worker("w-1"));
    state.apply_event(&Event::WorkerConnectionChanged {
        id: WorkerId::new("w-1"),
        connection: Connection::Offline,
    });
    assert_eq!(state.workers["w-1"].connection, Connection::Offline);
    assert!(!state.workers["w-1"].can_take_task());
}

#[test]
fn claim_binds_task_and_worker_and_activates_job() {
    let mut state = compiled_state("job-1");
    state.apply_event(&register_worker("w-1"));
    state.apply_event(&claim("job-1-a", "w-1"));

    let task = &state.tasks["job-1-a"];
    assert_eq!(task.status, TaskStatus::Claimed);
    assert_eq!(task.worker, Some(WorkerId::new("w-1")));
    assert_eq!(state.workers["w-1"].current_task, Some(TaskId::new("job-1-a")));
    assert!(!state.workers["w-1"].can_take_task());
    assert_eq!(state.jobs["job-1"].status, JobStatus::Active);
}

#[test]
fn finishing_task_frees_worker() {
    let mut state = compiled_state("job-1");
    state.apply_event(&register_worker("w-1"));
    state.apply_event(&claim("job-1-a", "w-1"));
    state.apply_event(&task_status("job-1-a", TaskStatus::Active));
    assert!(state.workers["w-1"].current_task.is_some());

    state.apply_event(&task_status("job-1-a", TaskStatus::Completed));

    assert!(state.tasks["job-1-a"].worker.is_none());
    assert!(state.workers["w-1"].current_task.is_none());
}

#[test]
fn events_for_unknown_records_are_ignored() {
    let mut state = MaterializedState::default();
    state.apply_event(&task_status("nope", TaskStatus::Active));
    state.apply_event(&claim("nope", "w-1"));
    state.apply_event(&job_status("nope", JobStatus::Queued));
    state.apply_event(&Event::WorkerStatusChanged {
        id: WorkerId::new("nope"),
        status: WorkerStatus::Disabled,
    });
    assert_eq!(state, MaterializedState::default());
}
