// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn dispatchable(state: &MaterializedState) -> Vec<&str> {
    state
        .dispatchable_tasks()
        .into_iter()
        .map(|t| t.id.as_str())
        .collect()
}

#[test]
fn only_roots_are_dispatchable_at_first() {
    let state = compiled_state("job-1");
    assert_eq!(dispatchable(&state), ["job-1-a"]);
}

#[test]
fn children_become_dispatchable_when_parent_completes() {
    let mut state = compiled_state("job-1");
    state.apply_event(&task_status("job-1-a", TaskStatus::Active));
    assert!(dispatchable(&state).is_empty());

    state.apply_event(&task_status("job-1-a", TaskStatus::Completed));
    // c has the higher priority
    assert_eq!(dispatchable(&state), ["job-1-c", "job-1-b"]);
}

#[test]
fn failed_parent_blocks_children() {
    let mut state = compiled_state("job-1");
    state.apply_event(&task_status("job-1-a", TaskStatus::Failed));
    assert!(dispatchable(&state).is_empty());
}

#[test]
fn task_with_two_parents_waits_for_both() {
    let mut state = MaterializedState::default();
    state.apply_event(&job_create_event("job-1"));
    state.apply_event(&Event::JobCompiled {
        id: JobId::new("job-1"),
        tasks: vec![
            task("r1", "job-1", &[], 0),
            task("r2", "job-1", &[], 0),
            task("merge", "job-1", &["r1", "r2"], 0),
        ],
    });

    state.apply_event(&task_status("r1", TaskStatus::Completed));
    assert_eq!(dispatchable(&state), ["r2"]);

    state.apply_event(&task_status("r2", TaskStatus::Completed));
    assert_eq!(dispatchable(&state), ["merge"]);
}

#[test]
fn equal_priority_keeps_creation_order_across_jobs() {
    let mut state = compiled_state("job-1");
    add_compiled_job(&mut state, "job-2");
    assert_eq!(dispatchable(&state), ["job-1-a", "job-2-a"]);
}

#[yare::parameterized(
    under_construction = { JobStatus::UnderConstruction },
    completed          = { JobStatus::Completed },
    failed             = { JobStatus::Failed },
    canceled           = { JobStatus::Canceled },
)]
fn job_status_gates_dispatch(status: JobStatus) {
    let mut state = compiled_state("job-1");
    // Force the job status without touching tasks
    state.jobs.get_mut("job-1").unwrap().status = status;
    assert!(dispatchable(&state).is_empty());
}

#[test]
fn uncompiled_job_has_nothing_to_dispatch() {
    let mut state = MaterializedState::default();
    state.apply_event(&job_create_event("job-1"));
    assert!(state.dispatchable_tasks().is_empty());
}
