// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn cancel_with_nothing_running_cancels_job_immediately() {
    let mut state = compiled_state("job-1");
    state.apply_event(&job_status("job-1", JobStatus::CancelRequested));

    assert!(state
        .tasks
        .values()
        .all(|t| t.status == TaskStatus::Canceled));
    assert_eq!(state.jobs["job-1"].status, JobStatus::Canceled);
}

#[test]
fn cancel_asks_running_tasks_to_stop() {
    let mut state = compiled_state("job-1");
    state.apply_event(&task_status("job-1-a", TaskStatus::Completed));
    state.apply_event(&task_status("job-1-b", TaskStatus::Active));

    state.apply_event(&job_status("job-1", JobStatus::CancelRequested));

    assert_eq!(state.tasks["job-1-a"].status, TaskStatus::Completed);
    assert_eq!(state.tasks["job-1-b"].status, TaskStatus::CancelRequested);
    assert_eq!(state.tasks["job-1-c"].status, TaskStatus::Canceled);
    assert_eq!(state.jobs["job-1"].status, JobStatus::CancelRequested);
    assert!(state
        .tasks
        .values()
        .all(|t| t.status != TaskStatus::Queued));

    // Worker-side agent stops the task
    state.apply_event(&task_status("job-1-b", TaskStatus::Canceled));
    assert_eq!(state.jobs["job-1"].status, JobStatus::Canceled);
}

#[test]
fn cancel_releases_claimed_task_worker() {
    let mut state = compiled_state("job-1");
    state.apply_event(&register_worker("w-1"));
    state.apply_event(&claim("job-1-a", "w-1"));
    assert_eq!(state.workers["w-1"].current_task, Some(TaskId::new("job-1-a")));

    state.apply_event(&job_status("job-1", JobStatus::CancelRequested));

    let task = &state.tasks["job-1-a"];
    assert_eq!(task.status, TaskStatus::Canceled);
    assert!(task.worker.is_none());
    assert!(state.workers["w-1"].current_task.is_none());
    assert_eq!(state.jobs["job-1"].status, JobStatus::Canceled);
}

#[test]
fn cancel_does_not_touch_other_jobs() {
    let mut state = compiled_state("job-1");
    add_compiled_job(&mut state, "job-2");

    state.apply_event(&job_status("job-1", JobStatus::CancelRequested));

    assert!(state
        .tasks_for_job(&JobId::new("job-2"))
        .all(|t| t.status == TaskStatus::Queued));
    assert_eq!(state.jobs["job-2"].status, JobStatus::Queued);
}

#[test]
fn requeue_failed_job_keeps_completed_tasks() {
    let mut state = compiled_state("job-1");
    state.apply_event(&task_status("job-1-a", TaskStatus::Completed));
    state.apply_event(&task_status("job-1-b", TaskStatus::Failed));
    assert_eq!(state.jobs["job-1"].status, JobStatus::Failed);

    state.apply_event(&job_status("job-1", JobStatus::Queued));

    assert_eq!(state.jobs["job-1"].status, JobStatus::Queued);
    assert_eq!(state.tasks["job-1-a"].status, TaskStatus::Completed);
    assert_eq!(state.tasks["job-1-b"].status, TaskStatus::Queued);
    assert_eq!(state.tasks["job-1-c"].status, TaskStatus::Queued);
}

#[test]
fn requeue_completed_job_reruns_everything() {
    let mut state = compiled_state("job-1");
    for id in ["job-1-a", "job-1-b", "job-1-c"] {
        state.apply_event(&task_status(id, TaskStatus::Completed));
    }
    assert_eq!(state.jobs["job-1"].status, JobStatus::Completed);

    state.apply_event(&job_status("job-1", JobStatus::Queued));

    assert!(state
        .tasks
        .values()
        .all(|t| t.status == TaskStatus::Queued));
    assert_eq!(state.jobs["job-1"].status, JobStatus::Queued);
}

#[test]
fn requeue_canceled_job() {
    let mut state = compiled_state("job-1");
    state.apply_event(&job_status("job-1", JobStatus::CancelRequested));
    assert_eq!(state.jobs["job-1"].status, JobStatus::Canceled);

    state.apply_event(&job_status("job-1", JobStatus::Queued));
    assert!(state
        .tasks
        .values()
        .all(|t| t.status == TaskStatus::Queued));
}
