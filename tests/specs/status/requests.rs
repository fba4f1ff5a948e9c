//! Status changes requested by clients.

use crate::prelude::*;

#[test]
fn cancel_cascades_to_tasks() {
    let farm = farm();
    let job = farm.render("1-3", 1);
    let worker = farm.manager.register_worker("render-01");
    let running = farm.manager.claim_task(&worker).unwrap().unwrap();
    farm.manager.update_task_status(&running.id, TaskStatus::Active).unwrap();

    farm.manager
        .web_set_job_status(&job, JobStatus::CancelRequested, "alice")
        .unwrap();

    assert_eq!(farm.status(&job), JobStatus::CancelRequested);
    for task in farm.tasks(&job) {
        let expected = if task.id == running.id {
            TaskStatus::CancelRequested
        } else {
            TaskStatus::Canceled
        };
        assert_eq!(task.status, expected, "{}", task.name);
    }

    farm.manager.update_task_status(&running.id, TaskStatus::Canceled).unwrap();
    assert_eq!(farm.status(&job), JobStatus::Canceled);
}

#[test]
fn canceled_job_can_be_requeued() {
    let farm = farm();
    let job = farm.render("1-2", 1);
    farm.manager
        .web_set_job_status(&job, JobStatus::CancelRequested, "alice")
        .unwrap();
    assert_eq!(farm.status(&job), JobStatus::Canceled);

    farm.manager.web_set_job_status(&job, JobStatus::Queued, "alice").unwrap();
    assert_eq!(farm.status(&job), JobStatus::Queued);

    let worker = farm.manager.register_worker("render-01");
    assert_eq!(farm.run_all(&worker).len(), 3);
    assert_eq!(farm.status(&job), JobStatus::Completed);
}

#[test]
fn completed_job_cannot_be_canceled() {
    let farm = farm();
    let job = farm.render("1", 1);
    let worker = farm.manager.register_worker("render-01");
    farm.run_all(&worker);

    let err = farm
        .manager
        .web_set_job_status(&job, JobStatus::CancelRequested, "alice")
        .unwrap_err();
    assert!(matches!(err, ManagerError::Transition(_)), "{err}");
    assert_eq!(farm.status(&job), JobStatus::Completed);
}

#[test]
fn only_queue_and_cancel_may_be_requested() {
    let farm = farm();
    let job = farm.render("1", 1);

    for requested in [
        JobStatus::Active,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Canceled,
        JobStatus::UnderConstruction,
    ] {
        let err = farm
            .manager
            .web_set_job_status(&job, requested, "alice")
            .unwrap_err();
        assert!(matches!(err, ManagerError::Transition(_)), "{requested}: {err}");
    }
    assert_eq!(farm.status(&job), JobStatus::Queued);
}

#[test]
fn job_under_construction_cannot_be_canceled() {
    let farm = farm();
    let job = farm
        .manager
        .submit_job("blender-render", "pending", render_settings("1", 1), 0);

    assert!(farm
        .manager
        .web_set_job_status(&job, JobStatus::CancelRequested, "alice")
        .is_err());
    assert_eq!(farm.status(&job), JobStatus::UnderConstruction);
}
