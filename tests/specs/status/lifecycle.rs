//! Job status follows the statuses of its tasks.

use crate::prelude::*;

#[test]
fn job_moves_from_queued_through_active_to_completed() {
    let farm = farm();
    let job = farm.render("1-2", 1);
    let worker = farm.manager.register_worker("render-01");
    assert_eq!(farm.status(&job), JobStatus::Queued);

    farm.run_next(&worker, TaskStatus::Completed).unwrap();
    assert_eq!(farm.status(&job), JobStatus::Active);

    farm.run_all(&worker);
    assert_eq!(farm.status(&job), JobStatus::Completed);
}

#[test]
fn failed_task_fails_job_and_stops_dispatch() {
    let farm = farm();
    let job = farm.render("1-3", 1);
    let worker = farm.manager.register_worker("render-01");

    farm.run_next(&worker, TaskStatus::Completed).unwrap();
    farm.run_next(&worker, TaskStatus::Failed).unwrap();

    assert_eq!(farm.status(&job), JobStatus::Failed);
    assert!(farm.manager.dispatchable_tasks().is_empty());
    assert!(farm.manager.claim_task(&worker).unwrap().is_none());
}

#[test]
fn jobs_do_not_share_tasks() {
    let farm = farm();
    let a = farm.render("1-2", 1);
    let b = farm.progressive("1-2", 1, 10, 2);
    let worker = farm.manager.register_worker("render-01");

    farm.run_all(&worker);

    assert_eq!(farm.status(&a), JobStatus::Completed);
    assert_eq!(farm.status(&b), JobStatus::Completed);
    for job in [&a, &b] {
        for task in farm.tasks(job) {
            for parent in &task.parents {
                assert_eq!(&farm.manager.task(parent.as_str()).unwrap().job_id, job);
            }
        }
    }
}

#[test]
fn worker_is_freed_when_its_task_ends() {
    let farm = farm();
    farm.render("1", 1);
    let worker = farm.manager.register_worker("render-01");

    let task = farm.manager.claim_task(&worker).unwrap().unwrap();
    let record = farm.manager.worker(worker.as_str()).unwrap();
    assert_eq!(record.current_task.as_ref(), Some(&task.id));

    farm.manager.update_task_status(&task.id, TaskStatus::Active).unwrap();
    farm.manager.update_task_status(&task.id, TaskStatus::Failed).unwrap();
    let record = farm.manager.worker(worker.as_str()).unwrap();
    assert!(record.current_task.is_none());
}
