//! Persisting and resuming manager state.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn resumed_manager_continues_where_it_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let farm = farm();
    let job = farm.progressive("1-2", 1, 10, 2);
    let worker = farm.manager.register_worker("render-01");
    farm.run_next(&worker, TaskStatus::Completed).unwrap();
    farm.manager.save_snapshot(&path).unwrap();

    let resumed = JobManager::open(&path, CompilerConfig::default()).unwrap();
    assert_eq!(resumed.job(job.as_str()), farm.manager.job(job.as_str()));
    assert_eq!(resumed.tasks_for_job(&job), farm.tasks(&job));

    let mut remaining = 0;
    while let Some(task) = resumed.claim_task(&worker).unwrap() {
        resumed.update_task_status(&task.id, TaskStatus::Active).unwrap();
        resumed.update_task_status(&task.id, TaskStatus::Completed).unwrap();
        remaining += 1;
    }
    assert_eq!(remaining, 6);
    assert_eq!(resumed.job(job.as_str()).unwrap().status, JobStatus::Completed);
}

#[test]
fn corrupt_snapshot_starts_fresh_and_keeps_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, "{ not json").unwrap();

    let manager = JobManager::open(&path, CompilerConfig::default()).unwrap();
    assert!(manager.jobs().is_empty());
    assert!(dir.path().join("snapshot.bak").exists());
}
