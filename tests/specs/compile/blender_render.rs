//! Compiling plain `blender-render` jobs.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn frames_are_split_into_chunked_render_tasks() {
    let farm = farm();
    let job = farm.render("1-10", 4);

    assert_eq!(
        farm.task_names(&job),
        ["move-existing-output", "render-1-4", "render-5-8", "render-9,10"]
    );
    assert_eq!(farm.status(&job), JobStatus::Queued);
}

#[test]
fn render_commands_carry_job_settings() {
    let farm = farm();
    let job = farm.render("1-10", 4);

    let render = farm.task(&job, "render-1-4");
    assert_eq!(render.commands.len(), 1);
    assert_eq!(render.commands[0].name(), "blender_render");
    assert_eq!(param(&render, 0, "frames"), "1..4");
    assert_eq!(param(&render, 0, "render_output"), RENDER_OUTPUT);
    assert_eq!(param(&render, 0, "format"), "PNG");
    assert_eq!(param(&render, 0, "filepath"), "/shots/010/scene.blend");
}

#[test]
fn relocation_moves_output_directory_first() {
    let farm = farm();
    let job = farm.render("1-3", 1);

    let relocation = farm.task(&job, "move-existing-output");
    assert!(relocation.parents.is_empty());
    assert_eq!(relocation.commands[0].name(), "move_out_of_way");
    assert_eq!(param(&relocation, 0, "src"), "/render/shot-010");

    for task in farm.tasks(&job).iter().filter(|t| t.name.starts_with("render-")) {
        assert_eq!(parent_names(&farm, task), ["move-existing-output"]);
        assert_eq!(task.priority, 50);
    }
}

#[test]
fn worker_runs_relocation_before_renders() {
    let farm = farm();
    let job = farm.render("1-3", 2);
    let worker = farm.manager.register_worker("render-01");

    assert_eq!(
        farm.run_all(&worker),
        ["move-existing-output", "render-1,2", "render-3"]
    );
    assert_eq!(farm.status(&job), JobStatus::Completed);
}

#[test]
fn invalid_settings_leave_job_under_construction() {
    let farm = farm();
    let settings = render_settings("10-1", 1);
    let job = farm.manager.submit_job("blender-render", "backwards", settings, 0);

    let err = farm.manager.compile(&job).unwrap_err();
    assert!(matches!(err, ManagerError::Compile(_)), "{err}");

    let record = farm.manager.job(job.as_str()).unwrap();
    assert_eq!(record.status, JobStatus::UnderConstruction);
    assert!(record.error.is_some());
    assert!(farm.tasks(&job).is_empty());
}

#[test]
fn missing_setting_is_named_in_error() {
    let farm = farm();
    let settings = JobSettings::new()
        .with("blender_cmd", "{blender}")
        .with("filepath", "/shots/010/scene.blend")
        .with("frames", "1-3")
        .with("chunk_size", 1_i64)
        .with("format", "PNG");

    let err = farm
        .manager
        .create_job("blender-render", "no-output", settings, 0)
        .unwrap_err();
    assert!(err.to_string().contains("render_output"), "{err}");
}
