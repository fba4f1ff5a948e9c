//! Compiling `blender-render-progressive` jobs.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn two_chunks_merge_into_final_output() {
    let farm = farm();
    let job = farm.progressive("1,2", 2, 100, 2);

    assert_eq!(
        farm.task_names(&job),
        [
            "move-existing-output",
            "render-smpl1-50-frm1,2",
            "render-smpl51-100-frm1,2",
            "merge-to-smpl100-frm1,2",
        ]
    );

    let first = farm.task(&job, "render-smpl1-50-frm1,2");
    assert_eq!(param(&first, 0, "cycles_samples_from"), "1");
    assert_eq!(param(&first, 0, "cycles_samples_to"), "50");
    assert_eq!(param(&first, 0, "cycles_chunk"), "1");
    assert_eq!(param(&first, 0, "cycles_num_chunks"), "2");
    assert_eq!(
        param(&first, 0, "render_output"),
        "/render/shot-010/_intermediate/render-smpl1-50-frm-######"
    );

    let merge = farm.task(&job, "merge-to-smpl100-frm1,2");
    assert_eq!(merge.commands.len(), 2);
    assert_eq!(param(&merge, 0, "output"), "/render/shot-010/frame-000001");
    assert_eq!(param(&merge, 1, "output"), "/render/shot-010/frame-000002");
    assert_eq!(
        param(&merge, 1, "input1"),
        "/render/shot-010/_intermediate/render-smpl1-50-frm-000002"
    );
    assert_eq!(
        param(&merge, 1, "input2"),
        "/render/shot-010/_intermediate/render-smpl51-100-frm-000002"
    );
    assert_eq!(param(&merge, 0, "weight1"), "50");
    assert_eq!(param(&merge, 0, "weight2"), "50");
    assert_eq!(
        parent_names(&farm, &merge),
        ["render-smpl1-50-frm1,2", "render-smpl51-100-frm1,2"]
    );
}

#[test]
fn merges_chain_through_intermediate_results() {
    let farm = farm();
    let job = farm.progressive("1", 1, 90, 3);

    let second = farm.task(&job, "merge-to-smpl60-frm1");
    assert_eq!(
        parent_names(&farm, &second),
        ["render-smpl1-30-frm1", "render-smpl31-60-frm1"]
    );
    assert_eq!(
        param(&second, 0, "output"),
        "/render/shot-010/_intermediate/merge-smpl60-frm-000001"
    );

    let last = farm.task(&job, "merge-to-smpl90-frm1");
    assert_eq!(
        parent_names(&farm, &last),
        ["merge-to-smpl60-frm1", "render-smpl61-90-frm1"]
    );
    assert_eq!(
        param(&last, 0, "input1"),
        "/render/shot-010/_intermediate/merge-smpl60-frm-000001"
    );
    assert_eq!(param(&last, 0, "output"), "/render/shot-010/frame-000001");
    assert_eq!(param(&last, 0, "weight1"), "60");
    assert_eq!(param(&last, 0, "weight2"), "30");
}

#[test]
fn earlier_chunks_run_first() {
    let farm = farm();
    let job = farm.progressive("1-3", 3, 90, 3);
    let worker = farm.manager.register_worker("render-01");

    assert_eq!(
        farm.run_all(&worker),
        [
            "move-existing-output",
            "render-smpl1-30-frm1-3",
            "render-smpl31-60-frm1-3",
            "merge-to-smpl60-frm1-3",
            "render-smpl61-90-frm1-3",
            "merge-to-smpl90-frm1-3",
        ]
    );
    assert_eq!(farm.status(&job), JobStatus::Completed);
}

#[test]
fn single_chunk_renders_in_place() {
    let farm = farm();
    let job = farm.progressive("1-4", 2, 64, 1);

    assert_eq!(
        farm.task_names(&job),
        ["move-existing-output", "render-smpl1-64-frm1,2", "render-smpl1-64-frm3,4"]
    );
    let render = farm.task(&job, "render-smpl1-64-frm3,4");
    assert_eq!(param(&render, 0, "render_output"), RENDER_OUTPUT);
}

#[test]
fn chunking_with_empty_tail_is_rejected() {
    let farm = farm();
    let err = farm
        .manager
        .create_job(
            "blender-render-progressive",
            "shot",
            progressive_settings("1", 1, 10, 6),
            0,
        )
        .unwrap_err();
    assert!(err.to_string().contains("cycles_num_chunks"), "{err}");
}

#[test]
fn non_exr_output_is_rejected() {
    let farm = farm();
    let settings = progressive_settings("1", 1, 10, 2).with("format", "PNG");
    let err = farm
        .manager
        .create_job("blender-render-progressive", "shot", settings, 0)
        .unwrap_err();
    assert!(err.to_string().contains("format"), "{err}");
}
