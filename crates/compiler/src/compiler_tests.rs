// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rf_core::test_support::{render_settings, RENDER_OUTPUT};

#[yare::parameterized(
    render      = { "blender-render", JobType::BlenderRender },
    progressive = { "blender-render-progressive", JobType::BlenderRenderProgressive },
)]
fn job_type_round_trips_wire_tag(tag: &str, expected: JobType) {
    let parsed: JobType = tag.parse().unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(parsed.to_string(), tag);
}

#[test]
fn unknown_job_type_tag() {
    let err = "blender-bake".parse::<JobType>().unwrap_err();
    assert_eq!(err, CompileError::UnknownJobType("blender-bake".to_string()));
}

#[test]
fn check_required_reports_first_missing() {
    let settings = JobSettings::new().with("a", 1);
    let err = check_required(&settings, &["a", "b", "c"]).unwrap_err();
    assert_eq!(err.setting, "b");
    assert!(check_required(&settings, &["a"]).is_ok());
}

#[test]
fn render_job_reads_settings() {
    let render = RenderJob::from_settings(&render_settings("1-5", 2)).unwrap();
    assert_eq!(render.render_output, PathBuf::from(RENDER_OUTPUT));
    assert_eq!(render.output_dir(), Path::new("/render/shot-010"));
    assert_eq!(render.frame_groups, vec![vec![1, 2], vec![3, 4], vec![5]]);
    assert_eq!(render.format, "PNG");
}

#[yare::parameterized(
    zero_chunk   = { render_settings("1-5", 0), "chunk_size" },
    bad_frames   = { render_settings("1-x", 2), "frames" },
    empty_frames = { render_settings("", 2), "frames" },
    no_file_name = { render_settings("1", 1).with("render_output", "/"), "render_output" },
    no_dir       = { render_settings("1", 1).with("render_output", "frame-####.exr"), "render_output" },
)]
fn render_job_rejects(settings: JobSettings, setting: &str) {
    let err = RenderJob::from_settings(&settings).unwrap_err();
    assert_eq!(err.setting, setting);
}

#[test]
fn frame_formatting() {
    assert_eq!(display_frames(&[1, 2, 3, 5]), "1-3,5");
    assert_eq!(blender_frames(&[1, 2, 3, 5]), "1..3,5");
}
