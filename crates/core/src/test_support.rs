// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Job, JobSettings};

pub const RENDER_OUTPUT: &str = "/render/shot-010/frame-######";

/// Settings for a plain `blender-render` job.
pub fn render_settings(frames: &str, chunk_size: i64) -> JobSettings {
    JobSettings::new()
        .with("blender_cmd", "{blender}")
        .with("filepath", "/shots/010/scene.blend")
        .with("render_output", RENDER_OUTPUT)
        .with("frames", frames)
        .with("chunk_size", chunk_size)
        .with("format", "PNG")
}

/// Settings for a `blender-render-progressive` job.
pub fn progressive_settings(
    frames: &str,
    chunk_size: i64,
    sample_count: i64,
    num_chunks: i64,
) -> JobSettings {
    render_settings(frames, chunk_size)
        .with("format", "EXR")
        .with("cycles_sample_count", sample_count)
        .with("cycles_num_chunks", num_chunks)
}

pub fn progressive_job(id: &str, settings: JobSettings) -> Job {
    Job::builder()
        .id(id)
        .job_type("blender-render-progressive")
        .settings(settings)
        .build()
}

pub fn render_job(id: &str, settings: JobSettings) -> Job {
    Job::builder()
        .id(id)
        .job_type("blender-render")
        .settings(settings)
        .build()
}
