// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain frame-chunked render: one task per frame group.

use crate::compiler::{
    blender_frames, check_required, display_frames, relocation_task, CompileContext, JobCompiler,
    JobType, RenderJob,
};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::graph::{Parents, TaskSpec};
use rf_core::{Command, JobSettingError, JobSettings};

const REQUIRED_SETTINGS: &[&str] = &[
    "blender_cmd",
    "filepath",
    "render_output",
    "frames",
    "chunk_size",
    "format",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BlenderRender;

impl JobCompiler for BlenderRender {
    fn job_type(&self) -> JobType {
        JobType::BlenderRender
    }

    fn required_settings(&self) -> &'static [&'static str] {
        REQUIRED_SETTINGS
    }

    fn validate(&self, settings: &JobSettings, _config: &CompilerConfig) -> Result<(), JobSettingError> {
        check_required(settings, REQUIRED_SETTINGS)?;
        RenderJob::from_settings(settings)?;
        Ok(())
    }

    fn compile(&self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        let render = RenderJob::from_settings(&ctx.job.settings)?;
        let relocation = relocation_task(ctx, &render)?;

        let specs = render
            .frame_groups
            .iter()
            .map(|group| {
                let frames = blender_frames(group);
                let command = Command::blender_render(&render.params(&render.render_output, &frames));
                TaskSpec::new(
                    format!("render-{}", display_frames(group)),
                    vec![command],
                    ctx.job.priority,
                )
            })
            .collect();
        ctx.graph.create_batch(specs, Parents::One(relocation))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "blender_render_tests.rs"]
mod tests;
