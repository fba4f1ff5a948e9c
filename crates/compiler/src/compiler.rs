// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The compiler interface and helpers shared by the concrete compilers.

use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::graph::TaskGraphBuilder;
use rf_core::{
    frame_range_merge, iter_frame_range, Command, Job, JobSettingError, JobSettings, RangeStyle,
    RenderParams, TaskId,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Known job types, keyed by their wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobType {
    BlenderRender,
    BlenderRenderProgressive,
}

impl JobType {
    pub const ALL: [JobType; 2] = [JobType::BlenderRender, JobType::BlenderRenderProgressive];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::BlenderRender => "blender-render",
            JobType::BlenderRenderProgressive => "blender-render-progressive",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CompileError::UnknownJobType(s.to_string()))
    }
}

/// Everything a compile call may read or write.
///
/// Built fresh for every compile, so nothing leaks between jobs.
pub struct CompileContext<'a> {
    pub job: &'a Job,
    pub config: &'a CompilerConfig,
    pub graph: TaskGraphBuilder<'a>,
}

/// Turns a job of one type into its task graph.
///
/// Implementations hold no per-job state; anything derived from a job lives
/// in locals of `compile` and is passed along explicitly.
pub trait JobCompiler: Send + Sync {
    fn job_type(&self) -> JobType;

    /// Settings that must be present, checked in this order.
    fn required_settings(&self) -> &'static [&'static str];

    /// Reject jobs whose settings cannot be compiled.
    ///
    /// The default checks that every required setting is present.
    fn validate(&self, settings: &JobSettings, _config: &CompilerConfig) -> Result<(), JobSettingError> {
        check_required(settings, self.required_settings())
    }

    /// Create the job's tasks in `ctx.graph`.
    fn compile(&self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError>;
}

pub(crate) fn check_required(settings: &JobSettings, required: &[&str]) -> Result<(), JobSettingError> {
    match required.iter().find(|key| !settings.is_set(key)) {
        Some(key) => Err(JobSettingError::missing(key)),
        None => Ok(()),
    }
}

/// Render settings read from a job, validated once.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RenderJob {
    pub blender_cmd: String,
    pub filepath: String,
    pub format: String,
    pub render_output: PathBuf,
    pub frame_groups: Vec<Vec<u32>>,
}

impl RenderJob {
    pub fn from_settings(settings: &JobSettings) -> Result<Self, JobSettingError> {
        let chunk_size = settings.int_at_least("chunk_size", 1)?;
        let frames = settings.frames("frames")?;
        let frame_groups = iter_frame_range(&frames, chunk_size)
            .map_err(|e| JobSettingError::new("frames", e.to_string()))?;

        let render_output = PathBuf::from(settings.str("render_output")?);
        let has_dir = render_output
            .parent()
            .is_some_and(|dir| !dir.as_os_str().is_empty());
        if render_output.file_name().is_none() || !has_dir {
            return Err(JobSettingError::new(
                "render_output",
                "must name a file inside a directory",
            ));
        }

        Ok(Self {
            blender_cmd: settings.str("blender_cmd")?,
            filepath: settings.str("filepath")?,
            format: settings.str("format")?,
            render_output,
            frame_groups,
        })
    }

    /// Directory holding the render output.
    pub fn output_dir(&self) -> &Path {
        self.render_output.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Render parameters for one frame group, writing to `output`.
    pub fn params<'a>(&'a self, output: &'a Path, frames: &'a str) -> RenderParams<'a> {
        RenderParams {
            blender_cmd: &self.blender_cmd,
            filepath: &self.filepath,
            format: &self.format,
            render_output: output,
            frames,
        }
    }
}

/// Frame group as shown in task names (`1-3,5`).
pub(crate) fn display_frames(frames: &[u32]) -> String {
    frame_range_merge(frames, RangeStyle::Display)
}

/// Frame group as passed to the renderer (`1..3,5`).
pub(crate) fn blender_frames(frames: &[u32]) -> String {
    frame_range_merge(frames, RangeStyle::Blender)
}

/// First task of every render job: move previous output out of the way.
pub(crate) fn relocation_task(
    ctx: &mut CompileContext<'_>,
    render: &RenderJob,
) -> Result<TaskId, CompileError> {
    let id = ctx.graph.create_task(
        "move-existing-output",
        vec![Command::move_out_of_way(render.output_dir())],
        &[],
        ctx.job.priority,
    )?;
    Ok(id)
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
