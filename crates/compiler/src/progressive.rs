// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progressive render: sample chunks merged into ever finer output.
//!
//! The total sample count is split into `N` chunks. Every chunk renders each
//! frame group into an intermediate directory next to the render output.
//! From the second chunk on, one merge task per frame group blends the
//! running result with the new chunk, weighted by sample counts. The last
//! merge writes to the real render output.
//!
//! ```text
//! move-existing-output
//!   ├─ render chunk 1 ─┐
//!   ├─ render chunk 2 ─┴─ merge 2 ─┐
//!   └─ render chunk 3 ─────────────┴─ merge 3 -> render_output
//! ```
//!
//! Each chunk gets a lower priority than the one before, so coarse previews
//! are dispatched before refinements.

use crate::compiler::{
    blender_frames, check_required, display_frames, relocation_task, CompileContext, JobCompiler,
    JobType, RenderJob,
};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::graph::{Parents, TaskSpec};
use rf_core::{frame_path, Command, JobSettingError, JobSettings, SampleChunk, TaskId};
use std::path::{Path, PathBuf};

const REQUIRED_SETTINGS: &[&str] = &[
    "blender_cmd",
    "filepath",
    "render_output",
    "frames",
    "chunk_size",
    "format",
    "cycles_sample_count",
    "cycles_num_chunks",
];

/// How a sample count is divided into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSplit {
    pub sample_count: u64,
    pub num_chunks: u32,
    /// `ceil(sample_count / num_chunks)`
    pub per_chunk: u64,
}

impl SampleSplit {
    /// Split `sample_count` samples into `num_chunks` non-empty chunks.
    pub fn new(sample_count: i64, num_chunks: i64) -> Result<Self, JobSettingError> {
        let samples = u64::try_from(sample_count)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                JobSettingError::new("cycles_sample_count", format!("must be at least 1, got {sample_count}"))
            })?;
        let chunks = u32::try_from(num_chunks)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                JobSettingError::new("cycles_num_chunks", format!("must be at least 1, got {num_chunks}"))
            })?;

        let per_chunk = samples.div_ceil(u64::from(chunks));
        if u64::from(chunks - 1) * per_chunk >= samples {
            return Err(JobSettingError::new(
                "cycles_num_chunks",
                format!("{chunks} chunks of {per_chunk} samples leave the last chunk of {samples} samples empty"),
            ));
        }
        Ok(Self {
            sample_count: samples,
            num_chunks: chunks,
            per_chunk,
        })
    }

    pub fn from_settings(settings: &JobSettings) -> Result<Self, JobSettingError> {
        Self::new(
            settings.int("cycles_sample_count")?,
            settings.int("cycles_num_chunks")?,
        )
    }

    /// Sample range of 0-based chunk `index`, in 1-based renderer numbering.
    pub fn chunk(&self, index: u32) -> SampleChunk {
        let from = u64::from(index) * self.per_chunk;
        let to = (from + self.per_chunk).min(self.sample_count);
        SampleChunk {
            num_chunks: self.num_chunks,
            chunk: index + 1,
            samples_from: from + 1,
            samples_to: to,
        }
    }

    pub fn chunks(&self) -> impl Iterator<Item = SampleChunk> + '_ {
        (0..self.num_chunks).map(|i| self.chunk(i))
    }
}

/// Priority of chunk `index`'s render tasks; its merges get one less.
pub fn chunk_priority(base: i32, step: i32, index: u32) -> i32 {
    let p = i64::from(base) - i64::from(step) * i64::from(index);
    p.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Reject job priorities whose last merge would fall below `i32::MIN`.
///
/// Clamping there would flatten chunks and merges onto one priority.
pub fn check_priority_range(base: i32, step: i32, num_chunks: u32) -> Result<(), JobSettingError> {
    let lowest = i64::from(base)
        - i64::from(step) * i64::from(num_chunks.saturating_sub(1))
        - i64::from(num_chunks > 1);
    if lowest < i64::from(i32::MIN) {
        return Err(JobSettingError::new(
            "priority",
            format!("{base} is too low to order {num_chunks} chunks {step} apart"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlenderRenderProgressive;

impl JobCompiler for BlenderRenderProgressive {
    fn job_type(&self) -> JobType {
        JobType::BlenderRenderProgressive
    }

    fn required_settings(&self) -> &'static [&'static str] {
        REQUIRED_SETTINGS
    }

    fn validate(&self, settings: &JobSettings, config: &CompilerConfig) -> Result<(), JobSettingError> {
        check_required(settings, REQUIRED_SETTINGS)?;
        let render = RenderJob::from_settings(settings)?;
        if !render.format.eq_ignore_ascii_case(&config.progressive_format) {
            return Err(JobSettingError::new(
                "format",
                format!(
                    "progressive renders must use format {:?}, not {:?}",
                    config.progressive_format, render.format
                ),
            ));
        }
        SampleSplit::from_settings(settings)?;
        Ok(())
    }

    fn compile(&self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        let render = RenderJob::from_settings(&ctx.job.settings)?;
        let split = SampleSplit::from_settings(&ctx.job.settings)?;
        check_priority_range(ctx.job.priority, ctx.config.priority_step, split.num_chunks)?;
        let intermediate = render
            .render_output
            .with_file_name(&ctx.config.intermediate_dir);
        let pass = Pass {
            render: &render,
            intermediate: &intermediate,
            split,
            base_priority: ctx.job.priority,
            priority_step: ctx.config.priority_step,
        };

        tracing::info!(
            job_id = %ctx.job.id,
            chunks = split.num_chunks,
            samples_per_chunk = split.per_chunk,
            frame_groups = render.frame_groups.len(),
            "compiling progressive render"
        );

        let relocation = relocation_task(ctx, &render)?;

        // Running result per frame group: task ids and their output template
        let mut acc_tasks: Vec<TaskId> = Vec::new();
        let mut acc_output = PathBuf::new();
        for chunk in split.chunks() {
            let index = chunk.chunk - 1;
            let rendered = pass.render_chunk(ctx, chunk, &relocation)?;
            if index == 0 {
                acc_tasks = rendered.tasks;
                acc_output = rendered.output;
                continue;
            }
            let merged = pass.merge_chunk(ctx, chunk, (&acc_tasks, &acc_output), &rendered)?;
            acc_tasks = merged.tasks;
            acc_output = merged.output;
        }
        Ok(())
    }
}

/// Values derived from one job, threaded through chunk construction.
struct Pass<'a> {
    render: &'a RenderJob,
    intermediate: &'a Path,
    split: SampleSplit,
    base_priority: i32,
    priority_step: i32,
}

/// Tasks of one stage, one per frame group, and the path template they write.
struct Stage {
    tasks: Vec<TaskId>,
    output: PathBuf,
}

impl Pass<'_> {
    fn is_last(&self, chunk: SampleChunk) -> bool {
        chunk.chunk == self.split.num_chunks
    }

    fn render_chunk(
        &self,
        ctx: &mut CompileContext<'_>,
        chunk: SampleChunk,
        relocation: &TaskId,
    ) -> Result<Stage, CompileError> {
        let (from, to) = (chunk.samples_from, chunk.samples_to);
        // A single chunk has nothing to merge with and renders in place
        let output = if self.split.num_chunks == 1 {
            self.render.render_output.clone()
        } else {
            self.intermediate
                .join(format!("render-smpl{from}-{to}-frm-######"))
        };
        let priority = chunk_priority(self.base_priority, self.priority_step, chunk.chunk - 1);

        let specs = self
            .render
            .frame_groups
            .iter()
            .map(|group| {
                let frames = blender_frames(group);
                let command = Command::blender_render_progressive(
                    &self.render.params(&output, &frames),
                    chunk,
                );
                TaskSpec::new(
                    format!("render-smpl{from}-{to}-frm{}", display_frames(group)),
                    vec![command],
                    priority,
                )
            })
            .collect();
        let tasks = ctx
            .graph
            .create_batch(specs, Parents::One(relocation.clone()))?;
        tracing::debug!(
            job_id = %ctx.job.id,
            chunk = chunk.chunk,
            samples_from = from,
            samples_to = to,
            tasks = tasks.len(),
            "created render tasks"
        );
        Ok(Stage { tasks, output })
    }

    fn merge_chunk(
        &self,
        ctx: &mut CompileContext<'_>,
        chunk: SampleChunk,
        (acc_tasks, acc_output): (&[TaskId], &Path),
        rendered: &Stage,
    ) -> Result<Stage, CompileError> {
        let to = chunk.samples_to;
        let output = if self.is_last(chunk) {
            self.render.render_output.clone()
        } else {
            self.intermediate.join(format!("merge-smpl{to}-frm-######"))
        };
        let weight1 = chunk.samples_from - 1;
        let weight2 = chunk.samples_to - chunk.samples_from + 1;
        let priority =
            chunk_priority(self.base_priority, self.priority_step, chunk.chunk - 1).saturating_sub(1);

        let mut tasks = Vec::with_capacity(self.render.frame_groups.len());
        for (g, group) in self.render.frame_groups.iter().enumerate() {
            let commands = group
                .iter()
                .map(|&frame| {
                    Command::merge_progressive_renders(
                        fill(acc_output, frame),
                        fill(&rendered.output, frame),
                        fill(&output, frame),
                        weight1,
                        weight2,
                    )
                })
                .collect();
            let parents = [acc_tasks[g].clone(), rendered.tasks[g].clone()];
            let id = ctx.graph.create_task(
                format!("merge-to-smpl{to}-frm{}", display_frames(group)),
                commands,
                &parents,
                priority,
            )?;
            tasks.push(id);
        }
        tracing::debug!(
            job_id = %ctx.job.id,
            chunk = chunk.chunk,
            weight1,
            weight2,
            tasks = tasks.len(),
            "created merge tasks"
        );
        Ok(Stage { tasks, output })
    }
}

fn fill(template: &Path, frame: u32) -> PathBuf {
    PathBuf::from(frame_path(&template.to_string_lossy(), frame))
}

#[cfg(test)]
#[path = "progressive_tests.rs"]
mod tests;
