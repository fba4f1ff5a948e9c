// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands carried by tasks.
//!
//! A command is a named record of parameters that a worker knows how to
//! execute. The named constructors are the only way compilers build them,
//! which keeps parameter names consistent across job types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single command parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CommandParam {
    Int(i64),
    Float(f64),
    Str(String),
    Path(PathBuf),
}

impl fmt::Display for CommandParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandParam::Int(n) => write!(f, "{}", n),
            CommandParam::Float(x) => write!(f, "{}", x),
            CommandParam::Str(s) => f.write_str(s),
            CommandParam::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

impl From<i64> for CommandParam {
    fn from(n: i64) -> Self {
        CommandParam::Int(n)
    }
}

impl From<u32> for CommandParam {
    fn from(n: u32) -> Self {
        CommandParam::Int(i64::from(n))
    }
}

impl From<f64> for CommandParam {
    fn from(x: f64) -> Self {
        CommandParam::Float(x)
    }
}

impl From<&str> for CommandParam {
    fn from(s: &str) -> Self {
        CommandParam::Str(s.to_string())
    }
}

impl From<String> for CommandParam {
    fn from(s: String) -> Self {
        CommandParam::Str(s)
    }
}

impl From<PathBuf> for CommandParam {
    fn from(p: PathBuf) -> Self {
        CommandParam::Path(p)
    }
}

impl From<&Path> for CommandParam {
    fn from(p: &Path) -> Self {
        CommandParam::Path(p.to_path_buf())
    }
}

/// A named, parameter-bearing unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    name: String,
    settings: IndexMap<String, CommandParam>,
}

/// Sample sub-range of a progressive render pass, 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleChunk {
    pub num_chunks: u32,
    /// 1-based chunk number
    pub chunk: u32,
    pub samples_from: u64,
    pub samples_to: u64,
}

/// Settings shared by every render command.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams<'a> {
    pub blender_cmd: &'a str,
    pub filepath: &'a str,
    pub format: &'a str,
    pub render_output: &'a Path,
    /// Frames in renderer notation (`1..3,5`)
    pub frames: &'a str,
}

impl Command {
    fn build(name: &str, params: impl IntoIterator<Item = (&'static str, CommandParam)>) -> Self {
        Self {
            name: name.to_string(),
            settings: params
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Move whatever exists at `src` aside so a re-run starts clean.
    pub fn move_out_of_way(src: &Path) -> Self {
        Self::build("move_out_of_way", [("src", src.into())])
    }

    pub fn blender_render(render: &RenderParams<'_>) -> Self {
        Self::build("blender_render", render_settings(render))
    }

    /// Render one sample chunk of a progressive render.
    pub fn blender_render_progressive(render: &RenderParams<'_>, chunk: SampleChunk) -> Self {
        let mut params = render_settings(render);
        params.extend([
            ("cycles_num_chunks", chunk.num_chunks.into()),
            ("cycles_chunk", chunk.chunk.into()),
            ("cycles_samples_from", sample_param(chunk.samples_from)),
            ("cycles_samples_to", sample_param(chunk.samples_to)),
        ]);
        Self::build("blender_render_progressive", params)
    }

    /// Sample-weighted average of two partial renders of one frame.
    pub fn merge_progressive_renders(
        input1: PathBuf,
        input2: PathBuf,
        output: PathBuf,
        weight1: u64,
        weight2: u64,
    ) -> Self {
        Self::build(
            "merge_progressive_renders",
            [
                ("input1", input1.into()),
                ("input2", input2.into()),
                ("output", output.into()),
                ("weight1", sample_param(weight1)),
                ("weight2", sample_param(weight2)),
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &IndexMap<String, CommandParam> {
        &self.settings
    }

    pub fn get(&self, key: &str) -> Option<&CommandParam> {
        self.settings.get(key)
    }
}

fn render_settings(render: &RenderParams<'_>) -> Vec<(&'static str, CommandParam)> {
    vec![
        ("blender_cmd", render.blender_cmd.into()),
        ("filepath", render.filepath.into()),
        ("format", render.format.into()),
        ("render_output", render.render_output.into()),
        ("frames", render.frames.into()),
    ]
}

fn sample_param(n: u64) -> CommandParam {
    CommandParam::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
