// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rf-compiler: turns render jobs into task graphs

mod blender_render;
mod compiler;
pub mod config;
mod error;
pub mod graph;
mod progressive;
mod registry;

pub use blender_render::BlenderRender;
pub use compiler::{CompileContext, JobCompiler, JobType};
pub use config::{CompilerConfig, ConfigError};
pub use error::{CompileError, GraphError};
pub use graph::{verify_tasks, Parents, TaskGraph, TaskGraphBuilder, TaskSpec};
pub use progressive::{check_priority_range, chunk_priority, BlenderRenderProgressive, SampleSplit};
pub use registry::CompilerRegistry;
pub use rf_core::JobSettingError;
