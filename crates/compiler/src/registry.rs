// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job type to compiler lookup, and the compile entry point.

use crate::blender_render::BlenderRender;
use crate::compiler::{CompileContext, JobCompiler, JobType};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::graph::{TaskGraph, TaskGraphBuilder};
use crate::progressive::BlenderRenderProgressive;
use rf_core::{IdGen, Job};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Compilers by job type.
///
/// Compilers are stateless, so one registry can serve concurrent compiles.
#[derive(Clone, Default)]
pub struct CompilerRegistry {
    compilers: BTreeMap<JobType, Arc<dyn JobCompiler>>,
}

impl CompilerRegistry {
    /// An empty registry; every compile fails with `UnknownJobType`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in compiler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(BlenderRender);
        registry.register(BlenderRenderProgressive);
        registry
    }

    /// Register a compiler under its job type, replacing any previous one.
    pub fn register(&mut self, compiler: impl JobCompiler + 'static) {
        self.compilers.insert(compiler.job_type(), Arc::new(compiler));
    }

    pub fn get(&self, job_type: &str) -> Result<&dyn JobCompiler, CompileError> {
        let parsed: JobType = job_type.parse()?;
        self.compilers
            .get(&parsed)
            .map(|c| c.as_ref())
            .ok_or_else(|| CompileError::UnknownJobType(job_type.to_string()))
    }

    pub fn job_types(&self) -> impl Iterator<Item = JobType> + '_ {
        self.compilers.keys().copied()
    }

    /// Validate `job` and build its complete task graph.
    ///
    /// Nothing is stored here: the caller commits the returned graph, so a
    /// failed compile leaves no tasks behind.
    pub fn compile(
        &self,
        job: &Job,
        ids: &dyn IdGen,
        config: &CompilerConfig,
    ) -> Result<TaskGraph, CompileError> {
        let compiler = self.get(&job.job_type)?;
        config
            .validate()
            .map_err(|e| CompileError::Config(e.to_string()))?;
        compiler.validate(&job.settings, config)?;

        let mut ctx = CompileContext {
            job,
            config,
            graph: TaskGraphBuilder::new(job.id.clone(), ids),
        };
        compiler.compile(&mut ctx)?;
        let graph = ctx.graph.finish()?;

        tracing::debug!(
            job_id = %job.id,
            job_type = %job.job_type,
            tasks = graph.len(),
            "compiled task graph"
        );
        Ok(graph)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
