// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency graph export for visualisation.
//!
//! Node ids are task indices in creation order; nodes are listed by
//! ascending priority. Edges point from parent to child.

use crate::MaterializedState;
use rf_core::{JobId, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepsNode {
    pub id: usize,
    pub label: String,
    pub shape: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepsEdge {
    pub from: usize,
    pub to: usize,
    pub arrows: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepsGraph {
    pub nodes: Vec<DepsNode>,
    pub edges: Vec<DepsEdge>,
}

impl MaterializedState {
    /// Export a job's task graph, or `None` for an unknown job.
    pub fn depsgraph(&self, job_id: &JobId) -> Option<DepsGraph> {
        if !self.jobs.contains_key(job_id) {
            return None;
        }
        let tasks: Vec<_> = self.tasks_for_job(job_id).collect();
        let index: HashMap<&TaskId, usize> =
            tasks.iter().enumerate().map(|(i, t)| (&t.id, i)).collect();

        let mut by_priority: Vec<(usize, _)> = tasks.iter().copied().enumerate().collect();
        by_priority.sort_by_key(|(_, t)| t.priority);

        let mut graph = DepsGraph::default();
        for (id, task) in by_priority {
            graph.nodes.push(DepsNode {
                id,
                label: task.name.clone(),
                shape: "box".to_string(),
                color: task.status.color().to_string(),
            });
            for parent in &task.parents {
                if let Some(&from) = index.get(parent) {
                    graph.edges.push(DepsEdge {
                        from,
                        to: id,
                        arrows: "to".to_string(),
                    });
                }
            }
        }
        Some(graph)
    }
}

#[cfg(test)]
#[path = "depsgraph_tests.rs"]
mod tests;
