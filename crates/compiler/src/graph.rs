// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task graph construction.
//!
//! A [`TaskGraphBuilder`] is scoped to one job and one compile call. Parents
//! must exist before their children are created, so a graph built through it
//! is acyclic by construction; [`verify_tasks`] checks the same invariants on
//! task lists that arrive from elsewhere.

use crate::error::GraphError;
use indexmap::IndexMap;
use rf_core::{Command, IdGen, JobId, Task, TaskId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Parent assignment for a batch of tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parents {
    None,
    /// Every task in the batch depends on this one (fan-out)
    One(TaskId),
    /// Task `i` of the batch depends on entry `i`; lengths must match
    Each(Vec<TaskId>),
}

/// One task to create as part of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub name: String,
    pub commands: Vec<Command>,
    pub priority: i32,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, commands: Vec<Command>, priority: i32) -> Self {
        Self {
            name: name.into(),
            commands,
            priority,
        }
    }
}

pub struct TaskGraphBuilder<'a> {
    job_id: JobId,
    ids: &'a dyn IdGen,
    tasks: IndexMap<TaskId, Task>,
}

impl<'a> TaskGraphBuilder<'a> {
    pub fn new(job_id: JobId, ids: &'a dyn IdGen) -> Self {
        Self {
            job_id,
            ids,
            tasks: IndexMap::new(),
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Create a queued task of this job and return its id.
    ///
    /// Every parent must already have been created by this builder.
    pub fn create_task(
        &mut self,
        name: impl Into<String>,
        commands: Vec<Command>,
        parents: &[TaskId],
        priority: i32,
    ) -> Result<TaskId, GraphError> {
        let name = name.into();
        let mut seen = HashSet::with_capacity(parents.len());
        for parent in parents {
            if !self.tasks.contains_key(parent) {
                return Err(GraphError::UnknownParent {
                    task: name,
                    parent: parent.clone(),
                });
            }
            if !seen.insert(parent) {
                return Err(GraphError::DuplicateParent {
                    task: name,
                    parent: parent.clone(),
                });
            }
        }

        let id = TaskId::new(self.ids.next());
        let task = Task::new(
            id.clone(),
            self.job_id.clone(),
            name,
            commands,
            parents.to_vec(),
            priority,
        );
        tracing::trace!(job_id = %self.job_id, task_id = %id, name = %task.name, "created task");
        self.tasks.insert(id.clone(), task);
        Ok(id)
    }

    /// Create several tasks at once, returning their ids in input order.
    pub fn create_batch(
        &mut self,
        specs: Vec<TaskSpec>,
        parents: Parents,
    ) -> Result<Vec<TaskId>, GraphError> {
        if let Parents::Each(ref each) = parents {
            if each.len() != specs.len() {
                return Err(GraphError::ParentCountMismatch {
                    tasks: specs.len(),
                    parents: each.len(),
                });
            }
        }

        let mut ids = Vec::with_capacity(specs.len());
        for (i, spec) in specs.into_iter().enumerate() {
            let parent: &[TaskId] = match &parents {
                Parents::None => &[],
                Parents::One(id) => std::slice::from_ref(id),
                Parents::Each(each) => std::slice::from_ref(&each[i]),
            };
            ids.push(self.create_task(spec.name, spec.commands, parent, spec.priority)?);
        }
        Ok(ids)
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Check the graph and hand it over for commit.
    pub fn finish(self) -> Result<TaskGraph, GraphError> {
        let tasks: Vec<Task> = self.tasks.into_values().collect();
        verify_tasks(&self.job_id, &tasks)?;
        Ok(TaskGraph {
            job_id: self.job_id,
            tasks,
        })
    }
}

/// A verified task graph, in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGraph {
    job_id: JobId,
    tasks: Vec<Task>,
}

impl TaskGraph {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Tasks that list `id` as a parent.
    pub fn children_of<'g>(&'g self, id: &'g TaskId) -> impl Iterator<Item = &'g Task> + 'g {
        self.tasks.iter().filter(move |t| t.has_parent(id))
    }
}

/// Check that `tasks` form a well-formed graph for `job_id`.
///
/// Parents must be tasks of the same job, listed at most once, and the
/// parent relation must be acyclic.
pub fn verify_tasks(job_id: &JobId, tasks: &[Task]) -> Result<(), GraphError> {
    let by_id: HashMap<&TaskId, &Task> = tasks.iter().map(|t| (&t.id, t)).collect();

    for task in tasks {
        let mut seen = HashSet::with_capacity(task.parents.len());
        for parent in &task.parents {
            let Some(p) = by_id.get(parent) else {
                return Err(GraphError::UnknownParent {
                    task: task.name.clone(),
                    parent: parent.clone(),
                });
            };
            if &p.job_id != job_id || &task.job_id != job_id {
                return Err(GraphError::ForeignParent {
                    task: task.name.clone(),
                    parent: parent.clone(),
                    parent_job: p.job_id.clone(),
                    job: job_id.clone(),
                });
            }
            if !seen.insert(parent) {
                return Err(GraphError::DuplicateParent {
                    task: task.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    // Kahn's algorithm over parent -> child edges
    let mut pending: HashMap<&TaskId, usize> =
        tasks.iter().map(|t| (&t.id, t.parents.len())).collect();
    let mut children: HashMap<&TaskId, Vec<&TaskId>> = HashMap::new();
    for task in tasks {
        for parent in &task.parents {
            children.entry(parent).or_default().push(&task.id);
        }
    }
    let mut ready: VecDeque<&TaskId> = tasks
        .iter()
        .filter(|t| t.parents.is_empty())
        .map(|t| &t.id)
        .collect();
    let mut visited = 0usize;
    while let Some(id) = ready.pop_front() {
        visited += 1;
        for child in children.get(id).into_iter().flatten() {
            if let Some(n) = pending.get_mut(child) {
                *n -= 1;
                if *n == 0 {
                    ready.push_back(child);
                }
            }
        }
    }

    if visited < tasks.len() {
        let stuck = tasks
            .iter()
            .find(|t| pending.get(&t.id).is_some_and(|n| *n > 0))
            .map(|t| t.id.clone())
            .unwrap_or_else(|| TaskId::new(""));
        return Err(GraphError::Cycle {
            job: job_id.clone(),
            task: stuck,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
