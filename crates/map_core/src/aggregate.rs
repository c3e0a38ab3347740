//! Flattens the tree into the aggregate grid: an ordered column list plus
//! task/stage span metadata that exactly tiles it.

use std::collections::BTreeSet;

use serde::Serialize;
use shared::domain::{Performer, PerformerId, StageId, Step, TaskId};

use crate::{performers::PerformerRegistry, tree::JourneyTree};

/// The performer filter applied to step visibility. The `unassigned`
/// sentinel is a dedicated flag rather than a magic id so the type keeps it
/// apart from real performer ids. An empty filter means "show all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformerFilter {
    pub ids: BTreeSet<PerformerId>,
    pub include_unassigned: bool,
}

impl PerformerFilter {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && !self.include_unassigned
    }

    pub fn toggle_performer(&mut self, id: PerformerId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn toggle_unassigned(&mut self) {
        self.include_unassigned = !self.include_unassigned;
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.include_unassigned = false;
    }
}

/// Why a task produced a placeholder column instead of step columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderReason {
    /// The task truly has no steps.
    Empty,
    /// The task has steps but the current filter hides them all.
    Filtered,
}

/// One rendered unit of the flattened grid: a real step or a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Column {
    Step {
        stage_id: StageId,
        task_id: TaskId,
        step: Step,
        /// Resolved performer objects for display; dangling ids are dropped.
        performers: Vec<Performer>,
    },
    Placeholder {
        stage_id: StageId,
        task_id: TaskId,
        reason: PlaceholderReason,
    },
}

impl Column {
    pub fn step_id(&self) -> Option<&shared::domain::StepId> {
        match self {
            Column::Step { step, .. } => Some(&step.id),
            Column::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSpan {
    pub task_id: TaskId,
    /// 0-based index of the first column belonging to this task.
    pub start: usize,
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSpan {
    pub stage_name: String,
    pub start: usize,
    pub width: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub columns: Vec<Column>,
    pub task_spans: Vec<TaskSpan>,
    pub stage_spans: Vec<StageSpan>,
}

/// Step visibility under a filter. Visibility is defined over the *resolved*
/// performer set: a step whose every performer id dangles counts as
/// unassigned, and filter ids that match no known performer never match
/// anything.
fn step_visible(step: &Step, registry: &PerformerRegistry, filter: &PerformerFilter) -> bool {
    if filter.is_empty() {
        return true;
    }
    let mut resolved = step
        .performer_ids
        .iter()
        .filter_map(|id| registry.get(id))
        .peekable();
    if resolved.peek().is_none() {
        return filter.include_unassigned;
    }
    resolved.any(|performer| filter.ids.contains(&performer.id))
}

/// Flattens the tree into `{columns, task_spans, stage_spans}`.
///
/// Stages and tasks are processed in stored order; stages with zero tasks
/// contribute nothing. Every task contributes at least one column (a
/// placeholder when it has no visible steps), so every emitted stage span has
/// width ≥ 1 and the spans tile the column list with no gaps or overlaps.
/// O(total steps); deterministic for a given tree, registry and filter.
pub fn aggregate(
    tree: &JourneyTree,
    registry: &PerformerRegistry,
    filter: &PerformerFilter,
) -> GridLayout {
    let mut layout = GridLayout::default();

    for stage in tree.stages() {
        if stage.tasks.is_empty() {
            continue;
        }
        let stage_start = layout.columns.len();

        for task in &stage.tasks {
            let task_start = layout.columns.len();
            let visible: Vec<&Step> = task
                .steps
                .iter()
                .filter(|step| step_visible(step, registry, filter))
                .collect();

            if visible.is_empty() {
                let reason = if task.steps.is_empty() {
                    PlaceholderReason::Empty
                } else {
                    PlaceholderReason::Filtered
                };
                layout.columns.push(Column::Placeholder {
                    stage_id: stage.id.clone(),
                    task_id: task.id.clone(),
                    reason,
                });
            } else {
                for step in visible {
                    let performers = step
                        .performer_ids
                        .iter()
                        .filter_map(|id| registry.get(id))
                        .cloned()
                        .collect();
                    layout.columns.push(Column::Step {
                        stage_id: stage.id.clone(),
                        task_id: task.id.clone(),
                        step: step.clone(),
                        performers,
                    });
                }
            }

            layout.task_spans.push(TaskSpan {
                task_id: task.id.clone(),
                start: task_start,
                width: layout.columns.len() - task_start,
            });
        }

        let stage_width = layout.columns.len() - stage_start;
        if stage_width > 0 {
            layout.stage_spans.push(StageSpan {
                stage_name: stage.name.clone(),
                start: stage_start,
                width: stage_width,
            });
        }
    }

    layout
}

#[cfg(test)]
#[path = "tests/aggregate_tests.rs"]
mod tests;
