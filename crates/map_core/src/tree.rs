//! The stage → task → step hierarchy and its mutation contract.
//!
//! Every mutation takes `&self` and returns a fresh tree value; a previously
//! returned tree is never mutated. A failing mutation returns `Err` and the
//! value it was called on is untouched, so callers can keep rendering the
//! current generation while an edit is rejected.

use shared::{
    domain::{
        EntryKind, PerformerId, Stage, StageId, Step, StepDraft, StepId, StepPatch, Task, TaskId,
        TaskPatch,
    },
    error::{NodeKind, TreeError},
};
use tracing::debug;

use crate::reorder::shift_entry;

/// Identifies a move of one step between (or within) task step lists.
/// Indices are positions in the source/destination step lists at the time the
/// drag started; for a same-task move the destination index is interpreted
/// after removal, the way drop surfaces report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveStep {
    pub step_id: StepId,
    pub source_stage_id: StageId,
    pub source_task_id: TaskId,
    pub source_index: usize,
    pub dest_stage_id: StageId,
    pub dest_task_id: TaskId,
    pub dest_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JourneyTree {
    stages: Vec<Stage>,
}

impl JourneyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale replacement on load/import; the previous tree is discarded,
    /// never diffed.
    pub fn from_stages(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.stages
            .iter()
            .flat_map(|stage| &stage.tasks)
            .map(|task| task.steps.len())
            .sum()
    }

    pub fn find_stage(&self, stage_id: &StageId) -> Option<&Stage> {
        self.stages.iter().find(|stage| &stage.id == stage_id)
    }

    pub fn find_task(&self, stage_id: &StageId, task_id: &TaskId) -> Option<&Task> {
        self.find_stage(stage_id)?
            .tasks
            .iter()
            .find(|task| &task.id == task_id)
    }

    pub fn find_step(
        &self,
        stage_id: &StageId,
        task_id: &TaskId,
        step_id: &StepId,
    ) -> Option<&Step> {
        self.find_task(stage_id, task_id)?
            .steps
            .iter()
            .find(|step| &step.id == step_id)
    }

    /// Locates a step by id alone, returning its full ancestry. Step ids are
    /// globally unique, so the first match is the only match.
    pub fn locate_step(&self, step_id: &StepId) -> Option<(&Stage, &Task, &Step)> {
        for stage in &self.stages {
            for task in &stage.tasks {
                if let Some(step) = task.steps.iter().find(|step| &step.id == step_id) {
                    return Some((stage, task, step));
                }
            }
        }
        None
    }

    // ----- stage operations -----

    pub fn add_stage(&self, name: impl Into<String>) -> (Self, StageId) {
        let mut next = self.clone();
        let stage_id = StageId::fresh();
        next.stages.push(Stage {
            id: stage_id.clone(),
            name: name.into(),
            tasks: Vec::new(),
        });
        debug!(stage_id = %stage_id, "added stage");
        (next, stage_id)
    }

    pub fn rename_stage(
        &self,
        stage_id: &StageId,
        name: impl Into<String>,
    ) -> Result<Self, TreeError> {
        let mut next = self.clone();
        next.stage_mut(stage_id)?.name = name.into();
        Ok(next)
    }

    /// Deletes a stage and cascades to every task and step under it.
    pub fn delete_stage(&self, stage_id: &StageId) -> Result<Self, TreeError> {
        let mut next = self.clone();
        let before = next.stages.len();
        next.stages.retain(|stage| &stage.id != stage_id);
        if next.stages.len() == before {
            return Err(TreeError::not_found(NodeKind::Stage, stage_id.as_str()));
        }
        debug!(stage_id = %stage_id, "deleted stage");
        Ok(next)
    }

    // ----- task operations -----

    pub fn add_task(
        &self,
        stage_id: &StageId,
        name: impl Into<String>,
        performer_ids: Vec<PerformerId>,
    ) -> Result<(Self, TaskId), TreeError> {
        let mut next = self.clone();
        let task_id = TaskId::fresh();
        next.stage_mut(stage_id)?.tasks.push(Task {
            id: task_id.clone(),
            name: name.into(),
            performer_ids,
            steps: Vec::new(),
        });
        debug!(stage_id = %stage_id, task_id = %task_id, "added task");
        Ok((next, task_id))
    }

    pub fn update_task(
        &self,
        stage_id: &StageId,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Self, TreeError> {
        let mut next = self.clone();
        let task = next.task_mut(stage_id, task_id)?;
        if let Some(name) = patch.name {
            task.name = name;
        }
        if let Some(performer_ids) = patch.performer_ids {
            task.performer_ids = performer_ids;
        }
        Ok(next)
    }

    /// Deletes a task and cascades to its steps.
    pub fn delete_task(&self, stage_id: &StageId, task_id: &TaskId) -> Result<Self, TreeError> {
        let mut next = self.clone();
        let stage = next.stage_mut(stage_id)?;
        let before = stage.tasks.len();
        stage.tasks.retain(|task| &task.id != task_id);
        if stage.tasks.len() == before {
            return Err(TreeError::not_found(NodeKind::Task, task_id.as_str()));
        }
        debug!(stage_id = %stage_id, task_id = %task_id, "deleted task");
        Ok(next)
    }

    // ----- step operations -----

    /// Appends a step to the named task. The task is addressed by id alone;
    /// task ids are globally unique so no stage context is needed.
    pub fn add_step(&self, task_id: &TaskId, draft: StepDraft) -> Result<(Self, StepId), TreeError> {
        let mut next = self.clone();
        let step_id = StepId::fresh();
        let task = next
            .stages
            .iter_mut()
            .flat_map(|stage| &mut stage.tasks)
            .find(|task| &task.id == task_id)
            .ok_or_else(|| TreeError::not_found(NodeKind::Task, task_id.as_str()))?;
        task.steps.push(Step {
            id: step_id.clone(),
            description: draft.description,
            performer_ids: draft.performer_ids,
            pain_points: draft.pain_points,
            opportunities: draft.opportunities,
            current_experiences: draft.current_experiences,
            insight: draft.insight,
        });
        debug!(task_id = %task_id, step_id = %step_id, "added step");
        Ok((next, step_id))
    }

    /// Applies a patch to a step. The step id is preserved; untouched fields
    /// keep their values.
    pub fn update_step(
        &self,
        stage_id: &StageId,
        task_id: &TaskId,
        step_id: &StepId,
        patch: StepPatch,
    ) -> Result<Self, TreeError> {
        let mut next = self.clone();
        let step = next.step_mut(stage_id, task_id, step_id)?;
        if let Some(description) = patch.description {
            step.description = description;
        }
        if let Some(performer_ids) = patch.performer_ids {
            step.performer_ids = performer_ids;
        }
        if let Some(pain_points) = patch.pain_points {
            step.pain_points = pain_points;
        }
        if let Some(opportunities) = patch.opportunities {
            step.opportunities = opportunities;
        }
        if let Some(current_experiences) = patch.current_experiences {
            step.current_experiences = current_experiences;
        }
        if let Some(insight) = patch.insight {
            step.insight = insight;
        }
        Ok(next)
    }

    pub fn delete_step(
        &self,
        stage_id: &StageId,
        task_id: &TaskId,
        step_id: &StepId,
    ) -> Result<Self, TreeError> {
        let mut next = self.clone();
        let task = next.task_mut(stage_id, task_id)?;
        let before = task.steps.len();
        task.steps.retain(|step| &step.id != step_id);
        if task.steps.len() == before {
            return Err(TreeError::not_found(NodeKind::Step, step_id.as_str()));
        }
        debug!(step_id = %step_id, "deleted step");
        Ok(next)
    }

    /// Moves one step between (or within) task step lists. The step payload
    /// crosses unchanged; only list membership and order move. An unresolved
    /// destination fails with `InvalidReference` and the tree is unchanged.
    /// Moving the only step out of a task leaves that task present with an
    /// empty step list.
    pub fn move_step(&self, request: &MoveStep) -> Result<Self, TreeError> {
        // Validate the destination against this generation before touching
        // anything, so a bad drop cannot half-apply.
        if self.find_stage(&request.dest_stage_id).is_none() {
            return Err(TreeError::invalid_reference(
                NodeKind::Stage,
                request.dest_stage_id.as_str(),
            ));
        }
        if self
            .find_task(&request.dest_stage_id, &request.dest_task_id)
            .is_none()
        {
            return Err(TreeError::invalid_reference(
                NodeKind::Task,
                request.dest_task_id.as_str(),
            ));
        }

        let source_task = self
            .find_task(&request.source_stage_id, &request.source_task_id)
            .ok_or_else(|| {
                TreeError::not_found(NodeKind::Task, request.source_task_id.as_str())
            })?;
        match source_task.steps.get(request.source_index) {
            Some(step) if step.id == request.step_id => {}
            _ => {
                // Stale index or id from an older generation.
                return Err(TreeError::not_found(
                    NodeKind::Step,
                    request.step_id.as_str(),
                ));
            }
        }

        let mut next = self.clone();
        let step = {
            let source = next.task_mut(&request.source_stage_id, &request.source_task_id)?;
            source.steps.remove(request.source_index)
        };
        let dest = next.task_mut(&request.dest_stage_id, &request.dest_task_id)?;
        let index = request.dest_index.min(dest.steps.len());
        dest.steps.insert(index, step);
        debug!(
            step_id = %request.step_id,
            dest_task_id = %request.dest_task_id,
            dest_index = index,
            "moved step"
        );
        Ok(next)
    }

    // ----- step entry operations -----

    pub fn add_step_entry(
        &self,
        stage_id: &StageId,
        task_id: &TaskId,
        step_id: &StepId,
        kind: EntryKind,
        text: impl Into<String>,
    ) -> Result<Self, TreeError> {
        let mut next = self.clone();
        next.step_mut(stage_id, task_id, step_id)?
            .entries_mut(kind)
            .push(text.into());
        Ok(next)
    }

    pub fn update_step_entry(
        &self,
        stage_id: &StageId,
        task_id: &TaskId,
        step_id: &StepId,
        kind: EntryKind,
        index: usize,
        text: impl Into<String>,
    ) -> Result<Self, TreeError> {
        let mut next = self.clone();
        let entries = next.step_mut(stage_id, task_id, step_id)?.entries_mut(kind);
        let slot = entries
            .get_mut(index)
            .ok_or_else(|| TreeError::not_found(NodeKind::Entry, index.to_string()))?;
        *slot = text.into();
        Ok(next)
    }

    pub fn remove_step_entry(
        &self,
        stage_id: &StageId,
        task_id: &TaskId,
        step_id: &StepId,
        kind: EntryKind,
        index: usize,
    ) -> Result<Self, TreeError> {
        let mut next = self.clone();
        let entries = next.step_mut(stage_id, task_id, step_id)?.entries_mut(kind);
        if index >= entries.len() {
            return Err(TreeError::not_found(NodeKind::Entry, index.to_string()));
        }
        entries.remove(index);
        Ok(next)
    }

    /// Reorders one entry within a step's list, using the same
    /// remove-then-insert primitive as the drag-drop path.
    pub fn reorder_step_entries(
        &self,
        stage_id: &StageId,
        task_id: &TaskId,
        step_id: &StepId,
        kind: EntryKind,
        source_index: usize,
        dest_index: usize,
    ) -> Result<Self, TreeError> {
        let mut next = self.clone();
        let entries = next.step_mut(stage_id, task_id, step_id)?.entries_mut(kind);
        if !shift_entry(entries, source_index, dest_index) {
            return Err(TreeError::not_found(
                NodeKind::Entry,
                source_index.to_string(),
            ));
        }
        Ok(next)
    }

    // ----- private mutable lookups -----

    fn stage_mut(&mut self, stage_id: &StageId) -> Result<&mut Stage, TreeError> {
        self.stages
            .iter_mut()
            .find(|stage| &stage.id == stage_id)
            .ok_or_else(|| TreeError::not_found(NodeKind::Stage, stage_id.as_str()))
    }

    fn task_mut(&mut self, stage_id: &StageId, task_id: &TaskId) -> Result<&mut Task, TreeError> {
        self.stage_mut(stage_id)?
            .tasks
            .iter_mut()
            .find(|task| &task.id == task_id)
            .ok_or_else(|| TreeError::not_found(NodeKind::Task, task_id.as_str()))
    }

    fn step_mut(
        &mut self,
        stage_id: &StageId,
        task_id: &TaskId,
        step_id: &StepId,
    ) -> Result<&mut Step, TreeError> {
        self.task_mut(stage_id, task_id)?
            .steps
            .iter_mut()
            .find(|step| &step.id == step_id)
            .ok_or_else(|| TreeError::not_found(NodeKind::Step, step_id.as_str()))
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
