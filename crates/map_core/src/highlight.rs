//! Cross-reference highlight state machine.
//!
//! Exactly one of the three state shapes is active at any time; entering a
//! new selection fully replaces the previous one. The engine never raises:
//! a click with no resolvable step/entry context degrades to a background
//! click, which clears the selection.

use shared::domain::{EntryKind, StepId};

use crate::tree::JourneyTree;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Highlight {
    #[default]
    Idle,
    /// All pain points, opportunities and experiences of the step are
    /// highlighted together.
    StepSelected { step_id: StepId },
    /// Exactly one entry is highlighted.
    ItemSelected {
        step_id: StepId,
        kind: EntryKind,
        index: usize,
    },
}

/// Notification payload handed to the external edit-detail collaborator when
/// a new entry selection is made. Carries the entry text and its parent
/// context; producing it is a side signal, not a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetail {
    pub step_id: StepId,
    pub kind: EntryKind,
    pub index: usize,
    pub text: String,
    pub step_description: String,
    pub stage_name: String,
    pub task_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct HighlightEngine {
    state: Highlight,
}

impl HighlightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Highlight {
        &self.state
    }

    /// Click on a step column: toggles `StepSelected` for that step, replaces
    /// any other selection.
    pub fn click_step(&mut self, step_id: StepId) {
        self.state = match &self.state {
            Highlight::StepSelected { step_id: current } if *current == step_id => Highlight::Idle,
            _ => Highlight::StepSelected { step_id },
        };
    }

    /// Click on an individual entry. Toggles `ItemSelected` for the exact
    /// `(step, kind, index)` triple; a *new* selection also yields the detail
    /// notification for the edit collaborator. A click whose context cannot
    /// be resolved in the tree is treated as a background click.
    pub fn click_entry(
        &mut self,
        tree: &JourneyTree,
        step_id: StepId,
        kind: EntryKind,
        index: usize,
    ) -> Option<EntryDetail> {
        let Some(detail) = entry_detail(tree, &step_id, kind, index) else {
            self.clear();
            return None;
        };

        match &self.state {
            Highlight::ItemSelected {
                step_id: current_step,
                kind: current_kind,
                index: current_index,
            } if *current_step == step_id && *current_kind == kind && *current_index == index => {
                self.state = Highlight::Idle;
                None
            }
            _ => {
                self.state = Highlight::ItemSelected {
                    step_id,
                    kind,
                    index,
                };
                Some(detail)
            }
        }
    }

    /// Escape key or a pointer click outside any card.
    pub fn clear(&mut self) {
        self.state = Highlight::Idle;
    }

    /// True when the whole step is selected, or when one of its entries is.
    pub fn step_involved(&self, step_id: &StepId) -> bool {
        match &self.state {
            Highlight::Idle => false,
            Highlight::StepSelected { step_id: current } => current == step_id,
            Highlight::ItemSelected {
                step_id: current, ..
            } => current == step_id,
        }
    }

    /// True when this entry should render highlighted: either its step is
    /// selected as a whole, or it is the selected item.
    pub fn entry_highlighted(&self, step_id: &StepId, kind: EntryKind, index: usize) -> bool {
        match &self.state {
            Highlight::Idle => false,
            Highlight::StepSelected { step_id: current } => current == step_id,
            Highlight::ItemSelected {
                step_id: current_step,
                kind: current_kind,
                index: current_index,
            } => current_step == step_id && *current_kind == kind && *current_index == index,
        }
    }
}

/// Resolves an entry's text and parent context from the tree.
pub fn entry_detail(
    tree: &JourneyTree,
    step_id: &StepId,
    kind: EntryKind,
    index: usize,
) -> Option<EntryDetail> {
    let (stage, task, step) = tree.locate_step(step_id)?;
    let text = step.entries(kind).get(index)?.clone();
    Some(EntryDetail {
        step_id: step.id.clone(),
        kind,
        index,
        text,
        step_description: step.description.clone(),
        stage_name: stage.name.clone(),
        task_name: task.name.clone(),
    })
}

#[cfg(test)]
#[path = "tests/highlight_tests.rs"]
mod tests;
