//! Translates drag-drop results into tree moves.
//!
//! Drop surfaces report a loosely addressed result: container ids that encode
//! a (stage, task) pair plus source/destination indices. This module owns the
//! container encoding, decides whether a drop is a no-op, and otherwise
//! delegates to `JourneyTree::move_step`. Cross-task and cross-stage moves
//! are handled identically; only the destination task differs.

use shared::domain::{StageId, StepId, TaskId};
use tracing::warn;

use crate::tree::{JourneyTree, MoveStep};

/// Separator for the `stage::task` container encoding. Freshly minted ids
/// never contain it.
const CONTAINER_SEPARATOR: &str = "::";

/// Strongly typed end-of-drag result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub dragged_id: StepId,
    pub source_container_id: String,
    pub source_index: usize,
    /// `None` when the drop landed outside any target.
    pub dest_container_id: Option<String>,
    pub dest_index: usize,
}

pub fn container_id(stage_id: &StageId, task_id: &TaskId) -> String {
    format!("{}{}{}", stage_id, CONTAINER_SEPARATOR, task_id)
}

pub fn parse_container_id(raw: &str) -> Option<(StageId, TaskId)> {
    let (stage, task) = raw.split_once(CONTAINER_SEPARATOR)?;
    if stage.is_empty() || task.is_empty() {
        return None;
    }
    Some((StageId::from(stage), TaskId::from(task)))
}

/// Applies a drop to the tree. Returns `None` — with the caller keeping its
/// current tree value — when the drop is a no-op (no destination, identical
/// source and destination position) or when a container id does not resolve;
/// a rejected move is logged, never raised.
pub fn apply_drop(tree: &JourneyTree, drop: &DropResult) -> Option<JourneyTree> {
    let dest_container = drop.dest_container_id.as_deref()?;
    if dest_container == drop.source_container_id && drop.dest_index == drop.source_index {
        return None;
    }

    let Some((source_stage_id, source_task_id)) = parse_container_id(&drop.source_container_id)
    else {
        warn!(container = %drop.source_container_id, "ignoring drop with unparsable source container");
        return None;
    };
    let Some((dest_stage_id, dest_task_id)) = parse_container_id(dest_container) else {
        warn!(container = %dest_container, "ignoring drop with unparsable destination container");
        return None;
    };

    let request = MoveStep {
        step_id: drop.dragged_id.clone(),
        source_stage_id,
        source_task_id,
        source_index: drop.source_index,
        dest_stage_id,
        dest_task_id,
        dest_index: drop.dest_index,
    };
    match tree.move_step(&request) {
        Ok(next) => Some(next),
        Err(err) => {
            warn!(step_id = %drop.dragged_id, %err, "ignoring unresolvable drop");
            None
        }
    }
}

/// The remove-then-insert primitive over any ordered list. Returns `false`
/// when `from` is out of range; `to` is clamped to the post-removal length.
pub(crate) fn shift_entry<T>(list: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= list.len() {
        return false;
    }
    let item = list.remove(from);
    let to = to.min(list.len());
    list.insert(to, item);
    true
}

/// Reorders a slice into a new list. Returns `None` when the move is a no-op
/// (identical indices) or `from` is out of range, so callers can keep the
/// original value untouched.
pub fn reorder_slice<T: Clone>(items: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from == to || from >= items.len() {
        return None;
    }
    let mut next = items.to_vec();
    shift_entry(&mut next, from, to);
    Some(next)
}

#[cfg(test)]
#[path = "tests/reorder_tests.rs"]
mod tests;
