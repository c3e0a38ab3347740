use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Mints a fresh globally unique id. Ids are immutable once assigned.
            pub fn fresh() -> Self {
                Self(format!(concat!($prefix, "-{}"), Uuid::new_v4()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(StageId, "stage");
id_newtype!(TaskId, "task");
id_newtype!(StepId, "step");
id_newtype!(PerformerId, "performer");

/// An actor/role a step can be attributed to. Steps reference performers by
/// id only; deleting a performer leaves dangling ids behind, which readers
/// treat as unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    pub id: PerformerId,
    pub name: String,
    pub color_hex: String,
    pub is_default: bool,
}

impl Performer {
    pub fn new(name: impl Into<String>, color_hex: impl Into<String>) -> Self {
        Self {
            id: PerformerId::fresh(),
            name: name.into(),
            color_hex: color_hex.into(),
            is_default: false,
        }
    }
}

/// Which of a step's annotation lists an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    PainPoint,
    Opportunity,
    CurrentExperience,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::PainPoint => "Pain point",
            EntryKind::Opportunity => "Opportunity",
            EntryKind::CurrentExperience => "Current experience",
        }
    }
}

/// Leaf unit of the map. Entry lists are ordered; order is preserved by every
/// operation except explicit reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub description: String,
    pub performer_ids: Vec<PerformerId>,
    pub pain_points: Vec<String>,
    pub opportunities: Vec<String>,
    pub current_experiences: Vec<String>,
    pub insight: String,
}

impl Step {
    pub fn entries(&self, kind: EntryKind) -> &[String] {
        match kind {
            EntryKind::PainPoint => &self.pain_points,
            EntryKind::Opportunity => &self.opportunities,
            EntryKind::CurrentExperience => &self.current_experiences,
        }
    }

    pub fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<String> {
        match kind {
            EntryKind::PainPoint => &mut self.pain_points,
            EntryKind::Opportunity => &mut self.opportunities,
            EntryKind::CurrentExperience => &mut self.current_experiences,
        }
    }
}

/// Second-level grouping. A task with zero steps is valid and renders as an
/// empty placeholder; it is never auto-pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub performer_ids: Vec<PerformerId>,
    pub steps: Vec<Step>,
}

/// Top-level grouping. A stage with zero tasks is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub tasks: Vec<Task>,
}

/// Initial field values for a freshly added step. The id is minted by the
/// add operation, never supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepDraft {
    pub description: String,
    pub performer_ids: Vec<PerformerId>,
    pub pain_points: Vec<String>,
    pub opportunities: Vec<String>,
    pub current_experiences: Vec<String>,
    pub insight: String,
}

/// Partial update for a task; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub performer_ids: Option<Vec<PerformerId>>,
}

/// Partial update for a step; `None` fields are left untouched. The step id
/// is never part of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepPatch {
    pub description: Option<String>,
    pub performer_ids: Option<Vec<PerformerId>>,
    pub pain_points: Option<Vec<String>>,
    pub opportunities: Option<Vec<String>>,
    pub current_experiences: Option<Vec<String>>,
    pub insight: Option<String>,
}
