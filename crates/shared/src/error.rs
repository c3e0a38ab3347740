use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Stage,
    Task,
    Step,
    Entry,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::Stage => "stage",
            NodeKind::Task => "task",
            NodeKind::Step => "step",
            NodeKind::Entry => "entry",
        };
        f.write_str(label)
    }
}

/// Failure of a tree mutation. Every failing mutation leaves the tree it was
/// called on unchanged; callers are expected to have obtained ids from a
/// previous read of the same tree generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown {kind} '{id}'")]
    NotFound { kind: NodeKind, id: String },
    #[error("move destination {kind} '{id}' does not resolve")]
    InvalidReference { kind: NodeKind, id: String },
}

impl TreeError {
    pub fn not_found(kind: NodeKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_reference(kind: NodeKind, id: impl Into<String>) -> Self {
        Self::InvalidReference {
            kind,
            id: id.into(),
        }
    }
}

/// Failure to read or write a persisted map document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document shape not recognized: expected a map document or a stage array")]
    UnrecognizedShape,
}
