//! Persisted document shape for load/import and save/export.
//!
//! Import is deliberately lenient: legacy documents carry a single
//! `personaId` instead of `jobPerformerIds`, and some writers stored name
//! fields as `{"name": "..."}` objects instead of plain strings. Both forms
//! are normalized here, once, at the document boundary; the in-memory model
//! only ever sees plain strings and id lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Performer, PerformerId, Stage, StageId, Step, StepId, Task, TaskId},
    error::DocumentError,
};

/// A name that may be a plain string or an object carrying a `name` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameField {
    Plain(String),
    Wrapped { name: String },
}

impl NameField {
    fn into_string(self) -> String {
        match self {
            NameField::Plain(name) => name,
            NameField::Wrapped { name } => name,
        }
    }
}

impl Default for NameField {
    fn default() -> Self {
        NameField::Plain(String::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformerDto {
    pub id: String,
    #[serde(default)]
    pub name: NameField,
    #[serde(default)]
    pub color_hex: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDto {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub job_performer_ids: Vec<String>,
    /// Legacy single-performer form; folded into `job_performer_ids` on import
    /// and never written back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pain_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opportunities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub current_experiences: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub insights: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: String,
    #[serde(default)]
    pub name: NameField,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub job_performer_ids: Vec<String>,
    #[serde(default)]
    pub steps: Vec<StepDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDto {
    pub id: String,
    #[serde(default)]
    pub name: NameField,
    #[serde(default)]
    pub tasks: Vec<TaskDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocumentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performers: Vec<PerformerDto>,
    #[serde(default)]
    pub stages: Vec<StageDto>,
}

/// Fully normalized in-memory form of a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDocument {
    pub saved_at: Option<DateTime<Utc>>,
    pub performers: Vec<Performer>,
    pub stages: Vec<Stage>,
}

impl StepDto {
    fn into_domain(self) -> Step {
        let mut performer_ids: Vec<PerformerId> = self
            .job_performer_ids
            .into_iter()
            .map(PerformerId)
            .collect();
        if performer_ids.is_empty() {
            if let Some(persona) = self.persona_id {
                performer_ids.push(PerformerId(persona));
            }
        }
        let mut seen = std::collections::HashSet::new();
        performer_ids.retain(|id| seen.insert(id.clone()));

        Step {
            id: StepId(self.id),
            description: self.description,
            performer_ids,
            pain_points: self.pain_points,
            opportunities: self.opportunities,
            current_experiences: self.current_experiences,
            insight: self.insights,
        }
    }

    fn from_domain(step: &Step) -> Self {
        Self {
            id: step.id.0.clone(),
            description: step.description.clone(),
            job_performer_ids: step.performer_ids.iter().map(|id| id.0.clone()).collect(),
            persona_id: None,
            pain_points: step.pain_points.clone(),
            opportunities: step.opportunities.clone(),
            current_experiences: step.current_experiences.clone(),
            insights: step.insight.clone(),
        }
    }
}

impl TaskDto {
    fn into_domain(self) -> Task {
        Task {
            id: TaskId(self.id),
            name: self.name.into_string(),
            performer_ids: self.job_performer_ids.into_iter().map(PerformerId).collect(),
            steps: self.steps.into_iter().map(StepDto::into_domain).collect(),
        }
    }

    fn from_domain(task: &Task) -> Self {
        Self {
            id: task.id.0.clone(),
            name: NameField::Plain(task.name.clone()),
            job_performer_ids: task.performer_ids.iter().map(|id| id.0.clone()).collect(),
            steps: task.steps.iter().map(StepDto::from_domain).collect(),
        }
    }
}

impl StageDto {
    fn into_domain(self) -> Stage {
        Stage {
            id: StageId(self.id),
            name: self.name.into_string(),
            tasks: self.tasks.into_iter().map(TaskDto::into_domain).collect(),
        }
    }

    fn from_domain(stage: &Stage) -> Self {
        Self {
            id: stage.id.0.clone(),
            name: NameField::Plain(stage.name.clone()),
            tasks: stage.tasks.iter().map(TaskDto::from_domain).collect(),
        }
    }
}

impl PerformerDto {
    fn into_domain(self) -> Performer {
        Performer {
            id: PerformerId(self.id),
            name: self.name.into_string(),
            color_hex: self.color_hex,
            is_default: self.is_default,
        }
    }

    fn from_domain(performer: &Performer) -> Self {
        Self {
            id: performer.id.0.clone(),
            name: NameField::Plain(performer.name.clone()),
            color_hex: performer.color_hex.clone(),
            is_default: performer.is_default,
        }
    }
}

/// Parses a saved document. Accepts both the full document wrapper and a bare
/// stage array (the shape older exports produced).
pub fn parse_document(json: &str) -> Result<MapDocument, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    if value.is_array() {
        let stages: Vec<StageDto> = serde_json::from_value(value)?;
        return Ok(MapDocument {
            saved_at: None,
            performers: Vec::new(),
            stages: stages.into_iter().map(StageDto::into_domain).collect(),
        });
    }

    if value.is_object() {
        let dto: MapDocumentDto = serde_json::from_value(value)?;
        return Ok(MapDocument {
            saved_at: dto.saved_at,
            performers: dto
                .performers
                .into_iter()
                .map(PerformerDto::into_domain)
                .collect(),
            stages: dto.stages.into_iter().map(StageDto::into_domain).collect(),
        });
    }

    Err(DocumentError::UnrecognizedShape)
}

/// Serializes a document in the normalized current shape.
pub fn render_document(document: &MapDocument) -> Result<String, DocumentError> {
    let dto = MapDocumentDto {
        saved_at: document.saved_at,
        performers: document
            .performers
            .iter()
            .map(PerformerDto::from_domain)
            .collect(),
        stages: document.stages.iter().map(StageDto::from_domain).collect(),
    };
    Ok(serde_json::to_string_pretty(&dto)?)
}

#[cfg(test)]
#[path = "tests/persist_tests.rs"]
mod tests;
