//! UI/worker events and error modeling for the desktop GUI controller.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use shared::persist::MapDocument;

pub enum UiEvent {
    DocumentLoaded {
        path: PathBuf,
        document: MapDocument,
    },
    DocumentSaved {
        path: PathBuf,
        saved_at: DateTime<Utc>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Io,
    Format,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    LoadDocument,
    SaveDocument,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("no such file")
            || message_lower.contains("not found")
            || message_lower.contains("permission")
            || message_lower.contains("denied")
            || message_lower.contains("failed to read")
            || message_lower.contains("failed to write")
        {
            UiErrorCategory::Io
        } else if message_lower.contains("parse")
            || message_lower.contains("not valid json")
            || message_lower.contains("shape")
            || message_lower.contains("expected")
        {
            UiErrorCategory::Format
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line banner text for the status strip.
    pub fn banner_text(&self) -> String {
        let prefix = match self.context {
            UiErrorContext::LoadDocument => "Open failed",
            UiErrorContext::SaveDocument => "Save failed",
            UiErrorContext::General => "Error",
        };
        format!("{prefix}: {}", self.message)
    }
}
