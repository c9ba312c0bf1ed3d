//! Startup idea submitted for analysis.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Raw form input, exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaDraft {
    pub title: String,
    pub description: String,
}

impl IdeaDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Whether the submit button should be enabled for this input.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// A validated idea. Both fields are trimmed and non-empty.
///
/// This is also the request body of the analysis call, so it serializes as
/// `{"title": ..., "description": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupIdea {
    title: String,
    description: String,
}

impl StartupIdea {
    /// Validates a draft, trimming both fields.
    ///
    /// The title is checked before the description.
    pub fn parse(draft: &IdeaDraft) -> Result<Self, ValidationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let description = draft.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        Ok(Self {
            title: title.to_string(),
            description: description.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
