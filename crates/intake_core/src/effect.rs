use std::time::Duration;

use crate::selection::{PreviewId, StagedFile};
use crate::state::SubmissionId;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Allocate a preview handle for a newly staged file.
    CreatePreview { preview_id: PreviewId, file: StagedFile },
    /// Release a preview handle. Emitted exactly once per created preview.
    RevokePreview { preview_id: PreviewId },
    /// Host callback: the presence of a selection flipped.
    SelectionChanged { has_selection: bool },
    /// Host callback: a new result, or `None` to clear the displayed one.
    ResultChanged(Option<serde_json::Value>),
    Notify(Notification),
    /// Send the staged files to the remote service.
    Submit(SubmissionRequest),
}

/// Everything the engine needs to build the multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub submission_id: SubmissionId,
    pub endpoint: String,
    pub field_name: &'static str,
    pub files: Vec<StagedFile>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A transient, user-facing message (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub description: Option<String>,
    pub duration: Duration,
}

impl Notification {
    pub const WARNING_DURATION: Duration = Duration::from_secs(3);
    pub const ERROR_DURATION: Duration = Duration::from_secs(5);

    pub fn warning(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            severity: Severity::Warning,
            title: title.into(),
            description,
            duration: Self::WARNING_DURATION,
        }
    }

    pub fn error(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            description,
            duration: Self::ERROR_DURATION,
        }
    }
}
