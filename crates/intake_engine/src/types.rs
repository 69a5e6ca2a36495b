use std::fmt;

use bytes::Bytes;

pub type SubmissionId = u64;

/// A local file read by the picker, ready to be staged and uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub submission_id: SubmissionId,
    pub endpoint: String,
    pub field_name: String,
    pub files: Vec<PickedFile>,
    pub category: Option<String>,
}

impl UploadJob {
    pub fn payload_bytes(&self) -> u64 {
        self.files.iter().map(|file| file.data.len() as u64).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Sending,
    Receiving,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub submission_id: SubmissionId,
    pub stage: UploadStage,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress(UploadProgress),
    UploadCompleted {
        submission_id: SubmissionId,
        result: Result<UploadOutput, UploadError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutput {
    pub status: u16,
    pub body: serde_json::Value,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError {
    pub kind: FailureKind,
    pub message: String,
}

impl UploadError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for UploadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidJson,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidJson => write!(f, "invalid json"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
