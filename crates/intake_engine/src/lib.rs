//! Intake engine: upload pipeline, preview handles and local file IO.
mod engine;
mod persist;
mod preview;
mod source;
mod types;
mod upload;

pub use engine::EngineHandle;
pub use persist::{ensure_parent_dir, write_atomic, PersistError};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use source::{accepts, load_files, mime_from_path, PickOutcome, SourceError, ACCEPT_IMAGES};
pub use types::{
    EngineEvent, FailureKind, PickedFile, SubmissionId, UploadError, UploadJob, UploadOutput,
    UploadProgress, UploadStage,
};
pub use upload::{ProgressSink, ReqwestUploader, UploadSettings, Uploader, DEFAULT_BASE_URL};
