//! Intake core: pure selection/submission state machine and view-model helpers.
mod effect;
mod msg;
mod selection;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notification, Severity, SubmissionRequest};
pub use msg::Msg;
pub use selection::{
    PreviewId, SelectRejected, SelectionChange, SelectionStore, StagedFile, MAX_SELECTION,
};
pub use state::{AppState, SubmissionId, SubmissionState, UploadConfig, UploadMode};
pub use update::update;
pub use view_model::{AppViewModel, StagedFileView};
