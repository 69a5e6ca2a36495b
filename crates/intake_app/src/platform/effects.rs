use std::time::Duration;

use intake_core::{Effect, Msg, Notification, Severity, StagedFile, SubmissionRequest};
use intake_engine::{EngineEvent, EngineHandle, PickedFile, PreviewRegistry, UploadJob};
use intake_logging::{intake_debug, intake_error, intake_info, intake_warn};

/// What the host page is told about.
pub(crate) trait HostCallbacks {
    fn on_selection_changed(&mut self, has_selection: bool);
    fn on_result(&mut self, result: Option<&serde_json::Value>);
    fn on_notification(&mut self, notification: &Notification);
}

pub(crate) struct EffectRunner {
    engine: EngineHandle,
    previews: PreviewRegistry,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            previews: PreviewRegistry::new(),
        }
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn run(&mut self, effects: Vec<Effect>, callbacks: &mut dyn HostCallbacks) {
        for effect in effects {
            match effect {
                Effect::CreatePreview { preview_id, file } => {
                    self.previews
                        .create(preview_id, &file.name, &file.mime_type, file.data);
                }
                Effect::RevokePreview { preview_id } => {
                    self.previews.revoke(preview_id);
                }
                Effect::SelectionChanged { has_selection } => {
                    callbacks.on_selection_changed(has_selection);
                }
                Effect::ResultChanged(result) => {
                    callbacks.on_result(result.as_ref());
                }
                Effect::Notify(notification) => {
                    log_notification(&notification);
                    callbacks.on_notification(&notification);
                }
                Effect::Submit(request) => {
                    intake_info!(
                        "Submit submission_id={} endpoint={} files={} category={:?}",
                        request.submission_id,
                        request.endpoint,
                        request.files.len(),
                        request.category
                    );
                    self.engine.submit(to_job(request));
                }
            }
        }
    }

    /// Wait up to `timeout` for the next engine event that the core cares about.
    pub fn poll(&self, timeout: Duration) -> Option<Msg> {
        match self.engine.recv_timeout(timeout)? {
            EngineEvent::Progress(progress) => {
                intake_debug!(
                    "Submission {} {:?} bytes={}",
                    progress.submission_id,
                    progress.stage,
                    progress.bytes
                );
                Some(Msg::NoOp)
            }
            EngineEvent::UploadCompleted {
                submission_id,
                result,
            } => Some(Msg::SubmissionFinished {
                submission_id,
                outcome: result.map(|output| output.body).map_err(|err| err.to_string()),
            }),
        }
    }
}

pub(crate) fn to_staged(file: PickedFile) -> StagedFile {
    StagedFile::new(file.name, file.mime_type, file.data)
}

fn to_job(request: SubmissionRequest) -> UploadJob {
    UploadJob {
        submission_id: request.submission_id,
        endpoint: request.endpoint,
        field_name: request.field_name.to_string(),
        files: request
            .files
            .into_iter()
            .map(|file| PickedFile {
                name: file.name,
                mime_type: file.mime_type,
                data: file.data,
            })
            .collect(),
        category: request.category,
    }
}

fn log_notification(notification: &Notification) {
    let description = notification.description.as_deref().unwrap_or("");
    match notification.severity {
        Severity::Info => intake_info!("{} {}", notification.title, description),
        Severity::Warning => intake_warn!("{} {}", notification.title, description),
        Severity::Error => intake_error!("{} {}", notification.title, description),
    }
}
