use std::time::Duration;

use futures_util::StreamExt;
use intake_logging::{intake_debug, intake_info, intake_warn};
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::{
    EngineEvent, FailureKind, SubmissionId, UploadError, UploadJob, UploadOutput, UploadProgress,
    UploadStage,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_response_bytes: 1024 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub(crate) struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub(crate) fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        job: &UploadJob,
        sink: &dyn ProgressSink,
    ) -> Result<UploadOutput, UploadError>;
}

/// Sends one multipart POST per job and decodes the JSON reply.
#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, UploadError> {
        Url::parse(&self.settings.base_url)
            .and_then(|base| base.join(endpoint))
            .map_err(|err| UploadError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn build_client(&self) -> Result<reqwest::Client, UploadError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| UploadError::new(FailureKind::Network, err.to_string()))
    }

    fn too_large(&self, actual: u64) -> UploadError {
        UploadError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_response_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

fn build_form(job: &UploadJob) -> Result<Form, UploadError> {
    let mut form = Form::new();
    for file in &job.files {
        let part = Part::stream_with_length(file.data.clone(), file.data.len() as u64)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|err| UploadError::new(FailureKind::InvalidRequest, err.to_string()))?;
        form = form.part(job.field_name.clone(), part);
    }
    if let Some(category) = &job.category {
        form = form.text("category", category.clone());
    }
    Ok(form)
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(
        &self,
        job: &UploadJob,
        sink: &dyn ProgressSink,
    ) -> Result<UploadOutput, UploadError> {
        let url = self.endpoint_url(&job.endpoint)?;
        let client = self.build_client()?;
        let form = build_form(job)?;

        intake_info!(
            "Uploading submission={} files={} field={} url={}",
            job.submission_id,
            job.files.len(),
            job.field_name,
            url
        );
        emit_progress(
            sink,
            job.submission_id,
            UploadStage::Sending,
            job.payload_bytes(),
        );

        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_response_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_response_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
            emit_progress(
                sink,
                job.submission_id,
                UploadStage::Receiving,
                bytes.len() as u64,
            );
        }

        // Any JSON reply is forwarded, whatever the status.
        let body: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(UploadError::new(
                    FailureKind::HttpStatus(status.as_u16()),
                    status.to_string(),
                ));
            }
            Err(err) => return Err(UploadError::new(FailureKind::InvalidJson, err.to_string())),
        };
        if !status.is_success() {
            intake_warn!(
                "Upload submission={} answered {}: {}",
                job.submission_id,
                status,
                server_error_message(&body).unwrap_or("no error field")
            );
        }
        intake_debug!(
            "Upload submission={} answered {} with {} bytes",
            job.submission_id,
            status,
            bytes.len()
        );
        emit_progress(sink, job.submission_id, UploadStage::Done, bytes.len() as u64);

        Ok(UploadOutput {
            status: status.as_u16(),
            body,
            byte_len: bytes.len() as u64,
        })
    }
}

fn emit_progress(
    sink: &dyn ProgressSink,
    submission_id: SubmissionId,
    stage: UploadStage,
    bytes: u64,
) {
    sink.emit(EngineEvent::Progress(UploadProgress {
        submission_id,
        stage,
        bytes,
    }));
}

/// The service reports failures as `{"error": "..."}`.
fn server_error_message(body: &serde_json::Value) -> Option<&str> {
    body.get("error").and_then(serde_json::Value::as_str)
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(FailureKind::Timeout, err.to_string());
    }
    UploadError::new(FailureKind::Network, err.to_string())
}
