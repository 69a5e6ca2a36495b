use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use intake_logging::{intake_info, intake_warn};

use crate::upload::{ChannelProgressSink, ReqwestUploader, UploadSettings, Uploader};
use crate::{EngineEvent, UploadJob};

enum EngineCommand {
    Submit(UploadJob),
}

/// Runs uploads on a background tokio runtime and reports back over a channel.
///
/// There is no cancel command: an upload runs until it succeeds or fails.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: UploadSettings) -> io::Result<Self> {
        Self::with_uploader(Arc::new(ReqwestUploader::new(settings)))
    }

    pub fn with_uploader(uploader: Arc<dyn Uploader>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("intake-engine".into())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let uploader = uploader.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(uploader.as_ref(), command, event_tx).await;
                    });
                }
                // Let queued uploads finish before the runtime goes away.
                runtime.shutdown_timeout(Duration::from_secs(5));
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, job: UploadJob) {
        if self.cmd_tx.send(EngineCommand::Submit(job)).is_err() {
            intake_warn!("Engine thread is gone; upload dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    uploader: &dyn Uploader,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit(job) => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = uploader.upload(&job, &sink).await;
            match &result {
                Ok(output) => intake_info!(
                    "Submission {} completed with status {}",
                    job.submission_id,
                    output.status
                ),
                Err(err) => intake_warn!("Submission {} failed: {}", job.submission_id, err),
            }
            let _ = event_tx.send(EngineEvent::UploadCompleted {
                submission_id: job.submission_id,
                result,
            });
        }
    }
}
