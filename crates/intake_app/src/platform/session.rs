use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use intake_core::{Msg, UploadMode};
use intake_engine::{load_files, EngineHandle, ACCEPT_IMAGES};
use intake_logging::{intake_info, intake_warn};

use super::app::Host;
use super::console::ConsoleCallbacks;
use super::effects::{to_staged, EffectRunner};
use super::{render, settings};
use crate::cli::{Cli, Command};

/// Extra time allowed beyond the request timeout before giving up on the engine.
const SETTLE_MARGIN: Duration = Duration::from_secs(5);

/// Pick, stage, optionally prune, then submit once and wait for the answer.
pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    let settings_path = cli.config.clone().unwrap_or_else(settings::default_path);
    let mut settings = settings::load_or_create(&settings_path);
    if let Some(base_url) = &cli.base_url {
        settings.base_url = base_url.clone();
    }

    let (mode, multiple, category, paths): (UploadMode, bool, Option<String>, Vec<PathBuf>) =
        match cli.command {
            Command::Classify { multiple, files } => (UploadMode::Classify, multiple, None, files),
            Command::Label { category, files } => {
                (UploadMode::Label, true, Some(category), files)
            }
        };

    let picked = load_files(&paths, ACCEPT_IMAGES)?;
    if !picked.skipped.is_empty() {
        intake_warn!("Ignored {} non-image file(s)", picked.skipped.len());
    }
    if picked.files.is_empty() {
        bail!("none of the given files is an image");
    }

    let engine = EngineHandle::new(settings.upload_settings()).context("starting upload engine")?;
    let config = settings.upload_config(mode, multiple);
    intake_info!(
        "Uploader ready: mode={:?} endpoint={} base={}",
        config.mode,
        config.endpoint,
        settings.base_url
    );
    let mut host = Host::new(config, EffectRunner::new(engine), ConsoleCallbacks::default());

    host.dispatch(Msg::FilesPicked(
        picked.files.into_iter().map(to_staged).collect(),
    ));
    if !host.callbacks().has_selection {
        bail!("selection rejected");
    }
    if let Some(category) = category {
        host.dispatch(Msg::CategoryChanged(category));
    }
    for index in &cli.remove {
        host.dispatch(Msg::RemoveFileClicked { index: *index });
    }
    if let Some(index) = cli.show {
        host.dispatch(Msg::PreviewSelected { index });
    }

    let view = host.view();
    for line in render::render_view(&view, host.previews()) {
        println!("{line}");
    }
    if !view.submit_enabled {
        bail!("a non-empty --category is required in label mode");
    }

    host.dispatch(Msg::SubmitClicked);
    if !host.wait_for_submission(settings.request_timeout() + SETTLE_MARGIN) {
        bail!("no answer from {}", settings.base_url);
    }
    if let Some(error) = host.state().last_error() {
        bail!("upload failed: {error}");
    }
    if host.callbacks().last_result.is_none() {
        match host.callbacks().notifications.last() {
            Some(notification) => bail!("nothing was submitted: {}", notification.title),
            None => bail!("nothing was submitted"),
        }
    }
    Ok(())
}
