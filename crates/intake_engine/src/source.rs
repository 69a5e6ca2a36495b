use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use intake_logging::intake_warn;
use thiserror::Error;

use crate::PickedFile;

/// The picker's `accept` filter.
pub const ACCEPT_IMAGES: &str = "image/*";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{0:?} has no file name")]
    NoFileName(PathBuf),
}

#[derive(Debug, Default)]
pub struct PickOutcome {
    pub files: Vec<PickedFile>,
    /// Paths rejected by the accept filter.
    pub skipped: Vec<PathBuf>,
}

pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Matches a MIME type against an `accept` list such as `image/*,application/pdf`.
pub fn accepts(accept: &str, mime_type: &str) -> bool {
    accept.split(',').map(str::trim).any(|pattern| {
        match pattern.strip_suffix("/*") {
            Some(major) => mime_type
                .split('/')
                .next()
                .is_some_and(|m| m.eq_ignore_ascii_case(major)),
            None => pattern.eq_ignore_ascii_case(mime_type),
        }
    })
}

/// Read picked paths in order, skipping those the accept filter rejects.
pub fn load_files(paths: &[PathBuf], accept: &str) -> Result<PickOutcome, SourceError> {
    let mut outcome = PickOutcome::default();
    for path in paths {
        let mime_type = mime_from_path(path);
        if !accepts(accept, mime_type) {
            intake_warn!("Skipping {:?}: {} not accepted by {}", path, mime_type, accept);
            outcome.skipped.push(path.clone());
            continue;
        }
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SourceError::NoFileName(path.clone()))?
            .to_string();
        let data = fs::read(path).map_err(|source| SourceError::Read {
            path: path.clone(),
            source,
        })?;
        outcome.files.push(PickedFile {
            name,
            mime_type: mime_type.to_string(),
            data: Bytes::from(data),
        });
    }
    Ok(outcome)
}
