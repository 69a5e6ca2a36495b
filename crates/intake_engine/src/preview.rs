use std::collections::HashMap;

use bytes::Bytes;
use intake_logging::{intake_debug, intake_warn};
use url::form_urlencoded::byte_serialize;

const SCHEME: &str = "preview://";

/// A revocable reference to bytes that are already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    pub id: u64,
    pub url: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// Live preview handles keyed by id.
///
/// Dropping the registry releases whatever is still live and logs it, since
/// every handle should have been revoked explicitly before that.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: HashMap<u64, PreviewHandle>,
    created: u64,
    revoked: u64,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle for `id` and return its URL.
    pub fn create(&mut self, id: u64, name: &str, mime_type: &str, data: Bytes) -> String {
        if let Some(existing) = self.live.get(&id) {
            intake_warn!("Preview {} already live; keeping {}", id, existing.url);
            return existing.url.clone();
        }
        let encoded: String = byte_serialize(name.as_bytes()).collect();
        let url = format!("{SCHEME}{id}/{encoded}");
        self.live.insert(
            id,
            PreviewHandle {
                id,
                url: url.clone(),
                mime_type: mime_type.to_string(),
                data,
            },
        );
        self.created += 1;
        intake_debug!("Created preview {}", url);
        url
    }

    /// Release a handle. Returns `false` if it was never created or already revoked.
    pub fn revoke(&mut self, id: u64) -> bool {
        match self.live.remove(&id) {
            Some(handle) => {
                self.revoked += 1;
                intake_debug!("Revoked preview {}", handle.url);
                true
            }
            None => {
                intake_warn!("Preview {} is not live; nothing to revoke", id);
                false
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<&PreviewHandle> {
        self.live.get(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created_count(&self) -> u64 {
        self.created
    }

    pub fn revoked_count(&self) -> u64 {
        self.revoked
    }
}

impl Drop for PreviewRegistry {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            let mut ids: Vec<u64> = self.live.keys().copied().collect();
            ids.sort_unstable();
            intake_warn!("Releasing {} leaked preview(s): {:?}", ids.len(), ids);
            self.live.clear();
        }
    }
}
