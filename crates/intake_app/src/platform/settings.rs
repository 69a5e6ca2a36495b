use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use intake_core::{UploadConfig, UploadMode};
use intake_engine::{write_atomic, UploadSettings, DEFAULT_BASE_URL};
use intake_logging::{intake_error, intake_info, intake_warn};
use serde::{Deserialize, Serialize};

pub(crate) const SETTINGS_FILENAME: &str = ".intake_settings.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub base_url: String,
    pub classify_endpoint: String,
    pub label_endpoint: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            classify_endpoint: "/analyse".to_string(),
            label_endpoint: "/populate".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
            max_response_bytes: 1024 * 1024,
        }
    }
}

impl Settings {
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout(),
            max_response_bytes: self.max_response_bytes,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upload_config(&self, mode: UploadMode, multiple: bool) -> UploadConfig {
        let endpoint = match mode {
            UploadMode::Classify => self.classify_endpoint.clone(),
            UploadMode::Label => self.label_endpoint.clone(),
        };
        UploadConfig {
            endpoint,
            multiple,
            mode,
        }
    }
}

pub(crate) fn default_path() -> PathBuf {
    PathBuf::from(".").join(SETTINGS_FILENAME)
}

/// Load settings, writing the defaults out when no file exists yet.
pub(crate) fn load_or_create(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let settings = Settings::default();
            save(path, &settings);
            return settings;
        }
        Err(err) => {
            intake_warn!("Failed to read settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            intake_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            intake_warn!("Failed to parse settings from {:?}: {}", path, err);
            Settings::default()
        }
    }
}

pub(crate) fn save(path: &Path, settings: &Settings) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(settings, pretty) {
        Ok(text) => text,
        Err(err) => {
            intake_error!("Failed to serialize settings: {}", err);
            return;
        }
    };

    if let Err(err) = write_atomic(path, &content) {
        intake_error!("Failed to write settings to {:?}: {}", path, err);
    }
}
