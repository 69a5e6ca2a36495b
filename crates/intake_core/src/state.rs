use crate::effect::SubmissionRequest;
use crate::selection::SelectionStore;
use crate::view_model::{AppViewModel, StagedFileView};

pub type SubmissionId = u64;

/// What the host page is doing with the uploaded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    /// Ask the service to classify the image(s).
    #[default]
    Classify,
    /// Feed labelled examples back to the service; a category is required.
    Label,
}

/// Per-instance configuration supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub endpoint: String,
    pub multiple: bool,
    pub mode: UploadMode,
}

impl UploadConfig {
    pub fn classify(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            multiple: false,
            mode: UploadMode::Classify,
        }
    }

    pub fn label(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            multiple: true,
            mode: UploadMode::Label,
        }
    }

    /// Multipart field the staged files are sent under.
    pub fn field_name(&self) -> &'static str {
        if self.multiple {
            "files"
        } else {
            "file"
        }
    }

    pub fn requires_category(&self) -> bool {
        self.mode == UploadMode::Label
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::classify("/analyse")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    /// Idle, with the last failure still on display.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    submission_id: SubmissionId,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    config: UploadConfig,
    selection: SelectionStore,
    category: String,
    in_flight: Option<InFlight>,
    last_submission_id: SubmissionId,
    has_result: bool,
    last_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub(crate) fn selection_mut(&mut self) -> &mut SelectionStore {
        &mut self.selection
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub(crate) fn set_category(&mut self, category: String) {
        if self.category != category {
            self.category = category;
            self.dirty = true;
        }
    }

    /// True unless the mode needs a category and the trimmed tag is blank.
    pub fn category_ready(&self) -> bool {
        !self.config.requires_category() || !self.category.trim().is_empty()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn submission_state(&self) -> SubmissionState {
        match (&self.in_flight, &self.last_error) {
            (Some(_), _) => SubmissionState::InFlight,
            (None, Some(_)) => SubmissionState::Error,
            (None, None) => SubmissionState::Idle,
        }
    }

    /// Snapshot the current selection into a request and mark it in flight.
    pub(crate) fn begin_submission(&mut self) -> SubmissionRequest {
        self.last_submission_id += 1;
        let submission_id = self.last_submission_id;
        self.in_flight = Some(InFlight {
            submission_id,
            generation: self.selection.generation(),
        });
        self.last_error = None;
        self.dirty = true;

        let category = match self.config.mode {
            UploadMode::Label => Some(self.category.trim().to_string()),
            UploadMode::Classify => None,
        };

        SubmissionRequest {
            submission_id,
            endpoint: self.config.endpoint.clone(),
            field_name: self.config.field_name(),
            files: self.selection.files().cloned().collect(),
            category,
        }
    }

    /// Ends the in-flight submission if `submission_id` matches it.
    /// Returns whether the selection is still the one that was submitted.
    pub(crate) fn finish_submission(&mut self, submission_id: SubmissionId) -> Option<bool> {
        let in_flight = self
            .in_flight
            .filter(|in_flight| in_flight.submission_id == submission_id)?;
        self.in_flight = None;
        self.dirty = true;
        Some(in_flight.generation == self.selection.generation())
    }

    pub fn has_result(&self) -> bool {
        self.has_result
    }

    pub(crate) fn set_has_result(&mut self, has_result: bool) {
        self.has_result = has_result;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.last_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn clear_error(&mut self) {
        if self.last_error.take().is_some() {
            self.dirty = true;
        }
    }

    pub fn view(&self) -> AppViewModel {
        let files: Vec<StagedFileView> = self
            .selection
            .files()
            .zip(self.selection.preview_ids())
            .enumerate()
            .map(|(index, (file, preview_id))| StagedFileView {
                index,
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
                size: file.size(),
                preview_id,
            })
            .collect();
        let plural = if self.config.multiple { "s" } else { "" };
        let submission = self.submission_state();

        AppViewModel {
            mode: self.config.mode,
            multiple: self.config.multiple,
            show_thumbnail_strip: files.len() > 1,
            has_selection: !files.is_empty(),
            files,
            active_preview: self.selection.active_index(),
            category: self.category.clone(),
            show_category_input: self.config.requires_category(),
            submission,
            submit_enabled: !self.is_in_flight() && self.category_ready(),
            select_label: format!("Select Image{plural}"),
            submit_label: if submission == SubmissionState::InFlight {
                "Processing...".to_string()
            } else {
                format!("Analyze Image{plural}")
            },
            last_error: self.last_error.clone(),
            has_result: self.has_result,
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns and resets the render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
