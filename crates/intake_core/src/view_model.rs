use crate::{PreviewId, SubmissionState, UploadMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub mode: UploadMode,
    pub multiple: bool,
    pub files: Vec<StagedFileView>,
    pub active_preview: Option<usize>,
    pub show_thumbnail_strip: bool,
    pub has_selection: bool,
    pub category: String,
    pub show_category_input: bool,
    pub submission: SubmissionState,
    pub submit_enabled: bool,
    pub select_label: String,
    pub submit_label: String,
    pub last_error: Option<String>,
    pub has_result: bool,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn active_file(&self) -> Option<&StagedFileView> {
        self.active_preview.and_then(|index| self.files.get(index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFileView {
    pub index: usize,
    pub name: String,
    pub mime_type: String,
    pub size: usize,
    pub preview_id: PreviewId,
}
