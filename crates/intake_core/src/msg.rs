#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The picker produced a whole new ordered batch of files.
    FilesPicked(Vec<crate::StagedFile>),
    /// User removed one staged file.
    RemoveFileClicked { index: usize },
    /// User picked a thumbnail from the strip.
    PreviewSelected { index: usize },
    /// User edited the category text box.
    CategoryChanged(String),
    /// User clicked Analyze.
    SubmitClicked,
    /// Engine completion for a submission.
    SubmissionFinished {
        submission_id: crate::SubmissionId,
        outcome: Result<serde_json::Value, String>,
    },
    /// The host is going away; release everything.
    Teardown,
    /// Engine progress reports; they change nothing in the core.
    NoOp,
}
