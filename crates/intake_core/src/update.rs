use crate::selection::{PreviewId, SelectRejected, MAX_SELECTION};
use crate::{AppState, Effect, Msg, Notification, StagedFile, SubmissionId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesPicked(files) => select_files(&mut state, files),
        Msg::RemoveFileClicked { index } => remove_file(&mut state, index),
        Msg::PreviewSelected { index } => {
            if state.selection_mut().set_active_preview_index(index) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CategoryChanged(text) => {
            state.set_category(text);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::SubmissionFinished {
            submission_id,
            outcome,
        } => finish_submission(&mut state, submission_id, outcome),
        Msg::Teardown => {
            let revoked = state.selection_mut().clear();
            if !revoked.is_empty() {
                state.mark_dirty();
            }
            revoke(revoked).collect()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn select_files(state: &mut AppState, files: Vec<StagedFile>) -> Vec<Effect> {
    let had_selection = !state.selection().is_empty();
    let change = match state.selection_mut().select_files(files) {
        Ok(change) => change,
        Err(SelectRejected::Empty) => return Vec::new(),
        Err(SelectRejected::TooMany { count }) => {
            return vec![Effect::Notify(Notification::warning(
                "Too many files",
                Some(format!(
                    "You can select at most {MAX_SELECTION} images at a time ({count} picked)."
                )),
            ))];
        }
    };

    state.clear_error();
    state.set_has_result(false);
    state.mark_dirty();

    let mut effects = Vec::with_capacity(change.revoked.len() + change.created.len() + 2);
    effects.extend(revoke(change.revoked));
    effects.extend(
        change
            .created
            .into_iter()
            .map(|(preview_id, file)| Effect::CreatePreview { preview_id, file }),
    );
    if !had_selection {
        effects.push(Effect::SelectionChanged {
            has_selection: true,
        });
    }
    // A fresh batch makes any displayed result stale.
    effects.push(Effect::ResultChanged(None));
    effects
}

fn remove_file(state: &mut AppState, index: usize) -> Vec<Effect> {
    let Some(preview_id) = state.selection_mut().remove_file(index) else {
        return Vec::new();
    };
    state.clear_error();
    state.mark_dirty();

    let mut effects = vec![Effect::RevokePreview { preview_id }];
    if state.selection().is_empty() {
        state.set_has_result(false);
        effects.push(Effect::SelectionChanged {
            has_selection: false,
        });
        effects.push(Effect::ResultChanged(None));
    }
    effects
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    // Both gates mirror a disabled button: nothing is sent and nothing is reported.
    if state.is_in_flight() || !state.category_ready() {
        return Vec::new();
    }
    if state.selection().is_empty() {
        return vec![Effect::Notify(Notification::warning(
            "No file selected",
            None,
        ))];
    }

    vec![Effect::Submit(state.begin_submission())]
}

fn finish_submission(
    state: &mut AppState,
    submission_id: SubmissionId,
    outcome: Result<serde_json::Value, String>,
) -> Vec<Effect> {
    let Some(selection_unchanged) = state.finish_submission(submission_id) else {
        return Vec::new();
    };

    match outcome {
        Ok(result) => {
            state.set_has_result(true);
            let mut effects = vec![Effect::ResultChanged(Some(result))];
            // Files picked while the upload ran were never sent; keep them.
            if selection_unchanged {
                let revoked = state.selection_mut().clear();
                if !revoked.is_empty() {
                    effects.extend(revoke(revoked));
                    effects.push(Effect::SelectionChanged {
                        has_selection: false,
                    });
                }
            }
            effects
        }
        Err(message) => {
            state.set_error(message.clone());
            vec![Effect::Notify(Notification::error(
                "Upload failed",
                Some(message),
            ))]
        }
    }
}

fn revoke(preview_ids: Vec<PreviewId>) -> impl Iterator<Item = Effect> {
    preview_ids
        .into_iter()
        .map(|preview_id| Effect::RevokePreview { preview_id })
}
