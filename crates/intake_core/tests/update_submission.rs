use intake_core::{
    update, AppState, Effect, Msg, Notification, Severity, StagedFile, SubmissionRequest,
    SubmissionState, UploadConfig, UploadMode,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn images(count: usize) -> Vec<StagedFile> {
    (0..count)
        .map(|i| StagedFile::new(format!("img{i}.jpg"), "image/jpeg", vec![0xFF, 0xD8, i as u8]))
        .collect()
}

fn staged(config: UploadConfig, count: usize) -> AppState {
    let (state, _) = update(AppState::new(config), Msg::FilesPicked(images(count)));
    state
}

fn submit(state: AppState) -> (AppState, Vec<Effect>) {
    update(state, Msg::SubmitClicked)
}

fn single_request(effects: &[Effect]) -> &SubmissionRequest {
    assert_eq!(effects.len(), 1, "expected exactly one effect: {effects:?}");
    match &effects[0] {
        Effect::Submit(request) => request,
        other => panic!("expected submit, got {other:?}"),
    }
}

#[test]
fn submit_without_selection_warns_and_sends_nothing() {
    let (state, effects) = submit(AppState::new(UploadConfig::default()));

    assert_eq!(
        effects,
        vec![Effect::Notify(Notification::warning("No file selected", None))]
    );
    assert_eq!(state.submission_state(), SubmissionState::Idle);
}

#[test]
fn label_mode_blank_category_blocks_silently() {
    for category in ["", "   ", "\t\n"] {
        let state = staged(UploadConfig::label("/populate"), 2);
        let (state, _) = update(state, Msg::CategoryChanged(category.to_string()));
        assert!(!state.view().submit_enabled);

        let (state, effects) = submit(state);
        assert!(effects.is_empty());
        assert_eq!(state.submission_state(), SubmissionState::Idle);
        assert_eq!(state.view().files.len(), 2);
    }
}

#[test]
fn classify_mode_submits_single_field_without_category() {
    let state = staged(UploadConfig::classify("/analyse"), 3);
    let (state, _) = update(state, Msg::CategoryChanged("ignored".into()));

    let (state, effects) = submit(state);
    let request = single_request(&effects);

    assert_eq!(request.submission_id, 1);
    assert_eq!(request.endpoint, "/analyse");
    assert_eq!(request.field_name, "file");
    assert_eq!(request.files, images(3));
    assert_eq!(request.category, None);
    assert_eq!(state.submission_state(), SubmissionState::InFlight);
    assert_eq!(state.view().submit_label, "Processing...");
    assert!(!state.view().submit_enabled);
}

#[test]
fn label_mode_sends_trimmed_category_under_files() {
    let state = staged(UploadConfig::label("/populate"), 2);
    let (state, _) = update(state, Msg::CategoryChanged("  plastic \n".into()));

    let (_state, effects) = submit(state);
    let request = single_request(&effects);

    assert_eq!(request.field_name, "files");
    assert_eq!(request.category.as_deref(), Some("plastic"));
}

#[test]
fn payload_reflects_removal_made_before_submit() {
    let state = staged(
        UploadConfig {
            endpoint: "/analyse".into(),
            multiple: true,
            mode: UploadMode::Classify,
        },
        3,
    );
    let (state, _) = update(state, Msg::RemoveFileClicked { index: 0 });

    let (_state, effects) = submit(state);
    let names: Vec<&str> = single_request(&effects)
        .files
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["img1.jpg", "img2.jpg"]);
}

#[test]
fn second_submit_while_in_flight_is_ignored() {
    let state = staged(UploadConfig::default(), 1);
    let (state, _) = submit(state);

    let (state, effects) = submit(state);
    assert!(effects.is_empty());
    assert!(state.is_in_flight());
}

#[test]
fn success_forwards_result_and_clears_selection() {
    let state = staged(UploadConfig::default(), 3);
    let (state, _) = submit(state);
    let result = json!({ "result": "Yes", "items": ["bottle"] });

    let (mut state, effects) = update(
        state,
        Msg::SubmissionFinished {
            submission_id: 1,
            outcome: Ok(result.clone()),
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::ResultChanged(Some(result)),
            Effect::RevokePreview { preview_id: 1 },
            Effect::RevokePreview { preview_id: 2 },
            Effect::RevokePreview { preview_id: 3 },
            Effect::SelectionChanged {
                has_selection: false
            },
        ]
    );
    let view = state.view();
    assert!(!view.has_selection);
    assert!(view.has_result);
    assert_eq!(view.submission, SubmissionState::Idle);
    assert_eq!(view.submit_label, "Analyze Image");
    assert!(state.consume_dirty());
}

#[test]
fn single_file_result_is_forwarded_unchanged() {
    let state = staged(UploadConfig::classify("/analyse"), 1);
    let (state, _) = submit(state);
    let result = json!({ "result": "No" });

    let (_state, effects) = update(
        state,
        Msg::SubmissionFinished {
            submission_id: 1,
            outcome: Ok(result.clone()),
        },
    );

    assert_eq!(effects[0], Effect::ResultChanged(Some(result)));
}

#[test]
fn service_error_body_is_a_result_not_a_failure() {
    let state = staged(UploadConfig::label("/populate"), 2);
    let (state, _) = update(state, Msg::CategoryChanged("glass".into()));
    let (state, _) = submit(state);
    let reply = json!({ "error": "No file uploaded" });

    let (state, effects) = update(
        state,
        Msg::SubmissionFinished {
            submission_id: 1,
            outcome: Ok(reply.clone()),
        },
    );

    assert_eq!(effects[0], Effect::ResultChanged(Some(reply)));
    assert!(effects.contains(&Effect::SelectionChanged {
        has_selection: false
    }));
    assert!(!effects.iter().any(|effect| matches!(effect, Effect::Notify(_))));
    assert_eq!(state.submission_state(), SubmissionState::Idle);
    assert!(state.view().files.is_empty());
}

#[test]
fn failure_keeps_selection_for_retry() {
    let state = staged(UploadConfig::default(), 3);
    let (state, _) = submit(state);

    let (state, effects) = update(
        state,
        Msg::SubmissionFinished {
            submission_id: 1,
            outcome: Err("connection refused".into()),
        },
    );

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::Notify(notification) => {
            assert_eq!(notification.severity, Severity::Error);
            assert_eq!(notification.title, "Upload failed");
            assert_eq!(notification.description.as_deref(), Some("connection refused"));
            assert_eq!(notification.duration, Notification::ERROR_DURATION);
        }
        other => panic!("unexpected effect {other:?}"),
    }
    let view = state.view();
    assert_eq!(view.files.len(), 3);
    assert!(view.submit_enabled);
    assert!(!view.has_result);
    assert_eq!(view.submission, SubmissionState::Error);
    assert_eq!(view.last_error.as_deref(), Some("connection refused"));

    // Retry without re-selecting.
    let (state, effects) = submit(state);
    let request = single_request(&effects);
    assert_eq!(request.submission_id, 2);
    assert_eq!(request.files.len(), 3);
    assert_eq!(state.submission_state(), SubmissionState::InFlight);
}

#[test]
fn stale_completion_is_ignored() {
    let state = staged(UploadConfig::default(), 1);
    let (state, _) = submit(state);

    let (state, effects) = update(
        state,
        Msg::SubmissionFinished {
            submission_id: 42,
            outcome: Ok(json!({ "result": "Yes" })),
        },
    );

    assert!(effects.is_empty());
    assert!(state.is_in_flight());
}

#[test]
fn files_picked_during_upload_survive_success() {
    let state = staged(UploadConfig::label("/populate"), 2);
    let (state, _) = update(state, Msg::CategoryChanged("glass".into()));
    let (state, _) = submit(state);
    let (state, _) = update(state, Msg::FilesPicked(images(1)));

    let (state, effects) = update(
        state,
        Msg::SubmissionFinished {
            submission_id: 1,
            outcome: Ok(json!({ "category": "glass", "labelsAdded": 4 })),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::ResultChanged(Some(
            json!({ "category": "glass", "labelsAdded": 4 })
        ))]
    );
    assert_eq!(state.view().files.len(), 1);
    assert_eq!(state.submission_state(), SubmissionState::Idle);
}

#[test]
fn labels_follow_multiple_flag() {
    let single = AppState::new(UploadConfig::classify("/analyse")).view();
    assert_eq!(single.select_label, "Select Image");
    assert_eq!(single.submit_label, "Analyze Image");
    assert!(!single.show_category_input);

    let batch = AppState::new(UploadConfig::label("/populate")).view();
    assert_eq!(batch.select_label, "Select Images");
    assert_eq!(batch.submit_label, "Analyze Images");
    assert!(batch.show_category_input);
}
