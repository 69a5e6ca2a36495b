use std::sync::Once;

use intake_core::{
    update, AppState, Effect, Msg, Severity, StagedFile, UploadConfig, MAX_SELECTION,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(intake_logging::initialize_for_tests);
}

fn images(count: usize) -> Vec<StagedFile> {
    (0..count)
        .map(|i| StagedFile::new(format!("img{i}.png"), "image/png", vec![i as u8; 4]))
        .collect()
}

fn created(effects: &[Effect]) -> Vec<u64> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::CreatePreview { preview_id, .. } => Some(*preview_id),
            _ => None,
        })
        .collect()
}

fn revoked(effects: &[Effect]) -> Vec<u64> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::RevokePreview { preview_id } => Some(*preview_id),
            _ => None,
        })
        .collect()
}

fn pick(state: AppState, files: Vec<StagedFile>) -> (AppState, Vec<Effect>) {
    update(state, Msg::FilesPicked(files))
}

#[test]
fn picking_up_to_the_limit_creates_one_preview_each() {
    init_logging();
    for n in 1..=MAX_SELECTION {
        let (mut state, effects) = pick(AppState::new(UploadConfig::label("/populate")), images(n));
        let view = state.view();

        assert_eq!(created(&effects).len(), n);
        assert!(revoked(&effects).is_empty());
        assert_eq!(view.files.len(), n);
        assert_eq!(view.active_preview, Some(0));
        assert!(view.has_selection);
        assert!(state.consume_dirty());
    }
}

#[test]
fn first_pick_reports_selection_and_clears_result() {
    init_logging();
    let files = images(2);
    let (_state, effects) = pick(AppState::new(UploadConfig::default()), files.clone());

    assert_eq!(
        effects,
        vec![
            Effect::CreatePreview {
                preview_id: 1,
                file: files[0].clone(),
            },
            Effect::CreatePreview {
                preview_id: 2,
                file: files[1].clone(),
            },
            Effect::SelectionChanged {
                has_selection: true
            },
            Effect::ResultChanged(None),
        ]
    );
}

#[test]
fn repick_revokes_old_previews_before_creating_new_ones() {
    init_logging();
    let (state, _) = pick(AppState::new(UploadConfig::default()), images(3));
    let (state, effects) = pick(state, images(1));

    assert_eq!(revoked(&effects), vec![1, 2, 3]);
    assert_eq!(created(&effects), vec![4]);
    let first_create = effects
        .iter()
        .position(|e| matches!(e, Effect::CreatePreview { .. }))
        .unwrap();
    let last_revoke = effects
        .iter()
        .rposition(|e| matches!(e, Effect::RevokePreview { .. }))
        .unwrap();
    assert!(last_revoke < first_create);
    // Still selected, so no presence change is reported.
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::SelectionChanged { .. })));
    assert_eq!(state.view().files.len(), 1);
}

#[test]
fn oversize_pick_is_rejected_without_touching_state() {
    init_logging();
    let (state, _) = pick(AppState::new(UploadConfig::default()), images(2));
    let (mut state, _) = update(state, Msg::PreviewSelected { index: 1 });
    state.consume_dirty();
    let before = state.clone();

    let (mut next, effects) = pick(state, images(MAX_SELECTION + 1));

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::Notify(notification) => {
            assert_eq!(notification.severity, Severity::Warning);
            assert_eq!(notification.title, "Too many files");
        }
        other => panic!("unexpected effect {other:?}"),
    }
    assert!(!next.consume_dirty());
    assert_eq!(next, before);
    assert_eq!(next.view().active_preview, Some(1));
}

#[test]
fn empty_pick_is_ignored() {
    init_logging();
    let state = AppState::new(UploadConfig::default());
    let (next, effects) = pick(state.clone(), Vec::new());

    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn remove_keeps_order_and_revokes_exactly_one() {
    init_logging();
    let (state, _) = pick(AppState::new(UploadConfig::label("/populate")), images(4));

    let (state, effects) = update(state, Msg::RemoveFileClicked { index: 1 });

    assert_eq!(effects, vec![Effect::RevokePreview { preview_id: 2 }]);
    let names: Vec<String> = state.view().files.into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["img0.png", "img2.png", "img3.png"]);
}

#[test]
fn removing_active_last_file_clamps_pointer() {
    init_logging();
    let (state, _) = pick(AppState::new(UploadConfig::label("/populate")), images(3));
    let (state, _) = update(state, Msg::PreviewSelected { index: 2 });

    let (state, _) = update(state, Msg::RemoveFileClicked { index: 2 });
    let view = state.view();

    assert_eq!(view.active_preview, Some(1));
    assert_eq!(view.active_file().unwrap().name, "img1.png");
}

#[test]
fn removing_last_remaining_file_clears_selection_and_result() {
    init_logging();
    let (state, _) = pick(AppState::new(UploadConfig::default()), images(1));

    let (state, effects) = update(state, Msg::RemoveFileClicked { index: 0 });

    assert_eq!(
        effects,
        vec![
            Effect::RevokePreview { preview_id: 1 },
            Effect::SelectionChanged {
                has_selection: false
            },
            Effect::ResultChanged(None),
        ]
    );
    let view = state.view();
    assert!(!view.has_selection);
    assert_eq!(view.active_preview, None);
}

#[test]
fn remove_with_invalid_index_does_nothing() {
    init_logging();
    let (mut state, _) = pick(AppState::new(UploadConfig::default()), images(1));
    state.consume_dirty();

    let (mut next, effects) = update(state.clone(), Msg::RemoveFileClicked { index: 3 });

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(next, state);
}

#[test]
fn thumbnail_strip_only_for_several_files() {
    init_logging();
    let (state, _) = pick(AppState::new(UploadConfig::label("/populate")), images(1));
    assert!(!state.view().show_thumbnail_strip);

    let (state, _) = pick(state, images(2));
    assert!(state.view().show_thumbnail_strip);
}

#[test]
fn teardown_revokes_everything_once() {
    init_logging();
    let (state, _) = pick(AppState::new(UploadConfig::label("/populate")), images(3));
    let (state, _) = update(state, Msg::RemoveFileClicked { index: 0 });

    let (state, effects) = update(state, Msg::Teardown);
    assert_eq!(revoked(&effects), vec![2, 3]);

    let (_state, effects) = update(state, Msg::Teardown);
    assert!(effects.is_empty());
}

#[test]
fn every_created_preview_is_revoked_exactly_once() {
    init_logging();
    let mut all = Vec::new();
    let state = AppState::new(UploadConfig::label("/populate"));

    let (state, effects) = pick(state, images(3));
    all.extend(effects);
    let (state, effects) = update(state, Msg::RemoveFileClicked { index: 1 });
    all.extend(effects);
    let (state, effects) = pick(state, images(MAX_SELECTION + 2));
    all.extend(effects);
    let (state, effects) = pick(state, images(2));
    all.extend(effects);
    let (state, effects) = update(state, Msg::RemoveFileClicked { index: 0 });
    all.extend(effects);
    let (_state, effects) = update(state, Msg::Teardown);
    all.extend(effects);

    let mut created = created(&all);
    let mut revoked = revoked(&all);
    created.sort_unstable();
    revoked.sort_unstable();
    assert_eq!(created, vec![1, 2, 3, 4, 5]);
    assert_eq!(revoked, created);
}
