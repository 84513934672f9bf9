//! End-to-end editor flows against the in-memory store

use mortgage_core::{EditPhase, EditView, EditorError, EditorEvent, Operation};
use mortgage_schema::RecordId;
use mortgage_test_utils::{
    persisted_records, setup_editor, valid_raw_record, FailureMode, Harness, InMemoryStore, StoreOp,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn fill_form(h: &Harness) {
    for (name, value) in valid_raw_record().iter() {
        h.editor.set_form_field(name, value).unwrap();
    }
}

fn draft_value(h: &Harness, name: &str) -> Option<String> {
    match h.editor.snapshot().edit {
        EditView::Editing { values, .. } => values.get(name).map(str::to_string),
        EditView::Viewing => None,
    }
}

#[tokio::test]
async fn valid_create_refreshes_once_and_resets_form() {
    let h = setup_editor(InMemoryStore::new());
    h.editor.refresh().await.unwrap();
    fill_form(&h);

    h.editor.submit_create().await.unwrap();

    assert_eq!(h.store.calls(StoreOp::Create), 1);
    assert_eq!(h.store.calls(StoreOp::List), 2);
    let snapshot = h.editor.snapshot();
    assert_eq!(snapshot.form.values, h.editor.schema().initial_record());
    assert!(snapshot.form.errors.is_empty());
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.records[0].get("loan_amount"), Some(&json!(300000.0)));
    assert_eq!(snapshot.records[0].get("credit_score"), Some(&json!(700)));

    let successes = h.notifier.successes();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].message, "Mortgage added successfully");
}

#[tokio::test]
async fn invalid_create_issues_no_remote_call() {
    let h = setup_editor(InMemoryStore::new());
    fill_form(&h);
    h.editor.set_form_field("loan_amount", "abc").unwrap();
    h.editor.set_form_field("credit_score", "851").unwrap();

    let err = h.editor.submit_create().await.unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains("loan_amount"));
    assert!(errors.contains("credit_score"));

    assert_eq!(h.store.calls(StoreOp::Create), 0);
    assert_eq!(h.editor.snapshot().form.values.get("loan_amount"), Some("abc"));
    assert!(h.notifier.all().is_empty());
}

#[tokio::test]
async fn failed_create_keeps_form_and_skips_refresh() {
    let h = setup_editor(InMemoryStore::new());
    fill_form(&h);
    h.store.fail_next(StoreOp::Create, FailureMode::Rejected(500));
    let before = h.editor.snapshot().form.values;

    let err = h.editor.submit_create().await.unwrap_err();
    assert!(err.is_remote());

    assert_eq!(h.store.calls(StoreOp::List), 0);
    assert_eq!(h.editor.snapshot().form.values, before);
    assert_eq!(h.notifier.failures().len(), 1);
    assert!(h.notifier.successes().is_empty());

    // unchanged input can be resubmitted
    h.editor.submit_create().await.unwrap();
    assert_eq!(h.store.records().len(), 1);
}

#[tokio::test]
async fn edit_save_round_trip() {
    let h = setup_editor(InMemoryStore::with_records(persisted_records(2)));
    h.editor.refresh().await.unwrap();

    h.editor.start_edit(RecordId(2)).unwrap();
    assert_eq!(draft_value(&h, "credit_score").as_deref(), Some("620"));
    h.editor.set_edit_field("loan_amount", "275000.5").unwrap();
    h.editor.save_edit().await.unwrap();

    assert_eq!(h.editor.edit_phase(), EditPhase::Viewing);
    let stored = h.store.get(RecordId(2)).unwrap();
    assert_eq!(stored.get("loan_amount"), Some(&json!(275000.5)));
    assert_eq!(stored.get("revision"), Some(&json!(1)));

    let listed = h.editor.records();
    assert_eq!(listed[1].get("loan_amount"), Some(&json!(275000.5)));
    // initial load plus exactly one refresh after the save
    assert_eq!(h.store.calls(StoreOp::Update), 1);
    assert_eq!(h.store.calls(StoreOp::List), 2);
    assert!(h.notifier.all().is_empty());
}

#[tokio::test]
async fn update_not_found_keeps_draft() {
    let h = setup_editor(InMemoryStore::with_records(persisted_records(3)));
    h.editor.refresh().await.unwrap();
    h.editor.start_edit(RecordId(3)).unwrap();
    h.editor.set_edit_field("debt_amount", "1500").unwrap();
    h.store.remove(RecordId(3));

    let err = h.editor.save_edit().await.unwrap_err();
    match err {
        EditorError::Remote { operation, source } => {
            assert_eq!(operation, Operation::Update);
            assert!(source.is_not_found());
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(h.editor.edit_phase(), EditPhase::Editing);
    assert_eq!(h.editor.editing(), Some(RecordId(3)));
    assert_eq!(draft_value(&h, "debt_amount").as_deref(), Some("1500"));
    assert_eq!(h.notifier.failures().len(), 1);
    assert_eq!(h.notifier.failures()[0].message, "Error updating mortgage");
    assert_eq!(h.store.calls(StoreOp::List), 1);
}

#[tokio::test]
async fn new_edit_discards_previous_draft() {
    let h = setup_editor(InMemoryStore::with_records(persisted_records(2)));
    h.editor.refresh().await.unwrap();

    h.editor.start_edit(RecordId(1)).unwrap();
    h.editor.set_edit_field("loan_amount", "1").unwrap();
    h.editor.start_edit(RecordId(2)).unwrap();

    assert_eq!(h.editor.editing(), Some(RecordId(2)));
    assert_eq!(draft_value(&h, "loan_amount").as_deref(), Some("300000"));

    h.editor.start_edit(RecordId(1)).unwrap();
    assert_eq!(draft_value(&h, "loan_amount").as_deref(), Some("300000"));
}

#[tokio::test]
async fn cancel_returns_to_viewing() {
    let h = setup_editor(InMemoryStore::with_records(persisted_records(1)));
    h.editor.refresh().await.unwrap();
    h.editor.start_edit(RecordId(1)).unwrap();

    assert_eq!(h.editor.cancel_edit(), Some(RecordId(1)));
    assert_eq!(h.editor.edit_phase(), EditPhase::Viewing);
    assert!(matches!(
        h.editor.set_edit_field("loan_amount", "5"),
        Err(EditorError::Draft(_))
    ));
    assert_eq!(h.store.calls(StoreOp::Update), 0);
}

#[tokio::test]
async fn delete_refreshes_list() {
    let h = setup_editor(InMemoryStore::with_records(persisted_records(3)));
    h.editor.refresh().await.unwrap();

    h.editor.delete_record(RecordId(2)).await.unwrap();

    let ids: Vec<_> = h.editor.records().iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![RecordId(1), RecordId(3)]);
    assert_eq!(h.store.calls(StoreOp::List), 2);
    assert!(h.notifier.all().is_empty());
}

#[tokio::test]
async fn delete_failure_leaves_list() {
    let h = setup_editor(InMemoryStore::with_records(persisted_records(2)));
    h.editor.refresh().await.unwrap();
    h.store.fail_next(StoreOp::Delete, FailureMode::Transport);

    assert!(h.editor.delete_record(RecordId(1)).await.is_err());
    assert_eq!(h.editor.records().len(), 2);
    assert_eq!(h.store.calls(StoreOp::List), 1);
    assert_eq!(h.notifier.failures()[0].operation, Operation::Delete);
}

#[tokio::test]
async fn failed_refresh_after_mutation_keeps_old_list() {
    let h = setup_editor(InMemoryStore::with_records(persisted_records(1)));
    h.editor.refresh().await.unwrap();
    fill_form(&h);
    h.store.fail_next(StoreOp::List, FailureMode::Transport);

    h.editor.submit_create().await.unwrap();

    assert_eq!(h.editor.records().len(), 1);
    assert_eq!(h.store.records().len(), 2);
    assert_eq!(h.notifier.successes().len(), 1);
    let failures = h.notifier.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].message, "Error fetching mortgages");
}

#[tokio::test]
async fn external_delete_closes_open_session() {
    let h = setup_editor(InMemoryStore::with_records(persisted_records(2)));
    h.editor.refresh().await.unwrap();
    h.editor.start_edit(RecordId(2)).unwrap();
    h.store.remove(RecordId(2));

    h.editor.refresh().await.unwrap();
    assert_eq!(h.editor.edit_phase(), EditPhase::Viewing);
}

#[tokio::test]
async fn events_drive_the_editor() {
    let h = setup_editor(InMemoryStore::new());
    h.editor.dispatch(EditorEvent::Refresh).await.unwrap();
    for (name, value) in valid_raw_record().iter() {
        h.editor
            .dispatch(EditorEvent::field_changed(name, value))
            .await
            .unwrap();
    }
    h.editor.dispatch(EditorEvent::SubmitCreate).await.unwrap();

    let id = h.editor.records()[0].id();
    h.editor
        .dispatch(EditorEvent::StartEdit { id })
        .await
        .unwrap();
    h.editor
        .dispatch(EditorEvent::field_changed_in_edit("property_type", "single_family"))
        .await
        .unwrap();
    h.editor.dispatch(EditorEvent::SaveEdit).await.unwrap();
    assert_eq!(
        h.store.get(id).unwrap().get("property_type"),
        Some(&json!("single_family"))
    );

    h.editor
        .dispatch(EditorEvent::DeleteRecord { id })
        .await
        .unwrap();
    assert!(h.editor.snapshot().is_empty());
}
