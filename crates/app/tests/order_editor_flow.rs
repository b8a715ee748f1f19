//! Integration tests for the collection order editor
//!
//! These tests drive the controller against the file-based collection store
//! and check what ends up on disk.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};
use tokio::sync::mpsc;

use apiweave_application::{AppEvent, EventBus, OrderRepository};
use apiweave_domain::{GlobalPolicy, Item, OrderEntry, StoredOrder};
use apiweave_infrastructure::{FileCollectionStore, TokioFileSystem, from_json_bytes};
use apiweave_ui::{OrderEditorController, UiCommand, UiUpdate};

type Store = Arc<FileCollectionStore<TokioFileSystem>>;

struct Fixture {
    _dir: TempDir,
    store: Store,
    collection_id: String,
    workflows: Vec<Item>,
}

async fn fixture() -> Fixture {
    let dir = tempdir().expect("Failed to create temp directory");
    let store = Arc::new(FileCollectionStore::new(TokioFileSystem::new(), dir.path()));

    let collection = store
        .create_collection("Checkout suite", None)
        .await
        .expect("Failed to create collection");

    let mut workflows = Vec::new();
    for (name, nodes) in [("Login", 4), ("Add to cart", 6), ("Pay", 9)] {
        workflows.push(
            store
                .add_workflow(&collection.id, name, nodes)
                .await
                .expect("Failed to add workflow"),
        );
    }

    Fixture {
        _dir: dir,
        store,
        collection_id: collection.id,
        workflows,
    }
}

fn editor_controller(
    store: &Store,
    events: EventBus,
) -> (
    OrderEditorController<Store, Store>,
    mpsc::UnboundedReceiver<UiUpdate>,
) {
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let controller =
        OrderEditorController::new(Arc::clone(store), Arc::clone(store), events, update_tx);
    (controller, update_rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<UiUpdate>) -> Vec<UiUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn test_edit_save_and_reopen() {
    let f = fixture().await;
    let events = EventBus::default();
    let mut saved_events = events.subscribe();
    let (mut controller, mut updates) = editor_controller(&f.store, events);

    for cmd in [
        UiCommand::OpenOrderEditor {
            collection_id: f.collection_id.clone(),
        },
        UiCommand::BeginDrag { index: 2 },
        UiCommand::DragOver { index: 0 },
        UiCommand::Drop,
        UiCommand::ToggleContinueOnFailure { index: 0 },
        UiCommand::RemoveEntry { index: 2 },
        UiCommand::ToggleGlobalContinueOnFailure,
        UiCommand::SaveOrder { close_after: true },
    ] {
        controller.handle(cmd).await;
    }

    let updates = drain(&mut updates);
    assert!(updates.contains(&UiUpdate::SaveSucceeded));
    assert!(controller.session().is_none());

    let stored = f
        .store
        .load_order(&f.collection_id)
        .await
        .expect("Failed to load order")
        .expect("order present");
    assert_eq!(
        stored,
        StoredOrder::new(
            vec![
                OrderEntry::new(f.workflows[2].id.clone(), 0).with_continue_on_failure(false),
                OrderEntry::new(f.workflows[0].id.clone(), 1),
            ],
            GlobalPolicy::new(false),
        )
    );

    assert_eq!(
        saved_events.recv().await.expect("event"),
        AppEvent::WorkflowOrderSaved {
            collection_id: f.collection_id.clone(),
            entry_count: 2,
        }
    );
    assert_eq!(
        saved_events.recv().await.expect("event"),
        AppEvent::OrderEditorClosed {
            collection_id: f.collection_id.clone(),
            saved: true,
        }
    );

    // Reopening shows the saved order and offers the removed workflow again
    let (mut controller, mut updates) = editor_controller(&f.store, EventBus::default());
    controller
        .handle(UiCommand::OpenOrderEditor {
            collection_id: f.collection_id.clone(),
        })
        .await;
    drain(&mut updates);

    let session = controller.session().expect("editor open");
    let names: Vec<String> = session.rows().into_iter().map(|row| row.name).collect();
    assert_eq!(names, vec!["Pay".to_string(), "Login".to_string()]);
    let available: Vec<String> = session
        .available_items()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(available, vec!["Add to cart".to_string()]);
    assert!(!session.editor().policy().continue_on_failure);
}

#[tokio::test]
async fn test_new_workflow_is_offered_not_inserted() {
    let f = fixture().await;
    let (mut controller, _updates) = editor_controller(&f.store, EventBus::default());

    controller
        .handle(UiCommand::OpenOrderEditor {
            collection_id: f.collection_id.clone(),
        })
        .await;
    controller
        .handle(UiCommand::SaveOrder { close_after: true })
        .await;

    let logout = f
        .store
        .add_workflow(&f.collection_id, "Logout", 2)
        .await
        .expect("Failed to add workflow");

    controller
        .handle(UiCommand::OpenOrderEditor {
            collection_id: f.collection_id.clone(),
        })
        .await;
    let session = controller.session().expect("editor open");

    assert_eq!(session.editor().order().len(), 3);
    assert!(!session.editor().order().contains(&logout.id));
    assert_eq!(session.available_items()[0].item_id, logout.id);
}

#[tokio::test]
async fn test_discarded_edits_leave_file_untouched() {
    let f = fixture().await;
    let path = f
        .store
        .root()
        .join("collections")
        .join(&f.collection_id)
        .join("collection.json");
    let before = std::fs::read(&path).expect("Failed to read collection file");

    let (mut controller, mut updates) = editor_controller(&f.store, EventBus::default());
    for cmd in [
        UiCommand::OpenOrderEditor {
            collection_id: f.collection_id.clone(),
        },
        UiCommand::RemoveEntry { index: 0 },
        UiCommand::CloseEditor,
        UiCommand::ConfirmDiscard,
    ] {
        controller.handle(cmd).await;
    }

    let updates = drain(&mut updates);
    assert!(updates.contains(&UiUpdate::ShowDiscardConfirmation(true)));
    assert_eq!(
        updates.last(),
        Some(&UiUpdate::EditorClosed {
            collection_id: f.collection_id.clone()
        })
    );

    let after = std::fs::read(&path).expect("Failed to read collection file");
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_saved_file_is_stable_json() {
    let f = fixture().await;
    let (mut controller, _updates) = editor_controller(&f.store, EventBus::default());
    for cmd in [
        UiCommand::OpenOrderEditor {
            collection_id: f.collection_id.clone(),
        },
        UiCommand::ToggleEnabled { index: 1 },
        UiCommand::SaveOrder { close_after: false },
    ] {
        controller.handle(cmd).await;
    }

    let path = f
        .store
        .root()
        .join("collections")
        .join(&f.collection_id)
        .join("collection.json");
    let bytes = std::fs::read(&path).expect("Failed to read collection file");
    let text = String::from_utf8(bytes.clone()).expect("utf-8");

    assert!(text.ends_with('\n'));
    assert!(text.contains("\n  \"workflow_order\": ["));

    let json: serde_json::Value = from_json_bytes(&bytes).expect("valid JSON");
    assert_eq!(json["workflow_order"][1]["enabled"], serde_json::Value::Bool(false));
    assert_eq!(json["schema_version"], serde_json::json!(1));
}

#[tokio::test]
async fn test_unknown_collection_reports_error() {
    let f = fixture().await;
    let (mut controller, mut updates) = editor_controller(&f.store, EventBus::default());

    controller
        .handle(UiCommand::OpenOrderEditor {
            collection_id: "does-not-exist".to_string(),
        })
        .await;

    let updates = drain(&mut updates);
    assert!(matches!(
        updates.as_slice(),
        [UiUpdate::Error { message }] if message.contains("does-not-exist")
    ));
    assert!(controller.session().is_none());
}

#[tokio::test]
async fn test_drag_onto_own_slot_only_rerenders_on_begin_and_drop() {
    let f = fixture().await;
    let (mut controller, mut updates) = editor_controller(&f.store, EventBus::default());
    controller
        .handle(UiCommand::OpenOrderEditor {
            collection_id: f.collection_id.clone(),
        })
        .await;
    drain(&mut updates);

    controller.handle(UiCommand::BeginDrag { index: 1 }).await;
    assert!(matches!(drain(&mut updates).as_slice(), [UiUpdate::OrderRows(_)]));

    controller.handle(UiCommand::DragOver { index: 1 }).await;
    assert!(drain(&mut updates).is_empty());

    controller.handle(UiCommand::Drop).await;
    assert!(matches!(drain(&mut updates).as_slice(), [UiUpdate::OrderRows(_)]));
    assert!(!controller.session().expect("editor open").is_dirty());
}
