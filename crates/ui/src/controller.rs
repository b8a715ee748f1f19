//! Order editor controller.
//!
//! Owns the open [`EditorSession`] and reacts to [`UiCommand`]s one at a
//! time, pushing [`UiUpdate`]s back to the UI. The only awaits are the
//! load and save calls, so commands never interleave.

use apiweave_application::{
    AppEvent, EventBus, LoadOrderEditor, LoadOrderEditorInput, OrderRepository, SaveWorkflowOrder,
    SaveWorkflowOrderInput, WorkflowCatalog,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::bridge::{UiCommand, UiUpdate};
use crate::state::{CloseRequest, EditorSession};

const SAVE_BLOCKED: &str =
    "The workflow list could not be loaded. Retry loading before saving the order.";

/// Drives one order editor at a time.
pub struct OrderEditorController<C, R> {
    load: LoadOrderEditor<C, R>,
    save: SaveWorkflowOrder<R>,
    events: EventBus,
    update_tx: mpsc::UnboundedSender<UiUpdate>,
    session: Option<EditorSession>,
}

impl<C, R> OrderEditorController<C, R>
where
    C: WorkflowCatalog,
    R: OrderRepository + Clone,
{
    /// Creates a controller with no editor open.
    pub fn new(
        catalog: C,
        orders: R,
        events: EventBus,
        update_tx: mpsc::UnboundedSender<UiUpdate>,
    ) -> Self {
        Self {
            load: LoadOrderEditor::new(catalog, orders.clone()),
            save: SaveWorkflowOrder::new(orders).with_events(events.clone()),
            events,
            update_tx,
            session: None,
        }
    }

    /// The open session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&EditorSession> {
        self.session.as_ref()
    }

    /// Handles commands until the sender side is dropped.
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<UiCommand>) {
        while let Some(cmd) = cmd_rx.recv().await {
            self.handle(cmd).await;
        }
        debug!("order editor command channel closed");
    }

    /// Handles a single command.
    pub async fn handle(&mut self, cmd: UiCommand) {
        match cmd {
            UiCommand::OpenOrderEditor { collection_id } => self.open(collection_id).await,

            UiCommand::RetryLoad => {
                let Some(session) = &self.session else {
                    debug!("retry without an open editor");
                    return;
                };
                if session.can_save() {
                    debug!("workflow list already loaded, ignoring retry");
                    return;
                }
                let collection_id = session.collection_id().to_string();
                let Some(mut reloaded) = self.load_session(&collection_id).await else {
                    return;
                };
                if let Some(previous) = self.session.take().filter(EditorSession::is_dirty) {
                    reloaded.set_global_continue_on_failure(
                        previous.editor().policy().continue_on_failure,
                    );
                }
                self.install(collection_id, reloaded);
            }

            UiCommand::BeginDrag { index } => {
                if self.with_session(|s| s.begin_drag(index)) == Some(true) {
                    self.send_rows();
                }
            }

            UiCommand::DragOver { index } => {
                if self.with_session(|s| s.drag_over(index)).flatten().is_some() {
                    self.send_rows();
                    self.send_dirty();
                }
            }

            UiCommand::Drop => {
                if let Some(Some(index)) = self.with_session(EditorSession::drop_drag) {
                    debug!(index, "drag dropped");
                    self.send_rows();
                }
            }

            UiCommand::CancelDrag => {
                if self.with_session(EditorSession::cancel_drag) == Some(true) {
                    self.send_rows();
                }
            }

            UiCommand::ToggleEnabled { index } => {
                if self.with_session(|s| s.toggle_enabled(index)).flatten().is_some() {
                    self.send_rows();
                    self.send_dirty();
                }
            }

            UiCommand::ToggleContinueOnFailure { index } => {
                if self
                    .with_session(|s| s.toggle_continue_on_failure(index))
                    .flatten()
                    .is_some()
                {
                    self.send_rows();
                    self.send_dirty();
                }
            }

            UiCommand::ToggleGlobalContinueOnFailure => {
                if let Some(continue_on_failure) =
                    self.with_session(EditorSession::toggle_global_continue_on_failure)
                {
                    self.send(UiUpdate::GlobalPolicy {
                        continue_on_failure,
                    });
                    self.send_dirty();
                }
            }

            UiCommand::RemoveEntry { index } => {
                if self.with_session(|s| s.remove_entry(index)).flatten().is_some() {
                    self.send_lists();
                    self.send_dirty();
                }
            }

            UiCommand::AddEntry { item_id } => {
                if self.with_session(|s| s.add_entry(&item_id)) == Some(true) {
                    self.send_lists();
                    self.send_dirty();
                } else {
                    debug!(%item_id, "add ignored");
                }
            }

            UiCommand::SaveOrder { close_after } => self.save(close_after).await,

            UiCommand::CloseEditor => match self.with_session(EditorSession::request_close) {
                Some(CloseRequest::Close) => self.close(),
                Some(CloseRequest::NeedsConfirmation) => {
                    self.send_rows();
                    self.send(UiUpdate::ShowDiscardConfirmation(true));
                }
                None => {}
            },

            UiCommand::ConfirmDiscard => {
                if self.session.as_ref().is_some_and(EditorSession::pending_discard) {
                    self.send(UiUpdate::ShowDiscardConfirmation(false));
                    self.close();
                }
            }

            UiCommand::CancelDiscard => {
                if self.with_session(EditorSession::cancel_discard) == Some(true) {
                    self.send(UiUpdate::ShowDiscardConfirmation(false));
                }
            }
        }
    }

    async fn open(&mut self, collection_id: String) {
        if let Some(session) = &self.session {
            if session.collection_id() == collection_id {
                debug!(%collection_id, "order editor already open");
                self.send_state();
                return;
            }
            if session.is_dirty() {
                self.send(UiUpdate::Error {
                    message: format!(
                        "The order of collection {} has unsaved changes. Save or close it first.",
                        session.collection_id()
                    ),
                });
                return;
            }
            self.close();
        }

        if let Some(session) = self.load_session(&collection_id).await {
            self.install(collection_id, session);
        }
    }

    /// Loads a fresh session without touching the open one.
    async fn load_session(&self, collection_id: &str) -> Option<EditorSession> {
        let input = LoadOrderEditorInput {
            collection_id: collection_id.to_string(),
        };

        match self.load.execute(input).await {
            Ok(output) => Some(EditorSession::open(output)),
            Err(error) => {
                warn!(%collection_id, %error, "failed to load order editor");
                self.send(UiUpdate::Error {
                    message: format!("Failed to load the workflow order: {error}"),
                });
                None
            }
        }
    }

    fn install(&mut self, collection_id: String, session: EditorSession) {
        info!(
            %collection_id,
            entries = session.editor().order().len(),
            "order editor opened"
        );
        self.send(UiUpdate::EditorOpened { collection_id });
        if let Some(message) = session.candidates_error() {
            self.send(UiUpdate::CandidatesUnavailable {
                message: message.to_string(),
            });
        }
        self.session = Some(session);
        self.send_state();
    }

    async fn save(&mut self, close_after: bool) {
        let Some(session) = &self.session else {
            debug!("save without an open editor");
            return;
        };

        if !session.can_save() {
            self.send(UiUpdate::SaveFailed {
                message: SAVE_BLOCKED.to_string(),
            });
            return;
        }

        let committed = session.commit();
        let input = SaveWorkflowOrderInput {
            collection_id: session.collection_id().to_string(),
            order: committed.order,
            policy: committed.policy,
        };

        self.send(UiUpdate::Saving);
        match self.save.execute(input).await {
            Ok(()) => {
                // The committed snapshot is what the editor holds: no command
                // ran while the save was awaited.
                self.with_session(EditorSession::mark_saved);
                self.send(UiUpdate::SaveSucceeded);
                self.send_dirty();
                if close_after {
                    self.close();
                }
            }
            Err(error) => {
                self.send(UiUpdate::SaveFailed {
                    message: error.to_string(),
                });
            }
        }
    }

    fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        let (collection_id, saved) = session.close();
        info!(%collection_id, saved, "order editor closed");
        self.events.publish(AppEvent::OrderEditorClosed {
            collection_id: collection_id.clone(),
            saved,
        });
        self.send(UiUpdate::EditorClosed { collection_id });
    }

    fn with_session<T>(&mut self, f: impl FnOnce(&mut EditorSession) -> T) -> Option<T> {
        let result = self.session.as_mut().map(f);
        if result.is_none() {
            debug!("no order editor open");
        }
        result
    }

    fn send(&self, update: UiUpdate) {
        if self.update_tx.send(update).is_err() {
            debug!("UI update receiver dropped");
        }
    }

    fn send_rows(&self) {
        if let Some(session) = &self.session {
            self.send(UiUpdate::OrderRows(session.rows()));
        }
    }

    fn send_dirty(&self) {
        if let Some(session) = &self.session {
            self.send(UiUpdate::Dirty(session.is_dirty()));
        }
    }

    fn send_lists(&self) {
        if let Some(session) = &self.session {
            self.send(UiUpdate::OrderRows(session.rows()));
            self.send(UiUpdate::AvailableItems(session.available_items()));
        }
    }

    fn send_state(&self) {
        if let Some(session) = &self.session {
            self.send_lists();
            self.send(UiUpdate::GlobalPolicy {
                continue_on_failure: session.editor().policy().continue_on_failure,
            });
            self.send_dirty();
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::significant_drop_tightening
)]
mod tests {
    use super::*;
    use crate::bridge::OrderRowData;
    use apiweave_application::{CatalogError, OrderStoreError};
    use apiweave_domain::{GlobalPolicy, Item, OrderEntry, OrderList, StoredOrder};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    struct MockCatalog {
        result: Mutex<Result<Vec<Item>, CatalogError>>,
    }

    #[async_trait]
    impl WorkflowCatalog for MockCatalog {
        async fn list_workflows(&self, _: &str) -> Result<Vec<Item>, CatalogError> {
            self.result.lock().expect("Lock poisoned").clone()
        }
    }

    #[derive(Default)]
    struct MockOrders {
        stored: Mutex<Option<StoredOrder>>,
        missing: Mutex<bool>,
        reject_saves: Mutex<bool>,
    }

    #[async_trait]
    impl OrderRepository for MockOrders {
        async fn load_order(&self, id: &str) -> Result<Option<StoredOrder>, OrderStoreError> {
            if *self.missing.lock().expect("Lock poisoned") {
                return Err(OrderStoreError::NotFound(id.to_string()));
            }
            Ok(self.stored.lock().expect("Lock poisoned").clone())
        }

        async fn save_order(
            &self,
            _: &str,
            order: &OrderList,
            policy: GlobalPolicy,
        ) -> Result<(), OrderStoreError> {
            if *self.reject_saves.lock().expect("Lock poisoned") {
                return Err(OrderStoreError::Unavailable("connection reset".to_string()));
            }
            *self.stored.lock().expect("Lock poisoned") =
                Some(StoredOrder::new(order.entries().to_vec(), policy));
            Ok(())
        }
    }

    type Controller = OrderEditorController<Arc<MockCatalog>, Arc<MockOrders>>;

    struct Harness {
        controller: Controller,
        catalog: Arc<MockCatalog>,
        orders: Arc<MockOrders>,
        updates: mpsc::UnboundedReceiver<UiUpdate>,
        events: tokio::sync::broadcast::Receiver<AppEvent>,
    }

    fn items() -> Vec<Item> {
        vec![
            Item::new("A", "Login"),
            Item::new("B", "Checkout"),
            Item::new("C", "Logout"),
        ]
    }

    fn harness(catalog: Result<Vec<Item>, CatalogError>, orders: MockOrders) -> Harness {
        let catalog = Arc::new(MockCatalog {
            result: Mutex::new(catalog),
        });
        let orders = Arc::new(orders);
        let bus = EventBus::default();
        let events = bus.subscribe();
        let (update_tx, updates) = mpsc::unbounded_channel();
        let controller =
            OrderEditorController::new(Arc::clone(&catalog), Arc::clone(&orders), bus, update_tx);

        Harness {
            controller,
            catalog,
            orders,
            updates,
            events,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<UiUpdate>) -> Vec<UiUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    fn row_ids(rows: &[OrderRowData]) -> Vec<&str> {
        rows.iter().map(|row| row.item_id.as_str()).collect()
    }

    fn open() -> UiCommand {
        UiCommand::OpenOrderEditor {
            collection_id: "c1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_sends_full_state() {
        let mut h = harness(Ok(items()), MockOrders::default());

        h.controller.handle(open()).await;

        let updates = drain(&mut h.updates);
        assert_eq!(
            updates[0],
            UiUpdate::EditorOpened {
                collection_id: "c1".to_string()
            }
        );
        let UiUpdate::OrderRows(rows) = &updates[1] else {
            panic!("expected rows, got {:?}", updates[1]);
        };
        assert_eq!(row_ids(rows), vec!["A", "B", "C"]);
        assert_eq!(
            &updates[2..],
            &[
                UiUpdate::AvailableItems(vec![]),
                UiUpdate::GlobalPolicy {
                    continue_on_failure: true
                },
                UiUpdate::Dirty(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_drag_then_save_persists_and_publishes() {
        let mut h = harness(Ok(items()), MockOrders::default());
        h.controller.handle(open()).await;

        for cmd in [
            UiCommand::BeginDrag { index: 2 },
            UiCommand::DragOver { index: 1 },
            UiCommand::DragOver { index: 0 },
            UiCommand::DragOver { index: 0 },
            UiCommand::Drop,
            UiCommand::ToggleEnabled { index: 1 },
            UiCommand::ToggleGlobalContinueOnFailure,
        ] {
            h.controller.handle(cmd).await;
        }
        drain(&mut h.updates);

        h.controller
            .handle(UiCommand::SaveOrder { close_after: false })
            .await;

        assert_eq!(
            drain(&mut h.updates),
            vec![UiUpdate::Saving, UiUpdate::SaveSucceeded, UiUpdate::Dirty(false)]
        );

        let stored = h.orders.stored.lock().expect("Lock poisoned").clone();
        assert_eq!(
            stored,
            Some(StoredOrder::new(
                vec![
                    OrderEntry::new("C", 0),
                    OrderEntry::new("A", 1).with_enabled(false),
                    OrderEntry::new("B", 2),
                ],
                GlobalPolicy::new(false),
            ))
        );
        assert_eq!(
            h.events.try_recv().expect("event"),
            AppEvent::WorkflowOrderSaved {
                collection_id: "c1".to_string(),
                entry_count: 3,
            }
        );
        assert!(h.controller.session().is_some());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_edits_for_retry() {
        let orders = MockOrders {
            reject_saves: Mutex::new(true),
            ..MockOrders::default()
        };
        let mut h = harness(Ok(items()), orders);
        h.controller.handle(open()).await;
        h.controller.handle(UiCommand::RemoveEntry { index: 0 }).await;
        drain(&mut h.updates);

        h.controller
            .handle(UiCommand::SaveOrder { close_after: true })
            .await;

        let updates = drain(&mut h.updates);
        assert_eq!(updates[0], UiUpdate::Saving);
        assert!(matches!(
            &updates[1],
            UiUpdate::SaveFailed { message } if message.contains("connection reset")
        ));
        let session = h.controller.session().expect("editor still open");
        assert!(session.is_dirty());
        assert_eq!(session.editor().order().len(), 2);
        assert!(h.orders.stored.lock().expect("Lock poisoned").is_none());

        *h.orders.reject_saves.lock().expect("Lock poisoned") = false;
        h.controller
            .handle(UiCommand::SaveOrder { close_after: true })
            .await;

        assert!(h.controller.session().is_none());
        let updates = drain(&mut h.updates);
        assert_eq!(
            updates.last(),
            Some(&UiUpdate::EditorClosed {
                collection_id: "c1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_candidate_failure_blocks_save_until_retry() {
        let stored = StoredOrder::new(vec![OrderEntry::new("B", 0)], GlobalPolicy::default());
        let orders = MockOrders {
            stored: Mutex::new(Some(stored.clone())),
            ..MockOrders::default()
        };
        let mut h = harness(
            Err(CatalogError::Unavailable("timeout".to_string())),
            orders,
        );

        h.controller.handle(open()).await;
        let updates = drain(&mut h.updates);
        assert!(updates.iter().any(|u| matches!(
            u,
            UiUpdate::CandidatesUnavailable { message } if message.contains("timeout")
        )));

        h.controller
            .handle(UiCommand::SaveOrder { close_after: false })
            .await;
        assert_eq!(
            drain(&mut h.updates),
            vec![UiUpdate::SaveFailed {
                message: SAVE_BLOCKED.to_string()
            }]
        );
        assert_eq!(
            *h.orders.stored.lock().expect("Lock poisoned"),
            Some(stored)
        );

        *h.catalog.result.lock().expect("Lock poisoned") = Ok(items());
        h.controller.handle(UiCommand::RetryLoad).await;

        let session = h.controller.session().expect("editor open");
        assert!(session.can_save());
        assert_eq!(
            session.editor().order().item_ids().collect::<Vec<_>>(),
            vec!["B"]
        );
    }

    #[tokio::test]
    async fn test_failed_retry_keeps_open_editor_and_edits() {
        let mut h = harness(
            Err(CatalogError::Unavailable("timeout".to_string())),
            MockOrders::default(),
        );
        h.controller.handle(open()).await;
        h.controller
            .handle(UiCommand::ToggleGlobalContinueOnFailure)
            .await;
        drain(&mut h.updates);

        *h.orders.missing.lock().expect("Lock poisoned") = true;
        h.controller.handle(UiCommand::RetryLoad).await;

        let updates = drain(&mut h.updates);
        assert_eq!(updates.len(), 1);
        assert!(matches!(
            &updates[0],
            UiUpdate::Error { message } if message.starts_with("Failed to load the workflow order")
        ));
        let session = h.controller.session().expect("editor still open");
        assert_eq!(session.collection_id(), "c1");
        assert!(session.is_dirty());
        assert!(!session.editor().policy().continue_on_failure);
        assert!(h.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_successful_retry_carries_pending_policy_edit() {
        let mut h = harness(
            Err(CatalogError::Unavailable("timeout".to_string())),
            MockOrders::default(),
        );
        h.controller.handle(open()).await;
        h.controller
            .handle(UiCommand::ToggleGlobalContinueOnFailure)
            .await;
        drain(&mut h.updates);

        *h.catalog.result.lock().expect("Lock poisoned") = Ok(items());
        h.controller.handle(UiCommand::RetryLoad).await;

        let session = h.controller.session().expect("editor open");
        assert!(session.can_save());
        assert!(session.is_dirty());
        assert!(!session.editor().policy().continue_on_failure);
        assert_eq!(
            drain(&mut h.updates).last(),
            Some(&UiUpdate::Dirty(true))
        );
    }

    #[tokio::test]
    async fn test_open_other_collection_while_dirty_is_refused() {
        let mut h = harness(Ok(items()), MockOrders::default());
        h.controller.handle(open()).await;
        h.controller.handle(UiCommand::ToggleEnabled { index: 0 }).await;
        drain(&mut h.updates);

        h.controller
            .handle(UiCommand::OpenOrderEditor {
                collection_id: "c2".to_string(),
            })
            .await;

        assert_eq!(
            drain(&mut h.updates),
            vec![UiUpdate::Error {
                message: "The order of collection c1 has unsaved changes. Save or close it first."
                    .to_string()
            }]
        );
        let session = h.controller.session().expect("editor still open");
        assert_eq!(session.collection_id(), "c1");
        assert!(session.is_dirty());
        assert!(h.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_open_other_collection_while_clean_switches() {
        let mut h = harness(Ok(items()), MockOrders::default());
        h.controller.handle(open()).await;
        drain(&mut h.updates);

        h.controller
            .handle(UiCommand::OpenOrderEditor {
                collection_id: "c2".to_string(),
            })
            .await;

        let updates = drain(&mut h.updates);
        assert_eq!(
            &updates[..2],
            &[
                UiUpdate::EditorClosed {
                    collection_id: "c1".to_string()
                },
                UiUpdate::EditorOpened {
                    collection_id: "c2".to_string()
                },
            ]
        );
        assert_eq!(updates.last(), Some(&UiUpdate::Dirty(false)));
        assert_eq!(
            h.controller.session().map(EditorSession::collection_id),
            Some("c2")
        );
        assert_eq!(
            h.events.try_recv().expect("event"),
            AppEvent::OrderEditorClosed {
                collection_id: "c1".to_string(),
                saved: true,
            }
        );
    }

    #[tokio::test]
    async fn test_order_store_failure_opens_nothing() {
        let orders = MockOrders {
            missing: Mutex::new(true),
            ..MockOrders::default()
        };
        let mut h = harness(Ok(items()), orders);

        h.controller.handle(open()).await;

        let updates = drain(&mut h.updates);
        assert_eq!(updates.len(), 1);
        assert!(matches!(&updates[0], UiUpdate::Error { message } if message.contains("c1")));
        assert!(h.controller.session().is_none());
    }

    #[tokio::test]
    async fn test_dirty_close_asks_for_confirmation() {
        let mut h = harness(Ok(items()), MockOrders::default());
        h.controller.handle(open()).await;
        h.controller
            .handle(UiCommand::ToggleContinueOnFailure { index: 0 })
            .await;
        drain(&mut h.updates);

        h.controller.handle(UiCommand::CloseEditor).await;
        let updates = drain(&mut h.updates);
        assert_eq!(updates.last(), Some(&UiUpdate::ShowDiscardConfirmation(true)));

        h.controller.handle(UiCommand::CancelDiscard).await;
        assert_eq!(
            drain(&mut h.updates),
            vec![UiUpdate::ShowDiscardConfirmation(false)]
        );
        assert!(h.controller.session().is_some());

        h.controller.handle(UiCommand::ConfirmDiscard).await;
        assert!(drain(&mut h.updates).is_empty());

        h.controller.handle(UiCommand::CloseEditor).await;
        h.controller.handle(UiCommand::ConfirmDiscard).await;

        assert!(h.controller.session().is_none());
        assert_eq!(
            h.events.try_recv().expect("event"),
            AppEvent::OrderEditorClosed {
                collection_id: "c1".to_string(),
                saved: false,
            }
        );
        assert!(h.orders.stored.lock().expect("Lock poisoned").is_none());
    }

    #[tokio::test]
    async fn test_clean_close_is_immediate() {
        let mut h = harness(Ok(items()), MockOrders::default());
        h.controller.handle(open()).await;
        drain(&mut h.updates);

        h.controller.handle(UiCommand::CloseEditor).await;

        assert_eq!(
            drain(&mut h.updates),
            vec![UiUpdate::EditorClosed {
                collection_id: "c1".to_string()
            }]
        );
        assert_eq!(
            h.events.try_recv().expect("event"),
            AppEvent::OrderEditorClosed {
                collection_id: "c1".to_string(),
                saved: true,
            }
        );
    }

    #[tokio::test]
    async fn test_add_from_available_list() {
        let stored = StoredOrder::new(vec![OrderEntry::new("A", 0)], GlobalPolicy::default());
        let orders = MockOrders {
            stored: Mutex::new(Some(stored)),
            ..MockOrders::default()
        };
        let mut h = harness(Ok(items()), orders);
        h.controller.handle(open()).await;
        drain(&mut h.updates);

        h.controller
            .handle(UiCommand::AddEntry {
                item_id: "C".to_string(),
            })
            .await;
        h.controller
            .handle(UiCommand::AddEntry {
                item_id: "C".to_string(),
            })
            .await;

        let updates = drain(&mut h.updates);
        assert_eq!(updates.len(), 3);
        let UiUpdate::OrderRows(rows) = &updates[0] else {
            panic!("expected rows, got {:?}", updates[0]);
        };
        assert_eq!(row_ids(rows), vec!["A", "C"]);
        let UiUpdate::AvailableItems(available) = &updates[1] else {
            panic!("expected available items, got {:?}", updates[1]);
        };
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].item_id, "B");
        assert_eq!(updates[2], UiUpdate::Dirty(true));
    }

    #[tokio::test]
    async fn test_run_processes_commands_in_order() {
        let h = harness(Ok(items()), MockOrders::default());
        let Harness {
            controller,
            orders,
            mut updates,
            ..
        } = h;
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        for cmd in [
            open(),
            UiCommand::RemoveEntry { index: 1 },
            UiCommand::SaveOrder { close_after: true },
        ] {
            cmd_tx.send(cmd).expect("send");
        }
        drop(cmd_tx);

        controller.run(cmd_rx).await;

        let stored = orders.stored.lock().expect("Lock poisoned").clone();
        let ids: Vec<String> = stored
            .expect("saved")
            .entries
            .into_iter()
            .map(|e| e.item_id)
            .collect();
        assert_eq!(ids, vec!["A".to_string(), "C".to_string()]);
        assert_eq!(
            drain(&mut updates).last(),
            Some(&UiUpdate::EditorClosed {
                collection_id: "c1".to_string()
            })
        );
    }
}
