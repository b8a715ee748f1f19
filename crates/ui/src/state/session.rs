//! One open order editor and the UI state around it.

use apiweave_application::LoadOrderEditorOutput;
use apiweave_domain::{GlobalPolicy, OrderEntry};

use super::drag::DragGesture;
use super::order_editor::{CommittedOrder, OrderedItemListEditor};
use crate::bridge::{AvailableItemData, OrderRowData};

/// What closing the editor requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequest {
    /// Nothing unsaved; close now.
    Close,
    /// Unsaved edits; ask before discarding them.
    NeedsConfirmation,
}

/// An order editor for one collection, with its drag gesture, load status
/// and pending discard prompt.
#[derive(Debug)]
pub struct EditorSession {
    collection_id: String,
    editor: OrderedItemListEditor,
    drag: DragGesture,
    candidates_error: Option<String>,
    pending_discard: bool,
}

impl EditorSession {
    /// Builds a session from freshly loaded editor data.
    #[must_use]
    pub fn open(output: LoadOrderEditorOutput) -> Self {
        let candidates_error = output.candidates_error.as_ref().map(ToString::to_string);
        let (existing, policy) = output
            .existing
            .map_or((None, GlobalPolicy::default()), |stored| {
                (Some(stored.entries), stored.policy)
            });

        Self {
            collection_id: output.collection_id,
            editor: OrderedItemListEditor::initialize(output.candidates, existing, policy),
            drag: DragGesture::default(),
            candidates_error,
            pending_discard: false,
        }
    }

    /// Collection being edited.
    #[must_use]
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// The underlying editor.
    #[must_use]
    pub const fn editor(&self) -> &OrderedItemListEditor {
        &self.editor
    }

    /// Why the workflow list could not be loaded, if it could not.
    #[must_use]
    pub fn candidates_error(&self) -> Option<&str> {
        self.candidates_error.as_deref()
    }

    /// Saving is refused while the workflow list is unavailable, since the
    /// order shown then is empty rather than real.
    #[must_use]
    pub const fn can_save(&self) -> bool {
        self.candidates_error.is_none()
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.editor.is_dirty()
    }

    /// Whether the discard prompt is showing.
    #[must_use]
    pub const fn pending_discard(&self) -> bool {
        self.pending_discard
    }

    pub fn begin_drag(&mut self, index: usize) -> bool {
        let len = self.editor.order().len();
        self.drag.begin(index, len)
    }

    pub fn drag_over(&mut self, index: usize) -> Option<usize> {
        self.drag.hover(&mut self.editor, index)
    }

    pub const fn drop_drag(&mut self) -> Option<usize> {
        self.drag.release()
    }

    pub const fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    pub fn toggle_enabled(&mut self, index: usize) -> Option<bool> {
        self.editor.toggle_enabled(index)
    }

    pub fn toggle_continue_on_failure(&mut self, index: usize) -> Option<bool> {
        self.editor.toggle_continue_on_failure(index)
    }

    pub const fn toggle_global_continue_on_failure(&mut self) -> bool {
        self.editor.toggle_global_continue_on_failure()
    }

    pub const fn set_global_continue_on_failure(&mut self, continue_on_failure: bool) {
        self.editor.set_global_continue_on_failure(continue_on_failure);
    }

    /// Removes a row. Cancels any drag, since indices shift.
    pub fn remove_entry(&mut self, index: usize) -> Option<OrderEntry> {
        self.drag.cancel();
        self.editor.remove_entry(index)
    }

    /// Adds a workflow. Cancels any drag.
    pub fn add_entry(&mut self, item_id: &str) -> bool {
        self.drag.cancel();
        self.editor.add_entry(item_id)
    }

    /// Snapshot to save.
    #[must_use]
    pub fn commit(&self) -> CommittedOrder {
        self.editor.commit()
    }

    /// Records a successful save.
    pub fn mark_saved(&mut self) {
        self.editor.mark_saved();
    }

    /// Asks to close. A dirty session arms the discard prompt.
    pub fn request_close(&mut self) -> CloseRequest {
        self.drag.cancel();
        if self.is_dirty() {
            self.pending_discard = true;
            CloseRequest::NeedsConfirmation
        } else {
            CloseRequest::Close
        }
    }

    /// Dismisses the discard prompt. Returns whether it was showing.
    pub const fn cancel_discard(&mut self) -> bool {
        let was_pending = self.pending_discard;
        self.pending_discard = false;
        was_pending
    }

    /// Ends the session, dropping unsaved edits. Returns the collection id
    /// and whether everything had been saved.
    #[must_use]
    pub fn close(mut self) -> (String, bool) {
        self.drag.cancel();
        let saved = !self.editor.is_dirty();
        self.editor.discard();
        (self.collection_id, saved)
    }

    /// Rows for the order list.
    #[must_use]
    pub fn rows(&self) -> Vec<OrderRowData> {
        let dragging = self.drag.dragging_index();
        self.editor
            .order()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let item = self.editor.item(&entry.item_id);
                OrderRowData {
                    item_id: entry.item_id.clone(),
                    name: item.map_or_else(|| entry.item_id.clone(), |i| i.display_name.clone()),
                    position: entry.position,
                    enabled: entry.enabled,
                    continue_on_failure: entry.continue_on_failure,
                    node_count: item.map_or(0, |i| i.metadata.node_count),
                    dragging: dragging == Some(index),
                }
            })
            .collect()
    }

    /// Entries for the "add more" list.
    #[must_use]
    pub fn available_items(&self) -> Vec<AvailableItemData> {
        self.editor
            .available_to_add()
            .map(|item| AvailableItemData {
                item_id: item.id.clone(),
                name: item.display_name.clone(),
                node_count: item.metadata.node_count,
                description: item.metadata.description.clone().unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiweave_application::CatalogError;
    use apiweave_domain::{Item, StoredOrder};
    use pretty_assertions::assert_eq;

    fn output(existing: Option<StoredOrder>) -> LoadOrderEditorOutput {
        LoadOrderEditorOutput {
            collection_id: "c1".to_string(),
            candidates: vec![
                Item::new("A", "Login").with_node_count(3),
                Item::new("B", "Checkout").with_description("Pays"),
            ],
            candidates_error: None,
            existing,
        }
    }

    #[test]
    fn test_open_uses_saved_order_and_policy() {
        let stored = StoredOrder::new(
            vec![OrderEntry::new("B", 0).with_enabled(false)],
            GlobalPolicy::new(false),
        );
        let session = EditorSession::open(output(Some(stored)));

        assert_eq!(session.collection_id(), "c1");
        assert!(!session.editor().policy().continue_on_failure);
        assert_eq!(
            session.rows(),
            vec![OrderRowData {
                item_id: "B".to_string(),
                name: "Checkout".to_string(),
                position: 0,
                enabled: false,
                continue_on_failure: true,
                node_count: 0,
                dragging: false,
            }]
        );
        assert_eq!(
            session.available_items(),
            vec![AvailableItemData {
                item_id: "A".to_string(),
                name: "Login".to_string(),
                node_count: 3,
                description: String::new(),
            }]
        );
    }

    #[test]
    fn test_rows_resolve_every_entry_to_a_candidate() {
        let stored = StoredOrder::new(
            vec![OrderEntry::new("gone", 0), OrderEntry::new("A", 1)],
            GlobalPolicy::default(),
        );
        let mut session = EditorSession::open(output(Some(stored)));
        assert!(!session.add_entry("gone"));

        let rows = session.rows();
        let resolved: Vec<(&str, &str, usize, usize)> = rows
            .iter()
            .map(|r| (r.item_id.as_str(), r.name.as_str(), r.position, r.node_count))
            .collect();
        assert_eq!(resolved, vec![("A", "Login", 0, 3)]);
    }

    #[test]
    fn test_candidate_failure_blocks_saving() {
        let mut data = output(None);
        data.candidates = Vec::new();
        data.candidates_error = Some(CatalogError::Unavailable("timeout".to_string()));

        let session = EditorSession::open(data);

        assert!(!session.can_save());
        assert!(session.candidates_error().is_some_and(|m| m.contains("timeout")));
        assert!(session.rows().is_empty());
    }

    #[test]
    fn test_rows_mark_the_dragged_entry() {
        let mut session = EditorSession::open(output(None));

        assert!(session.begin_drag(0));
        assert_eq!(session.drag_over(1), Some(1));

        let dragging: Vec<bool> = session.rows().iter().map(|r| r.dragging).collect();
        assert_eq!(dragging, vec![false, true]);

        assert_eq!(session.drop_drag(), Some(1));
        assert!(session.rows().iter().all(|r| !r.dragging));
    }

    #[test]
    fn test_structural_edits_cancel_drag() {
        let mut session = EditorSession::open(output(None));

        session.begin_drag(1);
        session.remove_entry(0);
        assert_eq!(session.drag_over(0), None);

        session.begin_drag(0);
        assert!(session.add_entry("A"));
        assert!(!session.cancel_drag());
    }

    #[test]
    fn test_close_flow() {
        let mut session = EditorSession::open(output(None));
        assert_eq!(session.request_close(), CloseRequest::Close);

        session.toggle_enabled(0);
        assert_eq!(session.request_close(), CloseRequest::NeedsConfirmation);
        assert!(session.pending_discard());
        assert!(session.cancel_discard());
        assert!(!session.pending_discard());

        let (collection_id, saved) = session.close();
        assert_eq!(collection_id, "c1");
        assert!(!saved);
    }
}
