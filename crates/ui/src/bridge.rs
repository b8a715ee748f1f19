//! UI Bridge Module
//!
//! Defines the protocol between the order editor front end and the
//! controller running on the Tokio runtime.

/// Commands sent from the UI to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Open the order editor for a collection.
    OpenOrderEditor { collection_id: String },

    /// Reload after the workflow list could not be loaded.
    RetryLoad,

    // --- Drag to reorder ---
    /// Pointer pressed on a row's drag handle.
    BeginDrag { index: usize },

    /// Dragged row is over another row.
    DragOver { index: usize },

    /// Pointer released.
    Drop,

    /// Escape pressed or pointer left the list.
    CancelDrag,

    // --- Row edits ---
    /// Enable or disable a row.
    ToggleEnabled { index: usize },

    /// Toggle a row's continue-on-failure flag.
    ToggleContinueOnFailure { index: usize },

    /// Toggle the collection-wide continue-on-failure flag.
    ToggleGlobalContinueOnFailure,

    /// Remove a row.
    RemoveEntry { index: usize },

    /// Add a workflow from the "add more" list.
    AddEntry { item_id: String },

    // --- Save / close ---
    /// Save the order, optionally closing the editor afterwards.
    SaveOrder { close_after: bool },

    /// Close the editor (asks first if there are unsaved changes).
    CloseEditor,

    /// Close without saving after the confirmation prompt.
    ConfirmDiscard,

    /// Keep editing after the confirmation prompt.
    CancelDiscard,
}

/// One row of the order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRowData {
    pub item_id: String,
    pub name: String,
    pub position: usize,
    pub enabled: bool,
    pub continue_on_failure: bool,
    pub node_count: usize,
    pub dragging: bool,
}

/// One entry of the "add more" list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableItemData {
    pub item_id: String,
    pub name: String,
    pub node_count: usize,
    pub description: String,
}

/// Updates sent from the controller to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// An editor is open for the collection.
    EditorOpened { collection_id: String },

    /// Current order rows.
    OrderRows(Vec<OrderRowData>),

    /// Workflows that can still be added.
    AvailableItems(Vec<AvailableItemData>),

    /// Collection-wide continue-on-failure flag.
    GlobalPolicy { continue_on_failure: bool },

    /// Whether there are unsaved changes.
    Dirty(bool),

    /// The workflow list failed to load; saving is disabled until a retry.
    CandidatesUnavailable { message: String },

    /// A save is in flight.
    Saving,

    /// The order was saved.
    SaveSucceeded,

    /// The order was not saved; the editor keeps its state.
    SaveFailed { message: String },

    /// Show or hide the discard confirmation prompt.
    ShowDiscardConfirmation(bool),

    /// The editor was closed.
    EditorClosed { collection_id: String },

    /// Error message.
    Error { message: String },
}
