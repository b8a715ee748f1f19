//! APIWeave UI - Order editor presentation layer
//!
//! This crate holds the state behind the collection order editor and the
//! controller that connects it to the application layer. Front ends talk
//! to the controller through the [`UiCommand`] / [`UiUpdate`] channels.

mod controller;
pub mod bridge;
pub mod state;

pub use bridge::{AvailableItemData, OrderRowData, UiCommand, UiUpdate};
pub use controller::OrderEditorController;
pub use state::{CloseRequest, CommittedOrder, DragGesture, EditorSession, OrderedItemListEditor};
