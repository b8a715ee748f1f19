//! Order editor state.

mod drag;
mod order_editor;
mod session;

pub use drag::DragGesture;
pub use order_editor::{CommittedOrder, OrderedItemListEditor};
pub use session::{CloseRequest, EditorSession};
