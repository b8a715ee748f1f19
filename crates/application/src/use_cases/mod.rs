//! Application use cases (business logic orchestration).

mod load_order_editor;
mod save_workflow_order;

pub use load_order_editor::*;
pub use save_workflow_order::*;
