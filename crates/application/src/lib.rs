//! APIWeave Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the workflow catalog and order storage)
//! - Use case orchestration for loading and saving a collection run order
//! - A typed event bus for cross-component notifications
//! - Application-level error handling

pub mod error;
pub mod events;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use events::{AppEvent, EventBus};
pub use ports::{
    CatalogError, FileSystem, FileSystemError, OrderRepository, OrderStoreError, WorkflowCatalog,
};
pub use use_cases::{
    LoadOrderEditor, LoadOrderEditorInput, LoadOrderEditorOutput, SaveWorkflowOrder,
    SaveWorkflowOrderInput,
};
