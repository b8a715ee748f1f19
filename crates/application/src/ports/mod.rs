//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod file_system;
mod order_repository;
mod workflow_catalog;

pub use file_system::{FileSystem, FileSystemError};
pub use order_repository::{OrderRepository, OrderStoreError};
pub use workflow_catalog::{CatalogError, WorkflowCatalog};
