//! Workflow catalog port
//!
//! Supplies the candidate set: every workflow that may appear in a
//! collection's run order.

use std::sync::Arc;

use apiweave_domain::Item;
use async_trait::async_trait;

/// Errors that can occur while listing workflows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The collection does not exist.
    #[error("Collection not found: {0}")]
    NotFound(String),

    /// The source could not be reached (network or I/O failure).
    #[error("Workflows unavailable: {0}")]
    Unavailable(String),

    /// The source answered with data that could not be parsed.
    #[error("Invalid workflow data: {0}")]
    InvalidData(String),
}

/// Source of the workflows associated with a collection.
#[async_trait]
pub trait WorkflowCatalog: Send + Sync {
    /// Lists the workflows of a collection, in discovery order.
    ///
    /// # Errors
    /// Returns an error if the workflows cannot be fetched or parsed.
    async fn list_workflows(&self, collection_id: &str) -> Result<Vec<Item>, CatalogError>;
}

#[async_trait]
impl<T: WorkflowCatalog + ?Sized> WorkflowCatalog for Arc<T> {
    async fn list_workflows(&self, collection_id: &str) -> Result<Vec<Item>, CatalogError> {
        (**self).list_workflows(collection_id).await
    }
}
