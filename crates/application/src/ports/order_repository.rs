//! Order repository port
//!
//! Defines the interface for loading and saving a collection's run order.

use std::sync::Arc;

use apiweave_domain::{GlobalPolicy, OrderList, StoredOrder};
use async_trait::async_trait;

/// Errors that can occur during order persistence.
#[derive(Debug, thiserror::Error)]
pub enum OrderStoreError {
    /// Collection not found.
    #[error("Collection not found: {0}")]
    NotFound(String),

    /// The store could not be reached.
    #[error("Order store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request.
    #[error("Rejected with status {status}: {reason}")]
    Rejected {
        /// Status code reported by the store.
        status: u16,
        /// Reason reported by the store.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Repository trait for collection run orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Loads the persisted order of a collection.
    ///
    /// Returns `Ok(None)` when the collection exists but has never had an
    /// order saved. Entries are returned as stored; callers rehydrate them
    /// against the current candidate set.
    ///
    /// # Errors
    /// Returns `OrderStoreError::NotFound` if the collection doesn't exist.
    async fn load_order(
        &self,
        collection_id: &str,
    ) -> Result<Option<StoredOrder>, OrderStoreError>;

    /// Persists the order and policy of a collection, replacing the previous one.
    ///
    /// # Errors
    /// Returns an error if the order cannot be written.
    async fn save_order(
        &self,
        collection_id: &str,
        order: &OrderList,
        policy: GlobalPolicy,
    ) -> Result<(), OrderStoreError>;
}

#[async_trait]
impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    async fn load_order(
        &self,
        collection_id: &str,
    ) -> Result<Option<StoredOrder>, OrderStoreError> {
        (**self).load_order(collection_id).await
    }

    async fn save_order(
        &self,
        collection_id: &str,
        order: &OrderList,
        policy: GlobalPolicy,
    ) -> Result<(), OrderStoreError> {
        (**self).save_order(collection_id, order, policy).await
    }
}
