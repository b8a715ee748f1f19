//! Application error types

use apiweave_domain::DomainError;
use thiserror::Error;

use crate::ports::{CatalogError, OrderStoreError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The workflow catalog could not be read.
    #[error("workflow catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The order store failed to load or save.
    #[error("order store error: {0}")]
    OrderStore(#[from] OrderStoreError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
