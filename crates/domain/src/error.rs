//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A display name is invalid or empty.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// The same item appears more than once in an order.
    #[error("duplicate item in order: {0}")]
    DuplicateItem(String),

    /// Entry positions are not contiguous from zero.
    #[error("invalid position {found} at index {index}")]
    InvalidPosition {
        /// Index of the offending entry.
        index: usize,
        /// Position stored on the entry.
        found: usize,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
