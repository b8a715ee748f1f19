//! APIWeave Domain - Core business types
//!
//! This crate defines the domain model for collection workflow ordering:
//! the workflows a collection can run, the ordered list of entries that
//! drives a collection run, and the collection-wide failure policy.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod item;
pub mod order;
pub mod persistence;

pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use item::{Item, ItemMetadata};
pub use order::{GlobalPolicy, OrderEntry, OrderList, StoredOrder};
