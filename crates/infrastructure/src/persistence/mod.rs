//! Persistence implementations for file-based storage.

mod collection_store;
mod file_system;

pub use collection_store::*;
pub use file_system::*;
