//! Persistence types for file-based storage.
//!
//! These types define the on-disk format of a collection and the workflow
//! order stored inside it. The format uses deterministic field ordering so
//! files diff cleanly under version control.

mod collection;
mod common;

pub use collection::PersistenceCollection;
pub use common::{CURRENT_SCHEMA_VERSION, Id};
