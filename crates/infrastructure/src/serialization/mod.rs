//! Deterministic JSON serialization for APIWeave files.
//!
//! Ensures clean Git diffs by:
//! - Keeping struct fields in alphabetical order (in domain types)
//! - Using 2-space indentation
//! - Adding a trailing newline

mod json;

pub use json::*;
