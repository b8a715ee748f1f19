//! ID generation utilities.

use uuid::Uuid;

/// Generates a new UUID v7 as a string.
///
/// UUID v7 includes timestamp information and is sortable, so collections
/// and workflows created later also sort later on disk.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}
