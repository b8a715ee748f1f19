//! Common types shared across persistence models.

/// Current schema version for all APIWeave file formats.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A UUID string type for stable identifiers.
/// Using String instead of `uuid::Uuid` keeps ids from other backends opaque.
pub type Id = String;
