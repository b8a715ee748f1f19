//! APIWeave Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;
pub mod telemetry;

pub use adapters::{RestClientError, RestCollectionClient};
pub use self::config::{AppConfig, ConfigError};
pub use persistence::{CollectionStoreError, FileCollectionStore, TokioFileSystem};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes};
pub use telemetry::{TelemetryError, init_tracing};
