//! Adapters for external services.

mod rest_client;

pub use rest_client::{RestClientError, RestCollectionClient};
