//! REST adapter for the APIWeave backend using reqwest.
//!
//! Implements the `WorkflowCatalog` and `OrderRepository` ports against:
//! - `GET  {base}/api/collections/{id}/workflows`
//! - `GET  {base}/api/collections/{id}`
//! - `PUT  {base}/api/collections/{id}/workflow-order`
//!
//! Wire payloads use camelCase and are converted into validated domain
//! types here, before anything else sees them.

use std::time::Duration;

use apiweave_application::ports::{CatalogError, OrderRepository, OrderStoreError, WorkflowCatalog};
use apiweave_domain::{DomainError, GlobalPolicy, Item, OrderEntry, OrderList, StoredOrder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("APIWeave/", env!("CARGO_PKG_VERSION"));

const fn default_true() -> bool {
    true
}

/// Errors raised while constructing the client.
#[derive(Debug, thiserror::Error)]
pub enum RestClientError {
    /// The base URL cannot address the API.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// Why a backend call failed, before it is mapped onto a port error.
#[derive(Debug, PartialEq, Eq)]
enum CallFailure {
    NotFound,
    Status { status: u16, body: String },
    Transport(String),
    Decode(String),
}

impl CallFailure {
    fn into_catalog_error(self, collection_id: &str) -> CatalogError {
        match self {
            Self::NotFound => CatalogError::NotFound(collection_id.to_string()),
            Self::Status { status, body } => {
                CatalogError::Unavailable(format!("backend returned {status}: {body}"))
            }
            Self::Transport(message) => CatalogError::Unavailable(message),
            Self::Decode(message) => CatalogError::InvalidData(message),
        }
    }

    fn into_store_error(self, collection_id: &str) -> OrderStoreError {
        match self {
            Self::NotFound => OrderStoreError::NotFound(collection_id.to_string()),
            Self::Status { status, body } => OrderStoreError::Rejected {
                status,
                reason: body,
            },
            Self::Transport(message) => OrderStoreError::Unavailable(message),
            Self::Decode(message) => OrderStoreError::Serialization(message),
        }
    }
}

/// A workflow as listed by the backend.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowDto {
    workflow_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    nodes: Vec<serde_json::Value>,
    #[serde(default)]
    node_count: Option<usize>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<WorkflowDto> for Item {
    type Error = DomainError;

    fn try_from(dto: WorkflowDto) -> Result<Self, Self::Error> {
        let node_count = dto.node_count.unwrap_or(dto.nodes.len());
        let mut item = Self::try_new(dto.workflow_id, dto.name)?.with_node_count(node_count);
        item.metadata.description = dto.description;
        item.metadata.updated_at = dto.updated_at;
        Ok(item)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderEntryDto {
    workflow_id: String,
    order: usize,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_true")]
    continue_on_fail: bool,
}

impl From<OrderEntryDto> for OrderEntry {
    fn from(dto: OrderEntryDto) -> Self {
        Self::new(dto.workflow_id, dto.order)
            .with_enabled(dto.enabled)
            .with_continue_on_failure(dto.continue_on_fail)
    }
}

impl From<&OrderEntry> for OrderEntryDto {
    fn from(entry: &OrderEntry) -> Self {
        Self {
            workflow_id: entry.item_id.clone(),
            order: entry.position,
            enabled: entry.enabled,
            continue_on_fail: entry.continue_on_failure,
        }
    }
}

/// The parts of a collection the order editor reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionDto {
    #[serde(default)]
    workflow_order: Option<Vec<OrderEntryDto>>,
    #[serde(default)]
    continue_on_fail: Option<bool>,
}

impl CollectionDto {
    /// Returns `None` when the backend has nothing saved for the collection.
    fn into_stored_order(self) -> Option<StoredOrder> {
        if self.workflow_order.is_none() && self.continue_on_fail.is_none() {
            return None;
        }

        let entries = self
            .workflow_order
            .unwrap_or_default()
            .into_iter()
            .map(OrderEntry::from)
            .collect();
        let policy = self
            .continue_on_fail
            .map_or_else(GlobalPolicy::default, GlobalPolicy::new);

        Some(StoredOrder::new(entries, policy))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderUpdateDto {
    workflow_order: Vec<OrderEntryDto>,
    continue_on_fail: bool,
}

impl OrderUpdateDto {
    fn new(order: &OrderList, policy: GlobalPolicy) -> Self {
        Self {
            workflow_order: order.iter().map(OrderEntryDto::from).collect(),
            continue_on_fail: policy.continue_on_failure,
        }
    }
}

/// HTTP client for the collection endpoints of the APIWeave backend.
#[derive(Debug, Clone)]
pub struct RestCollectionClient {
    client: Client,
    base_url: Url,
}

impl RestCollectionClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute http(s) URL or the
    /// client cannot be created.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RestClientError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RestClientError::Build(e.to_string()))?;

        Self::with_client(client, base_url)
    }

    /// Creates a client around a preconfigured reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute http(s) URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, RestClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RestClientError::InvalidBaseUrl(format!("{e}: {base_url}")))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(RestClientError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    /// Builds `{base}/api/collections/{collection_id}/{tail...}`.
    ///
    /// Segments are percent-encoded, so ids cannot escape the collection path.
    fn collection_url(&self, collection_id: &str, tail: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "collections", collection_id])
                .extend(tail);
        }
        url
    }

    fn transport_failure(error: &reqwest::Error) -> CallFailure {
        if error.is_timeout() {
            CallFailure::Transport(format!("request timed out: {error}"))
        } else {
            CallFailure::Transport(error.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CallFailure> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CallFailure::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallFailure::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CallFailure> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport_failure(&e))?;

        let bytes = Self::check_status(response)
            .await?
            .bytes()
            .await
            .map_err(|e| Self::transport_failure(&e))?;

        serde_json::from_slice(&bytes).map_err(|e| CallFailure::Decode(e.to_string()))
    }
}

#[async_trait]
impl WorkflowCatalog for RestCollectionClient {
    async fn list_workflows(&self, collection_id: &str) -> Result<Vec<Item>, CatalogError> {
        let url = self.collection_url(collection_id, &["workflows"]);
        let workflows: Vec<WorkflowDto> = self
            .get_json(url)
            .await
            .map_err(|f| f.into_catalog_error(collection_id))?;

        workflows
            .into_iter()
            .map(|dto| Item::try_from(dto).map_err(|e| CatalogError::InvalidData(e.to_string())))
            .collect()
    }
}

#[async_trait]
impl OrderRepository for RestCollectionClient {
    async fn load_order(
        &self,
        collection_id: &str,
    ) -> Result<Option<StoredOrder>, OrderStoreError> {
        let url = self.collection_url(collection_id, &[]);
        let collection: CollectionDto = self
            .get_json(url)
            .await
            .map_err(|f| f.into_store_error(collection_id))?;

        Ok(collection.into_stored_order())
    }

    async fn save_order(
        &self,
        collection_id: &str,
        order: &OrderList,
        policy: GlobalPolicy,
    ) -> Result<(), OrderStoreError> {
        let url = self.collection_url(collection_id, &["workflow-order"]);
        debug!(%url, entries = order.len(), "PUT");

        let response = self
            .client
            .put(url)
            .json(&OrderUpdateDto::new(order, policy))
            .send()
            .await
            .map_err(|e| Self::transport_failure(&e).into_store_error(collection_id))?;

        Self::check_status(response)
            .await
            .map_err(|f| f.into_store_error(collection_id))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(base: &str) -> RestCollectionClient {
        RestCollectionClient::new(base, Duration::from_secs(5)).expect("client builds")
    }

    #[test]
    fn test_collection_url_with_and_without_trailing_slash() {
        for base in ["http://localhost:8000", "http://localhost:8000/"] {
            let url = client(base).collection_url("c1", &["workflows"]);
            assert_eq!(url.as_str(), "http://localhost:8000/api/collections/c1/workflows");
        }
    }

    #[test]
    fn test_collection_url_keeps_base_path_and_encodes_ids() {
        let url = client("https://example.com/weave/").collection_url("a/../b", &[]);
        assert_eq!(
            url.as_str(),
            "https://example.com/weave/api/collections/a%2F..%2Fb"
        );
    }

    #[test]
    fn test_rejects_non_http_base_urls() {
        for base in ["not a url", "mailto:someone@example.com", "ftp://example.com"] {
            let result = RestCollectionClient::new(base, Duration::from_secs(1));
            assert!(matches!(result, Err(RestClientError::InvalidBaseUrl(_))), "{base}");
        }
    }

    #[test]
    fn test_workflow_dto_counts_nodes() {
        let dto: WorkflowDto = serde_json::from_str(
            r#"{"workflowId":"wf-1","name":"Login","nodes":[{},{},{}],"description":"auth"}"#,
        )
        .expect("parses");

        let item = Item::try_from(dto).expect("valid");
        assert_eq!(item.id, "wf-1");
        assert_eq!(item.metadata.node_count, 3);
        assert_eq!(item.metadata.description.as_deref(), Some("auth"));
    }

    #[test]
    fn test_workflow_dto_prefers_explicit_node_count() {
        let dto: WorkflowDto =
            serde_json::from_str(r#"{"workflowId":"wf-1","name":"A","nodeCount":12}"#)
                .expect("parses");
        assert_eq!(Item::try_from(dto).expect("valid").metadata.node_count, 12);
    }

    #[test]
    fn test_workflow_dto_rejects_blank_id() {
        let dto: WorkflowDto =
            serde_json::from_str(r#"{"workflowId":" ","name":"A"}"#).expect("parses");
        assert!(matches!(
            Item::try_from(dto),
            Err(DomainError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_collection_dto_without_order_is_none() {
        let dto: CollectionDto =
            serde_json::from_str(r#"{"collectionId":"c1","name":"Suite"}"#).expect("parses");
        assert_eq!(dto.into_stored_order(), None);
    }

    #[test]
    fn test_collection_dto_to_stored_order() {
        let dto: CollectionDto = serde_json::from_str(
            r#"{
                "collectionId": "c1",
                "workflowOrder": [
                    {"workflowId": "B", "order": 1, "enabled": false},
                    {"workflowId": "A", "order": 0, "continueOnFail": false}
                ],
                "continueOnFail": false
            }"#,
        )
        .expect("parses");

        let stored = dto.into_stored_order().expect("order present");
        assert_eq!(
            stored.entries,
            vec![
                OrderEntry::new("B", 1).with_enabled(false),
                OrderEntry::new("A", 0).with_continue_on_failure(false),
            ]
        );
        assert_eq!(stored.policy, GlobalPolicy::new(false));
    }

    #[test]
    fn test_order_update_payload_shape() {
        let items = [Item::new("A", "Login"), Item::new("B", "Checkout")];
        let mut order = OrderList::from_candidates(&items);
        order.toggle_enabled(1);

        let json = serde_json::to_value(OrderUpdateDto::new(&order, GlobalPolicy::new(true)))
            .expect("serializes");

        assert_eq!(
            json,
            serde_json::json!({
                "workflowOrder": [
                    {"workflowId": "A", "order": 0, "enabled": true, "continueOnFail": true},
                    {"workflowId": "B", "order": 1, "enabled": false, "continueOnFail": true}
                ],
                "continueOnFail": true
            })
        );
    }

    #[test]
    fn test_failures_map_onto_port_errors() {
        assert_eq!(
            CallFailure::NotFound.into_catalog_error("c1"),
            CatalogError::NotFound("c1".to_string())
        );
        assert!(matches!(
            CallFailure::Status {
                status: 503,
                body: "maintenance".to_string()
            }
            .into_store_error("c1"),
            OrderStoreError::Rejected { status: 503, ref reason } if reason == "maintenance"
        ));
        assert!(matches!(
            CallFailure::Transport("refused".to_string()).into_store_error("c1"),
            OrderStoreError::Unavailable(_)
        ));
    }
}
