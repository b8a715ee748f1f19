//! Backend selection: REST service or local file store.

use apiweave_application::{CatalogError, OrderRepository, OrderStoreError, WorkflowCatalog};
use apiweave_domain::{GlobalPolicy, Item, OrderList, StoredOrder};
use apiweave_infrastructure::{
    AppConfig, FileCollectionStore, RestClientError, RestCollectionClient, TokioFileSystem,
};
use async_trait::async_trait;
use tracing::info;

/// Where collections live.
#[derive(Debug)]
pub enum Backend {
    Rest(RestCollectionClient),
    File(FileCollectionStore<TokioFileSystem>),
}

impl Backend {
    /// Uses the REST service when `api_base_url` is set, else the file store.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, RestClientError> {
        if let Some(base_url) = &config.api_base_url {
            info!(%base_url, "using REST backend");
            return Ok(Self::Rest(RestCollectionClient::new(
                base_url,
                config.request_timeout(),
            )?));
        }

        info!(data_dir = %config.data_dir.display(), "using file store");
        Ok(Self::File(FileCollectionStore::new(
            TokioFileSystem::new(),
            config.data_dir.clone(),
        )))
    }

    /// The file store, if that is the active backend.
    #[must_use]
    pub const fn file_store(&self) -> Option<&FileCollectionStore<TokioFileSystem>> {
        match self {
            Self::File(store) => Some(store),
            Self::Rest(_) => None,
        }
    }
}

#[async_trait]
impl WorkflowCatalog for Backend {
    async fn list_workflows(&self, collection_id: &str) -> Result<Vec<Item>, CatalogError> {
        match self {
            Self::Rest(client) => client.list_workflows(collection_id).await,
            Self::File(store) => store.list_workflows(collection_id).await,
        }
    }
}

#[async_trait]
impl OrderRepository for Backend {
    async fn load_order(
        &self,
        collection_id: &str,
    ) -> Result<Option<StoredOrder>, OrderStoreError> {
        match self {
            Self::Rest(client) => client.load_order(collection_id).await,
            Self::File(store) => store.load_order(collection_id).await,
        }
    }

    async fn save_order(
        &self,
        collection_id: &str,
        order: &OrderList,
        policy: GlobalPolicy,
    ) -> Result<(), OrderStoreError> {
        match self {
            Self::Rest(client) => client.save_order(collection_id, order, policy).await,
            Self::File(store) => store.save_order(collection_id, order, policy).await,
        }
    }
}
