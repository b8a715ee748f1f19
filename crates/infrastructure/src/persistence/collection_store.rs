//! File-based collection store.
//!
//! Collections are stored as one JSON file each:
//! ```text
//! data_dir/
//!   collections/
//!     <collection-id>/
//!       collection.json
//! ```
//!
//! The store serves both the workflow catalog and the order repository
//! ports, so the CLI can work without a backend.

use std::path::{Path, PathBuf};

use apiweave_application::ports::{
    CatalogError, FileSystem, FileSystemError, OrderRepository, OrderStoreError, WorkflowCatalog,
};
use apiweave_domain::persistence::{CURRENT_SCHEMA_VERSION, PersistenceCollection};
use apiweave_domain::{DomainError, GlobalPolicy, Item, OrderList, StoredOrder, generate_id};
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

const COLLECTION_FILE: &str = "collection.json";

/// Error type for collection store operations.
#[derive(Debug, thiserror::Error)]
pub enum CollectionStoreError {
    /// Collection not found.
    #[error("Collection not found: {0}")]
    NotFound(String),

    /// The id cannot be used as a directory name.
    #[error("Invalid collection id: {0:?}")]
    InvalidId(String),

    /// Input rejected by domain validation.
    #[error("Invalid input: {0}")]
    Domain(#[from] DomainError),

    /// Schema version mismatch.
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaMismatch {
        /// Expected schema version.
        expected: u32,
        /// Found schema version.
        found: u32,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// File system error.
    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),
}

impl From<CollectionStoreError> for CatalogError {
    fn from(error: CollectionStoreError) -> Self {
        match error {
            CollectionStoreError::NotFound(id) | CollectionStoreError::InvalidId(id) => {
                Self::NotFound(id)
            }
            CollectionStoreError::FileSystem(e) => Self::Unavailable(e.to_string()),
            other => Self::InvalidData(other.to_string()),
        }
    }
}

impl From<CollectionStoreError> for OrderStoreError {
    fn from(error: CollectionStoreError) -> Self {
        match error {
            CollectionStoreError::NotFound(id) | CollectionStoreError::InvalidId(id) => {
                Self::NotFound(id)
            }
            CollectionStoreError::FileSystem(FileSystemError::Io(e)) => Self::Io(e),
            CollectionStoreError::FileSystem(e) => Self::Unavailable(e.to_string()),
            other => Self::Serialization(other.to_string()),
        }
    }
}

/// Collection store backed by JSON files.
#[derive(Debug, Clone)]
pub struct FileCollectionStore<F> {
    fs: F,
    root: PathBuf,
}

impl<F: FileSystem> FileCollectionStore<F> {
    /// Creates a store rooted at `root` (the data directory).
    pub fn new(fs: F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    /// Returns the data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_file(&self, collection_id: &str) -> Result<PathBuf, CollectionStoreError> {
        if !is_safe_segment(collection_id) {
            return Err(CollectionStoreError::InvalidId(collection_id.to_string()));
        }
        Ok(self
            .root
            .join("collections")
            .join(collection_id)
            .join(COLLECTION_FILE))
    }

    /// Loads a collection file.
    ///
    /// # Errors
    /// Returns `NotFound` if the collection doesn't exist, or an error if the
    /// file cannot be read or parsed.
    pub async fn load_collection(
        &self,
        collection_id: &str,
    ) -> Result<PersistenceCollection, CollectionStoreError> {
        let path = self.collection_file(collection_id)?;

        let content = match self.fs.read_file(&path).await {
            Ok(content) => content,
            Err(FileSystemError::NotFound(_)) => {
                return Err(CollectionStoreError::NotFound(collection_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let collection: PersistenceCollection = from_json_bytes(&content)?;
        if collection.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(CollectionStoreError::SchemaMismatch {
                expected: CURRENT_SCHEMA_VERSION,
                found: collection.schema_version,
            });
        }

        Ok(collection)
    }

    /// Writes a collection file, stamping `updated_at`.
    ///
    /// The file is written next to its destination and renamed into place,
    /// so readers never see a half-written file.
    async fn write_collection(
        &self,
        collection: &mut PersistenceCollection,
    ) -> Result<(), CollectionStoreError> {
        let path = self.collection_file(&collection.id)?;
        collection.updated_at = Some(Utc::now());

        let content = to_json_stable_bytes(collection)?;
        let staging = path.with_extension("json.tmp");
        self.fs.write_file(&staging, &content).await?;
        self.fs.rename(&staging, &path).await?;

        debug!(collection_id = %collection.id, path = %path.display(), "collection written");
        Ok(())
    }

    /// Creates a new empty collection with a generated id.
    ///
    /// # Errors
    /// Returns an error if the name is blank or the file cannot be written.
    pub async fn create_collection(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<PersistenceCollection, CollectionStoreError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidName(name.to_string()).into());
        }

        let mut collection = PersistenceCollection::new(generate_id(), name.trim());
        if let Some(description) = description {
            collection = collection.with_description(description);
        }

        self.write_collection(&mut collection).await?;
        Ok(collection)
    }

    /// Adds a new workflow with a generated id to a collection.
    ///
    /// The saved order is left alone; the workflow shows up as available to
    /// add, or in the default order if none was saved.
    ///
    /// # Errors
    /// Returns an error if the collection doesn't exist, the name is blank,
    /// or the file cannot be written.
    pub async fn add_workflow(
        &self,
        collection_id: &str,
        name: &str,
        node_count: usize,
    ) -> Result<Item, CollectionStoreError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidName(name.to_string()).into());
        }

        let mut collection = self.load_collection(collection_id).await?;
        let item = Item::try_new(generate_id(), name.trim())?
            .with_node_count(node_count)
            .with_updated_at(Utc::now());

        collection.workflows.push(item.clone());
        self.write_collection(&mut collection).await?;
        Ok(item)
    }
}

fn is_safe_segment(id: &str) -> bool {
    !id.trim().is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}

#[async_trait]
impl<F: FileSystem> WorkflowCatalog for FileCollectionStore<F> {
    async fn list_workflows(&self, collection_id: &str) -> Result<Vec<Item>, CatalogError> {
        let collection = self.load_collection(collection_id).await?;
        Ok(collection.workflows)
    }
}

#[async_trait]
impl<F: FileSystem> OrderRepository for FileCollectionStore<F> {
    async fn load_order(
        &self,
        collection_id: &str,
    ) -> Result<Option<StoredOrder>, OrderStoreError> {
        let collection = self.load_collection(collection_id).await?;
        Ok(Some(collection.stored_order()))
    }

    async fn save_order(
        &self,
        collection_id: &str,
        order: &OrderList,
        policy: GlobalPolicy,
    ) -> Result<(), OrderStoreError> {
        let mut collection = self.load_collection(collection_id).await?;
        collection.apply_order(order, policy);
        self.write_collection(&mut collection).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::persistence::TokioFileSystem;
    use apiweave_domain::OrderEntry;
    use pretty_assertions::assert_eq;
    use tempfile::{TempDir, tempdir};

    fn store() -> (TempDir, FileCollectionStore<TokioFileSystem>) {
        let dir = tempdir().expect("temp dir");
        let store = FileCollectionStore::new(TokioFileSystem::new(), dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_create_and_list_workflows() {
        let (_dir, store) = store();

        let collection = store
            .create_collection("Smoke suite", Some("Runs on every deploy"))
            .await
            .expect("create");
        let login = store
            .add_workflow(&collection.id, "Login", 4)
            .await
            .expect("add login");
        let checkout = store
            .add_workflow(&collection.id, "Checkout", 9)
            .await
            .expect("add checkout");

        let workflows = store.list_workflows(&collection.id).await.expect("list");
        assert_eq!(workflows, vec![login, checkout]);
        assert_eq!(workflows[1].metadata.node_count, 9);

        let file = store
            .root()
            .join("collections")
            .join(&collection.id)
            .join("collection.json");
        assert!(file.exists());
        assert!(!file.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_unsaved_order_loads_with_default_policy() {
        let (_dir, store) = store();
        let collection = store.create_collection("Suite", None).await.expect("create");

        let stored = store
            .load_order(&collection.id)
            .await
            .expect("load")
            .expect("stored order present");

        assert!(stored.entries.is_empty());
        assert_eq!(stored.policy, GlobalPolicy::default());
    }

    #[tokio::test]
    async fn test_save_order_round_trip() {
        let (_dir, store) = store();
        let collection = store.create_collection("Suite", None).await.expect("create");
        let a = store.add_workflow(&collection.id, "A", 1).await.expect("add");
        let b = store.add_workflow(&collection.id, "B", 2).await.expect("add");

        let mut order = OrderList::from_candidates(&[a.clone(), b.clone()]);
        order.move_entry(1, 0);
        order.toggle_continue_on_failure(0);

        store
            .save_order(&collection.id, &order, GlobalPolicy::new(false))
            .await
            .expect("save");

        let stored = store
            .load_order(&collection.id)
            .await
            .expect("load")
            .expect("stored order present");
        assert_eq!(
            stored.entries,
            vec![
                OrderEntry::new(b.id, 0).with_continue_on_failure(false),
                OrderEntry::new(a.id, 1),
            ]
        );
        assert!(!stored.policy.continue_on_failure);

        let reloaded = store.load_collection(&collection.id).await.expect("reload");
        assert!(reloaded.updated_at.is_some());
        assert_eq!(reloaded.workflows.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_collection_is_not_found() {
        let (_dir, store) = store();

        let catalog = store.list_workflows("nope").await.unwrap_err();
        assert_eq!(catalog, CatalogError::NotFound("nope".to_string()));

        let orders = store.load_order("nope").await.unwrap_err();
        assert!(matches!(orders, OrderStoreError::NotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_unsafe_ids_are_rejected() {
        let (_dir, store) = store();

        for id in ["../escape", "a/b", "..", ""] {
            let error = store.load_collection(id).await.unwrap_err();
            assert!(matches!(error, CollectionStoreError::InvalidId(_)), "{id}");
        }
    }

    #[tokio::test]
    async fn test_blank_names_are_rejected() {
        let (_dir, store) = store();

        let error = store.create_collection("   ", None).await.unwrap_err();
        assert!(matches!(
            error,
            CollectionStoreError::Domain(DomainError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_newer_schema_is_rejected() {
        let (_dir, store) = store();
        let collection = store.create_collection("Suite", None).await.expect("create");
        let path = store.collection_file(&collection.id).expect("path");

        let mut newer = collection.clone();
        newer.schema_version = CURRENT_SCHEMA_VERSION + 1;
        std::fs::write(&path, to_json_stable_bytes(&newer).expect("json")).expect("write");

        let error = store.load_collection(&collection.id).await.unwrap_err();
        assert!(matches!(error, CollectionStoreError::SchemaMismatch { .. }));
    }
}
