//! Load order editor use case.

use apiweave_domain::{Item, StoredOrder};
use tracing::{debug, warn};

use crate::ApplicationResult;
use crate::ports::{CatalogError, OrderRepository, WorkflowCatalog};

/// Input for loading the data an order editor starts from.
#[derive(Debug, Clone)]
pub struct LoadOrderEditorInput {
    /// Collection whose run order is edited.
    pub collection_id: String,
}

/// Everything needed to initialise an order editor.
#[derive(Debug, Clone)]
pub struct LoadOrderEditorOutput {
    /// Collection the data belongs to.
    pub collection_id: String,
    /// Candidate workflows. Empty when `candidates_error` is set.
    pub candidates: Vec<Item>,
    /// Why the candidates could not be loaded, if they could not.
    pub candidates_error: Option<CatalogError>,
    /// Previously saved order, if any.
    pub existing: Option<StoredOrder>,
}

impl LoadOrderEditorOutput {
    /// Whether the candidate set is usable.
    #[must_use]
    pub const fn candidates_available(&self) -> bool {
        self.candidates_error.is_none()
    }
}

/// Loads the candidate workflows and the saved order of a collection.
pub struct LoadOrderEditor<C, R> {
    catalog: C,
    orders: R,
}

impl<C: WorkflowCatalog, R: OrderRepository> LoadOrderEditor<C, R> {
    /// Creates a new `LoadOrderEditor` use case.
    #[must_use]
    pub const fn new(catalog: C, orders: R) -> Self {
        Self { catalog, orders }
    }

    /// Executes the use case.
    ///
    /// Both sources are queried concurrently. A catalog failure is not
    /// fatal: the output carries an empty candidate set and the error, so
    /// the editor can open and offer a retry.
    ///
    /// # Errors
    /// Returns an error if the saved order cannot be loaded.
    pub async fn execute(
        &self,
        input: LoadOrderEditorInput,
    ) -> ApplicationResult<LoadOrderEditorOutput> {
        let collection_id = input.collection_id;

        let (candidates, existing) = tokio::join!(
            self.catalog.list_workflows(&collection_id),
            self.orders.load_order(&collection_id),
        );

        let existing = existing?;

        let (candidates, candidates_error) = match candidates {
            Ok(items) => (items, None),
            Err(error) => {
                warn!(%collection_id, %error, "workflow candidates unavailable");
                (Vec::new(), Some(error))
            }
        };

        debug!(
            %collection_id,
            candidates = candidates.len(),
            saved_entries = existing.as_ref().map_or(0, |order| order.entries.len()),
            "loaded order editor data"
        );

        Ok(LoadOrderEditorOutput {
            collection_id,
            candidates,
            candidates_error,
            existing,
        })
    }
}
