//! Collection metadata type (collection.json).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{CURRENT_SCHEMA_VERSION, Id};
use crate::item::Item;
use crate::order::{GlobalPolicy, OrderEntry, OrderList, StoredOrder};

const fn default_true() -> bool {
    true
}

/// Collection stored in `collection.json` within a collection directory.
///
/// A collection groups workflows and keeps the order in which a collection
/// run executes them, together with the collection-wide failure policy.
///
/// Fields are ordered alphabetically for deterministic serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceCollection {
    /// Whether a collection run proceeds after a workflow fails.
    #[serde(default = "default_true")]
    pub continue_on_failure: bool,

    /// Human-readable description of the collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unique identifier (UUID v7).
    pub id: Id,

    /// Human-readable collection name.
    pub name: String,

    /// Schema version for migration support.
    pub schema_version: u32,

    /// Last time the collection file was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Saved run order. Empty means no order has been saved yet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workflow_order: Vec<OrderEntry>,

    /// Workflows that belong to the collection.
    #[serde(default)]
    pub workflows: Vec<Item>,
}

impl PersistenceCollection {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            continue_on_failure: true,
            description: None,
            id,
            name: name.into(),
            schema_version: CURRENT_SCHEMA_VERSION,
            updated_at: None,
            workflow_order: Vec::new(),
            workflows: Vec::new(),
        }
    }

    /// Sets the collection description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a workflow to the collection.
    #[must_use]
    pub fn with_workflow(mut self, item: Item) -> Self {
        self.workflows.push(item);
        self
    }

    /// Returns the saved order and policy as read from disk.
    #[must_use]
    pub fn stored_order(&self) -> StoredOrder {
        StoredOrder::new(
            self.workflow_order.clone(),
            GlobalPolicy::new(self.continue_on_failure),
        )
    }

    /// Replaces the saved order and policy.
    pub fn apply_order(&mut self, order: &OrderList, policy: GlobalPolicy) {
        self.workflow_order = order.entries().to_vec();
        self.continue_on_failure = policy.continue_on_failure;
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collection_new() {
        let collection = PersistenceCollection::new(
            "0190a1b2-0000-7000-8000-000000000000".to_string(),
            "Smoke suite",
        );
        assert_eq!(collection.name, "Smoke suite");
        assert_eq!(collection.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(collection.continue_on_failure);
        assert!(collection.workflow_order.is_empty());
    }

    #[test]
    fn test_apply_order_round_trips_through_stored_order() {
        let mut collection = PersistenceCollection::new("c1".to_string(), "Suite")
            .with_workflow(Item::new("A", "Login"))
            .with_workflow(Item::new("B", "Checkout"));

        let mut order = OrderList::from_candidates(&collection.workflows);
        order.move_entry(1, 0);
        order.toggle_enabled(1);
        collection.apply_order(&order, GlobalPolicy::new(false));

        let stored = collection.stored_order();
        assert_eq!(stored.entries, order.entries().to_vec());
        assert!(!stored.policy.continue_on_failure);
    }

    #[test]
    fn test_fields_serialize_alphabetically() {
        let collection = PersistenceCollection::new("c1".to_string(), "Suite");
        let json = serde_json::to_string(&collection).expect("serializes");

        let continue_at = json.find("continue_on_failure").expect("policy field");
        let id_at = json.find("\"id\"").expect("id field");
        let workflows_at = json.find("workflows").expect("workflows field");
        assert!(continue_at < id_at && id_at < workflows_at);
        assert!(!json.contains("workflow_order"));
    }
}
