//! Workflow items that can be placed in a collection run order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::persistence::Id;

/// A selectable entity (a workflow) that can appear in an order list.
///
/// Items are owned by the candidate set; order entries only refer to them
/// by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier, unique within the candidate set.
    pub id: Id,

    /// Name shown to the user.
    pub display_name: String,

    /// Read-only details used for display only.
    #[serde(default)]
    pub metadata: ItemMetadata,
}

/// Display-only details about an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Number of nodes in the workflow graph.
    #[serde(default)]
    pub node_count: usize,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Last time the workflow was modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Creates a new item with empty metadata.
    #[must_use]
    pub fn new(id: impl Into<Id>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            metadata: ItemMetadata::default(),
        }
    }

    /// Creates an item from untrusted input, rejecting blank identifiers.
    ///
    /// A blank display name falls back to the identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` if `id` is empty or whitespace.
    pub fn try_new(id: impl Into<Id>, display_name: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(id));
        }

        let name = display_name.into();
        let display_name = if name.trim().is_empty() {
            id.clone()
        } else {
            name
        };

        Ok(Self::new(id, display_name))
    }

    /// Sets the node count shown next to the item.
    #[must_use]
    pub const fn with_node_count(mut self, node_count: usize) -> Self {
        self.metadata.node_count = node_count;
        self
    }

    /// Sets the item description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    /// Sets the last-modified timestamp.
    #[must_use]
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.metadata.updated_at = Some(updated_at);
        self
    }
}
