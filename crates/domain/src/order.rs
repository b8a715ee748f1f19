//! Ordered workflow lists and their execution flags.
//!
//! An [`OrderList`] is the authoritative run order of a collection. Each
//! [`OrderEntry`] refers to an [`Item`] by id and carries the per-entry
//! flags the execution engine reads. Positions always mirror list indices.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::item::Item;
use crate::persistence::Id;

const fn default_true() -> bool {
    true
}

/// One row of an order list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    /// Id of the referenced item. The entry does not own the item.
    #[serde(alias = "workflow_id")]
    pub item_id: Id,

    /// Zero-based position; equal to the entry's index in its list.
    pub position: usize,

    /// Whether the entry runs. Disabled entries stay in the list.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether a run proceeds past a failure of this entry.
    #[serde(default = "default_true")]
    pub continue_on_failure: bool,
}

impl OrderEntry {
    /// Creates an enabled entry that continues on failure.
    #[must_use]
    pub fn new(item_id: impl Into<Id>, position: usize) -> Self {
        Self {
            item_id: item_id.into(),
            position,
            enabled: true,
            continue_on_failure: true,
        }
    }

    /// Sets the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the continue-on-failure flag.
    #[must_use]
    pub fn with_continue_on_failure(mut self, continue_on_failure: bool) -> Self {
        self.continue_on_failure = continue_on_failure;
        self
    }
}

/// Collection-wide execution policy, independent of per-entry flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPolicy {
    /// Whether a collection run proceeds after any workflow fails.
    pub continue_on_failure: bool,
}

impl GlobalPolicy {
    /// Creates a policy with the given flag.
    #[must_use]
    pub const fn new(continue_on_failure: bool) -> Self {
        Self {
            continue_on_failure,
        }
    }
}

impl Default for GlobalPolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

/// A persisted order as read back from storage, before rehydration.
///
/// Entries may be unsorted, reference items that no longer exist, or have
/// gaps in their positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOrder {
    /// Raw entries.
    pub entries: Vec<OrderEntry>,
    /// Collection-wide policy.
    pub policy: GlobalPolicy,
}

impl StoredOrder {
    /// Creates a stored order.
    #[must_use]
    pub const fn new(entries: Vec<OrderEntry>, policy: GlobalPolicy) -> Self {
        Self { entries, policy }
    }
}

/// An ordered list of entries with unique item ids and contiguous positions.
///
/// Every mutation keeps `entry.position == index` for all entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderList {
    entries: Vec<OrderEntry>,
}

impl OrderList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds the default order: every candidate, in discovery order,
    /// enabled and continuing on failure.
    #[must_use]
    pub fn from_candidates(candidates: &[Item]) -> Self {
        let mut list = Self::new();
        for item in candidates {
            list.push(item.id.clone());
        }
        list
    }

    /// Rebuilds a list from persisted entries.
    ///
    /// Entries are sorted by their stored position, entries whose item is not
    /// among `candidates` are dropped, repeated item ids keep their first
    /// occurrence, and positions are renumbered from zero. Flags are kept.
    #[must_use]
    pub fn rehydrate(mut existing: Vec<OrderEntry>, candidates: &[Item]) -> Self {
        existing.sort_by_key(|entry| entry.position);

        let known: HashSet<&str> = candidates.iter().map(|item| item.id.as_str()).collect();
        let mut seen: HashSet<Id> = HashSet::with_capacity(existing.len());

        let entries = existing
            .into_iter()
            .filter(|entry| known.contains(entry.item_id.as_str()))
            .filter(|entry| seen.insert(entry.item_id.clone()))
            .collect();

        let mut list = Self { entries };
        list.renumber();
        list
    }

    /// Returns the entries in order.
    #[must_use]
    pub fn entries(&self) -> &[OrderEntry] {
        &self.entries
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, OrderEntry> {
        self.entries.iter()
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OrderEntry> {
        self.entries.get(index)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry refers to `item_id`.
    #[must_use]
    pub fn contains(&self, item_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.item_id == item_id)
    }

    /// Ids of the referenced items, in order.
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.item_id.as_str())
    }

    /// Consumes the list, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<OrderEntry> {
        self.entries
    }

    /// Moves the entry at `from` to `to`, clamping `to` into the list.
    ///
    /// Returns the entry's new index, or `None` when nothing moved
    /// (`from` out of bounds, or the clamped target equals `from`).
    pub fn move_entry(&mut self, from: usize, to: usize) -> Option<usize> {
        if from >= self.entries.len() {
            return None;
        }

        let to = to.min(self.entries.len() - 1);
        if from == to {
            return None;
        }

        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.renumber();
        Some(to)
    }

    /// Flips `enabled` on the entry at `index`, returning the new value.
    pub fn toggle_enabled(&mut self, index: usize) -> Option<bool> {
        self.entries.get_mut(index).map(|entry| {
            entry.enabled = !entry.enabled;
            entry.enabled
        })
    }

    /// Flips `continue_on_failure` on the entry at `index`, returning the new value.
    pub fn toggle_continue_on_failure(&mut self, index: usize) -> Option<bool> {
        self.entries.get_mut(index).map(|entry| {
            entry.continue_on_failure = !entry.continue_on_failure;
            entry.continue_on_failure
        })
    }

    /// Removes the entry at `index`; later entries shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<OrderEntry> {
        if index >= self.entries.len() {
            return None;
        }

        let removed = self.entries.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Appends a default entry for `item_id`.
    ///
    /// Returns `false` without changing the list if the item is already present.
    pub fn push(&mut self, item_id: impl Into<Id>) -> bool {
        let item_id = item_id.into();
        if self.contains(&item_id) {
            return false;
        }

        let position = self.entries.len();
        self.entries.push(OrderEntry::new(item_id, position));
        true
    }

    /// Checks the list invariants: unique item ids and `position == index`.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> DomainResult<()> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.position != index {
                return Err(DomainError::InvalidPosition {
                    index,
                    found: entry.position,
                });
            }
            if !seen.insert(entry.item_id.as_str()) {
                return Err(DomainError::DuplicateItem(entry.item_id.clone()));
            }
        }
        Ok(())
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.position = index;
        }
    }
}

impl<'a> IntoIterator for &'a OrderList {
    type Item = &'a OrderEntry;
    type IntoIter = std::slice::Iter<'a, OrderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
