//! In-memory editor for a collection's workflow run order.

use apiweave_domain::{GlobalPolicy, Item, OrderEntry, OrderList};

/// Snapshot handed to the save path by [`OrderedItemListEditor::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedOrder {
    /// The order as edited.
    pub order: OrderList,
    /// The collection-wide policy as edited.
    pub policy: GlobalPolicy,
}

/// Edits the run order of a fixed candidate set.
///
/// The editor owns its [`OrderList`] exclusively. Nothing is persisted until
/// the caller saves the result of [`commit`](Self::commit); dropping or
/// [`discard`](Self::discard)ing the editor leaves storage untouched.
#[derive(Debug, Clone)]
pub struct OrderedItemListEditor {
    candidates: Vec<Item>,
    order: OrderList,
    policy: GlobalPolicy,
    saved_order: OrderList,
    saved_policy: GlobalPolicy,
}

impl OrderedItemListEditor {
    /// Creates an editor over `candidates`.
    ///
    /// A non-empty `existing` order is rehydrated: sorted by position, stale
    /// item ids dropped, positions renumbered. Otherwise every candidate is
    /// listed in the given order with default flags.
    #[must_use]
    pub fn initialize(
        candidates: Vec<Item>,
        existing: Option<Vec<OrderEntry>>,
        policy: GlobalPolicy,
    ) -> Self {
        let order = match existing {
            Some(entries) if !entries.is_empty() => OrderList::rehydrate(entries, &candidates),
            _ => OrderList::from_candidates(&candidates),
        };

        Self {
            candidates,
            saved_order: order.clone(),
            saved_policy: policy,
            order,
            policy,
        }
    }

    /// The candidate items, in discovery order.
    #[must_use]
    pub fn candidates(&self) -> &[Item] {
        &self.candidates
    }

    /// The current order.
    #[must_use]
    pub const fn order(&self) -> &OrderList {
        &self.order
    }

    /// The current collection-wide policy.
    #[must_use]
    pub const fn policy(&self) -> GlobalPolicy {
        self.policy
    }

    /// Looks up a candidate by id.
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.candidates.iter().find(|item| item.id == item_id)
    }

    /// Moves an entry; see [`OrderList::move_entry`].
    ///
    /// Safe to call on every pointer movement of a drag: repeated calls with
    /// the same target change nothing.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Option<usize> {
        self.order.move_entry(from, to)
    }

    /// Flips `enabled` at `index`. Positions are unaffected.
    pub fn toggle_enabled(&mut self, index: usize) -> Option<bool> {
        self.order.toggle_enabled(index)
    }

    /// Flips the per-entry `continue_on_failure` at `index`.
    pub fn toggle_continue_on_failure(&mut self, index: usize) -> Option<bool> {
        self.order.toggle_continue_on_failure(index)
    }

    /// Removes the entry at `index`. The item becomes available to add again.
    pub fn remove_entry(&mut self, index: usize) -> Option<OrderEntry> {
        self.order.remove(index)
    }

    /// Appends `item_id` with default flags.
    ///
    /// Returns `false` if the item is already listed or is not a candidate.
    pub fn add_entry(&mut self, item_id: &str) -> bool {
        if self.item(item_id).is_none() {
            return false;
        }
        self.order.push(item_id)
    }

    /// Candidates not in the current order, in discovery order.
    ///
    /// Evaluated lazily; call again for a fresh pass after edits.
    pub fn available_to_add(&self) -> impl Iterator<Item = &Item> + '_ {
        self.candidates
            .iter()
            .filter(|item| !self.order.contains(&item.id))
    }

    /// Flips the collection-wide policy, returning the new value.
    pub const fn toggle_global_continue_on_failure(&mut self) -> bool {
        self.policy.continue_on_failure = !self.policy.continue_on_failure;
        self.policy.continue_on_failure
    }

    /// Sets the collection-wide policy.
    pub const fn set_global_continue_on_failure(&mut self, continue_on_failure: bool) {
        self.policy.continue_on_failure = continue_on_failure;
    }

    /// Returns the current order and policy. No state changes, no I/O.
    #[must_use]
    pub fn commit(&self) -> CommittedOrder {
        CommittedOrder {
            order: self.order.clone(),
            policy: self.policy,
        }
    }

    /// Whether the order or policy differs from the last saved state.
    ///
    /// Edits that cancel out (a move and its reverse) are not dirty.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.order != self.saved_order || self.policy != self.saved_policy
    }

    /// Records the current state as saved.
    pub fn mark_saved(&mut self) {
        self.saved_order.clone_from(&self.order);
        self.saved_policy = self.policy;
    }

    /// Abandons all in-memory edits.
    pub fn discard(self) {
        tracing::debug!(
            entries = self.order.len(),
            dirty = self.is_dirty(),
            "order editor discarded"
        );
    }
}
