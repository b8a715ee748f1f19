//! Save workflow order use case.

use apiweave_domain::{GlobalPolicy, OrderList};
use tracing::{info, warn};

use crate::ApplicationResult;
use crate::events::{AppEvent, EventBus};
use crate::ports::OrderRepository;

/// Input for saving a collection run order.
#[derive(Debug, Clone)]
pub struct SaveWorkflowOrderInput {
    /// Collection whose order is saved.
    pub collection_id: String,
    /// The committed order.
    pub order: OrderList,
    /// The committed collection-wide policy.
    pub policy: GlobalPolicy,
}

/// Persists a committed order and announces it on the event bus.
///
/// Failures are returned to the caller unchanged; nothing is retried.
pub struct SaveWorkflowOrder<R> {
    orders: R,
    events: Option<EventBus>,
}

impl<R: OrderRepository> SaveWorkflowOrder<R> {
    /// Creates a new `SaveWorkflowOrder` use case.
    #[must_use]
    pub const fn new(orders: R) -> Self {
        Self {
            orders,
            events: None,
        }
    }

    /// Publishes `WorkflowOrderSaved` on `events` after each successful save.
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// - Returns a domain error if the order breaks the list invariants
    /// - Returns the store error if persisting fails
    pub async fn execute(&self, input: SaveWorkflowOrderInput) -> ApplicationResult<()> {
        input.order.validate()?;

        if let Err(error) = self
            .orders
            .save_order(&input.collection_id, &input.order, input.policy)
            .await
        {
            warn!(collection_id = %input.collection_id, %error, "saving workflow order failed");
            return Err(error.into());
        }

        info!(
            collection_id = %input.collection_id,
            entries = input.order.len(),
            continue_on_failure = input.policy.continue_on_failure,
            "workflow order saved"
        );

        if let Some(events) = &self.events {
            events.publish(AppEvent::WorkflowOrderSaved {
                collection_id: input.collection_id,
                entry_count: input.order.len(),
            });
        }

        Ok(())
    }
}
