//! Typed application events.
//!
//! Components publish [`AppEvent`] values on a shared [`EventBus`] instead of
//! string-keyed global events. The bus is a broadcast channel: every
//! subscriber sees every event published after it subscribed, and a slow
//! subscriber lags instead of blocking publishers.

use tokio::sync::broadcast;

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Events shared between otherwise independent components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A collection run order was persisted.
    WorkflowOrderSaved {
        /// Collection whose order changed.
        collection_id: String,
        /// Number of entries in the saved order.
        entry_count: usize,
    },

    /// The order editor for a collection was closed.
    OrderEditorClosed {
        /// Collection the editor was open for.
        collection_id: String,
        /// Whether the last edits were saved before closing.
        saved: bool,
    },
}

/// Publish/subscribe channel for [`AppEvent`]s.
///
/// Cloning the bus yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Registers a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event, returning how many subscribers will receive it.
    ///
    /// Publishing with no subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: AppEvent) -> usize {
        tracing::trace!(?event, "publishing event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let bus = EventBus::default();
        let delivered = bus.publish(AppEvent::OrderEditorClosed {
            collection_id: "c1".to_string(),
            saved: false,
        });
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let bus = EventBus::new(4);
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let event = AppEvent::WorkflowOrderSaved {
            collection_id: "c1".to_string(),
            entry_count: 3,
        };
        assert_eq!(bus.publish(event.clone()), 2);

        assert_eq!(first.recv().await.expect("first receives"), event);
        assert_eq!(second.recv().await.expect("second receives"), event);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        bus.publish(AppEvent::OrderEditorClosed {
            collection_id: "c1".to_string(),
            saved: true,
        });
        assert!(rx.try_recv().is_ok());
    }
}
