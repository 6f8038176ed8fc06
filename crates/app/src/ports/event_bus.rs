//! Event bus port: publish lifecycle notifications.

use std::future::Future;

use kvsource_domain::event::Event;

/// Publishes lifecycle events to interested subscribers.
///
/// Delivery is fire-and-forget: publishers never learn whether anyone
/// received the event.
pub trait EventPublisher<H>: Send + Sync {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event<H>) -> impl Future<Output = ()> + Send;
}

impl<H, T: EventPublisher<H>> EventPublisher<H> for std::sync::Arc<T> {
    fn publish(&self, event: Event<H>) -> impl Future<Output = ()> + Send {
        (**self).publish(event)
    }
}
