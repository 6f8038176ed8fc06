//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use kvsource_domain::event::Event;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus<H> {
    sender: broadcast::Sender<Event<H>>,
}

impl<H: Clone> InProcessEventBus<H> {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event<H>> {
        self.sender.subscribe()
    }
}

impl<H: Clone + Send + Sync> EventPublisher<H> for InProcessEventBus<H> {
    fn publish(&self, event: Event<H>) -> impl Future<Output = ()> + Send {
        // broadcast::send fails only when there are zero receivers,
        // which is fine, so the error is ignored.
        let _ = self.sender.send(event);
        async {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvsource_domain::datasource::DatasourceConfig;
    use kvsource_domain::event::EventKind;
    use kvsource_domain::name::DatasourceName;

    fn connect_start(name: &str) -> Event<u32> {
        Event::new(EventKind::ConnectStart {
            name: DatasourceName::new(name).unwrap(),
            config: DatasourceConfig::default(),
        })
    }

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        let event = connect_start("default");
        let event_id = event.id;

        bus.publish(event).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, event_id);
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let event = connect_start("alt");
        let event_id = event.id;

        bus.publish(event).await;

        assert_eq!(rx1.recv().await.unwrap().id, event_id);
        assert_eq!(rx2.recv().await.unwrap().id, event_id);
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let bus = InProcessEventBus::new(16);
        bus.publish(connect_start("early")).await;

        let mut rx = bus.subscribe();

        let later = connect_start("late");
        let later_id = later.id;
        bus.publish(later).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, later_id);
        assert_eq!(received.kind.name().as_str(), "late");
    }
}
