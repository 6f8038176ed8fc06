//! Event: an immutable record of a datasource lifecycle step.
//!
//! Events are emitted by the connection factory around every connect and
//! disconnect. They are generic over the handle type so subscribers can
//! reach the live connection that was just opened or is about to close.

use crate::datasource::DatasourceConfig;
use crate::id::EventId;
use crate::name::DatasourceName;
use crate::time::{Timestamp, now};

/// A lifecycle notification with identity and time of emission.
#[derive(Debug, Clone)]
pub struct Event<H> {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub kind: EventKind<H>,
}

impl<H> Event<H> {
    /// Stamp a new event with a fresh id and the current time.
    #[must_use]
    pub fn new(kind: EventKind<H>) -> Self {
        Self {
            id: EventId::new(),
            timestamp: now(),
            kind,
        }
    }
}

/// What happened.
#[derive(Debug, Clone)]
pub enum EventKind<H> {
    /// Before the storage engine is opened.
    ConnectStart {
        name: DatasourceName,
        config: DatasourceConfig,
    },
    /// After the engine opened and every bootstrap hook ran.
    ConnectEnd {
        name: DatasourceName,
        config: DatasourceConfig,
        handle: H,
    },
    /// Right after the engine opened, before bootstrap hooks.
    ConfigurationSetup {
        name: DatasourceName,
        config: DatasourceConfig,
        handle: H,
    },
    /// Before the engine is shut down.
    DisconnectStart {
        name: DatasourceName,
        config: DatasourceConfig,
        handle: H,
    },
    /// After the engine was shut down.
    DisconnectEnd {
        name: DatasourceName,
        config: DatasourceConfig,
    },
}

impl<H> EventKind<H> {
    /// Stable snake-case label, used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConnectStart { .. } => "connect_start",
            Self::ConnectEnd { .. } => "connect_end",
            Self::ConfigurationSetup { .. } => "configuration_setup",
            Self::DisconnectStart { .. } => "disconnect_start",
            Self::DisconnectEnd { .. } => "disconnect_end",
        }
    }

    /// The datasource this event is about.
    #[must_use]
    pub fn name(&self) -> &DatasourceName {
        match self {
            Self::ConnectStart { name, .. }
            | Self::ConnectEnd { name, .. }
            | Self::ConfigurationSetup { name, .. }
            | Self::DisconnectStart { name, .. }
            | Self::DisconnectEnd { name, .. } => name,
        }
    }

    /// The handle, for events emitted while one is live.
    #[must_use]
    pub fn handle(&self) -> Option<&H> {
        match self {
            Self::ConnectEnd { handle, .. }
            | Self::ConfigurationSetup { handle, .. }
            | Self::DisconnectStart { handle, .. } => Some(handle),
            Self::ConnectStart { .. } | Self::DisconnectEnd { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> EventKind<u32> {
        EventKind::ConnectStart {
            name: DatasourceName::default(),
            config: DatasourceConfig::default(),
        }
    }

    #[test]
    fn should_stamp_id_and_timestamp() {
        let a = Event::new(start());
        let b = Event::new(start());
        assert_ne!(a.id, b.id);
        assert!(b.timestamp >= a.timestamp);
    }

    #[test]
    fn should_expose_handle_only_while_live() {
        let end = EventKind::ConnectEnd {
            name: DatasourceName::default(),
            config: DatasourceConfig::default(),
            handle: 7_u32,
        };
        assert_eq!(end.handle(), Some(&7));
        assert_eq!(start().handle(), None);
    }

    #[test]
    fn should_label_every_kind() {
        let name = DatasourceName::new("alt").unwrap();
        let config = DatasourceConfig::default();
        let kinds = [
            EventKind::ConnectStart {
                name: name.clone(),
                config: config.clone(),
            },
            EventKind::ConfigurationSetup {
                name: name.clone(),
                config: config.clone(),
                handle: 1,
            },
            EventKind::ConnectEnd {
                name: name.clone(),
                config: config.clone(),
                handle: 1,
            },
            EventKind::DisconnectStart {
                name: name.clone(),
                config: config.clone(),
                handle: 1,
            },
            EventKind::DisconnectEnd {
                name: name.clone(),
                config,
            },
        ];
        let labels: Vec<_> = kinds.iter().map(EventKind::label).collect();
        assert_eq!(
            labels,
            [
                "connect_start",
                "configuration_setup",
                "connect_end",
                "disconnect_start",
                "disconnect_end"
            ]
        );
        assert!(kinds.iter().all(|k| k.name() == &name));
    }
}
