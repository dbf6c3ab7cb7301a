// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Event bus for inter-component communication

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::drivelock::{Alert, Status};

/// Event types in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Alert,
    Status,
    Notice,
}

/// Generic event wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Alert(Alert),
    Status(Status),
    /// User-facing notice, e.g. a refused location permission
    Notice { title: String, message: String },
}

/// Central event bus for pub/sub communication
pub struct EventBus {
    alert_tx: broadcast::Sender<Alert>,
    status_tx: broadcast::Sender<Status>,
    event_tx: broadcast::Sender<Event>,
    event_counter: AtomicU64,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (alert_tx, _) = broadcast::channel(capacity);
        let (status_tx, _) = broadcast::channel(capacity);
        let (event_tx, _) = broadcast::channel(capacity);

        Self {
            alert_tx,
            status_tx,
            event_tx,
            event_counter: AtomicU64::new(0),
        }
    }

    pub fn publish_alert(&self, alert: Alert) {
        let _ = self.alert_tx.send(alert.clone());
        self.publish_event(EventType::Alert, EventPayload::Alert(alert));
    }

    pub fn publish_status(&self, status: Status) {
        let _ = self.status_tx.send(status.clone());
        self.publish_event(EventType::Status, EventPayload::Status(status));
    }

    pub fn publish_notice(&self, title: &str, message: &str) {
        self.publish_event(
            EventType::Notice,
            EventPayload::Notice {
                title: title.to_string(),
                message: message.to_string(),
            },
        );
    }

    fn publish_event(&self, event_type: EventType, payload: EventPayload) {
        let id = self.event_counter.fetch_add(1, Ordering::Relaxed);
        let event = Event {
            id,
            event_type,
            timestamp: Utc::now(),
            payload,
        };
        let _ = self.event_tx.send(event);
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Alert> {
        self.alert_tx.subscribe()
    }

    pub fn subscribe_status(&self) -> broadcast::Receiver<Status> {
        self.status_tx.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        bus.publish_alert(Alert::info("nobody listening"));
        bus.publish_status(Status::default());
    }

    #[test]
    fn test_events_are_numbered_in_order() {
        let bus = EventBus::new(16);
        let mut events = bus.subscribe_events();
        let mut alerts = bus.subscribe_alerts();

        bus.publish_alert(Alert::danger("blocked"));
        bus.publish_notice("Error", "Failed to get your location");

        let first = events.try_recv().unwrap();
        let second = events.try_recv().unwrap();
        assert_eq!(first.id, 0);
        assert_eq!(first.event_type, EventType::Alert);
        assert_eq!(second.id, 1);
        assert!(matches!(second.payload, EventPayload::Notice { ref message, .. } if message == "Failed to get your location"));

        assert_eq!(alerts.try_recv().unwrap().message, "blocked");
        assert!(alerts.try_recv().is_err());
    }
}
