// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Safety alerts and the bounded alert history

use std::collections::VecDeque;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Info,
    Warning,
    Danger,
}

/// A safety alert raised by the status engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Danger, message)
    }
}

/// Most recent alerts, newest first
#[derive(Debug, Clone)]
pub struct AlertLog {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert an alert, evicting the oldest past capacity
    pub fn push(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
        self.alerts.truncate(self.capacity);
    }

    pub fn extend<I: IntoIterator<Item = Alert>>(&mut self, alerts: I) {
        for alert in alerts {
            self.push(alert);
        }
    }

    pub fn latest(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    /// Iterate newest first
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_five_newest() {
        let mut log = AlertLog::default();
        for i in 0..6 {
            log.push(Alert::info(format!("alert {}", i)));
        }

        assert_eq!(log.len(), 5);
        assert_eq!(log.latest().unwrap().message, "alert 5");
        let messages: Vec<_> = log.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["alert 5", "alert 4", "alert 3", "alert 2", "alert 1"]);
    }

    #[test]
    fn test_log_never_exceeds_capacity() {
        let mut log = AlertLog::new(3);
        log.extend((0..50).map(|i| Alert::warning(i.to_string())));
        assert_eq!(log.len(), 3);
        assert_eq!(log.capacity(), 3);
    }

    #[test]
    fn test_alert_ids_are_unique() {
        let a = Alert::danger("x");
        let b = Alert::danger("x");
        assert_ne!(a.id, b.id);
        assert_eq!(a.kind, AlertKind::Danger);
    }
}
