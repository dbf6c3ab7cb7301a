//! Core module - session engine and event bus

mod engine;
mod event_bus;

pub use engine::Engine;
pub use event_bus::{EventBus, Event, EventPayload, EventType};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::drivelock::Status;

/// User actions from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    ToggleDriveLock,
    ToggleBrake,
    ToggleSeatbelt,
}

/// Session-wide state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub running: bool,
    pub ticks: u64,
    pub countdown_steps: u64,
    pub alerts_raised: u64,
    pub audio_level: f64,
    pub uptime_seconds: u64,
    pub last_alert: Option<DateTime<Utc>>,
    pub status: Status,
}
