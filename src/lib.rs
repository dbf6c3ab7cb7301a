// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! DriveLock - distracted-driving app lock engine
//!
//! Derives a DriveLock status once per second from speed, engine audio,
//! phone tilt and distance to the parked vehicle:
//! - Threshold rules decide whether distracting apps are blocked
//! - A parking countdown holds the grace period after the vehicle stops
//! - Safety checks raise alerts into a bounded history
//! - Location and motion providers are pluggable, with seeded simulators
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   DriveLock Session                  │
//! ├──────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌──────────────────┐  │
//! │  │ Location │   │  Motion  │   │  Audio sampler   │  │
//! │  └────┬─────┘   └────┬─────┘   └────────┬─────────┘  │
//! │       └──── Tracking Manager ──┐        │            │
//! │                 (readings)     ↓        ↓            │
//! │               ┌──────────────────────────────┐       │
//! │               │ Engine: tick 1 Hz, countdown │       │
//! │               │        → StatusEngine        │       │
//! │               └──────────────┬───────────────┘       │
//! │                              ↓                       │
//! │                         Event Bus                    │
//! └──────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod core;
pub mod drivelock;
pub mod geo;
pub mod sensors;

// Re-exports for convenience
pub use config::Config;
pub use core::{Command, Engine, EventBus};
pub use drivelock::{Alert, AlertKind, AlertLog, PhoneOrientation, Status, StatusEngine, TickInputs, Tilt};
pub use geo::{haversine, Coordinate};
pub use sensors::TrackingManager;

/// DriveLock version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// DriveLock name
pub const NAME: &str = "DriveLock";
