// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Provider traits and common types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drivelock::Tilt;
use crate::geo::Coordinate;

/// Failures reported by the location and motion collaborators
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider closed")]
    Closed,
}

/// Provider operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderStatus {
    Idle,
    Denied,
    Active,
}

/// A single location fix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSample {
    pub coordinate: Coordinate,
    /// m/s, `None` when the provider cannot tell
    pub speed_mps: Option<f64>,
    /// meters
    pub accuracy_m: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(coordinate: Coordinate, speed_mps: Option<f64>, accuracy_m: Option<f64>) -> Self {
        Self {
            coordinate,
            speed_mps,
            accuracy_m,
            timestamp: Utc::now(),
        }
    }
}

/// Device location source
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &str;

    /// Current status
    fn status(&self) -> ProviderStatus;

    /// One-time foreground permission request
    async fn request_permission(&mut self) -> Result<(), ProviderError>;

    /// Single high-accuracy fix
    async fn current_position(&mut self) -> Result<LocationSample, ProviderError>;

    /// Wait for the next fix of the watch stream
    async fn next_sample(&mut self) -> Result<LocationSample, ProviderError>;
}

/// Device orientation source
#[async_trait]
pub trait MotionProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &str;

    /// Wait for the next rotation sample
    async fn next_tilt(&mut self) -> Result<Tilt, ProviderError>;
}

/// Engine audio level source, 0..100
pub trait AudioSampler: Send {
    fn sample(&mut self) -> f64;
}

impl<F> AudioSampler for F
where
    F: FnMut() -> f64 + Send,
{
    fn sample(&mut self) -> f64 {
        self()
    }
}
