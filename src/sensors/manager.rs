// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Tracking manager - permission, initial fix and continuous sampling

use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{LocationProvider, LocationSample, MotionProvider, ProviderError};
use crate::config::TrackingConfig;
use crate::core::EventBus;
use crate::drivelock::Tilt;
use crate::geo::{mps_to_mph, Coordinate};

pub const NOTICE_PERMISSION_DENIED: &str =
    "Location permission is required for DriveLock to function properly.";
pub const NOTICE_PERMISSION_FAILED: &str = "Failed to request location permission";
pub const NOTICE_LOCATION_FAILED: &str = "Failed to get your location";

/// Last-known provider readings. Every sample overwrites the previous one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Readings {
    pub user_position: Option<Coordinate>,
    pub vehicle_position: Option<Coordinate>,
    /// mph
    pub speed: f64,
    /// meters
    pub accuracy: f64,
    pub tilt: Tilt,
    pub last_fix: Option<DateTime<Utc>>,
}

impl Readings {
    pub fn apply_location(&mut self, sample: &LocationSample) {
        self.user_position = Some(sample.coordinate);
        self.speed = mps_to_mph(sample.speed_mps);
        self.accuracy = sample.accuracy_m.unwrap_or(0.0).round();
        self.last_fix = Some(sample.timestamp);
    }

    pub fn apply_tilt(&mut self, tilt: Tilt) {
        self.tilt = tilt;
    }
}

pub type SharedReadings = Arc<Mutex<Readings>>;

enum Sample {
    Location(Result<LocationSample, ProviderError>),
    Tilt(Result<Tilt, ProviderError>),
    Shutdown,
}

/// Owns the location and motion providers and feeds the shared readings
pub struct TrackingManager {
    config: TrackingConfig,
    location: Box<dyn LocationProvider>,
    motion: Box<dyn MotionProvider>,
    readings: SharedReadings,
    event_bus: Arc<EventBus>,
    tracking: bool,
}

impl TrackingManager {
    pub fn new(
        config: TrackingConfig,
        location: Box<dyn LocationProvider>,
        motion: Box<dyn MotionProvider>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            config,
            location,
            motion,
            readings: Arc::new(Mutex::new(Readings::default())),
            event_bus,
            tracking: false,
        }
    }

    /// Handle to the readings store
    pub fn readings(&self) -> SharedReadings {
        Arc::clone(&self.readings)
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Request permission and take the first fix.
    ///
    /// Failures become user notices and leave tracking disabled.
    pub async fn start(&mut self) -> bool {
        match self.location.request_permission().await {
            Ok(()) => {}
            Err(ProviderError::PermissionDenied) => {
                warn!("Location permission denied");
                self.event_bus.publish_notice("Permission Denied", NOTICE_PERMISSION_DENIED);
                return false;
            }
            Err(e) => {
                warn!("Error requesting location permission: {}", e);
                self.event_bus.publish_notice("Error", NOTICE_PERMISSION_FAILED);
                return false;
            }
        }

        self.tracking = true;

        match self.location.current_position().await {
            Ok(sample) => {
                let (dlat, dlon) = self.config.vehicle_offset_deg;
                let mut readings = self.readings.lock();
                readings.apply_location(&sample);
                readings.vehicle_position = Some(sample.coordinate.offset(dlat, dlon));
                info!(
                    "Tracking started at {:.5}, {:.5} ({})",
                    sample.coordinate.latitude,
                    sample.coordinate.longitude,
                    self.location.id()
                );
                true
            }
            Err(e) => {
                warn!("Error getting location: {}", e);
                self.event_bus.publish_notice("Error", NOTICE_LOCATION_FAILED);
                self.tracking = false;
                false
            }
        }
    }

    /// Feed provider samples into the readings until shutdown or the location stream ends
    pub async fn run(&mut self, mut shutdown: broadcast::Receiver<()>) {
        if !self.tracking {
            return;
        }

        let mut motion_enabled = true;

        loop {
            let sample = tokio::select! {
                s = self.location.next_sample() => Sample::Location(s),
                t = self.motion.next_tilt(), if motion_enabled => Sample::Tilt(t),
                _ = shutdown.recv() => Sample::Shutdown,
            };

            match sample {
                Sample::Location(Ok(sample)) => {
                    let mut readings = self.readings.lock();
                    readings.apply_location(&sample);
                    debug!("Fix: speed {} mph, accuracy {} m", readings.speed, readings.accuracy);
                }
                Sample::Location(Err(ProviderError::Closed)) => {
                    info!("Location stream closed");
                    break;
                }
                Sample::Location(Err(e)) => {
                    warn!("Error getting location: {}", e);
                    self.event_bus.publish_notice("Error", NOTICE_LOCATION_FAILED);
                    break;
                }
                Sample::Tilt(Ok(tilt)) => {
                    self.readings.lock().apply_tilt(tilt);
                }
                Sample::Tilt(Err(e)) => {
                    warn!("Motion provider {} failed: {}", self.motion.id(), e);
                    motion_enabled = false;
                }
                Sample::Shutdown => {
                    info!("Tracking manager shutting down...");
                    break;
                }
            }
        }

        self.stop();
    }

    /// Stop tracking. Speed drops to zero since no more fixes will arrive;
    /// the last position stays for the distance check.
    pub fn stop(&mut self) {
        if self.tracking {
            info!("Tracking stopped");
        }
        self.tracking = false;
        self.readings.lock().speed = 0.0;
    }
}
