// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Configuration module

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::geo::Coordinate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Log level
    pub log_level: String,

    /// DriveLock rule thresholds
    pub drivelock: DriveLockConfig,

    /// Tracking cadence
    pub tracking: TrackingConfig,

    /// Simulated providers
    pub simulation: SimulationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "DriveLock".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            drivelock: DriveLockConfig::default(),
            tracking: TrackingConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.tracking.tick_interval_ms == 0 {
            bail!("tracking.tick_interval_ms must be positive");
        }
        if self.tracking.countdown_interval_ms == 0 {
            bail!("tracking.countdown_interval_ms must be positive");
        }
        if self.tracking.event_capacity == 0 {
            bail!("tracking.event_capacity must be positive");
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("drivelock"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Rule thresholds for the status engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveLockConfig {
    /// Apps block only within this distance of the vehicle (meters)
    pub block_distance_m: f64,

    /// Audio level above which the engine counts as running
    pub engine_audio_threshold: f64,

    /// |beta| or |gamma| above this counts as tilted (radians)
    pub tilt_threshold: f64,

    /// beta above this means the screen faces the driver (radians)
    pub facing_driver_beta: f64,

    /// Seconds the block holds after the vehicle stops
    pub parking_grace_secs: u32,

    /// Speed above which cruising without brake is reported (mph)
    pub cruising_speed_mph: f64,

    /// Number of alerts kept in the history
    pub alert_capacity: usize,

    /// Apps listed as blocked while the lock holds
    pub blocked_apps: Vec<String>,
}

impl Default for DriveLockConfig {
    fn default() -> Self {
        Self {
            block_distance_m: 3.0,
            engine_audio_threshold: 60.0,
            tilt_threshold: 1.5,
            facing_driver_beta: 2.5,
            parking_grace_secs: 120,
            cruising_speed_mph: 30.0,
            alert_capacity: 5,
            blocked_apps: ["Instagram", "TikTok", "Snapchat", "Twitter", "Facebook"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Timer cadence for the tracking session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Status recomputation interval
    pub tick_interval_ms: u64,

    /// Parking countdown interval
    pub countdown_interval_ms: u64,

    /// Offset from the first fix where the demo vehicle is parked (degrees)
    pub vehicle_offset_deg: (f64, f64),

    /// Broadcast channel capacity
    pub event_capacity: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            countdown_interval_ms: 1000,
            vehicle_offset_deg: (0.0001, 0.0001),
            event_capacity: 256,
        }
    }
}

/// Simulated provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// RNG seed; `None` seeds from entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Refuse the location permission request
    pub deny_location: bool,

    /// Sample interval of the simulated providers
    pub sample_interval_ms: u64,

    /// Speed profile in m/s, one entry per sample, repeated
    pub speed_profile_mps: Vec<f64>,

    /// GPS accuracy reported with every fix (meters)
    pub accuracy_m: f64,

    /// Starting position of the simulated phone
    pub origin: Coordinate,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let mut profile = vec![0.0; 5];
        profile.extend([2.0, 5.0, 9.0, 14.0, 16.0, 16.0, 15.0, 10.0, 4.0]);
        profile.extend(vec![0.0; 10]);

        Self {
            seed: None,
            deny_location: false,
            sample_interval_ms: 1000,
            speed_profile_mps: profile,
            accuracy_m: 5.0,
            origin: Coordinate::new(37.7749, -122.4194),
        }
    }
}
