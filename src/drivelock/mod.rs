//! DriveLock module - status derivation, orientation, safety checks and alerts

mod alerts;
mod orientation;
mod safety;
mod status;

pub use alerts::*;
pub use orientation::*;
pub use safety::*;
pub use status::*;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::Coordinate;

/// Phone orientation relative to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhoneOrientation {
    #[default]
    Upright,
    TiltedForward,
    TiltedSideways,
    FacingDriver,
}

impl fmt::Display for PhoneOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhoneOrientation::Upright => "upright",
            PhoneOrientation::TiltedForward => "tilted-forward",
            PhoneOrientation::TiltedSideways => "tilted-sideways",
            PhoneOrientation::FacingDriver => "facing-driver",
        };
        f.write_str(s)
    }
}

/// DriveLock status record, recomputed every tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Status {
    /// Lock feature armed by the user
    pub active: bool,
    pub apps_blocked: bool,
    pub brake_pressed: bool,
    pub seatbelt_fastened: bool,
    /// Meters between phone and vehicle
    pub distance_from_vehicle: f64,
    pub phone_orientation: PhoneOrientation,
    pub engine_running: bool,
    /// Seconds left before a parked block releases
    pub parking_timer: u32,
}

impl Status {
    /// Headline shown on the dashboard
    pub fn label(&self) -> &'static str {
        match (self.active, self.apps_blocked) {
            (true, true) => "APPS BLOCKED",
            (true, false) => "DRIVELOCK ACTIVE",
            _ => "DRIVELOCK OFF",
        }
    }

    /// Parking timer as `m:ss`
    pub fn parking_timer_display(&self) -> String {
        format!("{}:{:02}", self.parking_timer / 60, self.parking_timer % 60)
    }
}

/// Phone rotation angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tilt {
    /// Rotation around the device x axis
    pub beta: f64,
    /// Rotation around the device y axis
    pub gamma: f64,
}

impl Tilt {
    pub fn new(beta: f64, gamma: f64) -> Self {
        Self { beta, gamma }
    }
}

/// Readings consumed by one tick
#[derive(Debug, Clone, Default)]
pub struct TickInputs {
    /// Vehicle speed in mph
    pub speed: f64,
    pub audio_level: f64,
    pub tilt: Tilt,
    pub user_position: Option<Coordinate>,
    pub vehicle_position: Option<Coordinate>,
}
