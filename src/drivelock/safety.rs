// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Safety-violation checks. Observers only: they never change the status.

use super::{Alert, PhoneOrientation, Status};

pub const MSG_FACING_DRIVER: &str = "Phone facing driver while moving - Potential distraction";
pub const MSG_CRUISING: &str = "Cruising detected - Apps remain blocked";
pub const MSG_FAR_FROM_VEHICLE: &str = "Far from vehicle - Apps will unblock soon";

/// Thresholds used by the safety checks
#[derive(Debug, Clone, Copy)]
pub struct SafetyThresholds {
    /// mph
    pub cruising_speed: f64,
    /// meters
    pub block_distance: f64,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            cruising_speed: 30.0,
            block_distance: 3.0,
        }
    }
}

/// Alerts for every violated rule, in rule order
pub fn check_violations(status: &Status, speed: f64, thresholds: &SafetyThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if status.phone_orientation == PhoneOrientation::FacingDriver && speed > 0.0 {
        alerts.push(Alert::warning(MSG_FACING_DRIVER));
    }

    if !status.brake_pressed && speed > thresholds.cruising_speed {
        alerts.push(Alert::info(MSG_CRUISING));
    }

    if status.distance_from_vehicle > thresholds.block_distance && status.apps_blocked {
        alerts.push(Alert::info(MSG_FAR_FROM_VEHICLE));
    }

    alerts
}
