// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Phone orientation from tilt angles

use super::{PhoneOrientation, Tilt};
use crate::config::DriveLockConfig;

/// Tilt thresholds for orientation classification
#[derive(Debug, Clone, Copy)]
pub struct OrientationThresholds {
    pub tilt: f64,
    pub facing_driver_beta: f64,
}

impl Default for OrientationThresholds {
    fn default() -> Self {
        Self {
            tilt: 1.5,
            facing_driver_beta: 2.5,
        }
    }
}

impl From<&DriveLockConfig> for OrientationThresholds {
    fn from(config: &DriveLockConfig) -> Self {
        Self {
            tilt: config.tilt_threshold,
            facing_driver_beta: config.facing_driver_beta,
        }
    }
}

/// Classify a tilt sample.
///
/// Rules are applied in order and each later match overwrites the earlier
/// one: forward tilt, then sideways tilt, then facing the driver.
pub fn classify_orientation(tilt: Tilt, thresholds: &OrientationThresholds) -> PhoneOrientation {
    let mut orientation = PhoneOrientation::Upright;

    if tilt.beta.abs() > thresholds.tilt {
        orientation = PhoneOrientation::TiltedForward;
    }
    if tilt.gamma.abs() > thresholds.tilt {
        orientation = PhoneOrientation::TiltedSideways;
    }
    if tilt.beta > thresholds.facing_driver_beta {
        orientation = PhoneOrientation::FacingDriver;
    }

    orientation
}
