// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Coordinates and great-circle distance

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// m/s to mph factor used for the dashboard speed readout
pub const MPS_TO_MPH: f64 = 2.237;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Shift by a delta in degrees
    pub fn offset(&self, dlat: f64, dlon: f64) -> Self {
        Self {
            latitude: self.latitude + dlat,
            longitude: self.longitude + dlon,
        }
    }

    /// Distance in meters to another coordinate
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine(self, other)
    }
}

/// Great-circle distance between two coordinates in meters.
///
/// ```text
/// h = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)
/// c = 2 · atan2(√h, √(1−h))
/// d = R · c
/// ```
pub fn haversine(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // rounding can push h past 1 for near-antipodal points
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Convert a provider speed (m/s) to whole mph.
///
/// Providers report negative speed when unknown; that counts as stationary.
pub fn mps_to_mph(mps: Option<f64>) -> f64 {
    match mps {
        Some(v) if v.is_finite() && v > 0.0 => (v * MPS_TO_MPH).round(),
        _ => 0.0,
    }
}
