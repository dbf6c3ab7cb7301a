// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! DriveLock status engine - per-tick status derivation and parking countdown

use tracing::debug;

use super::{
    check_violations, classify_orientation, Alert, OrientationThresholds, SafetyThresholds,
    Status, TickInputs,
};
use crate::config::DriveLockConfig;

pub const MSG_BLOCKED: &str = "Apps blocked - Driving detected";
pub const MSG_UNBLOCKED: &str = "Apps unblocked - Safe to use";

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub status: Status,
    pub alerts: Vec<Alert>,
}

/// Derives the next DriveLock status from the previous one and current readings
#[derive(Debug, Clone)]
pub struct StatusEngine {
    block_distance: f64,
    engine_audio_threshold: f64,
    parking_grace_secs: u32,
    orientation: OrientationThresholds,
    safety: SafetyThresholds,
}

impl StatusEngine {
    pub fn new(config: &DriveLockConfig) -> Self {
        Self {
            block_distance: config.block_distance_m,
            engine_audio_threshold: config.engine_audio_threshold,
            parking_grace_secs: config.parking_grace_secs,
            orientation: OrientationThresholds::from(config),
            safety: SafetyThresholds {
                cruising_speed: config.cruising_speed_mph,
                block_distance: config.block_distance_m,
            },
        }
    }

    /// Recompute the status for one tick.
    ///
    /// Later steps read the fields written by earlier ones, so the order
    /// below is significant.
    pub fn tick(&self, prev: &Status, inputs: &TickInputs) -> TickOutcome {
        let mut next = prev.clone();
        let mut alerts = Vec::new();

        let moving = inputs.speed > 0.0;

        next.engine_running = moving || inputs.audio_level > self.engine_audio_threshold;

        if let (Some(user), Some(vehicle)) = (&inputs.user_position, &inputs.vehicle_position) {
            next.distance_from_vehicle = user.distance_to(vehicle);
        }

        next.phone_orientation = classify_orientation(inputs.tilt, &self.orientation);

        let should_block = next.active
            && moving
            && next.seatbelt_fastened
            && next.distance_from_vehicle < self.block_distance;

        if should_block != prev.apps_blocked {
            alerts.push(if should_block {
                Alert::danger(MSG_BLOCKED)
            } else {
                Alert::info(MSG_UNBLOCKED)
            });
            next.apps_blocked = should_block;
            debug!("Apps blocked: {} -> {}", prev.apps_blocked, should_block);
        }

        // Motion stopped while the lock held: start the parking grace period
        if !moving && prev.parking_timer == 0 && prev.apps_blocked {
            next.parking_timer = self.parking_grace_secs;
            debug!("Parking timer started: {}s", self.parking_grace_secs);
        }

        alerts.extend(check_violations(&next, inputs.speed, &self.safety));

        TickOutcome { status: next, alerts }
    }

    /// One step of the parking countdown.
    ///
    /// Only runs while stationary with time left. Expiry releases the block.
    pub fn count_down(&self, prev: &Status, speed: f64) -> Status {
        if speed != 0.0 || prev.parking_timer == 0 {
            return prev.clone();
        }

        let mut next = prev.clone();
        next.parking_timer -= 1;
        if next.parking_timer == 0 {
            next.apps_blocked = false;
            debug!("Parking timer expired, apps released");
        }
        next
    }

    /// Arm or disarm DriveLock. Clears any block and pending parking timer.
    pub fn toggle_active(&self, prev: &Status) -> (Status, Alert) {
        let next = Status {
            active: !prev.active,
            apps_blocked: false,
            parking_timer: 0,
            ..prev.clone()
        };
        let alert = Alert::info(format!(
            "DriveLock {}",
            if next.active { "enabled" } else { "disabled" }
        ));
        (next, alert)
    }

    pub fn toggle_brake(&self, prev: &Status) -> Status {
        Status {
            brake_pressed: !prev.brake_pressed,
            ..prev.clone()
        }
    }

    pub fn toggle_seatbelt(&self, prev: &Status) -> Status {
        Status {
            seatbelt_fastened: !prev.seatbelt_fastened,
            ..prev.clone()
        }
    }
}

impl Default for StatusEngine {
    fn default() -> Self {
        Self::new(&DriveLockConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivelock::{AlertKind, PhoneOrientation, Tilt, MSG_CRUISING, MSG_FACING_DRIVER};
    use crate::geo::Coordinate;
    use proptest::prelude::*;

    fn armed() -> Status {
        Status {
            active: true,
            seatbelt_fastened: true,
            ..Status::default()
        }
    }

    fn driving(speed: f64) -> TickInputs {
        TickInputs {
            speed,
            ..TickInputs::default()
        }
    }

    fn messages(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.message.as_str()).collect()
    }

    #[test]
    fn test_audio_alone_means_engine_running() {
        let engine = StatusEngine::default();
        let inputs = TickInputs {
            speed: 0.0,
            audio_level: 70.0,
            ..TickInputs::default()
        };
        let out = engine.tick(&Status::default(), &inputs);
        assert!(out.status.engine_running);

        let quiet = TickInputs { audio_level: 60.0, ..inputs };
        assert!(!engine.tick(&Status::default(), &quiet).status.engine_running);
    }

    #[test]
    fn test_moving_means_engine_running() {
        let engine = StatusEngine::default();
        let out = engine.tick(&Status::default(), &driving(12.0));
        assert!(out.status.engine_running);
    }

    #[test]
    fn test_blocks_when_driving_armed_and_buckled() {
        let engine = StatusEngine::default();
        let out = engine.tick(&armed(), &driving(20.0));

        assert!(out.status.apps_blocked);
        assert_eq!(out.alerts.len(), 1);
        assert_eq!(out.alerts[0].kind, AlertKind::Danger);
        assert_eq!(out.alerts[0].message, MSG_BLOCKED);

        // no repeat alert while the state holds
        let again = engine.tick(&out.status, &driving(20.0));
        assert!(again.status.apps_blocked);
        assert!(again.alerts.is_empty());
    }

    #[test]
    fn test_no_block_without_seatbelt_or_arming() {
        let engine = StatusEngine::default();

        let unbuckled = Status { seatbelt_fastened: false, ..armed() };
        assert!(!engine.tick(&unbuckled, &driving(20.0)).status.apps_blocked);

        let disarmed = Status { active: false, ..armed() };
        assert!(!engine.tick(&disarmed, &driving(20.0)).status.apps_blocked);
    }

    #[test]
    fn test_distance_from_positions() {
        let engine = StatusEngine::default();
        let user = Coordinate::new(37.7749, -122.4194);
        let inputs = TickInputs {
            speed: 20.0,
            user_position: Some(user),
            vehicle_position: Some(user.offset(0.0001, 0.0001)),
            ..TickInputs::default()
        };

        let out = engine.tick(&armed(), &inputs);
        assert!(out.status.distance_from_vehicle > 3.0);
        assert!(!out.status.apps_blocked);

        // same spot: in the car
        let inside = TickInputs {
            vehicle_position: Some(user),
            ..inputs
        };
        let out = engine.tick(&armed(), &inside);
        assert_eq!(out.status.distance_from_vehicle, 0.0);
        assert!(out.status.apps_blocked);
    }

    #[test]
    fn test_missing_position_keeps_previous_distance() {
        let engine = StatusEngine::default();
        let prev = Status { distance_from_vehicle: 42.0, ..Status::default() };
        let inputs = TickInputs {
            user_position: Some(Coordinate::new(1.0, 1.0)),
            ..TickInputs::default()
        };
        assert_eq!(engine.tick(&prev, &inputs).status.distance_from_vehicle, 42.0);
    }

    #[test]
    fn test_orientation_cascade_in_tick() {
        let engine = StatusEngine::default();
        let mut inputs = TickInputs {
            tilt: Tilt::new(2.0, 2.0),
            ..TickInputs::default()
        };
        let out = engine.tick(&Status::default(), &inputs);
        assert_eq!(out.status.phone_orientation, PhoneOrientation::TiltedSideways);

        inputs.tilt = Tilt::new(3.0, 2.0);
        let out = engine.tick(&Status::default(), &inputs);
        assert_eq!(out.status.phone_orientation, PhoneOrientation::FacingDriver);
    }

    #[test]
    fn test_unblock_alert_when_vehicle_stops() {
        let engine = StatusEngine::default();
        let blocked = engine.tick(&armed(), &driving(20.0)).status;

        let out = engine.tick(&blocked, &driving(0.0));
        assert!(!out.status.apps_blocked);
        assert_eq!(messages(&out.alerts), vec![MSG_UNBLOCKED]);
        assert_eq!(out.alerts[0].kind, AlertKind::Info);
    }

    #[test]
    fn test_parking_timer_starts_when_blocked_vehicle_stops() {
        let engine = StatusEngine::default();
        let prev = Status {
            apps_blocked: true,
            parking_timer: 0,
            ..armed()
        };

        let out = engine.tick(&prev, &driving(0.0));
        assert_eq!(out.status.parking_timer, 120);
    }

    #[test]
    fn test_parking_timer_not_restarted_while_running() {
        let engine = StatusEngine::default();
        let prev = Status {
            apps_blocked: true,
            parking_timer: 37,
            ..armed()
        };
        assert_eq!(engine.tick(&prev, &driving(0.0)).status.parking_timer, 37);
    }

    #[test]
    fn test_countdown_runs_to_expiry() {
        let engine = StatusEngine::default();
        let mut status = Status {
            apps_blocked: true,
            parking_timer: 120,
            ..armed()
        };

        for expected in (0..120).rev() {
            status = engine.count_down(&status, 0.0);
            assert_eq!(status.parking_timer, expected);
            if expected > 0 {
                assert!(status.apps_blocked);
            }
        }
        assert!(!status.apps_blocked);

        // idle once expired
        assert_eq!(engine.count_down(&status, 0.0), status);
    }

    #[test]
    fn test_countdown_pauses_while_moving() {
        let engine = StatusEngine::default();
        let status = Status { parking_timer: 10, apps_blocked: true, ..armed() };
        assert_eq!(engine.count_down(&status, 5.0), status);
    }

    #[test]
    fn test_safety_alerts_follow_block_alert() {
        let engine = StatusEngine::default();
        let inputs = TickInputs {
            speed: 45.0,
            tilt: Tilt::new(3.0, 0.0),
            ..TickInputs::default()
        };
        let out = engine.tick(&armed(), &inputs);
        assert_eq!(
            messages(&out.alerts),
            vec![MSG_BLOCKED, MSG_FACING_DRIVER, MSG_CRUISING]
        );
    }

    #[test]
    fn test_toggle_active_resets_block_and_timer() {
        let engine = StatusEngine::default();
        let prev = Status {
            apps_blocked: true,
            parking_timer: 80,
            ..armed()
        };

        let (next, alert) = engine.toggle_active(&prev);
        assert!(!next.active);
        assert!(!next.apps_blocked);
        assert_eq!(next.parking_timer, 0);
        assert_eq!(alert.message, "DriveLock disabled");

        let (next, alert) = engine.toggle_active(&next);
        assert!(next.active);
        assert_eq!(alert.message, "DriveLock enabled");
    }

    #[test]
    fn test_toggle_inputs() {
        let engine = StatusEngine::default();
        let status = engine.toggle_seatbelt(&Status::default());
        assert!(status.seatbelt_fastened);
        let status = engine.toggle_brake(&status);
        assert!(status.brake_pressed);
        assert!(!engine.toggle_brake(&status).brake_pressed);
    }

    fn arb_status() -> impl Strategy<Value = Status> {
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            0.0f64..10.0,
            0u32..200,
        )
            .prop_map(|(active, apps_blocked, brake_pressed, seatbelt_fastened, distance, timer)| {
                Status {
                    active,
                    apps_blocked,
                    brake_pressed,
                    seatbelt_fastened,
                    distance_from_vehicle: distance,
                    parking_timer: timer,
                    ..Status::default()
                }
            })
    }

    fn arb_inputs() -> impl Strategy<Value = TickInputs> {
        (
            prop_oneof![Just(0.0f64), 0.0f64..80.0],
            0.0f64..100.0,
            -4.0f64..4.0,
            -4.0f64..4.0,
            proptest::option::of((-0.0001f64..0.0001, -0.0001f64..0.0001)),
        )
            .prop_map(|(speed, audio_level, beta, gamma, offset)| {
                let user = Coordinate::new(37.7749, -122.4194);
                TickInputs {
                    speed,
                    audio_level,
                    tilt: Tilt::new(beta, gamma),
                    user_position: offset.map(|_| user),
                    vehicle_position: offset.map(|(dlat, dlon)| user.offset(dlat, dlon)),
                }
            })
    }

    proptest! {
        #[test]
        fn blocked_only_when_all_conditions_hold(prev in arb_status(), inputs in arb_inputs()) {
            let engine = StatusEngine::default();
            let next = engine.tick(&prev, &inputs).status;
            if next.apps_blocked {
                prop_assert!(next.active);
                prop_assert!(inputs.speed > 0.0);
                prop_assert!(next.seatbelt_fastened);
                prop_assert!(next.distance_from_vehicle < 3.0);
            }
        }

        #[test]
        fn countdown_never_blocks(prev in arb_status(), speed in prop_oneof![Just(0.0f64), 0.0f64..80.0]) {
            let engine = StatusEngine::default();
            let next = engine.count_down(&prev, speed);
            prop_assert!(!next.apps_blocked || prev.apps_blocked);
            prop_assert!(next.parking_timer <= prev.parking_timer);
        }

        #[test]
        fn tick_emits_block_alert_only_on_change(prev in arb_status(), inputs in arb_inputs()) {
            let engine = StatusEngine::default();
            let out = engine.tick(&prev, &inputs);
            let changed = out.status.apps_blocked != prev.apps_blocked;
            let block_alerts = out
                .alerts
                .iter()
                .filter(|a| a.message == MSG_BLOCKED || a.message == MSG_UNBLOCKED)
                .count();
            prop_assert_eq!(block_alerts, usize::from(changed));
        }
    }
}
