// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Session engine - drives the status tick and the parking countdown

use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::Result;
use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::{Command, EventBus, SessionState};
use crate::config::Config;
use crate::drivelock::{Alert, AlertLog, Status, StatusEngine, TickInputs};
use crate::sensors::{AudioSampler, SharedReadings};

/// Owns the DriveLock status for the lifetime of a tracking session
pub struct Engine {
    pub config: Arc<Config>,
    status_engine: StatusEngine,
    status: Status,
    alerts: AlertLog,
    readings: SharedReadings,
    audio: Box<dyn AudioSampler>,
    event_bus: Arc<EventBus>,
    state: SessionState,
    start_time: Option<Instant>,
}

impl Engine {
    pub fn new(
        config: Arc<Config>,
        event_bus: Arc<EventBus>,
        readings: SharedReadings,
        audio: Box<dyn AudioSampler>,
    ) -> Self {
        Self {
            status_engine: StatusEngine::new(&config.drivelock),
            status: Status::default(),
            alerts: AlertLog::new(config.drivelock.alert_capacity),
            readings,
            audio,
            event_bus,
            state: SessionState::default(),
            start_time: None,
            config,
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    /// Apps currently blocked; empty while the lock is released
    pub fn blocked_apps(&self) -> &[String] {
        if self.status.apps_blocked {
            &self.config.drivelock.blocked_apps
        } else {
            &[]
        }
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            status: self.status.clone(),
            uptime_seconds: self.uptime(),
            ..self.state.clone()
        }
    }

    pub fn uptime(&self) -> u64 {
        self.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0)
    }

    /// One status recomputation from the latest readings
    pub fn on_tick(&mut self) -> Vec<Alert> {
        let audio_level = self.audio.sample();
        let inputs = {
            let readings = self.readings.lock();
            TickInputs {
                speed: readings.speed,
                audio_level,
                tilt: readings.tilt,
                user_position: readings.user_position,
                vehicle_position: readings.vehicle_position,
            }
        };

        let outcome = self.status_engine.tick(&self.status, &inputs);
        self.status = outcome.status;
        self.state.ticks += 1;
        self.state.audio_level = audio_level;

        debug!(
            "Tick {}: speed {} mph, audio {:.0}, {:.1} m from vehicle, {}",
            self.state.ticks,
            inputs.speed,
            audio_level,
            self.status.distance_from_vehicle,
            self.status.phone_orientation
        );

        for alert in &outcome.alerts {
            self.record_alert(alert.clone());
        }
        self.event_bus.publish_status(self.status.clone());

        outcome.alerts
    }

    /// One parking countdown step, gated on the vehicle standing still
    pub fn on_countdown(&mut self) {
        let speed = self.readings.lock().speed;
        let next = self.status_engine.count_down(&self.status, speed);
        if next != self.status {
            if !next.apps_blocked && self.status.apps_blocked {
                info!("Parking timer expired, apps released");
            }
            self.status = next;
            self.state.countdown_steps += 1;
            self.event_bus.publish_status(self.status.clone());
        }
    }

    /// Apply a user command
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::ToggleDriveLock => {
                let (next, alert) = self.status_engine.toggle_active(&self.status);
                self.status = next;
                self.record_alert(alert);
            }
            Command::ToggleBrake => {
                self.status = self.status_engine.toggle_brake(&self.status);
            }
            Command::ToggleSeatbelt => {
                self.status = self.status_engine.toggle_seatbelt(&self.status);
            }
        }
        debug!("Handled {:?}", command);
        self.event_bus.publish_status(self.status.clone());
    }

    fn record_alert(&mut self, alert: Alert) {
        info!("[{:?}] {}", alert.kind, alert.message);
        self.state.alerts_raised += 1;
        self.state.last_alert = Some(Utc::now());
        self.alerts.push(alert.clone());
        self.event_bus.publish_alert(alert);
    }

    /// Run the tick and countdown cadences until shutdown
    pub async fn run(
        &mut self,
        mut commands: mpsc::Receiver<Command>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        info!("Starting DriveLock engine...");
        self.start_time = Some(Instant::now());
        self.state.running = true;

        // tokio intervals panic on a zero period
        let mut tick = interval(Duration::from_millis(self.config.tracking.tick_interval_ms.max(1)));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut countdown =
            interval(Duration::from_millis(self.config.tracking.countdown_interval_ms.max(1)));
        countdown.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // first countdown step one period after start
        countdown.tick().await;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.on_tick();
                }
                _ = countdown.tick() => {
                    self.on_countdown();
                }
                Some(command) = commands.recv() => {
                    self.handle(command);
                }
                _ = shutdown.recv() => {
                    info!("DriveLock engine shutting down...");
                    break;
                }
            }
        }

        self.state.running = false;
        info!("DriveLock engine stopped after {} ticks", self.state.ticks);
        Ok(())
    }
}
