// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Provider simulators for demo/testing

use async_trait::async_trait;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{StandardNormal, Uniform};
use std::time::Duration;

use super::{AudioSampler, LocationProvider, LocationSample, MotionProvider, ProviderError, ProviderStatus};
use crate::config::SimulationConfig;
use crate::drivelock::Tilt;
use crate::geo::{Coordinate, EARTH_RADIUS_M};

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Simulates a phone moving along a straight heading with a scripted speed profile
pub struct SimulatedLocation {
    id: String,
    status: ProviderStatus,
    position: Coordinate,
    heading_rad: f64,
    speed_profile: Vec<f64>,
    step: usize,
    interval: Duration,
    accuracy_m: f64,
    deny_permission: bool,
    max_samples: Option<usize>,
    rng: StdRng,
}

impl SimulatedLocation {
    pub fn new(id: &str, config: &SimulationConfig) -> Self {
        let mut rng = make_rng(config.seed);
        let heading_rad = rng.gen_range(0.0..std::f64::consts::TAU);

        Self {
            id: id.to_string(),
            status: ProviderStatus::Idle,
            position: config.origin,
            heading_rad,
            speed_profile: config.speed_profile_mps.clone(),
            step: 0,
            interval: Duration::from_millis(config.sample_interval_ms),
            accuracy_m: config.accuracy_m,
            deny_permission: config.deny_location,
            max_samples: None,
            rng,
        }
    }

    /// Close the stream after `n` samples
    pub fn with_max_samples(mut self, n: usize) -> Self {
        self.max_samples = Some(n);
        self
    }

    fn current_speed(&self) -> f64 {
        if self.speed_profile.is_empty() {
            return 0.0;
        }
        self.speed_profile[self.step % self.speed_profile.len()]
    }

    fn advance(&mut self) -> LocationSample {
        let speed = self.current_speed();
        let seconds = self.interval.as_secs_f64().max(1e-3);
        let meters = speed * seconds;

        // Flat-earth step; fine at a few meters per sample
        let dlat = (meters * self.heading_rad.cos() / EARTH_RADIUS_M).to_degrees();
        let dlon = (meters * self.heading_rad.sin()
            / (EARTH_RADIUS_M * self.position.latitude.to_radians().cos()))
        .to_degrees();
        self.position = self.position.offset(dlat, dlon);
        self.step += 1;

        let jitter = Uniform::new(0.0, 1.0);
        let accuracy = self.accuracy_m + self.rng.sample(jitter);

        LocationSample::new(self.position, Some(speed), Some(accuracy))
    }
}

#[async_trait]
impl LocationProvider for SimulatedLocation {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ProviderStatus {
        self.status
    }

    async fn request_permission(&mut self) -> Result<(), ProviderError> {
        if self.deny_permission {
            self.status = ProviderStatus::Denied;
            return Err(ProviderError::PermissionDenied);
        }
        self.status = ProviderStatus::Active;
        Ok(())
    }

    async fn current_position(&mut self) -> Result<LocationSample, ProviderError> {
        if self.status != ProviderStatus::Active {
            return Err(ProviderError::PermissionDenied);
        }
        Ok(LocationSample::new(
            self.position,
            Some(self.current_speed()),
            Some(self.accuracy_m),
        ))
    }

    async fn next_sample(&mut self) -> Result<LocationSample, ProviderError> {
        if self.status != ProviderStatus::Active {
            return Err(ProviderError::PermissionDenied);
        }
        if let Some(max) = self.max_samples {
            if self.step >= max {
                self.status = ProviderStatus::Idle;
                return Err(ProviderError::Closed);
            }
        }
        tokio::time::sleep(self.interval).await;
        Ok(self.advance())
    }
}

/// Simulates phone rotation: small hand noise with an occasional pickup
pub struct SimulatedMotion {
    id: String,
    interval: Duration,
    noise_std: f64,
    pickup_probability: f64,
    rng: StdRng,
}

impl SimulatedMotion {
    pub fn new(id: &str, config: &SimulationConfig) -> Self {
        Self {
            id: id.to_string(),
            interval: Duration::from_millis(config.sample_interval_ms),
            noise_std: 0.3,
            pickup_probability: 0.05,
            rng: make_rng(config.seed.map(|s| s.wrapping_add(1))),
        }
    }

    fn generate(&mut self) -> Tilt {
        let mut beta = self.noise_std * self.rng.sample::<f64, _>(StandardNormal);
        let gamma = self.noise_std * self.rng.sample::<f64, _>(StandardNormal);

        if self.rng.gen::<f64>() < self.pickup_probability {
            beta += self.rng.gen_range(2.0..3.2);
        }

        Tilt::new(beta, gamma)
    }
}

#[async_trait]
impl MotionProvider for SimulatedMotion {
    fn id(&self) -> &str {
        &self.id
    }

    async fn next_tilt(&mut self) -> Result<Tilt, ProviderError> {
        tokio::time::sleep(self.interval).await;
        Ok(self.generate())
    }
}

/// Random engine audio level, uniform over 0..100
pub struct RandomAudio {
    rng: StdRng,
    range: Uniform<f64>,
}

impl RandomAudio {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: make_rng(seed.map(|s| s.wrapping_add(2))),
            range: Uniform::new(0.0, 100.0),
        }
    }
}

impl AudioSampler for RandomAudio {
    fn sample(&mut self) -> f64 {
        self.rng.sample(&self.range)
    }
}

/// Constant audio level
#[derive(Debug, Clone, Copy)]
pub struct FixedAudio(pub f64);

impl AudioSampler for FixedAudio {
    fn sample(&mut self) -> f64 {
        self.0
    }
}
