//! Sensor module - location, motion and audio providers

mod manager;
mod traits;
mod simulator;

pub use manager::*;
pub use traits::{AudioSampler, LocationProvider, LocationSample, MotionProvider, ProviderError, ProviderStatus};
pub use simulator::{FixedAudio, RandomAudio, SimulatedLocation, SimulatedMotion};
