//! One-dimensional flight simulation of a single-stage model rocket.
//!
//! A run steps the rocket through three phases in order: powered flight along
//! the motor's thrust samples, a ballistic coast for the parachute deploy
//! delay, and a parachute descent until touchdown.

pub mod drag;
pub mod simulator;
pub mod trajectory;

use rocketry_config::ConfigError;
use thiserror::Error;

pub use drag::DragProfile;
pub use simulator::{MotorInput, simulate, simulate_samples};
pub use trajectory::{Apogee, EventKind, FlightEvent, FlightPhase, FlightProfile, FlightState};

/// Errors raised before or during a simulation run. No partial trajectory is returned.
#[derive(Debug, Error)]
pub enum FlightError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("thrust curve has no samples")]
    EmptyThrustCurve,
    #[error("simulation did not reach the ground after {steps} steps ({time_s:.1} s of flight)")]
    Divergence { steps: usize, time_s: f64 },
    #[error("simulation produced a non-finite state at t = {time_s:.3} s")]
    NonFinite { time_s: f64 },
}
