//! Thrust-curve analysis and vertical flight simulation for model rockets.
//!
//! The member crates hold the logic; this crate re-exports them under one
//! name so the front ends (CLI, chart renderers) share a single dependency.

pub use rocketry_config as config;
pub use rocketry_core as common;
pub use rocketry_export as export;
pub use rocketry_flight as flight;
pub use rocketry_motors as motors;

use rocketry_config::{RocketConfiguration, SimulationSettings};
use rocketry_flight::{FlightError, FlightProfile};
use rocketry_motors::{MotorError, ThrustCurve, ThrustCurveRepository, ThrustSample};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error(transparent)]
    Motor(#[from] MotorError),
    #[error(transparent)]
    Flight(#[from] FlightError),
}

/// A simulated flight together with the catalog entry that powered it.
#[derive(Debug, Clone)]
pub struct MotorFlight<'a> {
    pub curve: &'a ThrustCurve,
    pub profile: FlightProfile,
}

/// Look up `motor_id` in the catalog and fly `config` on it.
pub fn flight_for_motor<'a>(
    repository: &'a ThrustCurveRepository,
    motor_id: &str,
    config: &RocketConfiguration,
    settings: &SimulationSettings,
) -> Result<MotorFlight<'a>, CalculatorError> {
    let curve = repository.find_by_id(motor_id)?;
    let profile = rocketry_flight::simulate(config, curve, settings)?;
    Ok(MotorFlight { curve, profile })
}

/// Chart-ready thrust series plus the figures drawn next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrustView {
    pub title: String,
    pub samples: Vec<ThrustSample>,
    pub impulse_ns: f64,
    pub average_thrust_n: f64,
    pub burn_time_s: f64,
}

/// Thrust series for `motor_id`, optionally resampled onto a uniform grid.
pub fn thrust_view(
    repository: &ThrustCurveRepository,
    motor_id: &str,
    resample_step_s: Option<f64>,
) -> Result<ThrustView, CalculatorError> {
    let curve = repository.find_by_id(motor_id)?;
    let samples = match resample_step_s {
        Some(step) => curve.resample(step)?,
        None => curve.samples().to_vec(),
    };
    Ok(ThrustView {
        title: curve.title(),
        samples,
        impulse_ns: curve.impulse_ns(),
        average_thrust_n: curve.average_thrust_n(),
        burn_time_s: curve.burn_time_s(),
    })
}

/// Install the stderr log subscriber used by every binary. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
