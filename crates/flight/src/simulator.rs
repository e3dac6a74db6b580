//! Fixed-step vertical flight integrator.
//!
//! The powered phase steps along the motor's own sample times, using the
//! thrust at the end of each interval. Coast and parachute descent share a
//! fixed step from [`SimulationSettings::time_step_s`]. Every step is
//! semi-implicit Euler: velocity is updated first and the new velocity moves
//! the altitude.

use rocketry_config::{RocketConfiguration, SimulationSettings};
use rocketry_motors::metrics::impulse;
use rocketry_motors::{ThrustCurve, ThrustSample};
use tracing::{debug, info, warn};

use crate::FlightError;
use crate::drag::DragProfile;
use crate::trajectory::{Apogee, EventKind, FlightEvent, FlightPhase, FlightProfile, FlightState};

/// Slack when comparing elapsed coast time against the deploy delay.
const DEPLOY_TIME_EPSILON: f64 = 1e-9;

/// Motor data consumed by the integrator.
#[derive(Debug, Clone, Copy)]
pub struct MotorInput<'a> {
    pub samples: &'a [ThrustSample],
    pub dry_mass_kg: f64,
    pub propellant_mass_kg: f64,
}

impl<'a> MotorInput<'a> {
    pub fn from_curve(curve: &'a ThrustCurve) -> Self {
        Self {
            samples: curve.samples(),
            dry_mass_kg: curve.dry_mass_kg(),
            propellant_mass_kg: curve.propellant_mass_kg,
        }
    }

    /// Thrust samples without any motor mass attached.
    pub fn from_samples(samples: &'a [ThrustSample]) -> Self {
        Self {
            samples,
            dry_mass_kg: 0.0,
            propellant_mass_kg: 0.0,
        }
    }
}

/// Simulate a full flight of `config` powered by `curve`.
pub fn simulate(
    config: &RocketConfiguration,
    curve: &ThrustCurve,
    settings: &SimulationSettings,
) -> Result<FlightProfile, FlightError> {
    debug!(motor = %curve.id, "starting flight simulation");
    simulate_samples(config, MotorInput::from_curve(curve), settings)
}

/// Simulate a full flight from raw thrust samples.
///
/// Samples must be sorted by increasing time, as produced by the motor parser.
pub fn simulate_samples(
    config: &RocketConfiguration,
    motor: MotorInput<'_>,
    settings: &SimulationSettings,
) -> Result<FlightProfile, FlightError> {
    config.validate()?;
    settings.validate()?;
    if motor.samples.is_empty() {
        return Err(FlightError::EmptyThrustCurve);
    }

    let env = Environment {
        gravity: settings.gravity_m_s2,
        air_density: settings.air_density_kg_m3,
    };
    let body = DragProfile::body(config);
    let chute = DragProfile::parachute(config);

    let mut state = FlightState::ignition();
    let mut states = vec![state];
    let mut events = vec![FlightEvent {
        time_s: 0.0,
        kind: EventKind::Ignition,
    }];
    let mut airborne = false;

    // Powered flight.
    let total_impulse = impulse(motor.samples);
    let mut burned = 0.0;
    for pair in motor.samples.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let dt = end.time_s - start.time_s;
        if dt <= 0.0 {
            continue;
        }
        burned += dt * (start.thrust_n + end.thrust_n) / 2.0;
        let mass = rocket_mass(config, &motor, settings, burned_fraction(burned, total_impulse));
        let step = advance(
            &state,
            end.thrust_n,
            mass,
            dt,
            end.time_s,
            &body,
            &env,
            FlightPhase::Powered,
        );
        state = checked(step.state)?;
        states.push(state);
        if !airborne && state.altitude_m > 0.0 {
            airborne = true;
            events.push(FlightEvent {
                time_s: state.time_s,
                kind: EventKind::Liftoff,
            });
        }
    }

    let burnout_time_s = state.time_s;
    events.push(FlightEvent {
        time_s: burnout_time_s,
        kind: EventKind::Burnout,
    });
    debug!(
        time_s = burnout_time_s,
        altitude_m = state.altitude_m,
        velocity_m_s = state.velocity_m_s,
        "burnout"
    );

    // Coast, then parachute descent, until the ground clamp fires.
    let dt = settings.time_step_s;
    let max_steps = (settings.max_flight_time_s / dt).ceil() as usize;
    let mass = rocket_mass(config, &motor, settings, 1.0);
    let mut deploy_time_s = None;
    let mut steps = 0usize;
    let touchdown_velocity_m_s = loop {
        if steps >= max_steps {
            warn!(steps, time_s = state.time_s, "flight never reached the ground");
            return Err(FlightError::Divergence {
                steps,
                time_s: state.time_s,
            });
        }
        let elapsed = steps as f64 * dt;
        let (phase, drag) = if elapsed + DEPLOY_TIME_EPSILON >= config.parachute_deploy_delay_s {
            if deploy_time_s.is_none() {
                deploy_time_s = Some(state.time_s);
                events.push(FlightEvent {
                    time_s: state.time_s,
                    kind: EventKind::ParachuteDeploy,
                });
                debug!(
                    time_s = state.time_s,
                    altitude_m = state.altitude_m,
                    "parachute deployed"
                );
            }
            (FlightPhase::Parachute, &chute)
        } else {
            (FlightPhase::Coast, &body)
        };

        steps += 1;
        let time_s = burnout_time_s + steps as f64 * dt;
        let step = advance(&state, 0.0, mass, dt, time_s, drag, &env, phase);
        state = checked(step.state)?;
        states.push(state);
        if let Some(velocity) = step.ground_contact {
            break velocity;
        }
    };

    let touchdown_time_s = state.time_s;
    events.push(FlightEvent {
        time_s: touchdown_time_s,
        kind: EventKind::Touchdown,
    });

    let apogee = highest_point(&states);
    if apogee.altitude_m > 0.0 {
        events.push(FlightEvent {
            time_s: apogee.time_s,
            kind: EventKind::Apogee,
        });
    }
    events.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));

    info!(
        apogee_m = apogee.altitude_m,
        apogee_time_s = apogee.time_s,
        touchdown_time_s,
        states = states.len(),
        "flight simulated"
    );

    Ok(FlightProfile {
        states,
        events,
        burnout_time_s,
        apogee,
        deploy_time_s,
        touchdown_time_s,
        touchdown_velocity_m_s,
    })
}

struct Environment {
    gravity: f64,
    air_density: f64,
}

struct Step {
    state: FlightState,
    /// Pre-clamp velocity when this step ended below ground.
    ground_contact: Option<f64>,
}

#[allow(clippy::too_many_arguments)]
fn advance(
    prev: &FlightState,
    thrust_n: f64,
    mass_kg: f64,
    dt: f64,
    time_s: f64,
    drag: &DragProfile,
    env: &Environment,
    phase: FlightPhase,
) -> Step {
    // Drag can at most cancel the momentum it acts against within one step.
    let drag_limit = mass_kg * prev.velocity_m_s.abs() / dt;
    let raw_drag_n = drag.force(prev.velocity_m_s, env.air_density);
    let drag_n = raw_drag_n.clamp(-drag_limit, drag_limit);
    let acceleration = (thrust_n - mass_kg * env.gravity + drag_n) / mass_kg;
    let velocity = prev.velocity_m_s + acceleration * dt;
    // A clamped step stops the rocket partway through, so it travels on the mean velocity.
    let travel_velocity = if raw_drag_n.abs() > drag_limit {
        0.5 * (prev.velocity_m_s + velocity)
    } else {
        velocity
    };
    let altitude = prev.altitude_m + travel_velocity * dt;

    if altitude < 0.0 {
        return Step {
            state: FlightState {
                time_s,
                altitude_m: 0.0,
                velocity_m_s: 0.0,
                acceleration_m_s2: 0.0,
                phase,
            },
            ground_contact: Some(velocity),
        };
    }

    Step {
        state: FlightState {
            time_s,
            altitude_m: altitude,
            velocity_m_s: velocity,
            acceleration_m_s2: acceleration,
            phase,
        },
        ground_contact: None,
    }
}

fn checked(state: FlightState) -> Result<FlightState, FlightError> {
    if state.is_finite() {
        Ok(state)
    } else {
        Err(FlightError::NonFinite {
            time_s: state.time_s,
        })
    }
}

fn burned_fraction(burned: f64, total: f64) -> f64 {
    if total > 0.0 {
        (burned / total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn rocket_mass(
    config: &RocketConfiguration,
    motor: &MotorInput<'_>,
    settings: &SimulationSettings,
    burned_fraction: f64,
) -> f64 {
    if !settings.include_motor_mass {
        return config.mass_kg;
    }
    config.mass_kg + motor.dry_mass_kg + motor.propellant_mass_kg * (1.0 - burned_fraction)
}

/// First state with the greatest altitude.
fn highest_point(states: &[FlightState]) -> Apogee {
    let mut best = Apogee {
        time_s: 0.0,
        altitude_m: 0.0,
    };
    for state in states {
        if state.altitude_m > best.altitude_m {
            best = Apogee {
                time_s: state.time_s,
                altitude_m: state.altitude_m,
            };
        }
    }
    best
}
