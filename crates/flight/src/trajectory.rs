//! Simulation output: per-step states, flight events, and annotation figures.

use serde::Serialize;

/// Flight phases in the order they occur. A run never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightPhase {
    Powered,
    Coast,
    Parachute,
}

impl FlightPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            FlightPhase::Powered => "powered",
            FlightPhase::Coast => "coast",
            FlightPhase::Parachute => "parachute",
        }
    }
}

/// State after one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightState {
    pub time_s: f64,
    /// Height above the pad; clamped so it never goes below zero.
    pub altitude_m: f64,
    /// Positive upwards.
    pub velocity_m_s: f64,
    pub acceleration_m_s2: f64,
    pub phase: FlightPhase,
}

impl FlightState {
    /// On the pad at ignition.
    pub fn ignition() -> Self {
        Self {
            time_s: 0.0,
            altitude_m: 0.0,
            velocity_m_s: 0.0,
            acceleration_m_s2: 0.0,
            phase: FlightPhase::Powered,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.time_s.is_finite()
            && self.altitude_m.is_finite()
            && self.velocity_m_s.is_finite()
            && self.acceleration_m_s2.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Ignition,
    Liftoff,
    Burnout,
    Apogee,
    ParachuteDeploy,
    Touchdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightEvent {
    pub time_s: f64,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Apogee {
    pub time_s: f64,
    pub altitude_m: f64,
}

/// Complete result of one run, from ignition to touchdown.
#[derive(Debug, Clone)]
pub struct FlightProfile {
    pub states: Vec<FlightState>,
    pub events: Vec<FlightEvent>,
    pub burnout_time_s: f64,
    pub apogee: Apogee,
    pub deploy_time_s: Option<f64>,
    pub touchdown_time_s: f64,
    /// Vertical speed just before the ground contact clamp (m/s, negative when falling).
    pub touchdown_velocity_m_s: f64,
}

impl FlightProfile {
    pub fn altitude_series(&self) -> Vec<(f64, f64)> {
        self.states.iter().map(|s| (s.time_s, s.altitude_m)).collect()
    }

    pub fn velocity_series(&self) -> Vec<(f64, f64)> {
        self.states
            .iter()
            .map(|s| (s.time_s, s.velocity_m_s))
            .collect()
    }

    pub fn acceleration_series(&self) -> Vec<(f64, f64)> {
        self.states
            .iter()
            .map(|s| (s.time_s, s.acceleration_m_s2))
            .collect()
    }

    /// Largest upward speed reached.
    pub fn max_velocity_m_s(&self) -> f64 {
        self.states
            .iter()
            .map(|s| s.velocity_m_s)
            .fold(0.0_f64, f64::max)
    }

    /// Largest acceleration magnitude, signed as it occurred.
    pub fn max_acceleration_m_s2(&self) -> f64 {
        self.states
            .iter()
            .map(|s| s.acceleration_m_s2)
            .fold(0.0_f64, |acc, a| if a.abs() > acc.abs() { a } else { acc })
    }

    /// Vertical speed at ground contact (m/s, negative when falling).
    pub fn landing_velocity_m_s(&self) -> f64 {
        self.touchdown_velocity_m_s
    }

    pub fn event_time(&self, kind: EventKind) -> Option<f64> {
        self.events.iter().find(|e| e.kind == kind).map(|e| e.time_s)
    }

    pub fn flight_time_s(&self) -> f64 {
        self.touchdown_time_s
    }
}
