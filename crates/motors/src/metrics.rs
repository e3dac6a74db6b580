//! Impulse, burn time, and average thrust of a thrust curve.
//!
//! Burn time and average thrust are measured over the effective window: the
//! samples whose thrust is above [`BURN_THRESHOLD_FRACTION`] of the peak. This
//! trims ignition spikes and tail-off noise the same way motor certification
//! data does. When the window collapses to fewer than two samples the full
//! curve is used instead.

use crate::curve::ThrustSample;

/// Fraction of peak thrust a sample must exceed to count as burning.
pub const BURN_THRESHOLD_FRACTION: f64 = 0.05;

/// Cached performance figures of a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub impulse_ns: f64,
    pub average_thrust_n: f64,
    pub burn_time_s: f64,
}

impl Metrics {
    pub fn compute(samples: &[ThrustSample]) -> Self {
        Self {
            impulse_ns: impulse(samples),
            average_thrust_n: average_thrust(samples),
            burn_time_s: burn_time(samples),
        }
    }
}

/// Trapezoidal integral of thrust over time (N·s).
pub fn impulse(samples: &[ThrustSample]) -> f64 {
    samples
        .windows(2)
        .map(|w| (w[1].time_s - w[0].time_s) * (w[1].thrust_n + w[0].thrust_n) * 0.5)
        .sum()
}

/// Samples strictly above the burn threshold, in time order.
pub fn effective_window(samples: &[ThrustSample]) -> Vec<ThrustSample> {
    let peak = samples.iter().map(|s| s.thrust_n).fold(0.0_f64, f64::max);
    let threshold = peak * BURN_THRESHOLD_FRACTION;
    samples
        .iter()
        .filter(|s| s.thrust_n > threshold)
        .copied()
        .collect()
}

/// Time span of the effective window, or of the whole curve if the window is degenerate.
pub fn burn_time(samples: &[ThrustSample]) -> f64 {
    let window = effective_window(samples);
    match window_span(&window) {
        Some(span) => span,
        None => full_span(samples),
    }
}

/// Impulse over burn time within the effective window, with the same fallback.
pub fn average_thrust(samples: &[ThrustSample]) -> f64 {
    let window = effective_window(samples);
    if let Some(span) = window_span(&window) {
        return impulse(&window) / span;
    }
    let max_time = samples.last().map(|s| s.time_s).unwrap_or(0.0);
    if max_time > 0.0 {
        impulse(samples) / max_time
    } else {
        0.0
    }
}

fn window_span(window: &[ThrustSample]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let span = full_span(window);
    (span > 0.0).then_some(span)
}

fn full_span(samples: &[ThrustSample]) -> f64 {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => last.time_s - first.time_s,
        _ => 0.0,
    }
}
