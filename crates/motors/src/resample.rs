//! Fixed-step linear resampling of thrust curves.

use crate::MotorError;
use crate::curve::ThrustSample;

/// Thrust at `time_s`, linearly interpolated between the bracketing samples.
///
/// Knot times return the stored value exactly; times outside the curve give 0.
pub fn interpolate(samples: &[ThrustSample], time_s: f64) -> f64 {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return 0.0;
    };
    if !(time_s >= first.time_s && time_s <= last.time_s) {
        return 0.0;
    }
    let idx = samples.partition_point(|s| s.time_s < time_s);
    let hi = samples[idx];
    if hi.time_s == time_s || idx == 0 {
        return hi.thrust_n;
    }
    let lo = samples[idx - 1];
    let frac = (time_s - lo.time_s) / (hi.time_s - lo.time_s);
    lo.thrust_n + frac * (hi.thrust_n - lo.thrust_n)
}

/// Sample the curve every `step_s` seconds from 0 up to its last time.
pub fn resample(samples: &[ThrustSample], step_s: f64) -> Result<Vec<ThrustSample>, MotorError> {
    if !step_s.is_finite() || step_s <= 0.0 {
        return Err(MotorError::InvalidStep { step: step_s });
    }
    if samples.len() < 2 {
        return Err(MotorError::TooFewSamples {
            count: samples.len(),
        });
    }
    let max_time = samples[samples.len() - 1].time_s;
    // Absorb representation error so 1.0 / 0.1 still yields 10 steps.
    let count = (max_time / step_s + 1e-9).floor() as usize;
    Ok((0..=count)
        .map(|k| {
            let t = (k as f64 * step_s).min(max_time);
            ThrustSample::new(t, interpolate(samples, t))
        })
        .collect())
}
