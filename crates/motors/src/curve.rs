//! Normalized thrust-curve model.

use serde::Serialize;

use crate::MotorError;
use crate::metrics::Metrics;
use crate::resample;

/// One measured point of a thrust curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThrustSample {
    pub time_s: f64,
    pub thrust_n: f64,
}

impl ThrustSample {
    pub const fn new(time_s: f64, thrust_n: f64) -> Self {
        Self { time_s, thrust_n }
    }
}

/// A parsed motor data file.
///
/// Samples are sorted by strictly increasing time, start at `t = 0` and carry
/// non-negative thrust. The curve is immutable once built; metrics are
/// computed on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrustCurve {
    pub id: String,
    pub manufacturer_code: String,
    pub manufacturer: String,
    pub designation: String,
    pub header_designation: String,
    pub diameter_mm: f64,
    pub length_mm: f64,
    pub delays: String,
    pub propellant_mass_kg: f64,
    pub total_mass_kg: f64,
    samples: Vec<ThrustSample>,
    metrics: Metrics,
}

/// Header fields of a motor file, gathered before the samples are attached.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub designation: String,
    pub diameter_mm: f64,
    pub length_mm: f64,
    pub delays: String,
    pub propellant_mass_kg: f64,
    pub total_mass_kg: f64,
    pub manufacturer_code: String,
}

impl ThrustCurve {
    pub(crate) fn from_parts(
        id: String,
        designation: String,
        manufacturer: String,
        header: Header,
        samples: Vec<ThrustSample>,
    ) -> Self {
        let metrics = Metrics::compute(&samples);
        Self {
            id,
            manufacturer_code: header.manufacturer_code,
            manufacturer,
            designation,
            header_designation: header.designation,
            diameter_mm: header.diameter_mm,
            length_mm: header.length_mm,
            delays: header.delays,
            propellant_mass_kg: header.propellant_mass_kg,
            total_mass_kg: header.total_mass_kg,
            samples,
            metrics,
        }
    }

    pub fn samples(&self) -> &[ThrustSample] {
        &self.samples
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn impulse_ns(&self) -> f64 {
        self.metrics.impulse_ns
    }

    pub fn average_thrust_n(&self) -> f64 {
        self.metrics.average_thrust_n
    }

    pub fn burn_time_s(&self) -> f64 {
        self.metrics.burn_time_s
    }

    pub fn dry_mass_kg(&self) -> f64 {
        self.total_mass_kg - self.propellant_mass_kg
    }

    /// Last sample time, i.e. the end of the defined thrust interval.
    pub fn max_time_s(&self) -> f64 {
        self.samples.last().map(|s| s.time_s).unwrap_or(0.0)
    }

    pub fn peak_thrust_n(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.thrust_n)
            .fold(0.0_f64, f64::max)
    }

    /// Fixed-step copy of the curve for plotting.
    pub fn resample(&self, step_s: f64) -> Result<Vec<ThrustSample>, MotorError> {
        resample::resample(&self.samples, step_s)
    }

    /// Label used in selection lists, e.g. `Estes Industries D12`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.designation)
    }

    /// Chart title derived from the file identifier: `Estes_D12_3.eng` → `Estes D12-3`.
    pub fn title(&self) -> String {
        let stem = self
            .id
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.id);
        stem.replacen('_', " ", 1).replacen('_', "-", 1)
    }
}

impl std::fmt::Display for ThrustCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.manufacturer, self.designation)
    }
}
