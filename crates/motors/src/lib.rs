//! Solid-motor thrust curves: `.eng` parsing, performance metrics, resampling,
//! and the in-memory motor catalog.

pub mod curve;
pub mod metrics;
pub mod parse;
pub mod repository;
pub mod resample;

use std::path::PathBuf;

use thiserror::Error;

pub use curve::{ThrustCurve, ThrustSample};
pub use metrics::Metrics;
pub use parse::{designation_from_file_name, manufacturer_name, parse_eng};
pub use repository::{CatalogRanges, MotorFilter, ThrustCurveRepository, ValueRange};
pub use resample::{interpolate, resample};

/// Errors surfaced by motor parsing and catalog queries.
#[derive(Debug, Error)]
pub enum MotorError {
    #[error("motor `{id}` not found in catalog")]
    NotFound { id: String },
    #[error("malformed motor file `{file}` (line {line}): {reason}")]
    Malformed {
        file: String,
        line: usize,
        reason: String,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("resample step must be a positive number of seconds, got {step}")]
    InvalidStep { step: f64 },
    #[error("thrust curve needs at least 2 samples, got {count}")]
    TooFewSamples { count: usize },
}
