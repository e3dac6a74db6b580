//! Export helpers for CSV series and JSON summaries.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod trajectory {
    use std::io::{Read, Write};

    use rocketry_flight::FlightProfile;
    use serde::{Deserialize, Serialize};

    use crate::ExportError;

    pub const HEADER: [&str; 5] = [
        "time_s",
        "altitude_m",
        "velocity_m_s",
        "acceleration_m_s2",
        "phase",
    ];

    #[derive(Serialize)]
    struct Row {
        time_s: f64,
        altitude_m: f64,
        velocity_m_s: f64,
        acceleration_m_s2: f64,
        phase: &'static str,
    }

    /// One trajectory row as read back by chart renderers.
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Record {
        pub time_s: f64,
        pub altitude_m: f64,
        pub velocity_m_s: f64,
        pub acceleration_m_s2: f64,
        pub phase: String,
    }

    /// Write every simulated state as one CSV row under [`HEADER`].
    pub fn write_csv<W: Write>(writer: W, profile: &FlightProfile) -> Result<(), ExportError> {
        let mut out = csv::Writer::from_writer(writer);
        for state in &profile.states {
            out.serialize(Row {
                time_s: state.time_s,
                altitude_m: state.altitude_m,
                velocity_m_s: state.velocity_m_s,
                acceleration_m_s2: state.acceleration_m_s2,
                phase: state.phase.as_str(),
            })?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Record>, ExportError> {
        let mut input = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for row in input.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }
}

pub mod thrust {
    use std::io::{Read, Write};

    use rocketry_motors::ThrustSample;
    use serde::Deserialize;

    use crate::ExportError;

    #[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
    pub struct Record {
        pub time_s: f64,
        pub thrust_n: f64,
    }

    pub fn write_csv<W: Write>(writer: W, samples: &[ThrustSample]) -> Result<(), ExportError> {
        let mut out = csv::Writer::from_writer(writer);
        for sample in samples {
            out.serialize(sample)?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ThrustSample>, ExportError> {
        let mut input = csv::Reader::from_reader(reader);
        let mut samples = Vec::new();
        for row in input.deserialize() {
            let record: Record = row?;
            samples.push(ThrustSample::new(record.time_s, record.thrust_n));
        }
        Ok(samples)
    }
}

pub mod summary {
    use std::io::{Read, Write};

    use rocketry_config::RocketConfiguration;
    use rocketry_core::display::round_to;
    use rocketry_flight::{EventKind, FlightProfile};
    use rocketry_motors::ThrustCurve;
    use serde::{Deserialize, Serialize};
    use serde_json::to_writer_pretty;

    use crate::ExportError;

    const PLACES: u32 = 3;

    fn rounded(value: f64) -> f64 {
        round_to(value, PLACES)
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct EventEntry {
        pub time_s: f64,
        pub kind: String,
    }

    /// Headline figures of one flight, used to annotate charts.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FlightSummary {
        pub rocket: Option<String>,
        pub motor_id: String,
        pub motor: String,
        pub mass_kg: f64,
        pub parachute_diameter_m: f64,
        pub placeholder_parachute: bool,
        pub burnout_time_s: f64,
        pub apogee_time_s: f64,
        pub apogee_altitude_m: f64,
        pub deploy_time_s: Option<f64>,
        pub touchdown_time_s: f64,
        pub max_velocity_m_s: f64,
        pub max_acceleration_m_s2: f64,
        pub landing_velocity_m_s: f64,
        pub events: Vec<EventEntry>,
    }

    impl FlightSummary {
        pub fn new(
            config: &RocketConfiguration,
            curve: &ThrustCurve,
            profile: &FlightProfile,
        ) -> Self {
            Self {
                rocket: config.name.clone(),
                motor_id: curve.id.clone(),
                motor: curve.display_name(),
                mass_kg: config.mass_kg,
                parachute_diameter_m: config.parachute_diameter_m,
                placeholder_parachute: config.parachute_diameter_defaulted,
                burnout_time_s: rounded(profile.burnout_time_s),
                apogee_time_s: rounded(profile.apogee.time_s),
                apogee_altitude_m: rounded(profile.apogee.altitude_m),
                deploy_time_s: profile.deploy_time_s.map(rounded),
                touchdown_time_s: rounded(profile.touchdown_time_s),
                max_velocity_m_s: rounded(profile.max_velocity_m_s()),
                max_acceleration_m_s2: rounded(profile.max_acceleration_m_s2()),
                landing_velocity_m_s: rounded(profile.landing_velocity_m_s()),
                events: profile
                    .events
                    .iter()
                    .map(|event| EventEntry {
                        time_s: rounded(event.time_s),
                        kind: event_name(event.kind).to_string(),
                    })
                    .collect(),
            }
        }
    }

    fn event_name(kind: EventKind) -> &'static str {
        match kind {
            EventKind::Ignition => "ignition",
            EventKind::Liftoff => "liftoff",
            EventKind::Burnout => "burnout",
            EventKind::Apogee => "apogee",
            EventKind::ParachuteDeploy => "parachute_deploy",
            EventKind::Touchdown => "touchdown",
        }
    }

    /// Catalog entry with its derived performance figures.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct MotorSummary {
        pub id: String,
        pub title: String,
        pub manufacturer: String,
        pub manufacturer_code: String,
        pub designation: String,
        pub diameter_mm: f64,
        pub length_mm: f64,
        pub delays: String,
        pub propellant_mass_kg: f64,
        pub total_mass_kg: f64,
        pub impulse_ns: f64,
        pub average_thrust_n: f64,
        pub peak_thrust_n: f64,
        pub burn_time_s: f64,
        pub max_time_s: f64,
        pub samples: usize,
    }

    impl From<&ThrustCurve> for MotorSummary {
        fn from(curve: &ThrustCurve) -> Self {
            Self {
                id: curve.id.clone(),
                title: curve.title(),
                manufacturer: curve.manufacturer.clone(),
                manufacturer_code: curve.manufacturer_code.clone(),
                designation: curve.designation.clone(),
                diameter_mm: curve.diameter_mm,
                length_mm: curve.length_mm,
                delays: curve.delays.clone(),
                propellant_mass_kg: curve.propellant_mass_kg,
                total_mass_kg: curve.total_mass_kg,
                impulse_ns: rounded(curve.impulse_ns()),
                average_thrust_n: rounded(curve.average_thrust_n()),
                peak_thrust_n: rounded(curve.peak_thrust_n()),
                burn_time_s: rounded(curve.burn_time_s()),
                max_time_s: rounded(curve.max_time_s()),
                samples: curve.samples().len(),
            }
        }
    }

    /// Pretty-print any summary as a JSON document followed by a newline.
    pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<(), ExportError> {
        to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_flight_summary<R: Read>(reader: R) -> Result<FlightSummary, ExportError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocketry_config::{RocketConfiguration, SimulationSettings};
    use rocketry_flight::simulate;
    use rocketry_motors::{ThrustCurve, parse_eng};

    const MOTOR: &str = "\
; test motor
F15 29 124 0-4-6-8 0.060 0.101 E
0.1 5.0
0.5 15.0
1.0 2.0
1.2 0.0
";

    fn curve() -> ThrustCurve {
        parse_eng("Estes_F15.eng", MOTOR).expect("fixture parses")
    }

    fn rocket() -> RocketConfiguration {
        RocketConfiguration {
            name: Some("Test Rocket".into()),
            mass_kg: 0.3,
            diameter_m: 0.03,
            parachute_diameter_m: 0.4,
            parachute_deploy_delay_s: 1.0,
            parachute_diameter_defaulted: false,
            ..RocketConfiguration::default()
        }
    }

    #[test]
    fn trajectory_csv_has_one_row_per_state() {
        let curve = curve();
        let profile = simulate(&rocket(), &curve, &SimulationSettings::default()).expect("flight");
        let mut buffer = Vec::new();
        trajectory::write_csv(&mut buffer, &profile).expect("write");

        let text = String::from_utf8(buffer.clone()).expect("utf8");
        let header = text.lines().next().expect("header");
        assert_eq!(header, trajectory::HEADER.join(","));

        let records = trajectory::read_csv(buffer.as_slice()).expect("read back");
        assert_eq!(records.len(), profile.states.len());
        assert_eq!(records[0].phase, "powered");
        assert_eq!(records.last().map(|r| r.altitude_m), Some(0.0));
        assert!(records.iter().any(|r| r.phase == "parachute"));
    }

    #[test]
    fn thrust_csv_lists_samples() {
        let curve = curve();
        let mut buffer = Vec::new();
        thrust::write_csv(&mut buffer, curve.samples()).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("time_s,thrust_n"));
        assert_eq!(lines.next(), Some("0.0,0.0"));
        assert_eq!(text.lines().count(), curve.samples().len() + 1);
    }

    #[test]
    fn summaries_round_to_three_places() {
        let curve = curve();
        let motor = summary::MotorSummary::from(&curve);
        assert_eq!(motor.manufacturer, "Estes Industries");
        assert_eq!(motor.impulse_ns, 8.7);
        assert_eq!(motor.average_thrust_n, 9.167);
        assert_eq!(motor.samples, 5);

        let profile = simulate(&rocket(), &curve, &SimulationSettings::default()).expect("flight");
        let flight = summary::FlightSummary::new(&rocket(), &curve, &profile);
        assert!(!flight.placeholder_parachute);
        assert_eq!(flight.motor, "Estes Industries F15");
        assert_eq!(flight.burnout_time_s, 1.2);
        let scaled = flight.apogee_altitude_m * 1000.0;
        assert!((scaled - scaled.round()).abs() < 1e-6);
        assert_eq!(flight.events.first().map(|e| e.kind.as_str()), Some("ignition"));
        assert_eq!(flight.events.last().map(|e| e.kind.as_str()), Some("touchdown"));
    }

    #[test]
    fn summary_json_reads_back() {
        let curve = curve();
        let profile = simulate(&rocket(), &curve, &SimulationSettings::default()).expect("flight");
        let flight = summary::FlightSummary::new(&rocket(), &curve, &profile);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/summary.json");
        let writer = writer_for_path(&path).expect("writer");
        summary::write_json(writer, &flight).expect("json");

        let file = File::open(&path).expect("open");
        let parsed = summary::read_flight_summary(file).expect("parse");
        assert_eq!(parsed, flight);
    }
}
