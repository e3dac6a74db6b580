use anyhow::{Context, bail};
use clap::Parser;
use rocketry_calculator::common::prefix::{MetricPrefix, PrefixError, parse_quantity};
use rocketry_calculator::config::{
    RocketConfig, RocketConfiguration, SimulationSettings, load_rocket_config, load_settings,
};
use rocketry_calculator::export::summary::{self, FlightSummary};
use rocketry_calculator::export::{trajectory, writer_for_path};
use rocketry_calculator::flight::FlightProfile;
use rocketry_calculator::motors::{ThrustCurve, ThrustCurveRepository};
use rocketry_calculator::{flight_for_motor, init_tracing};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fly a single-stage rocket on one catalog motor: powered ascent, coast, parachute descent.
#[derive(Parser, Debug)]
#[command(author, version, about = "Vertical flight simulator for model rockets")]
struct Cli {
    /// Directory of `.eng` motor files
    #[arg(long, default_value = "data/thrustcurve")]
    motors: PathBuf,

    /// Motor id (file name, e.g. Estes_D12.eng)
    #[arg(long)]
    motor: String,

    /// Rocket description (.toml, or .yaml list whose first record is used)
    #[arg(long)]
    rocket: Option<PathBuf>,

    /// Simulation settings (.toml)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Rocket mass without motor (kg, or with a unit such as `34g`)
    #[arg(long, value_parser = mass_kg)]
    mass: Option<f64>,

    /// Body tube diameter (m, or with a unit such as `25mm`)
    #[arg(long, value_parser = length_m)]
    diameter: Option<f64>,

    /// Body drag coefficient
    #[arg(long)]
    drag_coefficient: Option<f64>,

    /// Parachute diameter (m, or with a unit such as `30cm`)
    #[arg(long, value_parser = length_m)]
    chute_diameter: Option<f64>,

    /// Parachute drag coefficient
    #[arg(long)]
    chute_drag_coefficient: Option<f64>,

    /// Parachute deploy delay after burnout (s)
    #[arg(long)]
    deploy_delay: Option<f64>,

    /// Fixed integration step for coast and descent (s)
    #[arg(long)]
    time_step: Option<f64>,

    /// Add the motor's own mass to the rocket
    #[arg(long, default_value_t = false)]
    include_motor_mass: bool,

    /// Fly with the placeholder parachute when no diameter is configured
    #[arg(long, default_value_t = false)]
    accept_default_parachute: bool,

    /// Trajectory CSV output (use '-' for stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Flight summary JSON output
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let base = match &cli.rocket {
        Some(path) => load_rocket_config(path)
            .with_context(|| format!("loading rocket from {}", path.display()))?,
        None => RocketConfig::default(),
    };
    let config = base.merge(cli.overrides()).resolve()?;
    if config.parachute_diameter_defaulted && !cli.accept_default_parachute {
        bail!(
            "no parachute diameter configured; pass --chute-diameter or \
             --accept-default-parachute to fly the {} m placeholder",
            config.parachute_diameter_m
        );
    }

    let settings = cli.settings()?;
    let repository = ThrustCurveRepository::new(&cli.motors);
    let flight = flight_for_motor(&repository, &cli.motor, &config, &settings)?;
    info!(motor = %flight.curve.id, states = flight.profile.states.len(), "simulation complete");

    let csv_on_stdout = cli.output.as_deref() == Some(Path::new("-"));
    if let Some(path) = &cli.output {
        let writer = writer_for_path(path)?;
        trajectory::write_csv(writer, &flight.profile)?;
    }
    if let Some(path) = &cli.summary {
        let record = FlightSummary::new(&config, flight.curve, &flight.profile);
        summary::write_json(writer_for_path(path)?, &record)?;
    }

    // Keep stdout clean when it carries the CSV.
    if csv_on_stdout {
        report(&mut std::io::stderr(), &config, flight.curve, &flight.profile)?;
    } else {
        report(&mut std::io::stdout(), &config, flight.curve, &flight.profile)?;
    }
    Ok(())
}

fn mass_kg(input: &str) -> Result<f64, PrefixError> {
    parse_quantity(input, "g", MetricPrefix::Kilo)
}

fn length_m(input: &str) -> Result<f64, PrefixError> {
    parse_quantity(input, "m", MetricPrefix::Base)
}

impl Cli {
    fn overrides(&self) -> RocketConfig {
        RocketConfig {
            name: None,
            mass_kg: self.mass,
            diameter_m: self.diameter,
            drag_coefficient: self.drag_coefficient,
            parachute_diameter_m: self.chute_diameter,
            parachute_drag_coefficient: self.chute_drag_coefficient,
            parachute_deploy_delay_s: self.deploy_delay,
        }
    }

    fn settings(&self) -> anyhow::Result<SimulationSettings> {
        let mut settings = match &self.settings {
            Some(path) => load_settings(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => SimulationSettings::default(),
        };
        if let Some(step) = self.time_step {
            settings.time_step_s = step;
        }
        if self.include_motor_mass {
            settings.include_motor_mass = true;
        }
        Ok(settings)
    }
}

fn report(
    out: &mut dyn Write,
    config: &RocketConfiguration,
    curve: &ThrustCurve,
    profile: &FlightProfile,
) -> std::io::Result<()> {
    if let Some(name) = &config.name {
        writeln!(out, "Rocket:     {name}")?;
    }
    writeln!(out, "Motor:      {} ({})", curve.display_name(), curve.id)?;
    writeln!(out, "Burnout:    {:.3} s", profile.burnout_time_s)?;
    writeln!(
        out,
        "Apogee:     {:.3} m at {:.3} s",
        profile.apogee.altitude_m, profile.apogee.time_s
    )?;
    match profile.deploy_time_s {
        Some(t) => writeln!(out, "Deploy:     {t:.3} s")?,
        None => writeln!(out, "Deploy:     landed before deployment")?,
    }
    writeln!(
        out,
        "Touchdown:  {:.3} s at {:.3} m/s",
        profile.touchdown_time_s,
        profile.landing_velocity_m_s().abs()
    )?;
    if config.parachute_diameter_defaulted {
        writeln!(
            out,
            "Note:       placeholder {} m parachute in use",
            config.parachute_diameter_m
        )?;
    }
    Ok(())
}
