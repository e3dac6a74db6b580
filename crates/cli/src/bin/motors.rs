use clap::{Args, Parser, Subcommand};
use rocketry_calculator::export::summary::{self, MotorSummary};
use rocketry_calculator::export::{thrust, writer_for_path};
use rocketry_calculator::motors::{MotorFilter, ThrustCurveRepository, ValueRange};
use rocketry_calculator::{init_tracing, thrust_view};
use std::path::{Path, PathBuf};

/// Browse the motor catalog: list and filter motors, inspect one curve.
#[derive(Parser, Debug)]
#[command(author, version, about = "Motor catalog browser")]
struct Cli {
    /// Directory of `.eng` motor files
    #[arg(long, default_value = "data/thrustcurve", global = true)]
    motors: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List motors matching every given filter
    List(ListArgs),
    /// Show one motor's metrics, optionally writing its (resampled) curve as CSV.
    ///
    /// With `--resample` and no `--output` the CSV goes to stdout in place of the metrics.
    Show {
        /// Motor id (file name)
        id: String,
        /// Resample the curve onto a uniform grid with this step (s)
        #[arg(long)]
        resample: Option<f64>,
        /// Thrust CSV output (use '-' for stdout)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the metrics as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarise the catalog: manufacturers, diameters, metric ranges
    Catalog,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Manufacturer display name or code (case-insensitive)
    #[arg(long)]
    manufacturer: Option<String>,
    #[arg(long)]
    min_diameter: Option<f64>,
    #[arg(long)]
    max_diameter: Option<f64>,
    #[arg(long)]
    min_length: Option<f64>,
    #[arg(long)]
    max_length: Option<f64>,
    #[arg(long)]
    min_impulse: Option<f64>,
    #[arg(long)]
    max_impulse: Option<f64>,
    #[arg(long)]
    min_average_thrust: Option<f64>,
    #[arg(long)]
    max_average_thrust: Option<f64>,
    #[arg(long)]
    min_burn_time: Option<f64>,
    #[arg(long)]
    max_burn_time: Option<f64>,
    /// Print the matches as a JSON array
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl ListArgs {
    fn filter(&self) -> MotorFilter {
        MotorFilter {
            manufacturer: self.manufacturer.clone(),
            diameter_mm: range(self.min_diameter, self.max_diameter),
            length_mm: range(self.min_length, self.max_length),
            impulse_ns: range(self.min_impulse, self.max_impulse),
            average_thrust_n: range(self.min_average_thrust, self.max_average_thrust),
            burn_time_s: range(self.min_burn_time, self.max_burn_time),
        }
    }
}

fn range(min: Option<f64>, max: Option<f64>) -> Option<ValueRange> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(ValueRange::new(
        min.unwrap_or(f64::NEG_INFINITY),
        max.unwrap_or(f64::INFINITY),
    ))
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let repository = ThrustCurveRepository::new(&cli.motors);

    match cli.command {
        Command::List(args) => {
            let matches = repository.filter(&args.filter())?;
            if args.json {
                let rows: Vec<MotorSummary> =
                    matches.iter().map(|c| MotorSummary::from(*c)).collect();
                summary::write_json(std::io::stdout(), &rows)?;
                return Ok(());
            }
            if matches.is_empty() {
                println!("No motors match the given filters.");
                return Ok(());
            }
            println!(
                "{:<28} {:<22} {:>6} {:>7} {:>9} {:>8} {:>7}",
                "id", "motor", "dia mm", "len mm", "impulse", "avg N", "burn s"
            );
            for curve in matches {
                println!(
                    "{:<28} {:<22} {:>6.1} {:>7.1} {:>9.2} {:>8.2} {:>7.2}",
                    curve.id,
                    curve.display_name(),
                    curve.diameter_mm,
                    curve.length_mm,
                    curve.impulse_ns(),
                    curve.average_thrust_n(),
                    curve.burn_time_s()
                );
            }
        }
        Command::Show {
            id,
            resample,
            output,
            json,
        } => {
            let curve = repository.find_by_id(&id)?;
            let csv_target = match (output, resample) {
                (Some(path), _) => Some(path),
                (None, Some(_)) => Some(PathBuf::from("-")),
                (None, None) => None,
            };
            let csv_on_stdout = csv_target.as_deref() == Some(Path::new("-"));
            if json && !csv_on_stdout {
                summary::write_json(std::io::stdout(), &MotorSummary::from(curve))?;
            } else if !csv_on_stdout {
                println!("{}", curve.display_name());
                println!("  id:             {}", curve.id);
                println!("  diameter:       {} mm", curve.diameter_mm);
                println!("  length:         {} mm", curve.length_mm);
                println!("  delays:         {}", curve.delays);
                println!("  propellant:     {:.4} kg", curve.propellant_mass_kg);
                println!("  total mass:     {:.4} kg", curve.total_mass_kg);
                println!("  total impulse:  {:.3} N·s", curve.impulse_ns());
                println!("  average thrust: {:.3} N", curve.average_thrust_n());
                println!("  peak thrust:    {:.3} N", curve.peak_thrust_n());
                println!("  burn time:      {:.3} s", curve.burn_time_s());
            }
            if let Some(path) = csv_target {
                let view = thrust_view(&repository, &id, resample)?;
                thrust::write_csv(writer_for_path(&path)?, &view.samples)?;
            }
        }
        Command::Catalog => {
            let curves = repository.load_all()?;
            println!("motors:        {}", curves.len());
            println!("manufacturers: {}", repository.manufacturers()?.join(", "));
            let diameters: Vec<String> = repository
                .diameters()?
                .iter()
                .map(|d| format!("{d}"))
                .collect();
            println!("diameters mm:  {}", diameters.join(", "));
            if let Some(ranges) = repository.ranges()? {
                println!(
                    "length mm:     {:.1} .. {:.1}",
                    ranges.length_mm.min, ranges.length_mm.max
                );
                println!(
                    "impulse N·s:   {:.2} .. {:.2}",
                    ranges.impulse_ns.min, ranges.impulse_ns.max
                );
                println!(
                    "avg thrust N:  {:.2} .. {:.2}",
                    ranges.average_thrust_n.min, ranges.average_thrust_n.max
                );
                println!(
                    "burn time s:   {:.2} .. {:.2}",
                    ranges.burn_time_s.min, ranges.burn_time_s.max
                );
            }
        }
    }
    Ok(())
}
