use chrono::Local;
use clap::Parser;
use plotters::coord::Shift;
use plotters::prelude::*;
use rocketry_calculator::export::summary::{FlightSummary, read_flight_summary};
use rocketry_calculator::export::trajectory::{self, Record};
use rocketry_calculator::init_tracing;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render altitude, velocity and acceleration panels from a trajectory CSV"
)]
struct Cli {
    #[arg(long)]
    input: PathBuf,
    /// Flight summary JSON; adds deploy and touchdown markers and the motor name
    #[arg(long)]
    summary: Option<PathBuf>,
    #[arg(long, default_value = "artifacts/flight.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1000)]
    width: u32,
    #[arg(long, default_value_t = 1200)]
    height: u32,
}

/// Vertical line drawn across every panel.
struct Marker {
    time_s: f64,
    label: &'static str,
    color: RGBColor,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let records = trajectory::read_csv(File::open(&cli.input)?)?;
    if records.len() < 2 {
        return Err(anyhow::anyhow!(
            "trajectory CSV needs at least two rows, found {}",
            records.len()
        ));
    }
    let summary = match &cli.summary {
        Some(path) => Some(read_flight_summary(File::open(path)?)?),
        None => None,
    };

    if let Some(parent) = cli.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let title_font = FontDesc::new(font_family, 26.0, FontStyle::Bold);
    let caption_font = FontDesc::new(font_family, 20.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 15.0, FontStyle::Normal);

    let title = match &summary {
        Some(s) => match &s.rocket {
            Some(rocket) => format!("{rocket} on {}", s.motor),
            None => format!("Flight on {}", s.motor),
        },
        None => "Flight profile".to_string(),
    };
    let stamp = Local::now().format("%Y-%m-%d %H:%M");
    let root = root.titled(&format!("{title}  ({stamp})"), title_font)?;

    let markers = markers(&records, summary.as_ref());
    let panels = root.split_evenly((3, 1));
    let series: [(&str, &str, fn(&Record) -> f64, RGBColor); 3] = [
        ("Altitude", "m", |r| r.altitude_m, RGBColor(30, 90, 180)),
        ("Velocity", "m/s", |r| r.velocity_m_s, RGBColor(20, 140, 60)),
        (
            "Acceleration",
            "m/s²",
            |r| r.acceleration_m_s2,
            RGBColor(200, 60, 40),
        ),
    ];
    for (panel, (name, unit, value, color)) in panels.iter().zip(series) {
        draw_panel(
            panel,
            &records,
            name,
            unit,
            value,
            color,
            &markers,
            &caption_font,
            &label_font,
        )?;
    }

    root.present()?;
    info!(output = %cli.output.display(), rows = records.len(), "flight chart written");
    Ok(())
}

fn markers(records: &[Record], summary: Option<&FlightSummary>) -> Vec<Marker> {
    let mut markers = Vec::new();
    if let Some(last_powered) = records.iter().rev().find(|r| r.phase == "powered") {
        markers.push(Marker {
            time_s: last_powered.time_s,
            label: "burnout",
            color: RGBColor(230, 120, 0),
        });
    }
    let apogee = records
        .iter()
        .fold(None::<&Record>, |best, r| match best {
            Some(b) if b.altitude_m >= r.altitude_m => Some(b),
            _ => Some(r),
        });
    if let Some(apogee) = apogee
        && apogee.altitude_m > 0.0
    {
        markers.push(Marker {
            time_s: apogee.time_s,
            label: "apogee",
            color: RGBColor(150, 30, 160),
        });
    }
    if let Some(deploy) = summary.and_then(|s| s.deploy_time_s) {
        markers.push(Marker {
            time_s: deploy,
            label: "deploy",
            color: RGBColor(90, 90, 90),
        });
    }
    if let Some(summary) = summary {
        markers.push(Marker {
            time_s: summary.touchdown_time_s,
            label: "touchdown",
            color: RGBColor(20, 120, 60),
        });
    }
    markers
}

#[allow(clippy::too_many_arguments)]
fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    records: &[Record],
    name: &str,
    unit: &str,
    value: fn(&Record) -> f64,
    color: RGBColor,
    markers: &[Marker],
    caption_font: &FontDesc<'_>,
    label_font: &FontDesc<'_>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let t_max = records.last().map(|r| r.time_s).unwrap_or(1.0).max(1e-6);
    let (mut lo, mut hi) = records
        .iter()
        .map(value)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = (hi - lo) * 0.05;
    let (lo, hi) = (lo - pad, hi + pad);

    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .caption(name, caption_font.clone())
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..t_max, lo..hi)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc(format!("{name} ({unit})"))
        .label_style(label_font.clone())
        .axis_desc_style(label_font.clone())
        .x_labels(8)
        .y_labels(6)
        .draw()?;

    chart.draw_series(LineSeries::new(
        records.iter().map(|r| (r.time_s, value(r))),
        ShapeStyle::from(&color).stroke_width(2),
    ))?;

    for marker in markers {
        chart.draw_series(DashedLineSeries::new(
            vec![(marker.time_s, lo), (marker.time_s, hi)],
            6,
            4,
            ShapeStyle::from(&marker.color).stroke_width(1),
        ))?;
        chart.draw_series(std::iter::once(Text::new(
            marker.label,
            (marker.time_s + t_max * 0.005, hi - (hi - lo) * 0.08),
            label_font.clone().color(&marker.color),
        )))?;
    }
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time_s: f64, altitude_m: f64, phase: &str) -> Record {
        Record {
            time_s,
            altitude_m,
            velocity_m_s: 0.0,
            acceleration_m_s2: 0.0,
            phase: phase.to_string(),
        }
    }

    fn summary() -> FlightSummary {
        FlightSummary {
            rocket: None,
            motor_id: "Estes_C6.eng".into(),
            motor: "Estes Industries C6".into(),
            mass_kg: 0.1,
            parachute_diameter_m: 0.3,
            placeholder_parachute: false,
            burnout_time_s: 1.0,
            apogee_time_s: 2.0,
            apogee_altitude_m: 40.0,
            deploy_time_s: Some(4.0),
            touchdown_time_s: 9.5,
            max_velocity_m_s: 30.0,
            max_acceleration_m_s2: 60.0,
            landing_velocity_m_s: -4.0,
            events: Vec::new(),
        }
    }

    #[test]
    fn summary_adds_deploy_and_touchdown_markers() {
        let records = [
            record(0.0, 0.0, "powered"),
            record(1.0, 10.0, "powered"),
            record(2.0, 40.0, "coast"),
            record(9.5, 0.0, "parachute"),
        ];

        let bare: Vec<&str> = markers(&records, None).iter().map(|m| m.label).collect();
        assert_eq!(bare, ["burnout", "apogee"]);

        let annotated = markers(&records, Some(&summary()));
        let labels: Vec<(&str, f64)> = annotated.iter().map(|m| (m.label, m.time_s)).collect();
        assert_eq!(
            labels,
            [("burnout", 1.0), ("apogee", 2.0), ("deploy", 4.0), ("touchdown", 9.5)]
        );
    }
}
