use chrono::Local;
use clap::Parser;
use plotters::prelude::*;
use rocketry_calculator::export::thrust;
use rocketry_calculator::init_tracing;
use rocketry_calculator::motors::Metrics;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a thrust curve from CSV with its average-thrust line"
)]
struct Cli {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/thrust.png")]
    output: PathBuf,
    /// Chart title, e.g. the motor name
    #[arg(long, default_value = "Thrust curve")]
    title: String,
    #[arg(long, default_value_t = 1000)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let samples = thrust::read_csv(File::open(&cli.input)?)?;
    if samples.len() < 2 {
        return Err(anyhow::anyhow!(
            "thrust CSV needs at least two rows, found {}",
            samples.len()
        ));
    }
    let metrics = Metrics::compute(&samples);
    let t_max = samples
        .iter()
        .map(|s| s.time_s)
        .fold(0.0_f64, f64::max)
        .max(1e-6);
    let peak = samples
        .iter()
        .map(|s| s.thrust_n)
        .fold(0.0_f64, f64::max)
        .max(1e-6);

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
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 16.0, FontStyle::Normal);

    let caption = format!(
        "{}  ({})",
        cli.title,
        Local::now().format("%Y-%m-%d %H:%M")
    );
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, caption_font)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..t_max * 1.05, 0.0..peak * 1.15)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Thrust (N)")
        .label_style(label_font.clone())
        .axis_desc_style(label_font.clone())
        .x_labels(8)
        .y_labels(6)
        .draw()?;

    let curve_color = RGBColor(200, 60, 40);
    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.time_s, s.thrust_n)),
            ShapeStyle::from(&curve_color).stroke_width(2),
        ))?
        .label("thrust")
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], curve_color.stroke_width(2))
        });

    let average_color = RGBColor(30, 90, 180);
    let average = metrics.average_thrust_n;
    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, average), (t_max, average)],
            8,
            5,
            ShapeStyle::from(&average_color).stroke_width(2),
        ))?
        .label(format!("average {average:.2} N"))
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], average_color.stroke_width(2))
        });

    chart.draw_series(std::iter::once(Text::new(
        format!(
            "impulse {:.2} N·s   burn {:.2} s",
            metrics.impulse_ns, metrics.burn_time_s
        ),
        (t_max * 0.45, peak * 1.08),
        label_font.clone(),
    )))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(label_font)
        .draw()?;

    root.present()?;
    info!(output = %cli.output.display(), samples = samples.len(), "thrust chart written");
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
