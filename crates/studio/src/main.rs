//! Chart Studio - headless chart rendering host
//!
//! Parses a data file, renders it through an animated chart session driven
//! by a manual frame scheduler, and writes the settled frame as SVG (plus,
//! optionally, the canvas display list as JSON).
//!
//! Usage: chart-studio <data-file> [--config <settings.json>] [--format csv|manual|json|xlsx]
//!        [--chart line|bar|bar3d|pie] [--out <file.svg>]

mod settings;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use charts::{CanvasSurface, ChartKind, ChartSession, ManualScheduler, RenderRequest};
use settings::StudioSettings;
use table_model::TableFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default)]
struct Args {
    data: PathBuf,
    config: Option<PathBuf>,
    format: Option<TableFormat>,
    chart: Option<ChartKind>,
    out: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut data = None;
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().with_context(|| format!("{} needs a value", flag));
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--out" => parsed.out = Some(PathBuf::from(value("--out")?)),
            "--format" => {
                let v = value("--format")?;
                parsed.format = Some(
                    serde_json::from_value(serde_json::Value::String(v.clone()))
                        .with_context(|| format!("unknown format {:?}", v))?,
                );
            }
            "--chart" => {
                let v = value("--chart")?;
                parsed.chart = Some(
                    serde_json::from_value(serde_json::Value::String(v.clone()))
                        .with_context(|| format!("unknown chart kind {:?}", v))?,
                );
            }
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            path => {
                if data.replace(PathBuf::from(path)).is_some() {
                    bail!("only one data file may be given");
                }
            }
        }
    }
    parsed.data = data.context("missing data file argument")?;
    Ok(parsed)
}

fn detect_format(path: &Path) -> anyhow::Result<TableFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(TableFormat::from_extension)
        .with_context(|| format!("cannot tell the format of {}; pass --format", path.display()))
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut settings = match &args.config {
        Some(path) => StudioSettings::load(path)?,
        None => StudioSettings::default(),
    };
    if let Some(kind) = args.chart {
        settings.chart = kind;
    }
    if let Some(out) = args.out {
        settings.output.svg = out;
    }

    let format = match args.format {
        Some(format) => format,
        None => detect_format(&args.data)?,
    };
    let raw = std::fs::read(&args.data).with_context(|| format!("reading {}", args.data.display()))?;
    let table = table_model::parse(&raw, format)
        .with_context(|| format!("parsing {}", args.data.display()))?;
    tracing::info!(
        categories = table.category_count(),
        series = table.series_count(),
        "Loaded {}",
        args.data.display()
    );

    let series = settings.series_config(&table)?;
    let options = settings.chart_options();
    let request = RenderRequest {
        kind: settings.chart,
        table: &table,
        labels: &settings.labels,
        series: &series,
        options: &options,
    };

    let canvas_settings = &settings.canvas;
    let mut canvas = CanvasSurface::new(
        canvas_settings.width,
        canvas_settings.height,
        canvas_settings.device_pixel_ratio,
    );
    let mut session = ChartSession::new(ManualScheduler::new());
    let report = session.render(&mut canvas, &request)?;
    if let Some(thickness) = report.corrected_thickness {
        tracing::info!("Bar thickness set to {:.0}", thickness);
    }

    let frames = session.run_until_idle(&mut canvas);
    tracing::info!(frames, kind = settings.chart.name(), "Animation settled");

    let svg = session.export_vector()?;
    std::fs::write(&settings.output.svg, svg)
        .with_context(|| format!("writing {}", settings.output.svg.display()))?;
    tracing::info!("Wrote {}", settings.output.svg.display());

    if let Some(path) = &settings.output.display_list {
        std::fs::write(path, canvas.to_json()?).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Chart Studio");

    let args = parse_args(std::env::args().skip(1))?;
    run(args)
}
