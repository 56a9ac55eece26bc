//! Task map marker tool
//!
//! Reads task/cluster markers from a CSV file, lays them out for one viewport
//! (consolidating clusters and spidering any clicked overlapping group) and
//! writes the resulting render list as CSV.

use anyhow::{Context, Result, bail};
use clap::Parser;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use task_map_markers::markers::{
    BBox, ClickIntent, GeneratorConfig, LinearProjection, MarkerGenerator, MarkerId,
    MarkerRecord, PixelSize, Point, RenderFrame, ViewCommand, ViewportMetrics,
};


#[derive(Parser)]
#[command(name = "task_map_markers")]
#[command(about = "Consolidate and spiderfy task map markers", long_about = None)]
struct Args {
    /// Input CSV: id,lat,lng[,points,west,south,east,north[,status]]
    #[arg(short, long, default_value = "tasks.csv")]
    input: PathBuf,

    /// Output CSV with the render list (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output CSV with spider leader lines
    #[arg(long)]
    leader_lines: Option<PathBuf>,

    /// Visible bounds as west,south,east,north
    #[arg(short, long, value_parser = parse_bounds)]
    bounds: BBox,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1024.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 768.0)]
    height: f64,

    /// Map zoom level
    #[arg(short, long, default_value_t = 10.0)]
    zoom: f64,

    /// Marker icon size in pixels
    #[arg(long, default_value_t = 40.0)]
    icon_size: f64,

    /// Task count above which clusters are consolidated
    #[arg(long, default_value_t = 25)]
    cluster_threshold: usize,

    /// Total task count behind the view (default: sum of input points)
    #[arg(long, default_value_t = 0)]
    total_tasks: usize,

    /// Never consolidate clusters
    #[arg(long)]
    no_clusters: bool,

    /// Never spider overlapping markers
    #[arg(long)]
    no_spider: bool,

    /// Use monochromatic icons
    #[arg(long)]
    monochrome: bool,

    /// Marker ids to click, in order
    #[arg(short, long)]
    click: Vec<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: &Args) -> Result<()> {
    let tasks = read_tasks(&args.input)?;
    if tasks.is_empty() {
        bail!("no markers found in {:?}", args.input);
    }
    info!(count = tasks.len(), input = ?args.input, "read markers");

    let metrics = ViewportMetrics::new(
        args.bounds,
        PixelSize {
            x: args.width,
            y: args.height,
        },
        args.zoom,
    );
    if !metrics.is_renderable() {
        bail!("viewport has no area: {:?}", metrics);
    }

    let frame = generate(&config_from_args(args), metrics, tasks, &args.click);
    info!(markers = frame.markers.len(), "render list ready");

    match &args.output {
        None => write_render_list(io::stdout().lock(), &frame)?,
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
            write_render_list(file, &frame)?;
        }
    }

    if let Some(path) = &args.leader_lines {
        let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
        write_leader_lines(file, &frame)?;
    }

    Ok(())
}

fn config_from_args(args: &Args) -> GeneratorConfig {
    GeneratorConfig {
        icon_size_px: args.icon_size,
        spider_enabled: !args.no_spider,
        show_as_clusters: !args.no_clusters,
        cluster_display_threshold: args.cluster_threshold,
        total_task_count: args.total_tasks,
        monochromatic_icons: args.monochrome,
    }
}

/// Runs one viewport and a sequence of clicks through the generator
fn generate(
    config: &GeneratorConfig,
    metrics: ViewportMetrics,
    tasks: Vec<MarkerRecord>,
    clicks: &[String],
) -> RenderFrame {
    let mut generator = MarkerGenerator::new(config.clone());
    generator.on_viewport_changed(metrics);
    if let Some(ViewCommand::FitBounds(bbox)) = generator.on_data_changed(tasks) {
        info!(?bbox, "initial load would fit bounds");
    }

    let projection = LinearProjection::new(&metrics);
    for id in clicks {
        match generator.on_marker_clicked(&MarkerId::new(id.as_str()), &projection) {
            Some(ViewCommand::FitBounds(bbox)) => info!(%id, ?bbox, "click fits bounds"),
            Some(ViewCommand::SelectTask(task)) => info!(%task, "click selects task"),
            None => info!(%id, spidered = generator.spider_state().len(), "click handled"),
        }
    }

    generator.render()
}

fn parse_bounds(s: &str) -> Result<BBox, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid bounds {s:?}: {e}"))?;
    match parts.as_slice() {
        [west, south, east, north] => Ok(BBox::new(*west, *south, *east, *north)),
        _ => Err(format!("bounds need 4 values (west,south,east,north), got {s:?}")),
    }
}

/// Reads markers from a CSV file
///
/// Expected format: `id,lat,lng` for single tasks, or
/// `id,lat,lng,points,west,south,east,north` for clusters, with an optional
/// trailing status column. The header row is optional.
fn read_tasks(filename: &Path) -> Result<Vec<MarkerRecord>> {
    let file = File::open(filename).with_context(|| format!("opening {:?}", filename))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.with_context(|| format!("reading {:?}", filename))?;
        records.push(record.iter().map(|s| s.trim().to_string()).collect::<Vec<_>>());
    }

    // header row has a non-numeric latitude
    let has_header = records
        .first()
        .is_some_and(|r| r.get(1).is_none_or(|lat| lat.parse::<f64>().is_err()));
    let start_idx = if has_header { 1 } else { 0 };

    let mut tasks = Vec::new();
    for (line, record) in records.iter().enumerate().skip(start_idx) {
        match parse_task(record) {
            Some(task) => tasks.push(task),
            None => warn!(line = line + 1, "skipping malformed marker row"),
        }
    }

    Ok(tasks)
}

fn parse_task(record: &[String]) -> Option<MarkerRecord> {
    if record.len() < 3 {
        return None;
    }
    let lat = record[1].parse::<f64>().ok()?;
    let lng = record[2].parse::<f64>().ok()?;

    let mut task = MarkerRecord::task(record[0].as_str(), Point::new(lat, lng));

    if record.len() >= 8 {
        task.number_of_points = record[3].parse::<usize>().ok()?;
        let coords: Vec<f64> = record[4..8]
            .iter()
            .map(|v| v.parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        if task.number_of_points > 1 {
            let bbox = BBox::new(coords[0], coords[1], coords[2], coords[3]);
            task.bounding_geometry = Some(bbox.to_polygon());
        }
    }

    let status = match record.len() {
        4 => record.get(3),
        n if n > 8 => record.get(8),
        _ => None,
    };
    if let Some(status) = status.filter(|s| !s.is_empty()) {
        task = task.with_status(status.as_str());
    }

    Some(task)
}

fn click_label(intent: &ClickIntent) -> String {
    match intent {
        ClickIntent::SelectTask(id) => format!("select:{id}"),
        ClickIntent::Spiderfy(id) => format!("spiderfy:{id}"),
        ClickIntent::FitBounds(b) => {
            format!("fit:{};{};{};{}", b.west, b.south, b.east, b.north)
        }
        ClickIntent::Ignore => String::new(),
    }
}

/// Writes the render list as CSV
///
/// Columns: `id,lat,lng,icon,overlapping_count,interactive,click`
fn write_render_list<W: Write>(out: W, frame: &RenderFrame) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record([
        "id",
        "lat",
        "lng",
        "icon",
        "overlapping_count",
        "interactive",
        "click",
    ])?;

    for marker in &frame.markers {
        writer.write_record([
            marker.id.to_string(),
            marker.position.lat.to_string(),
            marker.position.lng.to_string(),
            marker.icon.to_string(),
            marker.overlapping_count.to_string(),
            marker.interactive.to_string(),
            click_label(&marker.on_click),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes spider leader lines as CSV: `id,from_lat,from_lng,to_lat,to_lng`
fn write_leader_lines<W: Write>(out: W, frame: &RenderFrame) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(["id", "from_lat", "from_lng", "to_lat", "to_lng"])?;

    for line in &frame.leader_lines {
        writer.write_record([
            line.id.to_string(),
            line.from.lat.to_string(),
            line.from.lng.to_string(),
            line.to.lat.to_string(),
            line.to.lng.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
