use anyhow::Context;
use clap::Parser;
use rain_radar::core_modules::utils::image_helper::image_helper;
use rain_radar::pipeline::{PaletteSource, RadarConfig, RainRadar};
use rain_radar::{Position, RadarImage, RainPalette, RainReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Report the distance to the nearest rain in each quadrant around a pixel of a
/// rainfall radar image.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Radar image to read.
    image: PathBuf,

    /// Column of the query pixel (0 is the left edge).
    x: i64,

    /// Row of the query pixel (0 is the top edge).
    y: i64,

    /// JSON config file with a palette and search settings.
    #[arg(long, env = "RAIN_RADAR_CONFIG")]
    config: Option<PathBuf>,

    /// Built-in palette name, overriding the config.
    #[arg(long, conflicts_with = "palette_file")]
    palette: Option<String>,

    /// JSON palette definition, overriding the config.
    #[arg(long)]
    palette_file: Option<PathBuf>,

    /// Furthest ring to search, in pixels.
    #[arg(long)]
    max_distance: Option<u32>,

    /// Write a copy of the image with the query and hits marked.
    #[arg(long)]
    annotate: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    // --- 1. Argument Parsing & Setup ---
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => RadarConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => RadarConfig::default(),
    };
    if let Some(name) = &args.palette {
        config.palette = PaletteSource::Named(name.clone());
    }
    if let Some(path) = &args.palette_file {
        let palette = RainPalette::from_file(path)
            .with_context(|| format!("reading palette {}", path.display()))?;
        config.palette = PaletteSource::Inline(palette.to_definition());
    }
    if args.max_distance.is_some() {
        config.locator.max_distance = args.max_distance;
    }
    let radar = RainRadar::new(config)?;

    // --- 2. Image Loading ---
    let image = RadarImage::open(&args.image)
        .with_context(|| format!("opening radar image {}", args.image.display()))?;

    // --- 3. Query ---
    let position = Position::new(args.x, args.y);
    let report = radar.nearest_rain_in(position, &image)?;
    print_report(&report, radar.palette().name());

    // --- 4. Optional Visualization ---
    if let Some(path) = &args.annotate {
        image_helper::save_png(path, &image_helper::annotate(&image, &report))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Annotated image saved to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &RainReport, palette: &str) {
    println!("Nearest rain around {} ({} palette):", report.center(), palette);
    if report.raining_at_center() {
        println!("  raining at this position");
    }
    for (quadrant, hit) in report.hits() {
        match hit {
            Some(hit) => {
                let rate = hit
                    .rate_mm_per_hour
                    .map(|rate| format!(", {rate} mm/h"))
                    .unwrap_or_default();
                println!("  {quadrant}: {} px at {}{rate}", hit.distance, hit.position);
            }
            None => println!("  {quadrant}: no rain found"),
        }
    }
}
