//! LoadDesk CLI - record directory and map overlay inspection

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use loaddesk_core::map::{
    EngineCall, FixedWaypoints, HeadlessEngine, LayerPaint, MapComposer, MapConfig, RouteOverlay,
    SourceSpec,
};
use loaddesk_core::source::{self, TabularSource, DEFAULT_SOURCE};
use loaddesk_core::{Directory, Keyed, LonLat};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "loaddesk")]
#[command(author, version, about = "Freight load-draft dashboard tooling", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the driver/carrier feed and print the deduplicated selection lists
    Directory {
        /// CSV file path or http(s) URL
        #[arg(short, long, default_value = DEFAULT_SOURCE)]
        source: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Compose the map against a recording engine and print the engine calls
    Plan {
        /// JSON map configuration (see `loaddesk config`)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Route origin as "lon,lat"
        #[arg(long, requires = "destination", allow_hyphen_values = true)]
        origin: Option<LonLat>,
        /// Route destination as "lon,lat"
        #[arg(long, requires = "origin", allow_hyphen_values = true)]
        destination: Option<LonLat>,
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print the default map configuration as JSON
    Config,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_config(path: Option<&PathBuf>) -> Result<MapConfig> {
    match path {
        Some(path) => MapConfig::from_json_file(path)
            .with_context(|| format!("Failed to load map config {}", path.display())),
        None => Ok(MapConfig::default()),
    }
}

fn print_directory(dir: &Directory) {
    println!("Carriers ({}):", dir.carriers.len());
    for carrier in &dir.carriers {
        println!("  {:<12} {}", carrier.key(), carrier.label());
    }
    println!("Drivers ({}):", dir.drivers.len());
    for driver in &dir.drivers {
        println!("  {:<12} {}", driver.key(), driver.label());
    }
}

fn describe_call(call: &EngineCall) -> String {
    match call {
        EngineCall::Create {
            viewport,
            container,
            options,
        } => format!(
            "[{}] create in '{}': style={} center=({:.4}, {:.4}) zoom={} min_zoom={} bounds={:?}",
            viewport,
            container,
            options.style,
            options.center.lon,
            options.center.lat,
            options.zoom,
            options.min_zoom,
            options.bounds.to_array(),
        ),
        EngineCall::AddSource { viewport, id, source } => match source {
            SourceSpec::Vector { url } => format!("[{}] source {} (vector {})", viewport, id, url),
            SourceSpec::GeoJson { .. } => format!("[{}] source {} (geojson)", viewport, id),
        },
        EngineCall::AddLayer { viewport, layer } => match &layer.paint {
            LayerPaint::Fill { color, opacity } => format!(
                "[{}] layer {} on {}: fill {} @ {}",
                viewport, layer.id, layer.source, color, opacity
            ),
            LayerPaint::Line { color, width, .. } => format!(
                "[{}] layer {} on {}: line {} x{}",
                viewport, layer.id, layer.source, color, width
            ),
        },
        EngineCall::AddMarker { viewport, marker } => format!(
            "[{}] marker {:?} at ({:.4}, {:.4})",
            viewport, marker.role, marker.position.lon, marker.position.lat
        ),
        EngineCall::Remove { viewport } => format!("[{}] remove", viewport),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Directory ────────────────────────────────────────────────
        Commands::Directory {
            source: location,
            json,
        } => {
            let src = TabularSource::from_str_or_url(&location);
            let start = Instant::now();
            let pb = spinner(&format!("Loading {}...", src));
            let dir = source::blocking::load_directory(&src);
            pb.finish_and_clear();
            info!("Loaded directory in {:.2?}", start.elapsed());

            if json {
                println!("{}", serde_json::to_string_pretty(&dir)?);
            } else {
                print_directory(&dir);
            }
        }

        // ── Plan ─────────────────────────────────────────────────────
        Commands::Plan {
            config,
            origin,
            destination,
            json,
        } => {
            let config = load_config(config.as_ref())?;
            let route = match (origin, destination) {
                (Some(o), Some(d)) => RouteOverlay::new(o, d),
                _ => RouteOverlay::sample(),
            };

            let engine = HeadlessEngine::new();
            let composer =
                MapComposer::with_waypoints(engine.clone(), config, FixedWaypoints(route));
            let mut handle = composer
                .initialize(Some("map"))
                .context("Failed to initialize viewport")?;
            futures::executor::block_on(composer.compose(&mut handle))
                .context("Failed to compose overlays")?;
            composer.teardown(&mut handle);

            let calls = engine.calls();
            if json {
                println!("{}", serde_json::to_string_pretty(&calls)?);
            } else {
                for call in &calls {
                    println!("{}", describe_call(call));
                }
            }
        }

        // ── Config ───────────────────────────────────────────────────
        Commands::Config => {
            println!("{}", MapConfig::default().to_json_pretty()?);
        }
    }

    Ok(())
}
