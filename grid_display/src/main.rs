// main.rs - Conway's Game of Life window on top of the conway canvas bridge

use anyhow::{Context as _, anyhow, bail, ensure};
use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use conway::{AnimationController, Canvas, ViewConfig};
use universe::{PATTERNS, Pattern, Universe};

mod scheduler;
mod ui;

use scheduler::RepaintScheduler;
use ui::{Controller, LifeApp};

#[derive(Parser, Debug)]
#[command(about = "Conway's Game of Life drawn on an egui canvas")]
struct Args {
    /// grid width in cells
    #[arg(long, default_value_t = universe::DEFAULT_WIDTH)]
    width: u32,

    /// grid height in cells
    #[arg(long, default_value_t = universe::DEFAULT_HEIGHT)]
    height: u32,

    /// inner cell size in canvas pixels
    #[arg(long, default_value_t = conway::config::CELL_SIZE)]
    cell_size: u32,

    /// display scale applied to the canvas image
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,

    /// seed for the Reset button's random fill
    #[arg(long)]
    seed: Option<u64>,

    /// start from a named pattern instead of the default fill
    #[arg(long)]
    pattern: Option<String>,

    /// start paused
    #[arg(long, default_value_t = false)]
    paused: bool,
}

fn build_controller(args: &Args) -> anyhow::Result<Controller> {
    ensure!(args.zoom.is_finite() && args.zoom > 0.0, "--zoom must be a positive number");

    let config = ViewConfig::default().with_cell_size(args.cell_size);
    config.validate()?;

    let mut universe = Universe::with_classic_seed(args.width, args.height)?;
    if let Some(seed) = args.seed {
        universe = universe.with_seed(seed);
    }
    if let Some(name) = &args.pattern {
        let Some(pattern) = Pattern::find(name) else {
            let known: Vec<_> = PATTERNS.iter().map(|pattern| pattern.name).collect();
            bail!("unknown pattern {name:?}, expected one of: {}", known.join(", "));
        };
        universe.load_pattern(pattern);
    }

    let controller = AnimationController::new(universe, RepaintScheduler::default(), config)
        .context("initial draw failed")?;
    Ok(controller)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let controller = build_controller(&args)?;

    let (canvas_width, canvas_height) = controller.canvas().size();
    tracing::info!(
        width = args.width,
        height = args.height,
        canvas_width,
        canvas_height,
        zoom = args.zoom,
        "starting"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([
            (canvas_width as f32 * args.zoom + 40.0).max(640.0),
            canvas_height as f32 * args.zoom + 220.0,
        ]),
        ..Default::default()
    };

    let (zoom, autoplay) = (args.zoom, !args.paused);
    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |cc| Box::new(LifeApp::new(cc, controller, zoom, autoplay))),
    )
    .map_err(|err| anyhow!("window failed: {err}"))
}
