mod app;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use class_force::{DiagramConfig, load_diagram, sample_diagram};

/// Force-directed class diagram viewer.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1200.0)]
    width: f32,
    /// Canvas height in pixels.
    #[arg(long, default_value_t = 900.0)]
    height: f32,
    /// Container id to draw into.
    #[arg(long, default_value = app::CANVAS_CONTAINER)]
    container: String,
    /// JSON diagram to show instead of the built-in sample.
    #[arg(long)]
    input: Option<PathBuf>,
    /// JSON file overriding layout and geometry constants.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DiagramConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DiagramConfig::default(),
    };
    let data = match &args.input {
        Some(path) => load_diagram(path)
            .with_context(|| format!("loading diagram from {}", path.display()))?,
        None => sample_diagram(),
    };
    info!(
        classes = data.entities.len(),
        relations = data.relations.len(),
        "starting viewer"
    );

    let launch = app::Launch {
        container: args.container,
        width: args.width.max(1.0),
        height: args.height.max(1.0),
        data,
        config,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([launch.width + 24.0, launch.height + 64.0]),
        ..Default::default()
    };

    eframe::run_native(
        "class-force",
        options,
        Box::new(move |cc| Ok(Box::new(app::ClassDiagramApp::new(cc, launch)))),
    )
    .map_err(|err| anyhow!("viewer exited with an error: {err}"))
}
