use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use metronav::{CanvasSize, Caption, DetailLevel, Navigator, NavigatorConfig, Point, SourceNode};

/// Lay out bounded document trees as metro maps.
#[derive(Parser)]
#[command(name = "metronav")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Navigator configuration (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, global = true, default_value = "800")]
    width: f32,

    /// Canvas height in pixels
    #[arg(long, global = true, default_value = "600")]
    height: f32,
}

#[derive(Subcommand)]
enum Commands {
    /// Print station positions for a source tree
    Layout {
        /// Source tree as JSON
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print the stations and captions visible for a view
    Frame {
        /// Source tree as JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Zoom factor, clamped into range
        #[arg(short, long)]
        zoom: Option<f32>,

        /// Station to select and centre on
        #[arg(short, long)]
        select: Option<String>,

        /// Fit the whole graph into the canvas first
        #[arg(long)]
        fit: bool,
    },
}

#[derive(Serialize)]
struct StationOutput {
    id: String,
    depth: u8,
    x: f32,
    y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<Caption>,
}

#[derive(Serialize)]
struct LayoutOutput {
    generation: u64,
    stations: Vec<StationOutput>,
}

#[derive(Serialize)]
struct FrameOutput {
    zoom: f32,
    center: Point,
    detail: DetailLevel,
    total_stations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<String>,
    stations: Vec<StationOutput>,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<NavigatorConfig> {
    let Some(path) = path else {
        return Ok(NavigatorConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => NavigatorConfig::from_json(&text)?,
        _ => NavigatorConfig::from_yaml(&text)?,
    };
    Ok(config)
}

fn load_navigator(cli: &Cli, input: &Path) -> anyhow::Result<Navigator> {
    let config = load_config(cli.config.as_deref())?;
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading source tree {}", input.display()))?;
    let source = SourceNode::from_json(&text)
        .with_context(|| format!("parsing source tree {}", input.display()))?;

    let mut navigator = Navigator::new(config, CanvasSize::new(cli.width, cli.height));
    navigator.rebuild(Some(&source));
    Ok(navigator)
}

fn layout(cli: &Cli, input: &Path) -> anyhow::Result<String> {
    let navigator = load_navigator(cli, input)?;
    let graph = navigator.graph();
    let stations = graph
        .nodes()
        .iter()
        .filter_map(|node| {
            let p = node.position?;
            Some(StationOutput {
                id: node.id.clone(),
                depth: node.depth,
                x: p.x,
                y: p.y,
                caption: None,
            })
        })
        .collect();

    let output = LayoutOutput {
        generation: graph.generation(),
        stations,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn frame(
    cli: &Cli,
    input: &Path,
    zoom: Option<f32>,
    select: Option<&str>,
    fit: bool,
) -> anyhow::Result<String> {
    let mut navigator = load_navigator(cli, input)?;
    if fit {
        navigator.push_event(metronav::InteractionEvent::FitToView);
        navigator.tick();
    }
    if let Some(id) = select {
        if navigator.sync_with_editor(id).is_none() {
            anyhow::bail!("no station matches '{id}'");
        }
    }
    if let Some(zoom) = zoom {
        let center = navigator.transform().center;
        navigator.set_transform(zoom, center);
    }

    let frame = navigator.frame();
    let output = FrameOutput {
        zoom: frame.transform.zoom(),
        center: frame.transform.center,
        detail: frame.detail,
        total_stations: frame.total_stations,
        selected: navigator.selected_id().map(str::to_string),
        stations: frame
            .stations
            .into_iter()
            .map(|s| StationOutput {
                id: s.id,
                depth: s.depth,
                x: s.position.x,
                y: s.position.y,
                caption: Some(s.caption),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = match &cli.command {
        Commands::Layout { input } => layout(&cli, input)?,
        Commands::Frame {
            input,
            zoom,
            select,
            fit,
        } => frame(&cli, input, *zoom, select.as_deref(), *fit)?,
    };
    println!("{json}");

    Ok(())
}
