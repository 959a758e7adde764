//! Application entry point for the leaf venation viewer.
//!
//! This binary parses command-line options, installs the tracing
//! subscriber, builds the initial [`SimulationContext`] and hands it to
//! [`Viewer`], which owns everything interactive.

mod viewer;

use std::{error::Error, fs, path::PathBuf};

use clap::Parser;
use venation_core::{config::SceneConfig, shapes::BoundaryShape, simulation::SimulationContext};
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(name = "venation-view", about = "Grow leaf venation patterns interactively")]
struct Args {
    /// JSON scene configuration; missing fields fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the RNG seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Initial boundary shape: 1 triangle, 2 square, 3 circle, 4 leaf.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=4))]
    shape: u32,

    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn load_config(args: &Args) -> Result<SceneConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {e}", path.display()))?;
            serde_json::from_str::<SceneConfig>(&text)
                .map_err(|e| format!("parsing {}: {e}", path.display()))?
        }
        None => SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the configuration cannot be loaded, the first scene cannot be
///   built, or eframe fails to create the window.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .init();

    let config = load_config(&args)?;
    let shape = BoundaryShape::from_digit(args.shape).unwrap_or_default();
    let sim = SimulationContext::new(config, shape)?;

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Leaf Venation",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(sim)))),
    )?;
    Ok(())
}
