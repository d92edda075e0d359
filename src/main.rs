mod demo;
mod report;

use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use log::{debug, info, LevelFilter};

use demo::build_demo_deck;
use grillagex::{run, PipelineConfig};
use report::render_summary;

/// Build SFD and BMD output for the demonstration grillage deck.
#[derive(Debug, Parser)]
#[command(name = "grillagex", version, about)]
struct Args {
    /// TOML file with pipeline options.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the renderer payload as JSON instead of the text summary.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'info' instead.",
            args.log_level
        );
        LevelFilter::Info
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(args:?; "Parsed arguments");

    let config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };

    // The deck stands in for a loader: five girders, nine bays each, with dead
    // and live load results already attached to every element end.
    let deck = build_demo_deck()?;
    let output = run(&deck.model, &deck.forces, &config)?;

    if args.json {
        println!("{}", output.to_json()?);
    } else {
        println!("{}", render_summary(&output));
    }

    info!("Completed successfully");
    Ok(())
}
