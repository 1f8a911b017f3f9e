//=========================================================================
// Stellar Folio Binary
//
// Loads the content document, optional tuning overrides, and runs the
// engine until the window closes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

//=== Internal Dependencies ===============================================

use stellar_folio::core::config::{ContentConfig, WorldSettings};
use stellar_folio::EngineBuilder;

//=== Arguments ===========================================================

#[derive(Parser, Debug)]
#[command(version, about = "Fly between orbiting bodies and land on them")]
struct Args {
    /// Content document describing the sun and the bodies
    #[arg(default_value = "content.json")]
    content: PathBuf,

    /// JSON file overriding world tuning values
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Capacity of the platform → world event channel
    #[arg(long, default_value_t = 128)]
    channel_capacity: usize,
}

//=== Entry Point =========================================================

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    info!("Starting Stellar Folio with {}", args.content.display());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let content = ContentConfig::load(&args.content)?;
    let settings = match &args.settings {
        Some(path) => WorldSettings::load(path)?,
        None => WorldSettings::default(),
    };

    EngineBuilder::new()
        .with_settings(settings)
        .with_channel_capacity(args.channel_capacity.max(1))
        .build(content)?
        .run()?;
    Ok(())
}
