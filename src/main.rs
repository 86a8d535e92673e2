//! Binary entry point for the arcade portfolio.

use atrium::prelude::*;
use atrium::init_logging;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

/// A portfolio presented as a top-down arcade game
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .add_plugins((
            LayoutPlugin,
            TweenPlugin,
            AtriumMapPlugin,
            PlayerPlugin,
            HintsPlugin,
            SectionsPlugin,
            CameraDirectorPlugin,
            OrbsPlugin,
            OverlayPlugin,
        ))
        .run();
    Ok(())
}
