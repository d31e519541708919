//! touchsynth - play one composite voice from the terminal
//!
//! Run with: cargo run -- --patch my_patch.yaml

mod app;
mod config;
mod ui;

use clap::Parser;

use config::Args;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let patch = config::load_patch(args.patch.as_deref())?;

    app::run(patch, &args)
}
