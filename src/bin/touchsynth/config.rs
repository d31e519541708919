//! Command line and patch file loading

use std::{fs, path::Path, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

use touch_synth::patch::Patch;

/// Composite voice player with an attack/release envelope
#[derive(Parser, Debug)]
#[command(name = "touchsynth")]
#[command(about = "Play a composite synth voice from the terminal", long_about = None)]
pub struct Args {
    /// Patch file (YAML). Uses the built-in patch when omitted.
    #[arg(short = 'p', long = "patch")]
    pub patch: Option<PathBuf>,

    /// Starting pitch in Hz, overriding the patch
    #[arg(short = 'f', long = "frequency")]
    pub frequency: Option<f32>,

    /// Control/status queue capacity
    #[arg(long = "queue", default_value_t = 64)]
    pub queue_size: usize,
}

/// Load and validate a patch, or fall back to the default one.
pub fn load_patch(path: Option<&Path>) -> EyreResult<Patch> {
    let Some(path) = path else {
        log::info!("no patch file given, using the built-in patch");
        return Ok(Patch::default());
    };

    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read patch file: {}", path.display()))?;

    let patch: Patch = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("failed to parse YAML patch: {}", path.display()))?;

    patch
        .validate()
        .wrap_err_with(|| format!("invalid patch: {}", path.display()))?;

    log::info!("loaded patch `{}` from {}", patch.name, path.display());
    Ok(patch)
}
