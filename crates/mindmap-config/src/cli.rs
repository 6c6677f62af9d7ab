//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Journal mindmap command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "mindmap", about = "Journal mindmap visibility/LOD driver")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Processed entries JSON to load.
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    pub frames: u32,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Distance beyond which the frustum test decides visibility.
    #[arg(long)]
    pub culling_distance: Option<f32>,

    /// Recompute culling and LOD every N frames.
    #[arg(long)]
    pub update_every: Option<u32>,

    /// Start with the optimizer disabled.
    #[arg(long)]
    pub disable_optimizer: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.dataset {
            self.scene.dataset_path = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(distance) = args.culling_distance {
            self.optimizer.culling_distance = distance;
        }
        if let Some(every) = args.update_every {
            self.optimizer.update_every_n_frames = every;
        }
    }
}
