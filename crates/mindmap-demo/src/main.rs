//! Headless driver for the journal mindmap visibility/LOD optimizer.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p mindmap-demo -- --dataset warhol_final.json` to load a
//! processed journal, or without `--dataset` to orbit a seeded synthetic map.

mod synthetic;

use std::f32::consts::TAU;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;
use mindmap_config::{CliArgs, Config, default_config_dir};
use mindmap_lod::OptimizerStats;
use mindmap_scene::{JournalEntry, MindmapScene, load_entries};
use tracing::{error, info, warn};

const SYNTHETIC_ENTRIES: usize = 1200;
const SYNTHETIC_SEED: u64 = 42;
/// Frames per full camera orbit.
const ORBIT_FRAMES: f32 = 720.0;

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    mindmap_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let entries = load_dataset(&config);
    let mut scene = match MindmapScene::build(entries, &config.scene, config.optimizer.clone()) {
        Ok(scene) => scene,
        Err(e) => {
            error!("Failed to build scene: {e}");
            std::process::exit(1);
        }
    };

    if args.disable_optimizer
        && let Err(e) = scene.set_optimizer_enabled(false)
    {
        warn!("Could not disable optimizer: {e}");
    }

    run(&mut scene, args.frames, config.debug.log_stats_every_n_frames);

    scene.dispose();
    info!("Done");
}

/// Processed entries from the configured path, or the synthetic map.
fn load_dataset(config: &Config) -> Vec<JournalEntry> {
    if let Some(path) = &config.scene.dataset_path {
        match load_entries(path) {
            Ok(entries) if !entries.is_empty() => return entries,
            Ok(_) => warn!("{} has no placeable entries", path.display()),
            Err(e) => warn!("Failed to load dataset: {e}"),
        }
    }
    info!("Using synthetic journal ({SYNTHETIC_ENTRIES} entries, seed {SYNTHETIC_SEED})");
    synthetic::generate(SYNTHETIC_ENTRIES, SYNTHETIC_SEED)
}

/// Orbit the camera around the map, selecting an entry for the middle third.
fn run(scene: &mut MindmapScene, frames: u32, log_every: u32) {
    let center = scene
        .items()
        .iter()
        .map(|item| item.position)
        .fold(Vec3::ZERO, |sum, p| sum + p)
        / scene.items().len().max(1) as f32;
    let start = scene.camera().position;
    let orbit_radius = Vec3::new(start.x - center.x, 0.0, start.z - center.z)
        .length()
        .max(1.0);
    let height = start.y;

    let select_at = frames / 3;
    let clear_at = 2 * frames / 3;
    let selected = scene.entries().first().map(|entry| entry.id.clone());

    for frame in 0..frames {
        let angle = frame as f32 / ORBIT_FRAMES * TAU;
        let camera = scene.camera_mut();
        camera.position = center
            + Vec3::new(
                angle.sin() * orbit_radius,
                height - center.y,
                angle.cos() * orbit_radius,
            );
        camera.look_at(center);

        if frame == select_at
            && let Some(id) = &selected
        {
            match scene.select(id) {
                Ok(selection) => info!(
                    "Frame {frame}: selected entry {id} ({} orbs pinned)",
                    selection.pinned.len()
                ),
                Err(e) => warn!("Frame {frame}: selection failed: {e}"),
            }
        }
        if frame == clear_at {
            match scene.clear_selection() {
                Ok(()) => info!("Frame {frame}: selection cleared"),
                Err(e) => warn!("Frame {frame}: {e}"),
            }
        }

        scene.frame();

        if log_every > 0 && frame % log_every == 0 {
            log_stats(frame, &scene.stats());
        }
    }

    log_stats(frames, &scene.stats());
    info!(
        "Geometry cache: {} entries, {} allocations",
        scene.optimizer().cache().len(),
        scene.optimizer().cache().allocations()
    );
}

fn log_stats(frame: u32, stats: &OptimizerStats) {
    info!(
        "Frame {frame}: {} | visible {} culled {} | geometry swaps {} material swaps {} restored {} failures {}",
        stats.state,
        stats.visible,
        stats.culled,
        stats.geometry_swaps,
        stats.material_swaps,
        stats.restored,
        stats.failures
    );
}
