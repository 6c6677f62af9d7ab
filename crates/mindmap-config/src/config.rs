//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use mindmap_lod::OptimizerConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level mindmap configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Dataset and orb appearance.
    pub scene: SceneConfig,
    /// Visibility/LOD optimizer.
    pub optimizer: OptimizerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Dataset location, orb sizing and the starting camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Processed entries JSON. `None` builds a synthetic map instead.
    pub dataset_path: Option<PathBuf>,
    /// Multiplier applied to the precomputed entry coordinates.
    pub coordinate_scale: f32,
    /// Radius of an orb with no emotional intensity.
    pub base_orb_radius: f32,
    /// Extra radius at full dominant-emotion intensity.
    pub orb_radius_scale: f32,
    /// Opacity of orb materials.
    pub base_opacity: f32,
    /// Vertical field of view in degrees.
    pub camera_fov_deg: f32,
    /// Camera start position.
    pub camera_start: [f32; 3],
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log optimizer counters every N frames (0 = never).
    pub log_stats_every_n_frames: u32,
}

// --- Default implementations ---

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            coordinate_scale: 1.0,
            base_orb_radius: 0.3,
            orb_radius_scale: 0.4,
            base_opacity: 0.85,
            camera_fov_deg: 75.0,
            camera_start: [0.0, 1.6, 30.0],
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_stats_every_n_frames: 60,
        }
    }
}

/// Default config directory: the platform config dir joined with `journal-mindmap`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("journal-mindmap"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        let config_path = config_dir.join(CONFIG_FILE);
        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .optimizer
            .validate()
            .map_err(|source| ConfigError::InvalidOptimizer {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config)
    }
}
