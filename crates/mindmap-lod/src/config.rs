//! Optimizer configuration: culling distance, throttle, LOD bands and per-band detail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned when an [`OptimizerConfig`] is rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LodConfigError {
    /// The throttle must run at least every frame.
    #[error("update_every_n_frames must be at least 1")]
    ZeroUpdateInterval,

    /// Culling distance is negative or not finite.
    #[error("invalid culling distance: {0}")]
    InvalidCullingDistance(f32),

    /// A distance threshold is not positive or not finite.
    #[error("LOD threshold {index} must be positive and finite, got {value}")]
    InvalidThreshold {
        /// Position in the threshold list.
        index: usize,
        /// Offending value.
        value: f32,
    },

    /// Thresholds must be strictly increasing.
    #[error("LOD thresholds must be strictly increasing (index {index})")]
    ThresholdsNotIncreasing {
        /// First index that is not greater than its predecessor.
        index: usize,
    },

    /// Every band needs exactly one detail level.
    #[error("expected {expected} LOD detail levels for {thresholds} thresholds, got {actual}")]
    DetailLevelCount {
        /// Number of thresholds configured.
        thresholds: usize,
        /// `thresholds + 1`.
        expected: usize,
        /// Number of detail levels configured.
        actual: usize,
    },

    /// Opacity factor for simplified materials must lie in `(0, 1]`.
    #[error("simplified_opacity_factor must be in (0, 1], got {0}")]
    InvalidOpacityFactor(f32),
}

/// Sphere tessellation used for one LOD band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLevel {
    /// Longitudinal segments.
    pub width_segments: u32,
    /// Latitudinal segments.
    pub height_segments: u32,
}

impl DetailLevel {
    pub const fn new(width_segments: u32, height_segments: u32) -> Self {
        Self {
            width_segments,
            height_segments,
        }
    }
}

/// Configuration for the visibility/LOD optimizer. Fixed once the optimizer is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Beyond this distance the frustum test decides visibility; inside it
    /// items are always visible.
    pub culling_distance: f32,
    /// Recompute culling and LOD only every N frames.
    pub update_every_n_frames: u32,
    /// Ascending band boundaries. `len() + 1` bands exist.
    pub lod_distance_thresholds: Vec<f32>,
    /// One tessellation per band, most detailed first.
    pub lod_detail_levels: Vec<DetailLevel>,
    /// Swap in the unlit material for bands beyond 1.
    pub simplify_material_beyond_band: bool,
    /// Opacity multiplier applied to the unlit stand-in material.
    pub simplified_opacity_factor: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            culling_distance: 40.0,
            update_every_n_frames: 5,
            lod_distance_thresholds: vec![10.0, 20.0, 40.0],
            lod_detail_levels: vec![
                DetailLevel::new(32, 16),
                DetailLevel::new(16, 12),
                DetailLevel::new(8, 6),
                DetailLevel::new(6, 4),
            ],
            simplify_material_beyond_band: true,
            simplified_opacity_factor: 0.9,
        }
    }
}

impl OptimizerConfig {
    /// Check every field for consistency.
    pub fn validate(&self) -> Result<(), LodConfigError> {
        if self.update_every_n_frames == 0 {
            return Err(LodConfigError::ZeroUpdateInterval);
        }
        if !self.culling_distance.is_finite() || self.culling_distance < 0.0 {
            return Err(LodConfigError::InvalidCullingDistance(self.culling_distance));
        }
        for (index, &value) in self.lod_distance_thresholds.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(LodConfigError::InvalidThreshold { index, value });
            }
            if index > 0 && value <= self.lod_distance_thresholds[index - 1] {
                return Err(LodConfigError::ThresholdsNotIncreasing { index });
            }
        }
        let expected = self.lod_distance_thresholds.len() + 1;
        if self.lod_detail_levels.len() != expected {
            return Err(LodConfigError::DetailLevelCount {
                thresholds: self.lod_distance_thresholds.len(),
                expected,
                actual: self.lod_detail_levels.len(),
            });
        }
        let factor = self.simplified_opacity_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(LodConfigError::InvalidOpacityFactor(factor));
        }
        Ok(())
    }

    /// Number of LOD bands.
    pub fn band_count(&self) -> usize {
        self.lod_detail_levels.len()
    }
}
