//! Distance-based LOD band selection.

/// Ascending distance boundaries between LOD bands.
///
/// Band 0 is the closest and most detailed. Each threshold that a distance
/// strictly exceeds moves it one band further out; the last band extends to
/// infinity.
#[derive(Clone, Debug)]
pub struct LodBands {
    thresholds: Vec<f32>,
    band_count: usize,
}

impl LodBands {
    /// Create bands from ascending thresholds, clamped to `band_count` bands.
    ///
    /// # Panics
    ///
    /// Panics if `band_count` is zero or thresholds are not strictly increasing.
    /// [`crate::OptimizerConfig::validate`] rejects both before this is reached.
    pub fn new(thresholds: Vec<f32>, band_count: usize) -> Self {
        assert!(band_count > 0, "must have at least one band");
        for pair in thresholds.windows(2) {
            assert!(pair[1] > pair[0], "thresholds must be strictly increasing");
        }
        Self {
            thresholds,
            band_count,
        }
    }

    /// The coarsest band index.
    pub fn max_band(&self) -> usize {
        self.band_count - 1
    }

    /// Band for an item at `distance` from the camera.
    pub fn select_band(&self, distance: f32) -> usize {
        debug_assert!(distance >= 0.0, "distance must be non-negative");
        let exceeded = self
            .thresholds
            .iter()
            .take_while(|&&threshold| distance > threshold)
            .count();
        exceeded.min(self.max_band())
    }
}
