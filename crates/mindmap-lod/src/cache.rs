//! Shared LOD geometry, bucketed per band and keyed by rounded radius.

use std::sync::Arc;

use mindmap_render::SphereGeometry;
use rustc_hash::FxHashMap;

use crate::config::DetailLevel;
use crate::optimizer::SubstitutionError;

/// Radius granularity of the cache: 0.01 world units.
const RADIUS_STEPS_PER_UNIT: f32 = 100.0;

/// Quantize a radius to cache granularity, in hundredths of a unit.
///
/// Entry-derived radii carry float jitter; rounding keeps the number of
/// distinct geometries bounded. Positive radii never round below one step.
pub fn radius_key(radius: f32) -> i64 {
    let key = (radius * RADIUS_STEPS_PER_UNIT).round() as i64;
    if radius > 0.0 { key.max(1) } else { key }
}

/// Geometry cache for LOD substitutes.
///
/// One bucket per detail level. A `(band, radius_key)` pair maps to exactly one
/// shared geometry; repeated lookups hand out clones of the same `Arc`.
#[derive(Debug, Default)]
pub struct GeometryCache {
    buckets: Vec<FxHashMap<i64, Arc<SphereGeometry>>>,
    allocations: u64,
}

impl GeometryCache {
    /// Empty cache with no buckets; call [`Self::prepare`] before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any cached geometry and create `levels` empty buckets.
    pub fn prepare(&mut self, levels: usize) {
        self.buckets.clear();
        self.buckets.resize_with(levels, FxHashMap::default);
    }

    /// Fetch the geometry for `band` at `radius`, building it on first use.
    pub fn get_or_create(
        &mut self,
        band: usize,
        radius: f32,
        detail_levels: &[DetailLevel],
    ) -> Result<Arc<SphereGeometry>, SubstitutionError> {
        let (Some(detail), Some(bucket)) = (detail_levels.get(band), self.buckets.get_mut(band))
        else {
            return Err(SubstitutionError::MissingDetailLevel {
                band,
                levels: detail_levels.len().min(self.buckets.len()),
            });
        };
        if !radius.is_finite() {
            return Err(SubstitutionError::Geometry(
                mindmap_render::GeometryError::InvalidRadius(radius),
            ));
        }

        let key = radius_key(radius);
        if let Some(geometry) = bucket.get(&key) {
            return Ok(Arc::clone(geometry));
        }

        let geometry = Arc::new(SphereGeometry::new(
            key as f32 / RADIUS_STEPS_PER_UNIT,
            detail.width_segments,
            detail.height_segments,
        )?);
        bucket.insert(key, Arc::clone(&geometry));
        self.allocations += 1;
        log::trace!(
            "cached band {band} geometry for radius {:.2} ({}x{})",
            geometry.radius(),
            detail.width_segments,
            detail.height_segments
        );
        Ok(geometry)
    }

    /// Release every cached geometry and remove all buckets.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Number of buckets (detail levels) currently prepared.
    pub fn band_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of cached geometries in `band`.
    pub fn bucket_len(&self, band: usize) -> usize {
        self.buckets.get(band).map_or(0, FxHashMap::len)
    }

    /// Total cached geometries across all bands.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(FxHashMap::len).sum()
    }

    /// True when no geometry is cached in any band.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Geometries built since the cache was created.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }
}
