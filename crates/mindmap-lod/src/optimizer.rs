//! Frame-driven visibility and LOD optimizer with pin-aware enable/disable state.
//!
//! Each throttled pass culls far items against the view frustum and assigns
//! every visible item a detail band by camera distance. Pinned items (the
//! current selection and its related entries) suspend the optimizer until the
//! caller resumes it. Every failure path falls back to "visible, original
//! appearance".

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use mindmap_render::{CameraProvider, Frustum, GeometryError, MaterialError};
use thiserror::Error;

use crate::cache::GeometryCache;
use crate::config::{LodConfigError, OptimizerConfig};
use crate::item::RenderableItem;
use crate::selector::LodBands;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single item could not be optimized. The item is restored and the pass continues.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubstitutionError {
    /// Position has a NaN or infinite component.
    #[error("item position is not finite: {0:?}")]
    NonFinitePosition([f32; 3]),

    /// No detail level configured (or no cache bucket prepared) for the band.
    #[error("no detail level for band {band} ({levels} configured)")]
    MissingDetailLevel {
        /// Requested band.
        band: usize,
        /// Available levels.
        levels: usize,
    },

    /// The substitute geometry could not be built.
    #[error("geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// The substitute material could not be derived.
    #[error("material: {0}")]
    Material(#[from] MaterialError),
}

/// A state transition that was refused. The optimizer state is unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Pinned items are still present.
    #[error("{count} pinned item(s) still present")]
    PinnedItemsPresent {
        /// Number of pinned items seen.
        count: usize,
    },
}

// ---------------------------------------------------------------------------
// State and diagnostics
// ---------------------------------------------------------------------------

/// Optimizer run state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptimizerState {
    /// Culling and LOD run on the throttled cadence.
    #[default]
    Enabled,
    /// Turned off by the operator. Sticky; pinning does not affect it.
    Disabled,
    /// Suspended because items are pinned. Left only through an explicit resume.
    TemporarilyDisabled,
}

impl fmt::Display for OptimizerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::TemporarilyDisabled => "temporarily disabled",
        };
        f.write_str(name)
    }
}

/// Counters from the most recent pass, for polling by an on-screen readout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OptimizerStats {
    /// State at the time of polling.
    pub state: OptimizerState,
    /// Frames counted while enabled.
    pub frame: u64,
    /// Items left visible by the last pass.
    pub visible: usize,
    /// Items hidden by the last pass.
    pub culled: usize,
    /// Geometry substitutions made by the last pass.
    pub geometry_swaps: usize,
    /// Material substitutions or material restores made by the last pass.
    pub material_swaps: usize,
    /// Items put back to original appearance by the last restore pass.
    pub restored: usize,
    /// Items that failed and were restored by the last pass.
    pub failures: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ItemOutcome {
    Culled,
    Visible {
        geometry_swapped: bool,
        material_swapped: bool,
    },
}

// ---------------------------------------------------------------------------
// VisibilityLodOptimizer
// ---------------------------------------------------------------------------

/// Distance-based frustum culling and LOD assignment for a set of orbs.
///
/// The caller owns the items and passes them to every call in a stable order.
pub struct VisibilityLodOptimizer {
    config: OptimizerConfig,
    bands: LodBands,
    cache: GeometryCache,
    state: OptimizerState,
    frame: u64,
    bound_items: Option<usize>,
    last_pass: OptimizerStats,
}

impl VisibilityLodOptimizer {
    /// Build an optimizer after validating `config`.
    pub fn new(config: OptimizerConfig) -> Result<Self, LodConfigError> {
        config.validate()?;
        let bands = LodBands::new(config.lod_distance_thresholds.clone(), config.band_count());
        Ok(Self {
            config,
            bands,
            cache: GeometryCache::new(),
            state: OptimizerState::Enabled,
            frame: 0,
            bound_items: None,
            last_pass: OptimizerStats::default(),
        })
    }

    /// Validated configuration this optimizer was built with.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Current run state.
    pub fn state(&self) -> OptimizerState {
        self.state
    }

    /// True while culling and LOD passes run.
    pub fn is_enabled(&self) -> bool {
        self.state == OptimizerState::Enabled
    }

    /// Number of items bound by the last [`Self::initialize`], `None` once disposed.
    pub fn bound_items(&self) -> Option<usize> {
        self.bound_items
    }

    /// Shared substitute geometry, for diagnostics.
    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    /// Counters from the last pass together with the current state.
    pub fn stats(&self) -> OptimizerStats {
        OptimizerStats {
            state: self.state,
            frame: self.frame,
            ..self.last_pass
        }
    }

    /// Bind the working set: prepare empty cache buckets and put every item at band 0.
    pub fn initialize(&mut self, items: &mut [RenderableItem]) {
        self.cache.prepare(self.config.band_count());
        for item in items.iter_mut() {
            item.set_lod_level(0);
        }
        self.bound_items = Some(items.len());
        self.frame = 0;
        self.last_pass = OptimizerStats::default();
        log::info!(
            "LOD optimizer bound to {} items ({} bands, culling beyond {})",
            items.len(),
            self.config.band_count(),
            self.config.culling_distance
        );
    }

    /// Run once per rendered frame.
    pub fn tick(&mut self, camera: Option<&dyn CameraProvider>, items: &mut [RenderableItem]) {
        if self.state != OptimizerState::Enabled {
            self.restore_all(items);
            return;
        }

        let pinned = pinned_count(items);
        if pinned > 0 {
            self.state = OptimizerState::TemporarilyDisabled;
            log::debug!("{pinned} pinned item(s), suspending LOD optimizer");
            self.restore_all(items);
            return;
        }

        self.frame += 1;
        if self.frame % u64::from(self.config.update_every_n_frames) != 0 {
            return;
        }

        self.recompute(camera, items);
    }

    /// Turn the optimizer on. Refused while any item is pinned.
    pub fn enable(&mut self, items: &[RenderableItem]) -> Result<(), TransitionError> {
        let count = pinned_count(items);
        if count > 0 {
            log::warn!("refusing to enable LOD optimizer: {count} pinned item(s)");
            return Err(TransitionError::PinnedItemsPresent { count });
        }
        if self.state != OptimizerState::Enabled {
            log::info!("LOD optimizer enabled (was {})", self.state);
            self.state = OptimizerState::Enabled;
        }
        Ok(())
    }

    /// Turn the optimizer off and put every item back to its original appearance now.
    pub fn disable(&mut self, items: &mut [RenderableItem]) {
        if self.state != OptimizerState::Disabled {
            log::info!("LOD optimizer disabled (was {})", self.state);
        }
        self.state = OptimizerState::Disabled;
        self.restore_all(items);
    }

    /// Leave the pin suspension and recompute immediately, skipping the throttle.
    ///
    /// A no-op unless the optimizer is temporarily disabled; an operator
    /// `Disabled` stays in force.
    pub fn resume_after_pin(
        &mut self,
        camera: Option<&dyn CameraProvider>,
        items: &mut [RenderableItem],
    ) -> Result<(), TransitionError> {
        match self.state {
            OptimizerState::Enabled => Ok(()),
            OptimizerState::Disabled => {
                log::debug!("resume ignored: LOD optimizer is disabled");
                Ok(())
            }
            OptimizerState::TemporarilyDisabled => {
                let count = pinned_count(items);
                if count > 0 {
                    log::warn!("cannot resume LOD optimizer: {count} item(s) still pinned");
                    return Err(TransitionError::PinnedItemsPresent { count });
                }
                self.state = OptimizerState::Enabled;
                log::debug!("LOD optimizer resumed");
                self.recompute(camera, items);
                Ok(())
            }
        }
    }

    /// Restore every item, release all cached geometry and unbind the working set.
    pub fn dispose(&mut self, items: &mut [RenderableItem]) {
        self.restore_all(items);
        let released = self.cache.len();
        self.cache.clear();
        self.bound_items = None;
        self.frame = 0;
        self.last_pass = OptimizerStats::default();
        log::info!("LOD optimizer disposed, released {released} cached geometries");
    }

    fn restore_all(&mut self, items: &mut [RenderableItem]) {
        let mut restored = 0;
        for item in items.iter_mut() {
            if item.restore_original() {
                restored += 1;
            }
            item.visible = true;
        }
        self.last_pass = OptimizerStats {
            visible: items.len(),
            restored,
            ..OptimizerStats::default()
        };
    }

    /// One full culling + LOD pass over `items`.
    fn recompute(&mut self, camera: Option<&dyn CameraProvider>, items: &mut [RenderableItem]) {
        let mut pass = OptimizerStats::default();

        let Some(camera) = camera else {
            self.last_pass = pass;
            return;
        };
        if self.bound_items.is_none() || items.is_empty() {
            self.last_pass = pass;
            return;
        }

        let camera_position = camera.position();
        let frustum = Frustum::from_view_projection(&camera.view_projection());

        for item in items.iter_mut() {
            if item.is_pinned() {
                pass.visible += 1;
                continue;
            }
            match self.process_item(item, camera_position, &frustum) {
                Ok(ItemOutcome::Culled) => pass.culled += 1,
                Ok(ItemOutcome::Visible {
                    geometry_swapped,
                    material_swapped,
                }) => {
                    pass.visible += 1;
                    pass.geometry_swaps += usize::from(geometry_swapped);
                    pass.material_swaps += usize::from(material_swapped);
                }
                Err(err) => {
                    log::warn!("LOD pass failed for {}: {err}; restoring original", item.id);
                    item.restore_original();
                    item.visible = true;
                    pass.visible += 1;
                    pass.failures += 1;
                }
            }
        }

        self.last_pass = pass;
    }

    fn process_item(
        &mut self,
        item: &mut RenderableItem,
        camera_position: Vec3,
        frustum: &Frustum,
    ) -> Result<ItemOutcome, SubstitutionError> {
        if !item.position.is_finite() {
            return Err(SubstitutionError::NonFinitePosition(item.position.to_array()));
        }

        let distance = item.position.distance(camera_position);
        // Near items are never culled, so nothing pops in right in front of the viewer.
        item.visible =
            distance <= self.config.culling_distance || frustum.contains_point(item.position);
        if !item.visible {
            return Ok(ItemOutcome::Culled);
        }

        let band = self.bands.select_band(distance);
        if item.lod_level() == Some(band) {
            return Ok(ItemOutcome::Visible {
                geometry_swapped: false,
                material_swapped: false,
            });
        }

        let levels = &self.config.lod_detail_levels;
        let geometry = self.cache.get_or_create(band, item.bounding_radius, levels)?;
        let simplified = if self.config.simplify_material_beyond_band
            && band > 1
            && !item.has_material_substitution()
        {
            Some(item.material().simplified(self.config.simplified_opacity_factor)?)
        } else {
            None
        };

        item.substitute_geometry(geometry);
        let material_swapped = match simplified {
            Some(material) => {
                item.substitute_material(Arc::new(material));
                true
            }
            None if band <= 1 => item.restore_material(),
            None => false,
        };
        item.set_lod_level(band);

        Ok(ItemOutcome::Visible {
            geometry_swapped: true,
            material_swapped,
        })
    }
}

fn pinned_count(items: &[RenderableItem]) -> usize {
    items.iter().filter(|item| item.is_pinned()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetailLevel;
    use crate::item::{ItemId, OpticalState};
    use glam::Mat4;
    use mindmap_render::{Camera, OrbMaterial, SphereGeometry};

    /// Camera at the origin looking down -Z.
    fn camera() -> Camera {
        Camera::default()
    }

    fn config() -> OptimizerConfig {
        OptimizerConfig {
            culling_distance: 20.0,
            update_every_n_frames: 1,
            lod_distance_thresholds: vec![5.0, 10.0, 20.0],
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

    fn item_at(id: u32, position: Vec3) -> RenderableItem {
        RenderableItem::new(
            ItemId(id),
            position,
            0.37,
            Arc::new(SphereGeometry::new(0.37, 32, 16).unwrap()),
            Arc::new(OrbMaterial::standard([0.9, 0.3, 0.2], 0.8, 0.3)),
        )
    }

    fn setup(positions: &[Vec3]) -> (VisibilityLodOptimizer, Vec<RenderableItem>) {
        let mut items: Vec<_> = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| item_at(i as u32, p))
            .collect();
        let mut optimizer = VisibilityLodOptimizer::new(config()).unwrap();
        optimizer.initialize(&mut items);
        (optimizer, items)
    }

    fn tick(optimizer: &mut VisibilityLodOptimizer, items: &mut [RenderableItem]) {
        let camera = camera();
        optimizer.tick(Some(&camera), items);
    }

    fn assert_original(item: &RenderableItem) {
        assert_eq!(item.optical_state(), OpticalState::Full);
        assert!(!item.has_geometry_substitution());
        assert!(!item.has_material_substitution());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = OptimizerConfig {
            update_every_n_frames: 0,
            ..config()
        };
        assert!(VisibilityLodOptimizer::new(bad).is_err());
    }

    #[test]
    fn test_initialize_prepares_buckets_without_geometry() {
        let (optimizer, items) = setup(&[Vec3::new(0.0, 0.0, -3.0)]);
        assert_eq!(optimizer.cache().band_count(), 4);
        assert!(optimizer.cache().is_empty());
        assert_eq!(items[0].lod_level(), Some(0));
    }

    /// Distance 3 with thresholds [5, 10, 20]: band 0, visible, full detail.
    #[test]
    fn test_close_item_stays_full_detail() {
        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, -3.0)]);
        tick(&mut optimizer, &mut items);

        assert!(items[0].visible);
        assert_eq!(items[0].lod_level(), Some(0));
        assert_original(&items[0]);
        assert_eq!(optimizer.stats().visible, 1);
        assert_eq!(optimizer.stats().geometry_swaps, 0);
    }

    /// Near items stay visible even when they are behind the camera.
    #[test]
    fn test_near_items_never_culled() {
        let (mut optimizer, mut items) = setup(&[
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(19.0, 0.0, 0.0),
            Vec3::new(0.0, -20.0, 0.0),
        ]);
        tick(&mut optimizer, &mut items);

        assert!(items.iter().all(|item| item.visible));
        assert_eq!(optimizer.stats().culled, 0);
    }

    /// Distance 25 outside the frustum: hidden and no LOD work done.
    #[test]
    fn test_far_item_outside_frustum_is_culled_without_lod() {
        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, 25.0)]);
        tick(&mut optimizer, &mut items);

        assert!(!items[0].visible);
        assert_eq!(items[0].lod_level(), Some(0));
        assert_original(&items[0]);
        assert!(optimizer.cache().is_empty());
        assert_eq!(optimizer.stats().culled, 1);
    }

    /// Beyond the culling distance, visibility equals frustum containment.
    #[test]
    fn test_far_visibility_matches_frustum() {
        let positions = [
            Vec3::new(0.0, 0.0, -25.0),
            Vec3::new(0.0, 0.0, 25.0),
            Vec3::new(200.0, 0.0, -30.0),
            Vec3::new(3.0, 2.0, -60.0),
        ];
        let (mut optimizer, mut items) = setup(&positions);
        tick(&mut optimizer, &mut items);

        let frustum = Frustum::from_view_projection(&camera().view_projection_matrix());
        for item in &items {
            assert_eq!(item.visible, frustum.contains_point(item.position), "{}", item.id);
        }
        assert_eq!(optimizer.stats().visible, 2);
        assert_eq!(optimizer.stats().culled, 2);
    }

    #[test]
    fn test_distant_visible_item_gets_low_detail_and_simple_material() {
        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, -25.0)]);
        let original_material = Arc::clone(items[0].material());
        tick(&mut optimizer, &mut items);

        let item = &items[0];
        assert!(item.visible);
        assert_eq!(item.lod_level(), Some(3));
        assert_eq!(item.optical_state(), OpticalState::Simplified);
        assert_eq!(item.geometry().width_segments(), 6);
        assert_eq!(item.material().shading, mindmap_render::Shading::Basic);
        assert_eq!(item.material().color, original_material.color);
        assert!(item.material().opacity < original_material.opacity);
        assert!(Arc::ptr_eq(item.original_material(), &original_material));
    }

    #[test]
    fn test_band_one_keeps_original_material() {
        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, -7.0)]);
        tick(&mut optimizer, &mut items);

        assert_eq!(items[0].lod_level(), Some(1));
        assert!(items[0].has_geometry_substitution());
        assert!(!items[0].has_material_substitution());
    }

    #[test]
    fn test_moving_closer_restores_material() {
        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, -15.0)]);
        tick(&mut optimizer, &mut items);
        assert_eq!(items[0].lod_level(), Some(2));
        assert!(items[0].has_material_substitution());

        items[0].position = Vec3::new(0.0, 0.0, -7.0);
        tick(&mut optimizer, &mut items);
        assert_eq!(items[0].lod_level(), Some(1));
        assert!(!items[0].has_material_substitution());
        assert_eq!(optimizer.stats().material_swaps, 1);
    }

    /// A second pass with nothing changed swaps nothing.
    #[test]
    fn test_tick_is_idempotent() {
        let (mut optimizer, mut items) = setup(&[
            Vec3::new(0.0, 0.0, -7.0),
            Vec3::new(0.0, 0.0, -15.0),
            Vec3::new(0.0, 0.0, -40.0),
        ]);
        tick(&mut optimizer, &mut items);
        assert_eq!(optimizer.stats().geometry_swaps, 3);
        let geometries: Vec<_> = items.iter().map(|i| Arc::clone(i.geometry())).collect();

        tick(&mut optimizer, &mut items);
        let stats = optimizer.stats();
        assert_eq!(stats.geometry_swaps, 0);
        assert_eq!(stats.material_swaps, 0);
        for (item, geometry) in items.iter().zip(&geometries) {
            assert!(Arc::ptr_eq(item.geometry(), geometry));
        }
    }

    #[test]
    fn test_items_with_same_radius_share_cached_geometry() {
        let (mut optimizer, mut items) =
            setup(&[Vec3::new(0.0, 0.0, -15.0), Vec3::new(1.0, 0.0, -15.0)]);
        tick(&mut optimizer, &mut items);

        assert!(Arc::ptr_eq(items[0].geometry(), items[1].geometry()));
        assert_eq!(optimizer.cache().allocations(), 1);
    }

    #[test]
    fn test_throttle_skips_intermediate_frames() {
        let mut items = vec![item_at(0, Vec3::new(0.0, 0.0, -15.0))];
        let mut optimizer = VisibilityLodOptimizer::new(OptimizerConfig {
            update_every_n_frames: 3,
            ..config()
        })
        .unwrap();
        optimizer.initialize(&mut items);

        tick(&mut optimizer, &mut items);
        tick(&mut optimizer, &mut items);
        assert_eq!(items[0].lod_level(), Some(0));

        tick(&mut optimizer, &mut items);
        assert_eq!(items[0].lod_level(), Some(2));
        assert_eq!(optimizer.stats().frame, 3);
    }

    /// Pinned at band 3: the next tick restores it and suspends the optimizer,
    /// even between throttle boundaries.
    #[test]
    fn test_pinning_suspends_and_restores_immediately() {
        let mut items = vec![
            item_at(0, Vec3::new(0.0, 0.0, -25.0)),
            item_at(1, Vec3::new(0.0, 0.0, -40.0)),
        ];
        let mut optimizer = VisibilityLodOptimizer::new(OptimizerConfig {
            update_every_n_frames: 1,
            ..config()
        })
        .unwrap();
        optimizer.initialize(&mut items);
        tick(&mut optimizer, &mut items);
        assert_eq!(items[0].lod_level(), Some(3));

        items[0].pin();
        tick(&mut optimizer, &mut items);

        assert_eq!(optimizer.state(), OptimizerState::TemporarilyDisabled);
        for item in &items {
            assert!(item.visible);
            assert_original(item);
        }
    }

    #[test]
    fn test_pinned_items_stay_original_while_suspended() {
        let (mut optimizer, mut items) =
            setup(&[Vec3::new(0.0, 0.0, -40.0), Vec3::new(0.0, 0.0, 30.0)]);
        items[0].pin();
        for _ in 0..5 {
            tick(&mut optimizer, &mut items);
            assert!(items[0].visible);
            assert_original(&items[0]);
            assert!(items[1].visible);
        }
    }

    #[test]
    fn test_enable_refused_while_pinned() {
        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, -3.0)]);
        items[0].pin();
        tick(&mut optimizer, &mut items);
        assert_eq!(optimizer.state(), OptimizerState::TemporarilyDisabled);

        let result = optimizer.enable(&items);
        assert_eq!(result, Err(TransitionError::PinnedItemsPresent { count: 1 }));
        assert_eq!(optimizer.state(), OptimizerState::TemporarilyDisabled);

        optimizer.disable(&mut items);
        assert!(optimizer.enable(&items).is_err());
        assert_eq!(optimizer.state(), OptimizerState::Disabled);
    }

    #[test]
    fn test_resume_refused_while_still_pinned() {
        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, -3.0)]);
        items[0].pin();
        tick(&mut optimizer, &mut items);

        let camera = camera();
        let result = optimizer.resume_after_pin(Some(&camera), &mut items);
        assert_eq!(result, Err(TransitionError::PinnedItemsPresent { count: 1 }));
        assert_eq!(optimizer.state(), OptimizerState::TemporarilyDisabled);
    }

    /// Resuming recomputes at once instead of waiting for the throttle.
    #[test]
    fn test_resume_recomputes_immediately() {
        let mut items = vec![item_at(0, Vec3::new(0.0, 0.0, -25.0))];
        let mut optimizer = VisibilityLodOptimizer::new(OptimizerConfig {
            update_every_n_frames: 1000,
            ..config()
        })
        .unwrap();
        optimizer.initialize(&mut items);
        items[0].pin();
        tick(&mut optimizer, &mut items);

        items[0].unpin();
        let camera = camera();
        optimizer.resume_after_pin(Some(&camera), &mut items).unwrap();

        assert_eq!(optimizer.state(), OptimizerState::Enabled);
        assert_eq!(items[0].lod_level(), Some(3));
        assert!(items[0].has_geometry_substitution());
    }

    #[test]
    fn test_resume_does_not_override_disable() {
        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, -3.0)]);
        optimizer.disable(&mut items);
        let camera = camera();
        assert_eq!(optimizer.resume_after_pin(Some(&camera), &mut items), Ok(()));
        assert_eq!(optimizer.state(), OptimizerState::Disabled);
    }

    #[test]
    fn test_disable_restores_everything_immediately() {
        let (mut optimizer, mut items) =
            setup(&[Vec3::new(0.0, 0.0, -40.0), Vec3::new(0.0, 0.0, 30.0)]);
        tick(&mut optimizer, &mut items);
        assert!(!items[1].visible);
        assert!(items[0].has_material_substitution());

        optimizer.disable(&mut items);

        assert_eq!(optimizer.state(), OptimizerState::Disabled);
        for item in &items {
            assert!(item.visible);
            assert_original(item);
        }
        assert_eq!(optimizer.stats().restored, 1);

        // Ticks while disabled keep everything at full detail.
        tick(&mut optimizer, &mut items);
        assert!(items.iter().all(|i| i.visible));
        assert_original(&items[0]);
    }

    /// disable → enable → ticks puts the item back in the band its distance implies.
    #[test]
    fn test_disable_enable_round_trip() {
        let mut items = vec![
            item_at(0, Vec3::new(0.0, 0.0, -40.0)),
            item_at(1, Vec3::new(0.0, 0.0, -7.0)),
            item_at(2, Vec3::new(0.0, 0.0, -2.0)),
        ];
        let mut optimizer = VisibilityLodOptimizer::new(OptimizerConfig {
            update_every_n_frames: 4,
            ..config()
        })
        .unwrap();
        optimizer.initialize(&mut items);
        let original_material = Arc::clone(items[0].material());
        for _ in 0..4 {
            tick(&mut optimizer, &mut items);
        }
        let bands: Vec<_> = items.iter().map(RenderableItem::lod_level).collect();
        assert_eq!(bands, vec![Some(3), Some(1), Some(0)]);

        optimizer.disable(&mut items);
        optimizer.enable(&items).unwrap();
        for _ in 0..4 {
            tick(&mut optimizer, &mut items);
        }

        let after: Vec<_> = items.iter().map(RenderableItem::lod_level).collect();
        assert_eq!(after, bands);
        assert!(Arc::ptr_eq(items[0].original_material(), &original_material));
    }

    #[test]
    fn test_bad_item_is_restored_and_pass_continues() {
        let (mut optimizer, mut items) = setup(&[
            Vec3::new(0.0, 0.0, -15.0),
            Vec3::new(0.0, 0.0, -15.0),
            Vec3::new(0.0, 0.0, -15.0),
        ]);
        items[0].position = Vec3::new(f32::NAN, 0.0, 0.0);
        items[1].bounding_radius = -1.0;
        items[1].visible = false;

        tick(&mut optimizer, &mut items);

        let stats = optimizer.stats();
        assert_eq!(stats.failures, 2);
        assert_eq!(stats.visible, 3);
        assert!(items[0].visible);
        assert!(items[1].visible);
        assert_original(&items[0]);
        assert_original(&items[1]);
        assert_eq!(items[2].lod_level(), Some(2));
    }

    #[test]
    fn test_tiny_radius_still_gets_lod() {
        let mut items = vec![RenderableItem::new(
            ItemId(0),
            Vec3::new(0.0, 0.0, -15.0),
            0.004,
            Arc::new(SphereGeometry::new(0.004, 32, 16).unwrap()),
            Arc::new(OrbMaterial::standard([0.9, 0.3, 0.2], 0.8, 0.3)),
        )];
        let mut optimizer = VisibilityLodOptimizer::new(config()).unwrap();
        optimizer.initialize(&mut items);

        for _ in 0..3 {
            tick(&mut optimizer, &mut items);
            assert_eq!(optimizer.stats().failures, 0);
        }
        assert_eq!(items[0].lod_level(), Some(2));
        assert!(items[0].has_geometry_substitution());
        assert_eq!(items[0].geometry().width_segments(), 8);
    }

    /// A failing material derivation leaves no half-applied geometry swap.
    #[test]
    fn test_material_failure_leaves_item_untouched() {
        let bad_material = OrbMaterial {
            opacity: f32::NAN,
            ..OrbMaterial::default()
        };
        let mut items = vec![RenderableItem::new(
            ItemId(0),
            Vec3::new(0.0, 0.0, -15.0),
            0.37,
            Arc::new(SphereGeometry::new(0.37, 32, 16).unwrap()),
            Arc::new(bad_material),
        )];
        let mut optimizer = VisibilityLodOptimizer::new(config()).unwrap();
        optimizer.initialize(&mut items);

        tick(&mut optimizer, &mut items);

        assert_eq!(optimizer.stats().failures, 1);
        assert_original(&items[0]);
        assert!(items[0].visible);
    }

    #[test]
    fn test_missing_camera_is_nothing_to_do() {
        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, -40.0)]);
        optimizer.tick(None, &mut items);
        assert_eq!(optimizer.state(), OptimizerState::Enabled);
        assert_original(&items[0]);
        assert_eq!(optimizer.stats().visible, 0);
    }

    #[test]
    fn test_empty_item_set_is_nothing_to_do() {
        let mut optimizer = VisibilityLodOptimizer::new(config()).unwrap();
        let mut items: Vec<RenderableItem> = Vec::new();
        optimizer.initialize(&mut items);
        tick(&mut optimizer, &mut items);
        assert_eq!(optimizer.stats().visible, 0);
        assert!(optimizer.cache().is_empty());
    }

    #[test]
    fn test_unbound_optimizer_does_nothing() {
        let mut optimizer = VisibilityLodOptimizer::new(config()).unwrap();
        let mut items = vec![item_at(0, Vec3::new(0.0, 0.0, -40.0))];
        tick(&mut optimizer, &mut items);
        assert_original(&items[0]);
    }

    #[test]
    fn test_dispose_restores_and_clears_cache() {
        let (mut optimizer, mut items) =
            setup(&[Vec3::new(0.0, 0.0, -15.0), Vec3::new(0.0, 0.0, -40.0)]);
        tick(&mut optimizer, &mut items);
        assert_eq!(optimizer.cache().len(), 2);

        optimizer.dispose(&mut items);

        assert_eq!(optimizer.cache().band_count(), 0);
        assert!(optimizer.cache().is_empty());
        for item in &items {
            assert_original(item);
            assert!(item.visible);
        }
        // Unbound after dispose: further ticks leave items alone.
        tick(&mut optimizer, &mut items);
        assert_original(&items[0]);
    }

    /// A custom provider is enough; the optimizer needs only position and matrix.
    #[test]
    fn test_custom_camera_provider() {
        struct FixedCamera(Camera);
        impl CameraProvider for FixedCamera {
            fn position(&self) -> Vec3 {
                self.0.position
            }
            fn view_projection(&self) -> Mat4 {
                self.0.view_projection_matrix()
            }
        }

        let (mut optimizer, mut items) = setup(&[Vec3::new(0.0, 0.0, 25.0)]);
        let behind = FixedCamera(Camera::looking_at(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            1.0,
            1.0,
        ));
        optimizer.tick(Some(&behind), &mut items);
        assert!(items[0].visible);
        assert_eq!(items[0].lod_level(), Some(3));
    }
}
