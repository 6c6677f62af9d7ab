//! The mindmap scene: entry orbs, the viewing camera, the optimizer and the
//! current selection.

use std::sync::Arc;

use glam::Vec3;
use mindmap_config::SceneConfig;
use mindmap_lod::{
    ItemId, LodConfigError, OptimizerConfig, OptimizerStats, RenderableItem, TransitionError,
    VisibilityLodOptimizer, radius_key,
};
use mindmap_render::{Camera, GeometryError, OrbMaterial, SphereGeometry};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::dataset::{EntryId, JournalEntry};
use crate::emotion::orb_appearance;

const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;

/// Errors returned by scene construction and selection.
#[derive(Debug, Error)]
pub enum SceneError {
    /// No entry with this id is placed in the scene.
    #[error("unknown entry: {0}")]
    UnknownEntry(EntryId),

    /// Two entries share an id.
    #[error("duplicate entry id: {0}")]
    DuplicateEntry(EntryId),

    /// An entry was passed without coordinates.
    #[error("entry {0} has no coordinates")]
    Unplaced(EntryId),

    /// Orb geometry could not be built.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The optimizer configuration was rejected.
    #[error(transparent)]
    Optimizer(#[from] LodConfigError),

    /// The optimizer refused a state change.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// The selected entry and the related entries pinned with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub entry: EntryId,
    /// Item indices pinned for this selection, the selected entry first.
    pub pinned: Vec<usize>,
}

/// One orb per journal entry, driven by a [`VisibilityLodOptimizer`].
pub struct MindmapScene {
    entries: Vec<JournalEntry>,
    items: Vec<RenderableItem>,
    index: FxHashMap<EntryId, usize>,
    camera: Camera,
    optimizer: VisibilityLodOptimizer,
    selection: Option<Selection>,
}

impl MindmapScene {
    /// Place `entries` and bind the optimizer to their orbs.
    ///
    /// Every entry must carry coordinates; [`crate::parse_entries`] already
    /// drops those that do not.
    pub fn build(
        entries: Vec<JournalEntry>,
        scene: &SceneConfig,
        optimizer_config: OptimizerConfig,
    ) -> Result<Self, SceneError> {
        let mut optimizer = VisibilityLodOptimizer::new(optimizer_config)?;
        let full_detail = optimizer.config().lod_detail_levels[0];

        let mut index = FxHashMap::default();
        let mut geometries: FxHashMap<i64, Arc<SphereGeometry>> = FxHashMap::default();
        let mut items = Vec::with_capacity(entries.len());
        let mut centroid = Vec3::ZERO;

        for (i, entry) in entries.iter().enumerate() {
            let Some(coords) = entry.coordinates else {
                return Err(SceneError::Unplaced(entry.id.clone()));
            };
            if index.insert(entry.id.clone(), i).is_some() {
                return Err(SceneError::DuplicateEntry(entry.id.clone()));
            }

            let appearance = orb_appearance(&entry.emotions, scene);
            let geometry = match geometries.get(&radius_key(appearance.radius)) {
                Some(geometry) => Arc::clone(geometry),
                None => {
                    let geometry = Arc::new(SphereGeometry::new(
                        appearance.radius,
                        full_detail.width_segments,
                        full_detail.height_segments,
                    )?);
                    geometries.insert(radius_key(appearance.radius), Arc::clone(&geometry));
                    geometry
                }
            };
            let material = Arc::new(OrbMaterial::standard(
                appearance.color,
                appearance.opacity,
                appearance.emissive_intensity,
            ));

            let position = Vec3::new(coords.x, coords.y, coords.z) * scene.coordinate_scale;
            centroid += position;
            items.push(RenderableItem::new(
                ItemId(i as u32),
                position,
                appearance.radius,
                geometry,
                material,
            ));
        }

        if !items.is_empty() {
            centroid /= items.len() as f32;
        }
        let mut camera = Camera::looking_at(
            Vec3::from(scene.camera_start),
            centroid,
            scene.camera_fov_deg.to_radians(),
            DEFAULT_ASPECT_RATIO,
        );
        camera.near = scene.near;
        camera.far = scene.far;

        optimizer.initialize(&mut items);
        log::info!(
            "Scene built: {} orbs, {} shared full-detail geometries",
            items.len(),
            geometries.len()
        );

        Ok(Self {
            entries,
            items,
            index,
            camera,
            optimizer,
            selection: None,
        })
    }

    /// Advance one frame.
    pub fn frame(&mut self) {
        self.optimizer.tick(Some(&self.camera), &mut self.items);
    }

    /// Pin `id` and its related entries, replacing any previous selection.
    pub fn select(&mut self, id: &EntryId) -> Result<&Selection, SceneError> {
        let Some(&selected) = self.index.get(id) else {
            return Err(SceneError::UnknownEntry(id.clone()));
        };

        self.unpin_selection();

        let mut pinned = vec![selected];
        for related in &self.entries[selected].related_entries {
            match self.index.get(related) {
                Some(&i) if !pinned.contains(&i) => pinned.push(i),
                Some(_) => {}
                None => log::debug!("entry {id}: related entry {related} is not in the scene"),
            }
        }
        for &i in &pinned {
            self.items[i].pin();
        }
        log::debug!("selected entry {id}, pinned {} orb(s)", pinned.len());

        Ok(&*self.selection.insert(Selection {
            entry: id.clone(),
            pinned,
        }))
    }

    /// Unpin the current selection and let the optimizer resume.
    pub fn clear_selection(&mut self) -> Result<(), SceneError> {
        if self.unpin_selection() {
            self.optimizer
                .resume_after_pin(Some(&self.camera), &mut self.items)?;
        }
        Ok(())
    }

    /// Operator switch for the optimizer. Enabling is refused while a selection is pinned.
    pub fn set_optimizer_enabled(&mut self, enabled: bool) -> Result<(), SceneError> {
        if enabled {
            self.optimizer.enable(&self.items)?;
        } else {
            self.optimizer.disable(&mut self.items);
        }
        Ok(())
    }

    /// Release the optimizer's cached geometry and restore every orb.
    pub fn dispose(&mut self) {
        self.unpin_selection();
        self.optimizer.dispose(&mut self.items);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn items(&self) -> &[RenderableItem] {
        &self.items
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn optimizer(&self) -> &VisibilityLodOptimizer {
        &self.optimizer
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Orb for entry `id`.
    pub fn item_for(&self, id: &EntryId) -> Option<&RenderableItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn stats(&self) -> OptimizerStats {
        self.optimizer.stats()
    }

    fn unpin_selection(&mut self) -> bool {
        let Some(selection) = self.selection.take() else {
            return false;
        };
        for i in selection.pinned {
            self.items[i].unpin();
        }
        true
    }
}
