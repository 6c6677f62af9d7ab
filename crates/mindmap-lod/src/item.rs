//! The renderable record the optimizer reads and mutates.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use mindmap_render::{OrbMaterial, SphereGeometry};

/// Stable identifier of a renderable across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Whether a reduced-detail geometry or material is currently substituted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpticalState {
    /// Showing the item's own geometry and material.
    Full,
    /// At least one handle is a substitute; the originals are saved.
    Simplified,
}

/// A positioned orb owned by the caller.
///
/// The saved `original_*` handles are `Some` exactly while a substitute is
/// live. Pinning restores them first, so a pinned item never carries a
/// substitution.
#[derive(Clone, Debug)]
pub struct RenderableItem {
    /// Stable identifier.
    pub id: ItemId,
    /// World-space center.
    pub position: Vec3,
    /// Radius used to pick the cached LOD geometry.
    pub bounding_radius: f32,
    /// Visibility flag read by the renderer.
    pub visible: bool,
    geometry: Arc<SphereGeometry>,
    material: Arc<OrbMaterial>,
    original_geometry: Option<Arc<SphereGeometry>>,
    original_material: Option<Arc<OrbMaterial>>,
    pinned: bool,
    lod_level: Option<usize>,
}

impl RenderableItem {
    /// Visible, unpinned item showing its own geometry and material.
    pub fn new(
        id: ItemId,
        position: Vec3,
        bounding_radius: f32,
        geometry: Arc<SphereGeometry>,
        material: Arc<OrbMaterial>,
    ) -> Self {
        Self {
            id,
            position,
            bounding_radius,
            visible: true,
            geometry,
            material,
            original_geometry: None,
            original_material: None,
            pinned: false,
            lod_level: None,
        }
    }

    /// Live geometry handle.
    pub fn geometry(&self) -> &Arc<SphereGeometry> {
        &self.geometry
    }

    /// Live material handle.
    pub fn material(&self) -> &Arc<OrbMaterial> {
        &self.material
    }

    /// The item's own geometry, whether or not a substitute is live.
    pub fn original_geometry(&self) -> &Arc<SphereGeometry> {
        self.original_geometry.as_ref().unwrap_or(&self.geometry)
    }

    /// The item's own material, whether or not a substitute is live.
    pub fn original_material(&self) -> &Arc<OrbMaterial> {
        self.original_material.as_ref().unwrap_or(&self.material)
    }

    /// Whether a substitute is currently live.
    pub fn optical_state(&self) -> OpticalState {
        if self.original_geometry.is_some() || self.original_material.is_some() {
            OpticalState::Simplified
        } else {
            OpticalState::Full
        }
    }

    /// True while a reduced-detail geometry replaces the original.
    pub fn has_geometry_substitution(&self) -> bool {
        self.original_geometry.is_some()
    }

    /// True while a simplified material replaces the original.
    pub fn has_material_substitution(&self) -> bool {
        self.original_material.is_some()
    }

    /// Current LOD band, `None` until the optimizer has assigned one.
    pub fn lod_level(&self) -> Option<usize> {
        self.lod_level
    }

    /// Whether the item belongs to the current selection.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Exempt the item from culling and LOD. Restores original appearance first.
    pub fn pin(&mut self) {
        self.restore_original();
        self.visible = true;
        self.pinned = true;
    }

    /// Return the item to the optimizer's control.
    pub fn unpin(&mut self) {
        self.pinned = false;
    }

    /// Put back the original geometry and material and reset the band to full detail.
    ///
    /// Returns `true` if any substitute was removed.
    pub fn restore_original(&mut self) -> bool {
        let mut restored = false;
        if let Some(original) = self.original_geometry.take() {
            self.geometry = original;
            restored = true;
        }
        if self.restore_material() {
            restored = true;
        }
        if self.lod_level.is_some() {
            self.lod_level = Some(0);
        }
        restored
    }

    /// Put back the original material only. Returns `true` if one was substituted.
    pub(crate) fn restore_material(&mut self) -> bool {
        match self.original_material.take() {
            Some(original) => {
                self.material = original;
                true
            }
            None => false,
        }
    }

    /// Swap in `geometry`, saving the original on the first substitution.
    pub(crate) fn substitute_geometry(&mut self, geometry: Arc<SphereGeometry>) {
        let previous = std::mem::replace(&mut self.geometry, geometry);
        if self.original_geometry.is_none() {
            self.original_geometry = Some(previous);
        }
    }

    /// Swap in `material`, saving the original on the first substitution.
    pub(crate) fn substitute_material(&mut self, material: Arc<OrbMaterial>) {
        let previous = std::mem::replace(&mut self.material, material);
        if self.original_material.is_none() {
            self.original_material = Some(previous);
        }
    }

    pub(crate) fn set_lod_level(&mut self, level: usize) {
        self.lod_level = Some(level);
    }
}
