//! Visibility and level-of-detail optimizer for the journal mindmap.
//!
//! The caller owns a list of [`RenderableItem`]s and a camera. Once per frame it
//! hands both to [`VisibilityLodOptimizer::tick`], which culls distant orbs
//! outside the view frustum and swaps cached low-poly spheres (and, further
//! out, unlit materials) onto the visible ones. Pinned items suspend the
//! optimizer until [`VisibilityLodOptimizer::resume_after_pin`].

mod cache;
mod config;
mod item;
mod optimizer;
mod selector;

pub use cache::{GeometryCache, radius_key};
pub use config::{DetailLevel, LodConfigError, OptimizerConfig};
pub use item::{ItemId, OpticalState, RenderableItem};
pub use mindmap_render::CameraProvider;
pub use optimizer::{
    OptimizerState, OptimizerStats, SubstitutionError, TransitionError, VisibilityLodOptimizer,
};
pub use selector::LodBands;
