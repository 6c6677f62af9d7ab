//! Render-side value types for the mindmap: camera pose, view frustum, orb geometry and orb materials.
//!
//! Nothing here talks to a GPU. These are the handles a host renderer hands to
//! the visibility/LOD optimizer and receives back.

mod camera;
mod frustum;
mod geometry;
mod material;

pub use camera::{Camera, CameraProvider};
pub use frustum::Frustum;
pub use geometry::{GeometryError, SphereGeometry};
pub use material::{MaterialError, OrbMaterial, Shading};
