//! Camera pose and projection, plus the [`CameraProvider`] seam consumed by the optimizer.

use glam::{Mat4, Quat, Vec3};

/// Source of the camera pose, sampled synchronously once per optimizer pass.
pub trait CameraProvider {
    /// Current world-space camera position.
    fn position(&self) -> Vec3;

    /// Combined projection × view-inverse matrix used to build the frustum.
    fn view_projection(&self) -> Mat4;
}

/// A perspective camera in world space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera at `position` looking at `target` with +Y up.
    pub fn looking_at(position: Vec3, target: Vec3, fov_y: f32, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position,
            fov_y,
            aspect_ratio,
            ..Self::default()
        };
        camera.look_at(target);
        camera
    }

    /// Re-orient the camera toward `target`, keeping +Y up.
    ///
    /// Does nothing when `target` coincides with the camera position.
    pub fn look_at(&mut self, target: Vec3) {
        if (target - self.position).length_squared() <= f32::EPSILON {
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        self.rotation = rotation.normalize();
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation);
        let translation_matrix = Mat4::from_translation(self.position);
        (translation_matrix * rotation_matrix).inverse()
    }

    /// Perspective projection with reverse-Z: near maps to z=1, far to z=0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

impl CameraProvider for Camera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn view_projection(&self) -> Mat4 {
        self.view_projection_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: 75.0_f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
