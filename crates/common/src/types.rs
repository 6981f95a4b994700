use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid placement of a viewpoint: position and rotation, no scale.
///
/// Viewpoints look down their local -Z axis with +Y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Unit forward direction in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// World-from-local matrix.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// View matrix (local-from-world).
    pub fn view_matrix(&self) -> Mat4 {
        self.to_matrix().inverse()
    }
}

/// Near and far clip distances of a perspective view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipPlanes {
    pub near: f32,
    pub far: f32,
}

impl ClipPlanes {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    /// Distance between the two planes.
    pub fn depth(&self) -> f32 {
        self.far - self.near
    }

    /// Both planes moved by the same signed amount along the view axis.
    pub fn offset(&self, dist: f32) -> Self {
        Self {
            near: self.near + dist,
            far: self.far + dist,
        }
    }

    /// True when both values are finite and `near < far`.
    pub fn is_ordered(&self) -> bool {
        self.near.is_finite() && self.far.is_finite() && self.near < self.far
    }
}

impl Default for ClipPlanes {
    fn default() -> Self {
        Self {
            near: 0.3,
            far: 1000.0,
        }
    }
}
