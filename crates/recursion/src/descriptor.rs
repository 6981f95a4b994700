use glam::{Mat4, Quat, Vec3};
use nestworld_common::{ClipPlanes, Pose};

use crate::error::CloneError;
use crate::projection::remap_depth;
use crate::reference::ReferenceViewpointState;

/// What a render runtime needs to draw one clone: pose and projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloneView {
    pub pose: Pose,
    pub projection: Mat4,
}

impl Default for CloneView {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            projection: Mat4::perspective_rh(60.0_f32.to_radians(), 1.0, 0.3, 1000.0),
        }
    }
}

impl CloneView {
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn rotation(&self) -> Quat {
        self.pose.rotation
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.pose.view_matrix()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

/// One nested viewpoint. Owns its view, which is overwritten every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneDescriptor {
    level: u32,
    scale: f32,
    view: CloneView,
    clip: Option<ClipPlanes>,
}

impl CloneDescriptor {
    pub(crate) fn new(level: u32, scale: f32) -> Self {
        Self {
            level,
            scale,
            view: CloneView::default(),
            clip: None,
        }
    }

    /// Nesting depth, starting at 1.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn view(&self) -> &CloneView {
        &self.view
    }

    /// Clip planes derived on the last successful update, `None` before the first.
    pub fn clip(&self) -> Option<ClipPlanes> {
        self.clip
    }

    /// Recompute this clone from the reference snapshot.
    ///
    /// On error nothing is written and the previous frame's view is kept.
    /// Deep levels far from the center can leave `f32` range; such results,
    /// and clip ranges that collapse from lost precision, are rejected.
    pub fn recompute(
        &mut self,
        center: Vec3,
        reference: &ReferenceViewpointState,
    ) -> Result<(), CloneError> {
        let position = clone_position(center, reference.position(), self.scale)?;
        let dist = axial_offset(reference.position(), position, reference.forward);
        let clip = reference.clip.offset(dist);
        if !(position.is_finite() && clip.is_ordered()) {
            return Err(CloneError::NumericOverflow {
                level: self.level,
                position,
                near: clip.near,
                far: clip.far,
            });
        }
        let projection = remap_depth(
            reference.projection,
            reference.depth_range,
            clip,
            reference.clip,
        )?;
        if !projection.is_finite() {
            return Err(CloneError::NumericOverflow {
                level: self.level,
                position,
                near: clip.near,
                far: clip.far,
            });
        }

        self.view = CloneView {
            pose: Pose::new(position, reference.rotation()),
            projection,
        };
        self.clip = Some(clip);
        Ok(())
    }
}

/// Inverse-scale `reference` about `center`: `C + (P - C) / s`.
pub fn clone_position(center: Vec3, reference: Vec3, scale: f32) -> Result<Vec3, CloneError> {
    if scale == 0.0 || !scale.is_finite() {
        return Err(CloneError::DegenerateScale(scale));
    }
    Ok(center + (reference - center) / scale)
}

/// Signed length of `reference - clone` along the unit `forward` axis.
///
/// Positive when the clone sits behind the reference.
pub fn axial_offset(reference: Vec3, clone: Vec3, forward: Vec3) -> f32 {
    (reference - clone).dot(forward)
}
