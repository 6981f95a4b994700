use glam::{Mat4, Vec3};
use nestworld_common::ClipPlanes;
use serde::{Deserialize, Serialize};

use crate::error::LocomotionError;

/// Movement and look tuning for [`crate::FirstPersonController`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Horizontal acceleration toward the target speed while grounded.
    pub ground_acceleration: f32,
    /// Same, while airborne.
    pub air_acceleration: f32,
    pub max_speed: f32,
    /// Degrees of rotation per unit of mouse motion.
    pub look_sensitivity: f32,
    pub min_pitch_degrees: f32,
    pub max_pitch_degrees: f32,
    /// How far below the capsule the ground probe reaches.
    pub ground_probe_distance: f32,
    /// Upward speed applied by a jump.
    pub jump_power: f32,
    /// Seconds a jump press stays buffered waiting for ground contact.
    pub jump_buffer: f32,
    /// Mouse up looks down when set.
    pub invert_y: bool,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            ground_acceleration: 20.0,
            air_acceleration: 10.0,
            max_speed: 5.0,
            look_sensitivity: 1.0,
            min_pitch_degrees: -80.0,
            max_pitch_degrees: 80.0,
            ground_probe_distance: 0.1,
            jump_power: 5.0,
            jump_buffer: 0.1,
            invert_y: false,
        }
    }
}

impl LocomotionConfig {
    pub fn validate(&self) -> Result<(), LocomotionError> {
        for (name, value) in [
            ("ground_acceleration", self.ground_acceleration),
            ("air_acceleration", self.air_acceleration),
            ("max_speed", self.max_speed),
            ("look_sensitivity", self.look_sensitivity),
            ("ground_probe_distance", self.ground_probe_distance),
            ("jump_power", self.jump_power),
            ("jump_buffer", self.jump_buffer),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LocomotionError::NegativeParameter { name, value });
            }
        }

        let (min, max) = (self.min_pitch_degrees, self.max_pitch_degrees);
        if !(min >= -90.0 && max <= 90.0 && min < max) {
            return Err(LocomotionError::InvalidPitchLimits { min, max });
        }
        Ok(())
    }
}

/// Lens of the reference camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLens {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Eye height above the body origin.
    pub eye_height: f32,
}

impl Default for CameraLens {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.3,
            far: 1000.0,
            eye_height: 0.8,
        }
    }
}

impl CameraLens {
    pub fn validate(&self) -> Result<(), LocomotionError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(LocomotionError::InvalidFov(self.fov_degrees));
        }
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return Err(LocomotionError::InvalidAspect(self.aspect));
        }
        if !(self.clip().is_ordered() && self.near > 0.0) {
            return Err(LocomotionError::InvalidClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        if !self.eye_height.is_finite() {
            return Err(LocomotionError::NegativeParameter {
                name: "eye_height",
                value: self.eye_height,
            });
        }
        Ok(())
    }

    pub fn clip(&self) -> ClipPlanes {
        ClipPlanes::new(self.near, self.far)
    }

    /// Right-handed perspective with depth in `[0, 1]`.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Local axis the capsule's length runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CapsuleAxis {
    X,
    #[default]
    Y,
    Z,
}

/// Body collision shape, in the body's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capsule {
    pub center: Vec3,
    pub height: f32,
    pub radius: f32,
    pub axis: CapsuleAxis,
}

impl Default for Capsule {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            height: 2.0,
            radius: 0.5,
            axis: CapsuleAxis::Y,
        }
    }
}

impl Capsule {
    pub fn validate(&self) -> Result<(), LocomotionError> {
        if !(self.radius > 0.0 && self.height.is_finite() && 2.0 * self.radius <= self.height) {
            return Err(LocomotionError::InvalidCapsule {
                radius: self.radius,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Center of the lower hemisphere, in local space.
    pub fn lower_sphere_center(&self) -> Vec3 {
        let mut c = self.center;
        if self.axis == CapsuleAxis::Y {
            c.y -= self.height / 2.0 - self.radius;
        }
        c
    }

    /// Lowest local point of the shape.
    pub fn bottom(&self) -> f32 {
        self.lower_sphere_center().y - self.radius
    }
}
