/// Errors from controller configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocomotionError {
    #[error("lens clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("field of view must lie in (0, 180) degrees, got {0}")]
    InvalidFov(f32),
    #[error("aspect ratio must be positive, got {0}")]
    InvalidAspect(f32),
    #[error("pitch limits must satisfy -90 <= min < max <= 90, got min={min} max={max}")]
    InvalidPitchLimits { min: f32, max: f32 },
    #[error("{name} must be a non-negative finite number, got {value}")]
    NegativeParameter { name: &'static str, value: f32 },
    #[error("capsule must satisfy 0 < radius and 2 * radius <= height, got radius={radius} height={height}")]
    InvalidCapsule { radius: f32, height: f32 },
}
