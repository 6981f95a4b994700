use glam::Vec3;

/// Errors from clone configuration and per-clone recomputation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CloneError {
    #[error("base scale must lie in the open interval (0, 1), got {0}")]
    InvalidBaseScale(f32),
    #[error("clone level {level} has scale {scale:e}, below f32 normal range")]
    ScaleUnderflow { level: u32, scale: f32 },
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("reference forward must be unit length, got {0:?}")]
    NonUnitForward(Vec3),
    #[error("projection is not a perspective projection (perspective term {0})")]
    NotPerspective(f32),
    #[error("scale factor {0} cannot place a clone")]
    DegenerateScale(f32),
    #[error("clone count {count} exceeds the limit of {max}")]
    TooManyClones { count: usize, max: u32 },
    #[error("clone level {level} left f32 range (position {position:?}, near={near}, far={far})")]
    NumericOverflow {
        level: u32,
        position: Vec3,
        near: f32,
        far: f32,
    },
}
