//! Depth remapping of perspective projection matrices.
//!
//! Only the two coefficients that encode the near and far planes are written.
//! Field of view, aspect ratio, off-center terms and handedness stay exactly
//! as they were in the base matrix.

use glam::Mat4;
use nestworld_common::ClipPlanes;
use serde::{Deserialize, Serialize};

use crate::error::CloneError;

/// Tolerance when checking the perspective-divide term for ±1.
const PERSPECTIVE_EPSILON: f32 = 1e-4;

/// Clip-space depth convention of a projection matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthRange {
    /// GL-style clip space, depth in `[-1, 1]`.
    NegativeOneToOne,
    /// wgpu / D3D / Vulkan style, depth in `[0, 1]`.
    #[default]
    ZeroToOne,
}

/// Perspective-divide term of a projection (`-1` right-handed, `+1` left-handed).
///
/// Returns `NotPerspective` for anything else, e.g. an orthographic matrix.
pub fn perspective_sign(m: &Mat4) -> Result<f32, CloneError> {
    let w = m.z_axis.w;
    if (w.abs() - 1.0).abs() > PERSPECTIVE_EPSILON || m.w_axis.w.abs() > PERSPECTIVE_EPSILON {
        return Err(CloneError::NotPerspective(w));
    }
    Ok(w.signum())
}

/// Return a copy of `base` whose depth mapping uses `new` instead of `old`.
///
/// The denominator is the width of the `old` range. Callers shift both planes
/// by the same distance, so the width is unchanged and the result is exactly
/// the projection `base` would have been built with for `new`.
pub fn remap_depth(
    base: Mat4,
    range: DepthRange,
    new: ClipPlanes,
    old: ClipPlanes,
) -> Result<Mat4, CloneError> {
    if !old.is_ordered() {
        return Err(CloneError::InvalidClipPlanes {
            near: old.near,
            far: old.far,
        });
    }
    let sign = perspective_sign(&base)?;
    let depth = old.depth();

    let (zz, wz) = match range {
        DepthRange::NegativeOneToOne => (
            sign * (new.far + new.near) / depth,
            -2.0 * new.far * new.near / depth,
        ),
        DepthRange::ZeroToOne => (sign * new.far / depth, -new.far * new.near / depth),
    };

    let mut out = base;
    out.z_axis.z = zz;
    out.w_axis.z = wz;
    Ok(out)
}
