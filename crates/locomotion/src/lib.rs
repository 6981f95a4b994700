//! First-person locomotion: the controller that owns the reference camera.
//!
//! # Invariants
//! - Pure logic. Devices, physics bodies and colliders belong to the host;
//!   the controller only sees [`FrameInput`] and a [`GroundProbe`].
//! - Pitch always lies within the configured limits after a look update.
//! - Horizontal speed approaches its target without overshooting it.

mod config;
mod controller;
mod error;
mod input;
mod probe;

pub use config::{CameraLens, Capsule, CapsuleAxis, LocomotionConfig};
pub use controller::{FirstPersonController, clamp_pitch, move_towards};
pub use error::LocomotionError;
pub use input::FrameInput;
pub use probe::{FlatGround, GroundProbe, NoGround};

pub fn crate_info() -> &'static str {
    "nestworld-locomotion v0.1.0"
}
