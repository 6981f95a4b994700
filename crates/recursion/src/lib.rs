//! Recursive viewpoints: nested clone cameras, each a uniformly scaled copy
//! of one reference camera about a fixed recursion center.
//!
//! # Invariants
//! - The clone list is fixed once the manager is built.
//! - Clone orientation is always the reference orientation.
//! - Depth remapping moves both clip planes by the same amount, so the clip
//!   range width equals the reference's.
//! - Runtime faults skip the affected frame or clone and keep prior state.

mod config;
mod descriptor;
mod error;
mod manager;
mod projection;
mod reference;

pub use config::{CloneConfig, MAX_CLONES};
pub use descriptor::{CloneDescriptor, CloneView, axial_offset, clone_position};
pub use error::CloneError;
pub use manager::{
    CloneDiagnostics, FrameOutcome, RecursionCenter, RecursiveViewpointManager, SkipReason,
};
pub use projection::{DepthRange, perspective_sign, remap_depth};
pub use reference::{ReferenceSlot, ReferenceViewpoint, ReferenceViewpointState};

pub fn crate_info() -> &'static str {
    "nestworld-recursion v0.1.0"
}
