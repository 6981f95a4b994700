//! Shared value types for the nestworld crates.
//!
//! # Invariants
//! - Types here are plain `Copy` values; nothing owns a viewpoint by reference.

mod types;

pub use types::{ClipPlanes, Pose};

pub fn crate_info() -> &'static str {
    "nestworld-common v0.1.0"
}
