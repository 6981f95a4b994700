use glam::Vec3;

use crate::config::CloneConfig;
use crate::descriptor::CloneDescriptor;
use crate::error::CloneError;
use crate::reference::{ReferenceViewpoint, ReferenceViewpointState};

/// Fixed pivot about which every clone is scaled. Set once, never moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecursionCenter(Vec3);

impl RecursionCenter {
    pub fn new(position: Vec3) -> Self {
        Self(position)
    }

    pub fn position(&self) -> Vec3 {
        self.0
    }
}

/// Why a frame's recomputation was skipped. Prior clone state is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The reference returned nothing.
    NoReference,
    /// The snapshot was published for an earlier frame: the reference has not
    /// run its own update yet.
    StaleReference { published: u64, expected: u64 },
    /// The snapshot was published for a later frame than the one being drawn.
    AheadOfFrame { published: u64, expected: u64 },
    /// The snapshot failed validation.
    InvalidReference(CloneError),
}

/// Result of one late-update pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Updated { updated: usize, skipped: usize },
    Skipped(SkipReason),
}

/// One row of per-clone diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloneDiagnostics {
    pub level: u32,
    pub scale: f32,
    pub near: Option<f32>,
    pub far: Option<f32>,
}

/// Owns the nested clones and recomputes them from the reference each frame.
///
/// The descriptor list is built once in [`RecursiveViewpointManager::new`] and
/// never grows or shrinks afterwards.
pub struct RecursiveViewpointManager<R> {
    center: RecursionCenter,
    reference: R,
    clones: Vec<CloneDescriptor>,
}

impl<R: ReferenceViewpoint> RecursiveViewpointManager<R> {
    /// Validate `config` and build one descriptor per nesting level.
    pub fn new(config: &CloneConfig, center: Vec3, reference: R) -> Result<Self, CloneError> {
        let clones: Vec<CloneDescriptor> = config
            .scales()?
            .into_iter()
            .map(|(level, scale)| CloneDescriptor::new(level, scale))
            .collect();

        tracing::debug!(
            count = clones.len(),
            base_scale = config.base_scale,
            ?center,
            "clone descriptors initialized"
        );

        Ok(Self {
            center: RecursionCenter::new(center),
            reference,
            clones,
        })
    }

    pub fn center(&self) -> RecursionCenter {
        self.center
    }

    pub fn clones(&self) -> &[CloneDescriptor] {
        &self.clones
    }

    pub fn reference(&self) -> &R {
        &self.reference
    }

    /// Late-phase update for `frame`.
    ///
    /// Must run after the reference camera has published its state for the
    /// same frame. A snapshot stamped with an earlier frame is stale and one
    /// stamped with a later frame is out of order; both are skipped.
    pub fn late_update(&mut self, frame: u64) -> FrameOutcome {
        let Some(state) = self.reference.query() else {
            tracing::debug!(frame, "no reference viewpoint, keeping previous clones");
            return FrameOutcome::Skipped(SkipReason::NoReference);
        };
        if state.frame < frame {
            tracing::warn!(
                published = state.frame,
                expected = frame,
                "reference snapshot is stale, skipping clone update"
            );
            return FrameOutcome::Skipped(SkipReason::StaleReference {
                published: state.frame,
                expected: frame,
            });
        }
        if state.frame > frame {
            tracing::warn!(
                published = state.frame,
                expected = frame,
                "reference snapshot is ahead of the frame, skipping clone update"
            );
            return FrameOutcome::Skipped(SkipReason::AheadOfFrame {
                published: state.frame,
                expected: frame,
            });
        }
        self.update_from(&state)
    }

    /// Recompute every clone from an explicit snapshot.
    pub fn update_from(&mut self, state: &ReferenceViewpointState) -> FrameOutcome {
        let _span = tracing::info_span!("recursion_update", frame = state.frame).entered();

        if let Err(e) = state.validate() {
            tracing::warn!(error = %e, "invalid reference viewpoint");
            return FrameOutcome::Skipped(SkipReason::InvalidReference(e));
        }

        let center = self.center.position();
        let mut updated = 0;
        let mut skipped = 0;
        for clone in &mut self.clones {
            match clone.recompute(center, state) {
                Ok(()) => {
                    updated += 1;
                    if let Some(clip) = clone.clip() {
                        tracing::trace!(
                            level = clone.level(),
                            scale = clone.scale(),
                            near = clip.near,
                            far = clip.far,
                            "clone updated"
                        );
                    }
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(level = clone.level(), error = %e, "clone update skipped");
                }
            }
        }

        FrameOutcome::Updated { updated, skipped }
    }

    /// `(level, scale, near, far)` for every clone, in level order.
    pub fn diagnostics(&self) -> impl Iterator<Item = CloneDiagnostics> + '_ {
        self.clones.iter().map(|c| CloneDiagnostics {
            level: c.level(),
            scale: c.scale(),
            near: c.clip().map(|p| p.near),
            far: c.clip().map(|p| p.far),
        })
    }
}
