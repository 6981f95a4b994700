use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::{Mat4, Quat, Vec3};
use nestworld_common::{ClipPlanes, Pose};

use crate::error::CloneError;
use crate::projection::{DepthRange, perspective_sign};

/// Value snapshot of the reference camera for one frame.
///
/// Read by the manager and dropped at the end of the same frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceViewpointState {
    /// Frame index the snapshot was published for.
    pub frame: u64,
    pub pose: Pose,
    /// Unit view direction in world space.
    pub forward: Vec3,
    pub clip: ClipPlanes,
    /// Base perspective projection built for `clip`.
    pub projection: Mat4,
    pub depth_range: DepthRange,
}

impl ReferenceViewpointState {
    /// Build a snapshot whose forward direction is derived from the pose.
    pub fn from_pose(
        frame: u64,
        pose: Pose,
        clip: ClipPlanes,
        projection: Mat4,
        depth_range: DepthRange,
    ) -> Self {
        Self {
            frame,
            pose,
            forward: pose.forward(),
            clip,
            projection,
            depth_range,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn rotation(&self) -> Quat {
        self.pose.rotation
    }

    /// Reject snapshots the clone computation cannot use.
    pub fn validate(&self) -> Result<(), CloneError> {
        let ClipPlanes { near, far } = self.clip;
        if !(self.clip.is_ordered() && near > 0.0) {
            return Err(CloneError::InvalidClipPlanes { near, far });
        }
        if !self.forward.is_normalized() {
            return Err(CloneError::NonUnitForward(self.forward));
        }
        perspective_sign(&self.projection)?;
        Ok(())
    }
}

/// Source of the reference camera's live state.
///
/// Returns `None` when no reference is available this frame.
pub trait ReferenceViewpoint {
    fn query(&self) -> Option<ReferenceViewpointState>;
}

impl<T: ReferenceViewpoint + ?Sized> ReferenceViewpoint for &T {
    fn query(&self) -> Option<ReferenceViewpointState> {
        (**self).query()
    }
}

/// A provider shared with the code that drives it.
///
/// A provider that is mutably borrowed (mid-update) answers `None`.
impl<T: ReferenceViewpoint + ?Sized> ReferenceViewpoint for Rc<RefCell<T>> {
    fn query(&self) -> Option<ReferenceViewpointState> {
        self.try_borrow().ok().and_then(|p| p.query())
    }
}

/// Single-threaded published snapshot.
///
/// The reference camera publishes into one clone of the slot after its own
/// update; the manager holds another clone and reads it in the late phase.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSlot(Rc<Cell<Option<ReferenceViewpointState>>>);

impl ReferenceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, state: ReferenceViewpointState) {
        self.0.set(Some(state));
    }

    pub fn clear(&self) {
        self.0.set(None);
    }

    pub fn is_empty(&self) -> bool {
        self.0.get().is_none()
    }
}

impl ReferenceViewpoint for ReferenceSlot {
    fn query(&self) -> Option<ReferenceViewpointState> {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(frame: u64) -> ReferenceViewpointState {
        let clip = ClipPlanes::new(0.3, 1000.0);
        ReferenceViewpointState::from_pose(
            frame,
            Pose::new(Vec3::new(0.0, 1.0, 10.0), Quat::IDENTITY),
            clip,
            Mat4::perspective_rh(1.0, 1.5, clip.near, clip.far),
            DepthRange::ZeroToOne,
        )
    }

    struct Fixed(ReferenceViewpointState);

    impl ReferenceViewpoint for Fixed {
        fn query(&self) -> Option<ReferenceViewpointState> {
            Some(self.0)
        }
    }

    #[test]
    fn forward_derived_from_pose() {
        let s = state(0);
        assert_eq!(s.forward, Vec3::NEG_Z);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn slot_shares_published_state() {
        let slot = ReferenceSlot::new();
        let reader = slot.clone();
        assert!(reader.query().is_none());

        slot.publish(state(3));
        assert_eq!(reader.query().map(|s| s.frame), Some(3));

        slot.clear();
        assert!(reader.is_empty());
    }

    #[test]
    fn shared_provider_mid_update_is_missing() {
        let shared = Rc::new(RefCell::new(Fixed(state(1))));
        assert!(shared.query().is_some());

        let _guard = shared.borrow_mut();
        assert!(shared.query().is_none());
    }

    #[test]
    fn validate_rejects_degenerate_clip() {
        let mut s = state(0);
        s.clip = ClipPlanes::new(10.0, 10.0);
        assert!(matches!(
            s.validate(),
            Err(CloneError::InvalidClipPlanes { .. })
        ));

        s.clip = ClipPlanes::new(0.0, 10.0);
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_unit_forward() {
        let mut s = state(0);
        s.forward = Vec3::new(0.0, 0.0, -2.0);
        assert!(matches!(s.validate(), Err(CloneError::NonUnitForward(_))));
    }

    #[test]
    fn validate_rejects_orthographic_base() {
        let mut s = state(0);
        s.projection = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.3, 1000.0);
        assert!(matches!(s.validate(), Err(CloneError::NotPerspective(_))));
    }
}
