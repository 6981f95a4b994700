use glam::Vec3;

/// Sphere-overlap query against walkable geometry.
///
/// Implementers must not report the controller's own body as ground.
pub trait GroundProbe {
    fn overlaps_ground(&self, center: Vec3, radius: f32) -> bool;
}

impl<F: Fn(Vec3, f32) -> bool> GroundProbe for F {
    fn overlaps_ground(&self, center: Vec3, radius: f32) -> bool {
        self(center, radius)
    }
}

/// Infinite horizontal plane at `height`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl GroundProbe for FlatGround {
    fn overlaps_ground(&self, center: Vec3, radius: f32) -> bool {
        center.y - radius <= self.height
    }
}

/// Nothing to stand on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoGround;

impl GroundProbe for NoGround {
    fn overlaps_ground(&self, _center: Vec3, _radius: f32) -> bool {
        false
    }
}
