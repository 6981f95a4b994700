use glam::Vec2;

/// Per-frame input sampled by the host and handed to the controller.
///
/// The controller never reads devices; any embodiment that can fill this
/// struct can drive it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Forward/back axis, `+1` forward.
    pub forward: f32,
    /// Strafe axis, `+1` right.
    pub strafe: f32,
    /// Mouse motion this frame: `x` right, `y` up.
    pub look_delta: Vec2,
    /// Jump button went down this frame.
    pub jump_pressed: bool,
}

impl FrameInput {
    pub fn walk(forward: f32, strafe: f32) -> Self {
        Self {
            forward,
            strafe,
            ..Self::default()
        }
    }

    pub fn look(dx: f32, dy: f32) -> Self {
        Self {
            look_delta: Vec2::new(dx, dy),
            ..Self::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Self::default()
        }
    }

    /// Movement axes limited to `[-1, 1]`, NaN treated as released.
    pub fn axes(&self) -> Vec2 {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        Vec2::new(clamp(self.strafe), clamp(self.forward))
    }
}
