use glam::{Quat, Vec2, Vec3};
use nestworld_common::Pose;
use nestworld_recursion::{DepthRange, ReferenceViewpoint, ReferenceViewpointState};

use crate::config::{CameraLens, Capsule, LocomotionConfig};
use crate::error::LocomotionError;
use crate::input::FrameInput;
use crate::probe::GroundProbe;

/// First-person body with a head-mounted camera.
///
/// Split in two phases like a game loop: [`update`](Self::update) runs once
/// per rendered frame (look, input latching, jump buffering) and
/// [`fixed_update`](Self::fixed_update) runs at the physics rate (ground
/// probe, acceleration, jump). Yaw and pitch are kept in degrees; positive
/// yaw turns right, positive pitch looks up.
#[derive(Debug, Clone)]
pub struct FirstPersonController {
    config: LocomotionConfig,
    lens: CameraLens,
    capsule: Capsule,
    pub position: Vec3,
    pub velocity: Vec3,
    yaw: f32,
    pitch: f32,
    axes: Vec2,
    since_jump_press: f32,
    grounded: bool,
    frame: u64,
}

impl FirstPersonController {
    pub fn new(
        config: LocomotionConfig,
        lens: CameraLens,
        capsule: Capsule,
        position: Vec3,
    ) -> Result<Self, LocomotionError> {
        config.validate()?;
        lens.validate()?;
        capsule.validate()?;
        Ok(Self {
            config,
            lens,
            capsule,
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            axes: Vec2::ZERO,
            since_jump_press: f32::INFINITY,
            grounded: false,
            frame: 0,
        })
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn lens(&self) -> &CameraLens {
        &self.lens
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Frame index of the last [`update`](Self::update).
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Body rotation: yaw only.
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Camera rotation: body yaw, then head pitch.
    pub fn eye_rotation(&self) -> Quat {
        self.body_rotation() * Quat::from_rotation_x(self.pitch.to_radians())
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.lens.eye_height, 0.0)
    }

    pub fn eye_pose(&self) -> Pose {
        Pose::new(self.eye_position(), self.eye_rotation())
    }

    /// Per-frame phase.
    pub fn update(&mut self, frame: u64, input: &FrameInput, dt: f32) {
        self.frame = frame;
        self.apply_look(input.look_delta);

        self.axes = input.axes();
        self.since_jump_press += dt;
        if input.jump_pressed {
            self.since_jump_press = 0.0;
        }
    }

    fn apply_look(&mut self, delta: Vec2) {
        let sens = self.config.look_sensitivity;
        let dy = if self.config.invert_y { -delta.y } else { delta.y };

        self.yaw = (self.yaw + delta.x * sens).rem_euclid(360.0);
        self.pitch = clamp_pitch(
            self.pitch + dy * sens,
            self.config.min_pitch_degrees,
            self.config.max_pitch_degrees,
        );
    }

    /// Fixed-rate phase. Returns whether the body is grounded.
    pub fn fixed_update(&mut self, probe: &impl GroundProbe, dt: f32) -> bool {
        self.grounded = self.probe_ground(probe);
        self.apply_movement(dt);
        self.apply_jump();
        self.grounded
    }

    /// World-space sphere the ground probe tests.
    pub fn probe_sphere(&self) -> (Vec3, f32) {
        let mut local = self.capsule.lower_sphere_center();
        local.y -= self.config.ground_probe_distance;
        (
            self.position + self.body_rotation() * local,
            self.capsule.radius,
        )
    }

    fn probe_ground(&self, probe: &impl GroundProbe) -> bool {
        let (center, radius) = self.probe_sphere();
        probe.overlaps_ground(center, radius)
    }

    fn apply_movement(&mut self, dt: f32) {
        let forward = self.body_rotation() * Vec3::NEG_Z;
        let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        let right = forward.cross(Vec3::Y);

        let accel = if self.grounded {
            self.config.ground_acceleration
        } else {
            self.config.air_acceleration
        };
        let max_delta = accel * dt;

        let forward_speed = move_towards(
            self.velocity.dot(forward),
            self.config.max_speed * self.axes.y,
            max_delta,
        );
        let right_speed = move_towards(
            self.velocity.dot(right),
            self.config.max_speed * self.axes.x,
            max_delta,
        );

        let horizontal = forward * forward_speed + right * right_speed;
        self.velocity = Vec3::new(horizontal.x, self.velocity.y, horizontal.z);
    }

    fn apply_jump(&mut self) {
        if self.grounded && self.since_jump_press < self.config.jump_buffer {
            self.velocity.y = self.config.jump_power;
            self.since_jump_press = f32::INFINITY;
            tracing::debug!(frame = self.frame, "jump");
        }
    }

    /// Explicit Euler step for headless runs. No collision response.
    pub fn integrate(&mut self, gravity: Vec3, dt: f32) {
        self.velocity += gravity * dt;
        self.position += self.velocity * dt;
    }

    /// Push the body up onto a floor at `height` and cancel downward speed.
    pub fn settle_on_floor(&mut self, height: f32) {
        let bottom = self.position.y + self.capsule.bottom();
        if bottom < height {
            self.position.y += height - bottom;
            self.velocity.y = self.velocity.y.max(0.0);
        }
    }

    /// Reference snapshot for the clone manager.
    pub fn snapshot(&self) -> ReferenceViewpointState {
        ReferenceViewpointState::from_pose(
            self.frame,
            self.eye_pose(),
            self.lens.clip(),
            self.lens.projection(),
            DepthRange::ZeroToOne,
        )
    }
}

impl ReferenceViewpoint for FirstPersonController {
    fn query(&self) -> Option<ReferenceViewpointState> {
        Some(self.snapshot())
    }
}

/// Wrap into `(-180, 180]` then clamp to the limits.
pub fn clamp_pitch(pitch: f32, min: f32, max: f32) -> f32 {
    let mut p = pitch;
    if p > 180.0 {
        p -= 360.0;
    } else if p <= -180.0 {
        p += 360.0;
    }
    p.clamp(min, max)
}

/// Step `current` toward `target` by at most `max_delta`, never past it.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if current > target {
        (current - max_delta).max(target)
    } else if current < target {
        (current + max_delta).min(target)
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{FlatGround, NoGround};

    const DT: f32 = 0.02;

    fn controller() -> FirstPersonController {
        FirstPersonController::new(
            LocomotionConfig::default(),
            CameraLens::default(),
            Capsule::default(),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn rejects_bad_lens() {
        let lens = CameraLens {
            near: 2.0,
            far: 1.0,
            ..CameraLens::default()
        };
        let r = FirstPersonController::new(
            LocomotionConfig::default(),
            lens,
            Capsule::default(),
            Vec3::ZERO,
        );
        assert!(r.is_err());
    }

    #[test]
    fn move_towards_never_overshoots() {
        assert_eq!(move_towards(0.0, 5.0, 0.4), 0.4);
        assert_eq!(move_towards(4.9, 5.0, 0.4), 5.0);
        assert_eq!(move_towards(5.0, -5.0, 0.4), 4.6);
        assert_eq!(move_towards(-4.9, -5.0, 0.4), -5.0);
        assert_eq!(move_towards(2.0, 2.0, 0.4), 2.0);
    }

    #[test]
    fn pitch_wraps_and_clamps() {
        assert_eq!(clamp_pitch(30.0, -80.0, 80.0), 30.0);
        assert_eq!(clamp_pitch(120.0, -80.0, 80.0), 80.0);
        // 350 degrees is 10 degrees down.
        assert_eq!(clamp_pitch(350.0, -80.0, 80.0), -10.0);
        assert_eq!(clamp_pitch(-100.0, -80.0, 80.0), -80.0);
    }

    #[test]
    fn look_accumulates_yaw_and_clamps_pitch() {
        let mut c = controller();
        c.update(0, &FrameInput::look(90.0, 500.0), DT);
        assert_eq!(c.yaw(), 90.0);
        assert_eq!(c.pitch(), 80.0);

        c.update(1, &FrameInput::look(300.0, -1000.0), DT);
        assert_eq!(c.yaw(), 30.0);
        assert_eq!(c.pitch(), -80.0);
    }

    #[test]
    fn invert_y_flips_pitch() {
        let mut c = FirstPersonController::new(
            LocomotionConfig {
                invert_y: true,
                ..LocomotionConfig::default()
            },
            CameraLens::default(),
            Capsule::default(),
            Vec3::ZERO,
        )
        .unwrap();
        c.update(0, &FrameInput::look(0.0, 10.0), DT);
        assert_eq!(c.pitch(), -10.0);
    }

    #[test]
    fn positive_yaw_turns_right() {
        let mut c = controller();
        c.update(0, &FrameInput::look(90.0, 0.0), DT);
        let fwd = c.eye_rotation() * Vec3::NEG_Z;
        assert!(fwd.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn positive_pitch_looks_up() {
        let mut c = controller();
        c.update(0, &FrameInput::look(0.0, 30.0), DT);
        let fwd = c.eye_rotation() * Vec3::NEG_Z;
        assert!(fwd.y > 0.4);
    }

    #[test]
    fn accelerates_toward_max_speed_on_ground() {
        let mut c = controller();
        c.update(0, &FrameInput::walk(1.0, 0.0), DT);
        c.fixed_update(&FlatGround::new(0.0), DT);
        assert!(c.is_grounded());
        // 20 units/s^2 for one 0.02 s step.
        assert!(c.velocity.abs_diff_eq(Vec3::new(0.0, 0.0, -0.4), 1e-5));

        for _ in 0..100 {
            c.fixed_update(&FlatGround::new(0.0), DT);
        }
        assert!((c.velocity.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn air_control_is_weaker() {
        let mut c = controller();
        c.update(0, &FrameInput::walk(0.0, 1.0), DT);
        c.fixed_update(&NoGround, DT);
        assert!(!c.is_grounded());
        assert!(c.velocity.abs_diff_eq(Vec3::new(0.2, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn vertical_speed_is_preserved_by_movement() {
        let mut c = controller();
        c.velocity = Vec3::new(0.0, -3.0, 0.0);
        c.update(0, &FrameInput::walk(1.0, 1.0), DT);
        c.fixed_update(&NoGround, DT);
        assert_eq!(c.velocity.y, -3.0);
    }

    #[test]
    fn buffered_jump_fires_on_landing() {
        let mut c = controller();
        c.update(0, &FrameInput::jump(), DT);
        c.fixed_update(&NoGround, DT);
        assert_eq!(c.velocity.y, 0.0);

        c.update(1, &FrameInput::default(), DT);
        c.fixed_update(&FlatGround::new(0.0), DT);
        assert_eq!(c.velocity.y, 5.0);

        // Consumed: a second grounded step does not re-fire.
        c.velocity.y = 0.0;
        c.fixed_update(&FlatGround::new(0.0), DT);
        assert_eq!(c.velocity.y, 0.0);
    }

    #[test]
    fn jump_buffer_expires() {
        let mut c = controller();
        c.update(0, &FrameInput::jump(), DT);
        for f in 1..10 {
            c.update(f, &FrameInput::default(), DT);
        }
        c.fixed_update(&FlatGround::new(0.0), DT);
        assert_eq!(c.velocity.y, 0.0);
    }

    #[test]
    fn probe_sits_below_capsule() {
        let c = controller();
        let (center, radius) = c.probe_sphere();
        assert!(center.abs_diff_eq(Vec3::new(0.0, 0.4, 0.0), 1e-6));
        assert_eq!(radius, 0.5);
    }

    #[test]
    fn settles_on_floor() {
        let mut c = controller();
        c.position.y = 0.5;
        c.velocity.y = -2.0;
        c.settle_on_floor(0.0);
        assert_eq!(c.position.y, 1.0);
        assert_eq!(c.velocity.y, 0.0);
    }

    #[test]
    fn snapshot_is_a_valid_reference() {
        let mut c = controller();
        c.update(7, &FrameInput::look(33.0, -12.0), DT);
        let s = c.query().expect("always present");
        assert_eq!(s.frame, 7);
        assert!(s.validate().is_ok());
        assert_eq!(s.pose.rotation, c.eye_rotation());
        assert_eq!(s.position(), c.eye_position());
    }
}
