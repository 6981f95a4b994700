use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use nestworld_locomotion::{FirstPersonController, FlatGround, FrameInput};
use nestworld_recursion::{CloneDiagnostics, CloneView, FrameOutcome, RecursiveViewpointManager};

use crate::scene::{SceneConfig, SceneError};

const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Result of a headless run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub frames: u64,
    pub updated_frames: u64,
    pub skipped_frames: u64,
    pub final_eye: Vec3,
    pub diagnostics: Vec<CloneDiagnostics>,
    pub views: Vec<CloneView>,
}

/// Scripted input: walk forward while turning slowly, jump every two seconds.
pub fn scripted_input(frame: u64, dt: f32) -> FrameInput {
    let t = frame as f32 * dt;
    let jump_period = (2.0 / dt).round().max(1.0) as u64;
    FrameInput {
        forward: 1.0,
        strafe: (t * 0.5).sin() * 0.5,
        look_delta: Vec2::new(0.5, (t * 0.8).sin() * 0.3),
        jump_pressed: frame > 0 && frame % jump_period == 0,
    }
}

/// Run `frames` frames: controller update, fixed update, integration, then
/// the late clone update against the state committed this frame.
pub fn run(scene: &SceneConfig, frames: u64, dt: f32) -> Result<SimulationReport, SceneError> {
    let _span = tracing::info_span!("simulate", frames, dt).entered();

    let controller = Rc::new(RefCell::new(FirstPersonController::new(
        scene.locomotion,
        scene.camera,
        scene.capsule,
        scene.start,
    )?));
    let mut clones =
        RecursiveViewpointManager::new(&scene.clones, scene.center, Rc::clone(&controller))?;
    let ground = FlatGround::new(0.0);

    let mut updated_frames = 0;
    let mut skipped_frames = 0;
    for frame in 0..frames {
        {
            let mut c = controller.borrow_mut();
            c.update(frame, &scripted_input(frame, dt), dt);
            c.fixed_update(&ground, dt);
            c.integrate(GRAVITY, dt);
            c.settle_on_floor(ground.height);
        }

        match clones.late_update(frame) {
            FrameOutcome::Updated { .. } => updated_frames += 1,
            FrameOutcome::Skipped(reason) => {
                skipped_frames += 1;
                tracing::warn!(frame, ?reason, "clone update skipped");
            }
        }
    }

    let final_eye = controller.borrow().eye_position();
    tracing::info!(updated_frames, skipped_frames, "simulation complete");

    Ok(SimulationReport {
        frames,
        updated_frames,
        skipped_frames,
        final_eye,
        diagnostics: clones.diagnostics().collect(),
        views: clones.clones().iter().map(|c| *c.view()).collect(),
    })
}
