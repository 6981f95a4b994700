use std::path::Path;

use glam::Vec3;
use nestworld_locomotion::{CameraLens, Capsule, LocomotionConfig, LocomotionError};
use nestworld_recursion::{CloneConfig, CloneError};
use serde::{Deserialize, Serialize};

/// Errors from loading a scene file.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("clone config: {0}")]
    Clones(#[from] CloneError),
    #[error("locomotion config: {0}")]
    Locomotion(#[from] LocomotionError),
}

/// Everything a headless run needs. Every section has defaults, so a partial
/// JSON file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub clones: CloneConfig,
    /// Recursion center in world space.
    pub center: Vec3,
    /// Body position at frame 0.
    pub start: Vec3,
    pub camera: CameraLens,
    pub capsule: Capsule,
    pub locomotion: LocomotionConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clones: CloneConfig::default(),
            center: Vec3::ZERO,
            start: Vec3::new(0.0, 1.0, 10.0),
            camera: CameraLens::default(),
            capsule: Capsule::default(),
            locomotion: LocomotionConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Read, parse and validate a scene file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let data = std::fs::read_to_string(path)?;
        let scene: Self = serde_json::from_str(&data)?;
        scene.validate()?;
        tracing::debug!(path = %path.display(), "scene loaded");
        Ok(scene)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        self.clones.validate()?;
        self.camera.validate()?;
        self.capsule.validate()?;
        self.locomotion.validate()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        serde_json::to_writer_pretty(std::fs::File::create(path)?, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, r#"{{ "clones": {{ "count": 3 }}, "center": [1.0, 0.0, 2.0] }}"#).unwrap();

        let scene = SceneConfig::load(&path).unwrap();
        assert_eq!(scene.clones.count, 3);
        assert_eq!(scene.clones.base_scale, 0.2);
        assert_eq!(scene.center, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(scene.camera, CameraLens::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let scene = SceneConfig {
            center: Vec3::new(0.0, 5.0, 0.0),
            ..SceneConfig::default()
        };
        scene.save(&path).unwrap();
        assert_eq!(SceneConfig::load(&path).unwrap(), scene);
    }

    #[test]
    fn unit_base_scale_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{ "clones": { "base_scale": 1.0 } }"#).unwrap();
        assert!(matches!(
            SceneConfig::load(&path),
            Err(SceneError::Clones(CloneError::InvalidBaseScale(_)))
        ));
    }

    #[test]
    fn degenerate_lens_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{ "camera": { "near": 10.0, "far": 10.0 } }"#).unwrap();
        assert!(matches!(
            SceneConfig::load(&path),
            Err(SceneError::Locomotion(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let r = SceneConfig::load(&dir.path().join("nope.json"));
        assert!(matches!(r, Err(SceneError::Io(_))));
    }
}
