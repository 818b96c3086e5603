use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vantage_camera::CameraSettings;

/// Errors from loading the desktop config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Desktop host configuration, read from YAML.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub clear_color: [f32; 4],
    pub near: f32,
    pub far: f32,
    pub camera_position: Vec3,
    pub camera_yaw: f32,
    pub camera_pitch: f32,
    pub camera: CameraSettings,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        let shaders = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        Self {
            title: "vantage".into(),
            width: 800,
            height: 600,
            vertex_shader: shaders.join("cube.vert"),
            fragment_shader: shaders.join("cube.frag"),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            near: 0.1,
            far: 100.0,
            camera_position: Vec3::new(0.0, 0.0, 3.0),
            camera_yaw: -90.0,
            camera_pitch: 0.0,
            camera: CameraSettings::default(),
        }
    }
}

impl DesktopConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
