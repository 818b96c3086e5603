use serde::{Deserialize, Serialize};

/// Tuning constants for a [`Camera`](crate::Camera).
///
/// Missing fields fall back to their defaults when deserialized, so a config
/// file only has to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Degrees of yaw/pitch per unit of cursor delta.
    pub mouse_sensitivity: f32,
    /// Degrees of field of view per unit of scroll.
    pub scroll_sensitivity: f32,
    /// Initial vertical field of view in degrees.
    pub fov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            speed: 2.5,
            mouse_sensitivity: 0.1,
            scroll_sensitivity: 2.0,
            fov: 45.0,
        }
    }
}
