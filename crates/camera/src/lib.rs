//! Free-fly camera for the render loop.
//!
//! Orientation is stored as yaw/pitch in degrees. The forward/right/up basis is
//! derived from those angles and a fixed world-up axis, and is recomputed after
//! every orientation change. The camera never rolls.
//!
//! # Invariants
//! - Pitch stays within [-89°, 89°].
//! - Field of view stays within [1°, 45°].
//! - The basis is orthonormal after every mutation.
//! - Movement never changes orientation.

mod camera;
mod movement;
mod settings;

pub use camera::{Camera, CameraError, MAX_FOV, MIN_FOV, PITCH_LIMIT};
pub use movement::Movement;
pub use settings::CameraSettings;

pub fn crate_info() -> &'static str {
    "vantage-camera v0.1.0"
}
