use vantage_camera::{Camera, Movement};

/// A camera action produced from input.
///
/// Window events and key polling both reduce to actions; the camera only ever
/// sees these, never raw events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move along the camera basis for this frame.
    Move(Movement),
    /// Rotate by a pointer delta. Positive `dy` means the pointer moved up.
    Look { dx: f32, dy: f32 },
    /// Change the field of view by a scroll delta.
    Zoom(f32),
    /// Nothing to do this frame.
    Idle,
}

impl Action {
    /// Apply the action to `camera`. `dt` only affects [`Action::Move`].
    pub fn apply(self, camera: &mut Camera, dt: f32) {
        match self {
            Self::Move(movement) => camera.process_input_movement(movement, dt),
            Self::Look { dx, dy } => camera.process_input_offset(dx, dy),
            Self::Zoom(scroll) => camera.process_input_zoom(scroll),
            Self::Idle => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn move_uses_dt() {
        let mut cam = Camera::default();
        Action::Move(Movement::FORWARD).apply(&mut cam, 2.0);
        assert!(cam.position().abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    }

    #[test]
    fn look_rotates() {
        let mut cam = Camera::default();
        Action::Look { dx: 10.0, dy: -20.0 }.apply(&mut cam, 0.0);
        assert!((cam.yaw() - (-89.0)).abs() < 1e-5);
        assert!((cam.pitch() - (-2.0)).abs() < 1e-5);
    }

    #[test]
    fn zoom_narrows_fov() {
        let mut cam = Camera::default();
        Action::Zoom(1.0).apply(&mut cam, 0.0);
        assert_eq!(cam.fov(), 43.0);
    }

    #[test]
    fn idle_changes_nothing() {
        let mut cam = Camera::default();
        let before = (cam.position(), cam.yaw(), cam.pitch(), cam.fov());
        Action::Idle.apply(&mut cam, 1.0);
        Action::Move(Movement::IDLE).apply(&mut cam, 1.0);
        assert_eq!(before, (cam.position(), cam.yaw(), cam.pitch(), cam.fov()));
    }
}
