use glam::{Mat4, Vec3};
use vantage_common::CameraId;

use crate::movement::Movement;
use crate::settings::CameraSettings;

/// Pitch bound in degrees, applied symmetrically.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest field of view in degrees.
pub const MIN_FOV: f32 = 1.0;
/// Widest field of view in degrees.
pub const MAX_FOV: f32 = 45.0;

/// Errors from camera construction.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// The look-at direction has no horizontal component, so yaw is undefined.
    #[error("look-at target {target} from {position} leaves yaw undefined")]
    DegenerateLookAt { position: Vec3, target: Vec3 },
}

/// Free-fly camera with yaw/pitch orientation and a derived basis.
///
/// Camera motion happens outside any simulation step; the render loop owns the
/// camera and mutates it from input each frame.
#[derive(Debug, Clone)]
pub struct Camera {
    id: CameraId,
    position: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    world_up: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    settings: CameraSettings,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, -90.0, 0.0, Vec3::Y)
    }
}

impl Camera {
    /// Create a camera from a position and yaw/pitch in degrees.
    ///
    /// Pitch is clamped to [`PITCH_LIMIT`]. A zero `world_up` falls back to +Y.
    pub fn new(position: Vec3, yaw: f32, pitch: f32, world_up: Vec3) -> Self {
        let settings = CameraSettings::default();
        let mut camera = Self {
            id: CameraId::new(),
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            fov: settings.fov.clamp(MIN_FOV, MAX_FOV),
            world_up: world_up.try_normalize().unwrap_or(Vec3::Y),
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            settings,
        };
        camera.update_basis();
        camera
    }

    /// Create a camera at `position` looking toward `target`.
    ///
    /// Yaw and pitch are back-derived from the normalized direction. A target
    /// equal to the position, or straight above/below it, is rejected because
    /// yaw cannot be recovered from a vertical direction.
    pub fn looking_at(position: Vec3, target: Vec3, world_up: Vec3) -> Result<Self, CameraError> {
        let degenerate = || CameraError::DegenerateLookAt { position, target };
        let dir = (target - position).try_normalize().ok_or_else(degenerate)?;
        if dir.x.hypot(dir.z) <= f32::EPSILON {
            return Err(degenerate());
        }

        let pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees();
        let yaw = dir.z.atan2(dir.x).to_degrees();
        tracing::trace!(yaw, pitch, "derived orientation from look-at target");
        Ok(Self::new(position, yaw, pitch, world_up))
    }

    /// Replace the tuning constants. The field of view resets to `settings.fov`.
    pub fn with_settings(mut self, settings: CameraSettings) -> Self {
        self.fov = settings.fov.clamp(MIN_FOV, MAX_FOV);
        self.settings = settings;
        self
    }

    pub fn id(&self) -> CameraId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Yaw in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees, always within [`PITCH_LIMIT`].
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Right-handed look-at transform from the current position and basis.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    /// OpenGL perspective projection built from the current field of view.
    ///
    /// Requires `near > 0` and `far > near`.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        debug_assert!(near > 0.0 && far > near, "invalid clip planes {near}..{far}");
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, near, far)
    }

    pub fn view_projection(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        self.projection_matrix(aspect, near, far) * self.view_matrix()
    }

    /// Move along the basis for every active flag, scaled by speed and `dt`.
    ///
    /// Opposing flags cancel exactly: each axis contributes `-1`, `0` or `1`
    /// times the step, so a cancelled axis adds nothing.
    pub fn process_input_movement(&mut self, movement: Movement, dt: f32) {
        if movement.is_empty() {
            return;
        }
        let step = self.settings.speed * dt;
        let (fwd, right, up) = movement.axes();
        let delta = self.forward * (fwd * step) + self.right * (right * step) + self.up * (up * step);
        self.position += delta;
    }

    /// Apply a pointer delta to yaw/pitch and rebuild the basis.
    ///
    /// Positive `dy` means the pointer moved up on screen.
    pub fn process_input_offset(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.settings.mouse_sensitivity;
        self.pitch = (self.pitch + dy * self.settings.mouse_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_basis();
    }

    /// Narrow or widen the field of view from a scroll delta.
    pub fn process_input_zoom(&mut self, scroll: f32) {
        self.fov = (self.fov - scroll * self.settings.scroll_sensitivity).clamp(MIN_FOV, MAX_FOV);
    }

    fn update_basis(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let dir = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.forward = dir.normalize();
        // Forward parallel to world-up only happens with a tilted world-up axis;
        // keep the previous right vector unless it is no longer perpendicular.
        self.right = match self.forward.cross(self.world_up).try_normalize() {
            Some(right) => right,
            None if self.right.dot(self.forward).abs() < 1e-4 => self.right,
            None => self.forward.any_orthonormal_vector(),
        };
        self.up = self.right.cross(self.forward).normalize();
    }
}
