use glam::Vec2;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use vantage_camera::Camera;
use vantage_common::CameraId;

use crate::action::Action;

/// Errors from attaching or detaching a binding.
///
/// Both are non-fatal: the registry is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("window {window} already has {camera} attached")]
    Conflict { window: String, camera: CameraId },
    #[error("no camera attached to window {window}")]
    Absent { window: String },
}

/// Converts absolute cursor positions into frame-to-frame deltas.
#[derive(Debug, Clone, Default)]
struct CursorTracker {
    last: Option<Vec2>,
}

impl CursorTracker {
    /// Delta since the previous position with Y flipped to point up, or `None`
    /// for the first position seen.
    fn delta(&mut self, x: f32, y: f32) -> Option<Vec2> {
        let current = Vec2::new(x, y);
        let delta = self
            .last
            .map(|last| Vec2::new(current.x - last.x, last.y - current.y));
        self.last = Some(current);
        delta
    }
}

#[derive(Debug, Clone)]
struct CameraInput {
    camera: CameraId,
    cursor: CursorTracker,
}

/// Registry of window-to-camera input bindings.
///
/// `W` is the host's window key (a winit `WindowId`, a test integer, ...).
/// The host forwards cursor and scroll events through
/// [`cursor_moved`](Self::cursor_moved) and [`scrolled`](Self::scrolled),
/// handing in the camera each time.
#[derive(Debug, Clone)]
pub struct InputBindings<W> {
    bindings: HashMap<W, CameraInput>,
}

impl<W> Default for InputBindings<W> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<W: Copy + Eq + Hash + fmt::Debug> InputBindings<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `camera` to `window`, failing if the window is already bound.
    pub fn try_attach(&mut self, window: W, camera: &Camera) -> Result<(), BindingError> {
        if let Some(existing) = self.bindings.get(&window) {
            return Err(BindingError::Conflict {
                window: format!("{window:?}"),
                camera: existing.camera,
            });
        }
        self.bindings.insert(
            window,
            CameraInput {
                camera: camera.id(),
                cursor: CursorTracker::default(),
            },
        );
        tracing::debug!(?window, camera = %camera.id(), "attached camera input");
        Ok(())
    }

    /// Bind `camera` to `window`. A conflict is logged and the existing
    /// binding kept. Returns whether the binding was made.
    pub fn attach(&mut self, window: W, camera: &Camera) -> bool {
        self.try_attach(window, camera)
            .inspect_err(|e| tracing::warn!("{e}"))
            .is_ok()
    }

    /// Remove the binding for `window`, failing if there is none.
    pub fn try_detach(&mut self, window: W) -> Result<CameraId, BindingError> {
        let input = self
            .bindings
            .remove(&window)
            .ok_or_else(|| BindingError::Absent {
                window: format!("{window:?}"),
            })?;
        tracing::debug!(?window, camera = %input.camera, "detached camera input");
        Ok(input.camera)
    }

    /// Remove the binding for `window`. A missing binding is logged.
    /// Returns whether a binding was removed.
    pub fn detach(&mut self, window: W) -> bool {
        self.try_detach(window)
            .inspect_err(|e| tracing::warn!("{e}"))
            .is_ok()
    }

    pub fn is_bound(&self, window: W) -> bool {
        self.bindings.contains_key(&window)
    }

    /// The camera bound to `window`, if any.
    pub fn camera_for(&self, window: W) -> Option<CameraId> {
        self.bindings.get(&window).map(|input| input.camera)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Forget the last cursor position so the next event only sets a
    /// reference, e.g. after the cursor is recaptured.
    pub fn reset_cursor(&mut self, window: W) {
        if let Some(input) = self.bindings.get_mut(&window) {
            input.cursor = CursorTracker::default();
        }
    }

    /// Translate an absolute cursor position into a look action.
    ///
    /// Returns `None` for unbound windows and for the first event after
    /// attaching, which only records the reference position.
    pub fn cursor_action(&mut self, window: W, x: f64, y: f64) -> Option<Action> {
        let input = self.bindings.get_mut(&window)?;
        let delta = input.cursor.delta(x as f32, y as f32)?;
        Some(Action::Look {
            dx: delta.x,
            dy: delta.y,
        })
    }

    /// Translate a scroll event into a zoom action. Only the vertical delta
    /// is used.
    pub fn scroll_action(&self, window: W, _dx: f64, dy: f64) -> Option<Action> {
        self.bindings
            .contains_key(&window)
            .then_some(Action::Zoom(dy as f32))
    }

    /// Cursor-move entry point: update the tracker and rotate `camera`.
    ///
    /// Returns whether the event reached the camera.
    pub fn cursor_moved(&mut self, window: W, camera: &mut Camera, x: f64, y: f64) -> bool {
        if !self.accepts(window, camera) {
            return false;
        }
        match self.cursor_action(window, x, y) {
            Some(action) => {
                action.apply(camera, 0.0);
                true
            }
            None => false,
        }
    }

    /// Scroll entry point: forward the vertical delta to `camera`'s zoom.
    ///
    /// Returns whether the event reached the camera.
    pub fn scrolled(&mut self, window: W, camera: &mut Camera, dx: f64, dy: f64) -> bool {
        if !self.accepts(window, camera) {
            return false;
        }
        match self.scroll_action(window, dx, dy) {
            Some(action) => {
                action.apply(camera, 0.0);
                true
            }
            None => false,
        }
    }

    fn accepts(&self, window: W, camera: &Camera) -> bool {
        match self.bindings.get(&window) {
            Some(input) if input.camera == camera.id() => true,
            Some(input) => {
                tracing::warn!(
                    ?window,
                    bound = %input.camera,
                    given = %camera.id(),
                    "input event for a camera that is not bound to this window"
                );
                false
            }
            None => false,
        }
    }
}
