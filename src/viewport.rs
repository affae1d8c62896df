//! Translation of raw input deltas into camera operations.

use crate::camera::ViewerCamera3d;
use crate::event::{Key, Modifiers, MouseButton};

/// Degrees of rotation per arrow key press.
pub const KEY_ROTATE_STEP: f32 = 5.0;

/// Degrees of rotation per pixel of drag.
const DRAG_ROTATE_FACTOR: f32 = 0.5;

/// Wheel delta divisor applied before the dolly.
const WHEEL_DOLLY_DIVISOR: f32 = 10.0;

/// Actions a key press requests beyond plain camera mutation.
///
/// The viewer facade resolves these: focusing needs the mesh bounds, and the
/// toggles mutate render state and notify subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlAction {
    /// Recenter the camera on the loaded model.
    FocusModel,
    /// Flip the wireframe overlay.
    ToggleWireframe,
    /// Flip the heads-up readout.
    ToggleHud,
}

/// Thin translation layer between pointer/wheel/keyboard deltas and
/// [`ViewerCamera3d`] mutations.
///
/// Navigation drags require the modifier key, matching the viewer's
/// Alt-drag convention; unmodified drags are left for the embedding UI.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportController;

impl ViewportController {
    /// Creates a controller with the default bindings.
    pub fn new() -> ViewportController {
        ViewportController
    }

    /// Applies a pointer drag delta.
    ///
    /// Left drag rotates, middle drag pans, right drag dollies. Does nothing
    /// without the modifier held.
    pub fn handle_pointer_drag(
        &self,
        camera: &mut ViewerCamera3d,
        dx: f32,
        dy: f32,
        button: MouseButton,
        modifiers: Modifiers,
    ) {
        if !modifiers.contains(Modifiers::ALT) {
            return;
        }
        match button {
            MouseButton::Left => camera.rotate(dy * DRAG_ROTATE_FACTOR, dx * DRAG_ROTATE_FACTOR),
            MouseButton::Middle => camera.pan(dx, dy),
            MouseButton::Right => camera.dolly(dy),
        }
    }

    /// Applies a wheel delta as a dolly, with or without the modifier.
    pub fn handle_wheel(&self, camera: &mut ViewerCamera3d, delta: f32, _modifiers: Modifiers) {
        camera.dolly(delta / WHEEL_DOLLY_DIVISOR);
    }

    /// Applies a key press.
    ///
    /// Arrow keys rotate by fixed steps directly; other bindings are
    /// returned as a [`ControlAction`] for the facade to resolve.
    pub fn handle_key(&self, camera: &mut ViewerCamera3d, key: Key) -> Option<ControlAction> {
        match key {
            Key::F => return Some(ControlAction::FocusModel),
            Key::W => return Some(ControlAction::ToggleWireframe),
            Key::H => return Some(ControlAction::ToggleHud),
            Key::Left => camera.rotate(0.0, -KEY_ROTATE_STEP),
            Key::Right => camera.rotate(0.0, KEY_ROTATE_STEP),
            Key::Up => camera.rotate(-KEY_ROTATE_STEP, 0.0),
            Key::Down => camera.rotate(KEY_ROTATE_STEP, 0.0),
            Key::Unknown => {}
        }
        None
    }
}
