//! Input system for handling keyboard and mouse input
//!
//! Translates raw winit input into viewer operations:
//! - held movement keys are polled every frame (`movement_directions`)
//! - single key presses become [`ViewerCommand`]s
//! - cursor motion becomes a pan or an orbit depending on held modifiers
//! - wheel motion becomes a zoom amount in "lines"

use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window};
use tracing::{debug, warn};

use crate::component::CameraMovement;

/// Pixel wheel deltas (touchpads) are converted to line steps with this ratio
const PIXELS_PER_LINE: f32 = 50.0;

/// Discrete actions triggered by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    /// Escape
    Quit,
    /// F
    FitToScreen,
    /// K
    LogCameraPosition,
    /// Ctrl+Z
    Undo,
    /// Ctrl+O
    Import,
}

/// Cursor motion classified by the held keys and buttons
///
/// `dx` grows to the right and `dy` grows downwards, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseMotion {
    /// Left Ctrl + (middle button or Left Shift)
    Pan { dx: f32, dy: f32 },
    /// X key or middle button; `begin` is set on the first event of a drag
    Orbit { dx: f32, dy: f32, begin: bool },
}

/// InputSystem manages keyboard and mouse input state
pub struct InputSystem {
    // Keyboard state
    pressed_keys: HashSet<KeyCode>,

    // Mouse state
    last_mouse_pos: Option<(f64, f64)>,
    mouse_buttons: HashSet<MouseButton>,

    // An orbit drag is in progress
    orbiting: bool,

    // Cursor lock state
    cursor_locked: bool,
}

impl InputSystem {
    /// Create a new InputSystem
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            last_mouse_pos: None,
            mouse_buttons: HashSet::new(),
            orbiting: false,
            cursor_locked: false,
        }
    }

    /// Process keyboard input event
    ///
    /// Returns the command bound to a fresh key press, if any.
    /// Auto-repeat presses only refresh the held-key state.
    pub fn on_keyboard_input(
        &mut self,
        keycode: KeyCode,
        state: ElementState,
        repeat: bool,
    ) -> Option<ViewerCommand> {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(keycode);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&keycode);
                if !self.orbit_held() {
                    self.orbiting = false;
                }
                return None;
            }
        }

        if repeat {
            return None;
        }

        let ctrl = self.ctrl_held();
        match keycode {
            KeyCode::Escape => Some(ViewerCommand::Quit),
            KeyCode::KeyZ if ctrl => Some(ViewerCommand::Undo),
            KeyCode::KeyO if ctrl => Some(ViewerCommand::Import),
            KeyCode::KeyF if !ctrl => Some(ViewerCommand::FitToScreen),
            KeyCode::KeyK if !ctrl => Some(ViewerCommand::LogCameraPosition),
            _ => None,
        }
    }

    /// Process mouse button event
    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.mouse_buttons.insert(button);
            }
            ElementState::Released => {
                self.mouse_buttons.remove(&button);
                if !self.orbit_held() {
                    self.orbiting = false;
                }
            }
        }
    }

    /// Process mouse movement event
    ///
    /// The first event after start-up (or after [`reset`](Self::reset)) only
    /// records the position, so the camera does not jump.
    pub fn on_mouse_move(&mut self, position: (f64, f64)) -> Option<MouseMotion> {
        let Some(last) = self.last_mouse_pos.replace(position) else {
            return None;
        };

        let dx = (position.0 - last.0) as f32;
        let dy = (position.1 - last.1) as f32;

        if self.pan_held() {
            self.orbiting = false;
            Some(MouseMotion::Pan { dx, dy })
        } else if self.orbit_held() {
            let begin = !self.orbiting;
            self.orbiting = true;
            Some(MouseMotion::Orbit { dx, dy, begin })
        } else {
            self.orbiting = false;
            None
        }
    }

    /// Record the cursor position without producing motion
    ///
    /// Used while the pointer is over the GUI: the drag state is kept, and the
    /// next [`on_mouse_move`](Self::on_mouse_move) measures from here, so the
    /// model does not jump when the pointer leaves the panel.
    pub fn track_cursor(&mut self, position: (f64, f64)) {
        self.last_mouse_pos = Some(position);
    }

    /// Convert a wheel event to a zoom amount in lines (positive = scroll up)
    pub fn on_scroll(&self, delta: MouseScrollDelta) -> f32 {
        match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        }
    }

    /// Movement directions for the keys held this frame
    pub fn movement_directions(&self) -> Vec<CameraMovement> {
        const BINDINGS: [(KeyCode, CameraMovement); 6] = [
            (KeyCode::KeyW, CameraMovement::Forward),
            (KeyCode::KeyS, CameraMovement::Backward),
            (KeyCode::KeyA, CameraMovement::Left),
            (KeyCode::KeyD, CameraMovement::Right),
            (KeyCode::KeyE, CameraMovement::Up),
            (KeyCode::KeyR, CameraMovement::Down),
        ];

        // Ctrl+<key> is a shortcut, not a movement
        if self.ctrl_held() {
            return Vec::new();
        }

        BINDINGS
            .iter()
            .filter(|(key, _)| self.pressed_keys.contains(key))
            .map(|(_, movement)| *movement)
            .collect()
    }

    fn ctrl_held(&self) -> bool {
        self.is_key_pressed(KeyCode::ControlLeft) || self.is_key_pressed(KeyCode::ControlRight)
    }

    fn pan_held(&self) -> bool {
        self.is_key_pressed(KeyCode::ControlLeft)
            && (self.is_mouse_button_pressed(MouseButton::Middle)
                || self.is_key_pressed(KeyCode::ShiftLeft))
    }

    fn orbit_held(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyX) || self.is_mouse_button_pressed(MouseButton::Middle)
    }

    /// The cursor should be confined while the middle button drags
    pub fn wants_cursor_grab(&self) -> bool {
        self.is_mouse_button_pressed(MouseButton::Middle)
    }

    /// Grab or release the cursor to match [`wants_cursor_grab`](Self::wants_cursor_grab)
    pub fn sync_cursor(&mut self, window: &Window) {
        if self.wants_cursor_grab() {
            self.lock_cursor(window);
        } else {
            self.unlock_cursor(window);
        }
    }

    /// Confine cursor to the window during a drag
    fn lock_cursor(&mut self, window: &Window) {
        if self.cursor_locked {
            return;
        }

        // Use Confined mode as it's more widely supported than Locked
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined) {
            if let Err(e2) = window.set_cursor_grab(CursorGrabMode::Locked) {
                warn!(
                    "Failed to grab cursor (Confined: {}, Locked: {}). Dragging still works.",
                    e, e2
                );
                return;
            }
            debug!("Cursor grabbed with Locked mode");
        } else {
            debug!("Cursor grabbed with Confined mode");
        }
        self.cursor_locked = true;
    }

    /// Release the cursor grab
    fn unlock_cursor(&mut self, window: &Window) {
        if !self.cursor_locked {
            return;
        }

        if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            warn!("Failed to release cursor grab: {}", e);
        } else {
            debug!("Cursor grab released");
        }

        self.cursor_locked = false;
    }

    /// Reset input state (window lost focus)
    pub fn reset(&mut self) {
        self.pressed_keys.clear();
        self.mouse_buttons.clear();
        self.last_mouse_pos = None;
        self.orbiting = false;
    }

    /// Check if a specific key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Check if a specific mouse button is currently pressed
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn press(input: &mut InputSystem, key: KeyCode) -> Option<ViewerCommand> {
        input.on_keyboard_input(key, ElementState::Pressed, false)
    }

    fn release(input: &mut InputSystem, key: KeyCode) {
        input.on_keyboard_input(key, ElementState::Released, false);
    }

    #[test]
    fn test_key_commands() {
        let mut input = InputSystem::new();
        assert_eq!(press(&mut input, KeyCode::Escape), Some(ViewerCommand::Quit));
        assert_eq!(press(&mut input, KeyCode::KeyF), Some(ViewerCommand::FitToScreen));
        assert_eq!(press(&mut input, KeyCode::KeyK), Some(ViewerCommand::LogCameraPosition));
        assert_eq!(press(&mut input, KeyCode::KeyW), None);
    }

    #[test]
    fn test_ctrl_shortcuts() {
        let mut input = InputSystem::new();
        assert_eq!(press(&mut input, KeyCode::KeyZ), None);
        release(&mut input, KeyCode::KeyZ);

        press(&mut input, KeyCode::ControlLeft);
        assert_eq!(press(&mut input, KeyCode::KeyZ), Some(ViewerCommand::Undo));
        assert_eq!(press(&mut input, KeyCode::KeyO), Some(ViewerCommand::Import));
    }

    #[test]
    fn test_repeat_does_not_retrigger() {
        let mut input = InputSystem::new();
        assert_eq!(
            input.on_keyboard_input(KeyCode::KeyF, ElementState::Pressed, true),
            None
        );
        assert!(input.is_key_pressed(KeyCode::KeyF));
    }

    #[test]
    fn test_movement_directions() {
        let mut input = InputSystem::new();
        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::KeyE);
        assert_eq!(
            input.movement_directions(),
            vec![CameraMovement::Forward, CameraMovement::Up]
        );

        release(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::KeyR);
        assert_eq!(
            input.movement_directions(),
            vec![CameraMovement::Up, CameraMovement::Down]
        );

        press(&mut input, KeyCode::ControlLeft);
        assert!(input.movement_directions().is_empty());
    }

    #[test]
    fn test_first_mouse_move_is_swallowed() {
        let mut input = InputSystem::new();
        input.on_mouse_button(MouseButton::Middle, ElementState::Pressed);
        assert_eq!(input.on_mouse_move((100.0, 100.0)), None);
        assert_eq!(
            input.on_mouse_move((110.0, 95.0)),
            Some(MouseMotion::Orbit { dx: 10.0, dy: -5.0, begin: true })
        );
        assert_eq!(
            input.on_mouse_move((111.0, 95.0)),
            Some(MouseMotion::Orbit { dx: 1.0, dy: 0.0, begin: false })
        );
    }

    #[test]
    fn test_no_motion_without_modifiers() {
        let mut input = InputSystem::new();
        input.on_mouse_move((0.0, 0.0));
        assert_eq!(input.on_mouse_move((5.0, 5.0)), None);
    }

    #[test]
    fn test_orbit_with_x_key() {
        let mut input = InputSystem::new();
        input.on_mouse_move((0.0, 0.0));
        press(&mut input, KeyCode::KeyX);
        assert!(matches!(
            input.on_mouse_move((3.0, 0.0)),
            Some(MouseMotion::Orbit { begin: true, .. })
        ));

        // releasing X ends the drag, the next one starts fresh
        release(&mut input, KeyCode::KeyX);
        press(&mut input, KeyCode::KeyX);
        assert!(matches!(
            input.on_mouse_move((4.0, 0.0)),
            Some(MouseMotion::Orbit { begin: true, .. })
        ));
    }

    #[test]
    fn test_pan_takes_precedence_over_orbit() {
        let mut input = InputSystem::new();
        input.on_mouse_move((0.0, 0.0));
        press(&mut input, KeyCode::ControlLeft);
        input.on_mouse_button(MouseButton::Middle, ElementState::Pressed);

        assert_eq!(
            input.on_mouse_move((2.0, 4.0)),
            Some(MouseMotion::Pan { dx: 2.0, dy: 4.0 })
        );

        // Ctrl + Shift pans without any button
        input.on_mouse_button(MouseButton::Middle, ElementState::Released);
        press(&mut input, KeyCode::ShiftLeft);
        assert_eq!(
            input.on_mouse_move((3.0, 4.0)),
            Some(MouseMotion::Pan { dx: 1.0, dy: 0.0 })
        );
    }

    #[test]
    fn test_tracked_cursor_does_not_orbit() {
        let mut input = InputSystem::new();
        input.on_mouse_move((0.0, 0.0));
        press(&mut input, KeyCode::KeyX);

        // pointer over a panel: position follows, no drag starts
        input.track_cursor((40.0, 10.0));
        input.track_cursor((60.0, 10.0));

        // back over the viewport: delta from the last tracked position,
        // and this is still the first event of the drag
        assert_eq!(
            input.on_mouse_move((65.0, 12.0)),
            Some(MouseMotion::Orbit { dx: 5.0, dy: 2.0, begin: true })
        );
    }

    #[test]
    fn test_tracked_cursor_keeps_drag_in_progress() {
        let mut input = InputSystem::new();
        input.on_mouse_move((0.0, 0.0));
        input.on_mouse_button(MouseButton::Middle, ElementState::Pressed);
        assert!(matches!(
            input.on_mouse_move((1.0, 0.0)),
            Some(MouseMotion::Orbit { begin: true, .. })
        ));

        input.track_cursor((30.0, 0.0));

        // same drag, no second undo snapshot
        assert_eq!(
            input.on_mouse_move((31.0, 0.0)),
            Some(MouseMotion::Orbit { dx: 1.0, dy: 0.0, begin: false })
        );
    }

    #[test]
    fn test_scroll_normalisation() {
        let input = InputSystem::new();
        assert_eq!(input.on_scroll(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -100.0));
        assert_eq!(input.on_scroll(pixels), -2.0);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut input = InputSystem::new();
        press(&mut input, KeyCode::KeyW);
        input.on_mouse_button(MouseButton::Middle, ElementState::Pressed);
        input.on_mouse_move((1.0, 1.0));

        input.reset();

        assert!(input.movement_directions().is_empty());
        assert!(!input.wants_cursor_grab());
        assert_eq!(input.on_mouse_move((50.0, 50.0)), None);
    }
}
