//! Input Handling
//!
//! Keyboard and mouse events, and the bindings that turn them into camera
//! actions. Nothing here touches the camera itself; callers forward the
//! returned [`CameraAction`]s to a `CameraSender`.

use std::collections::HashSet;

use bitflags::bitflags;
use cardtable_core::CameraAction;
use glam::Vec2;
use smallvec::{smallvec, SmallVec};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::{Key, ModifiersState, PhysicalKey};

/// Degrees per arrow key press
pub const ROTATE_STEP_DEGREES: f32 = 2.0;

/// Units per W/A/S/D press
pub const TRANSLATE_STEP: f32 = 0.05;

/// Eye distance change per zoom key press or wheel line
pub const ZOOM_STEP: f32 = 0.1;

/// Step multiplier while Shift is held
pub const SHIFT_MULTIPLIER: f32 = 5.0;

/// Degrees of rotation per pixel of left-button drag
pub const DRAG_ROTATE_DEGREES_PER_PIXEL: f32 = 0.5;

/// Units of translation per pixel of right-button drag
pub const DRAG_TRANSLATE_PER_PIXEL: f32 = 0.005;

/// Pixel-precise scroll deltas are converted to lines at this rate
const PIXELS_PER_LINE: f32 = 20.0;

/// Camera actions produced by a single event
pub type Actions = SmallVec<[CameraAction; 2]>;

/// Input event types
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Keyboard key pressed (also sent on key repeat)
    KeyPressed(KeyCode),
    /// Keyboard key released
    KeyReleased(KeyCode),
    /// Mouse button pressed
    MousePressed(MouseButton),
    /// Mouse button released
    MouseReleased(MouseButton),
    /// Cursor moved, in window pixels
    MouseMoved { x: f32, y: f32 },
    /// Mouse wheel scrolled, in lines
    MouseWheel { delta_x: f32, delta_y: f32 },
    /// Modifier keys changed
    ModifiersChanged(Modifiers),
}

/// Keyboard key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A,
    D,
    R,
    S,
    W,
    Escape,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    Plus,
    Minus,
    LeftShift,
    RightShift,
    Unknown,
}

impl KeyCode {
    /// Map a winit key. `+` and `-` are matched on the produced character so
    /// they work on any layout; everything else on the physical key.
    pub fn from_winit(physical: PhysicalKey, logical: &Key) -> Self {
        use winit::keyboard::KeyCode as W;

        if let Key::Character(text) = logical {
            match text.as_str() {
                "+" | "=" => return Self::Plus,
                "-" | "_" => return Self::Minus,
                _ => {}
            }
        }

        let PhysicalKey::Code(code) = physical else {
            return Self::Unknown;
        };
        match code {
            W::KeyA => Self::A,
            W::KeyD => Self::D,
            W::KeyR => Self::R,
            W::KeyS => Self::S,
            W::KeyW => Self::W,
            W::Escape => Self::Escape,
            W::PageUp => Self::PageUp,
            W::PageDown => Self::PageDown,
            W::ArrowLeft => Self::Left,
            W::ArrowRight => Self::Right,
            W::ArrowUp => Self::Up,
            W::ArrowDown => Self::Down,
            W::NumpadAdd => Self::Plus,
            W::NumpadSubtract => Self::Minus,
            W::ShiftLeft => Self::LeftShift,
            W::ShiftRight => Self::RightShift,
            _ => Self::Unknown,
        }
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Left,
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

bitflags! {
    /// Keyboard modifiers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CONTROL = 0b0010;
        const ALT = 0b0100;
        const SUPER = 0b1000;
    }
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::SHIFT, state.shift_key());
        modifiers.set(Modifiers::CONTROL, state.control_key());
        modifiers.set(Modifiers::ALT, state.alt_key());
        modifiers.set(Modifiers::SUPER, state.super_key());
        modifiers
    }
}

impl InputEvent {
    /// Translate a winit window event, if it carries input
    pub fn from_winit(event: &winit::event::WindowEvent) -> Option<Self> {
        use winit::event::WindowEvent as W;

        match event {
            W::KeyboardInput { event, .. } => {
                let key = KeyCode::from_winit(event.physical_key, &event.logical_key);
                Some(match event.state {
                    ElementState::Pressed => Self::KeyPressed(key),
                    ElementState::Released => Self::KeyReleased(key),
                })
            }
            W::MouseInput { state, button, .. } => {
                let button = MouseButton::from(*button);
                Some(match state {
                    ElementState::Pressed => Self::MousePressed(button),
                    ElementState::Released => Self::MouseReleased(button),
                })
            }
            W::CursorMoved { position, .. } => Some(Self::MouseMoved {
                x: position.x as f32,
                y: position.y as f32,
            }),
            W::MouseWheel { delta, .. } => {
                let (delta_x, delta_y) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                    MouseScrollDelta::PixelDelta(p) => {
                        (p.x as f32 / PIXELS_PER_LINE, p.y as f32 / PIXELS_PER_LINE)
                    }
                };
                Some(Self::MouseWheel { delta_x, delta_y })
            }
            W::ModifiersChanged(modifiers) => Some(Self::ModifiersChanged(modifiers.state().into())),
            _ => None,
        }
    }
}

/// Tracks held keys and buttons and maps events to camera actions
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: HashSet<KeyCode>,
    /// Mouse buttons pressed
    mouse_buttons: HashSet<MouseButton>,
    /// Last known cursor position
    cursor: Option<Vec2>,
    /// Current modifiers
    modifiers: Modifiers,
}

impl InputState {
    /// Create a new input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button is pressed
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Last known cursor position
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Get current modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Update held state from an event and return the camera actions it triggers
    pub fn handle_event(&mut self, event: &InputEvent) -> Actions {
        match event {
            InputEvent::KeyPressed(key) => {
                self.keys_pressed.insert(*key);
                self.update_modifiers(*key, true);
                self.key_actions(*key)
            }
            InputEvent::KeyReleased(key) => {
                self.keys_pressed.remove(key);
                self.update_modifiers(*key, false);
                Actions::new()
            }
            InputEvent::MousePressed(button) => {
                self.mouse_buttons.insert(*button);
                Actions::new()
            }
            InputEvent::MouseReleased(button) => {
                self.mouse_buttons.remove(button);
                Actions::new()
            }
            InputEvent::MouseMoved { x, y } => {
                let position = Vec2::new(*x, *y);
                let previous = self.cursor.replace(position);
                match previous {
                    Some(previous) => self.drag_actions(position - previous),
                    None => Actions::new(),
                }
            }
            InputEvent::MouseWheel { delta_y, .. } => {
                if *delta_y == 0.0 {
                    Actions::new()
                } else {
                    smallvec![CameraAction::Zoom(-delta_y * ZOOM_STEP)]
                }
            }
            InputEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
                Actions::new()
            }
        }
    }

    fn step_scale(&self) -> f32 {
        if self.modifiers.contains(Modifiers::SHIFT) {
            SHIFT_MULTIPLIER
        } else {
            1.0
        }
    }

    fn key_actions(&self, key: KeyCode) -> Actions {
        let rotate = ROTATE_STEP_DEGREES * self.step_scale();
        let translate = TRANSLATE_STEP * self.step_scale();

        let action = match key {
            KeyCode::Left => CameraAction::RotateY(-rotate),
            KeyCode::Right => CameraAction::RotateY(rotate),
            KeyCode::Up => CameraAction::RotateX(-rotate),
            KeyCode::Down => CameraAction::RotateX(rotate),
            KeyCode::W => CameraAction::Translate { dx: 0.0, dy: translate },
            KeyCode::S => CameraAction::Translate { dx: 0.0, dy: -translate },
            KeyCode::A => CameraAction::Translate { dx: -translate, dy: 0.0 },
            KeyCode::D => CameraAction::Translate { dx: translate, dy: 0.0 },
            KeyCode::PageUp | KeyCode::Plus => CameraAction::Zoom(-ZOOM_STEP),
            KeyCode::PageDown | KeyCode::Minus => CameraAction::Zoom(ZOOM_STEP),
            KeyCode::R => CameraAction::Reset,
            _ => return Actions::new(),
        };
        smallvec![action]
    }

    fn drag_actions(&self, delta: Vec2) -> Actions {
        let mut actions = Actions::new();
        if delta == Vec2::ZERO {
            return actions;
        }
        if self.is_mouse_pressed(MouseButton::Left) {
            actions.push(CameraAction::RotateY(delta.x * DRAG_ROTATE_DEGREES_PER_PIXEL));
            actions.push(CameraAction::RotateX(delta.y * DRAG_ROTATE_DEGREES_PER_PIXEL));
        }
        if self.is_mouse_pressed(MouseButton::Right) {
            actions.push(CameraAction::Translate {
                dx: delta.x * DRAG_TRANSLATE_PER_PIXEL,
                dy: -delta.y * DRAG_TRANSLATE_PER_PIXEL,
            });
        }
        actions
    }

    fn update_modifiers(&mut self, key: KeyCode, pressed: bool) {
        if matches!(key, KeyCode::LeftShift | KeyCode::RightShift) {
            let held = pressed
                || self.is_key_pressed(KeyCode::LeftShift)
                || self.is_key_pressed(KeyCode::RightShift);
            self.modifiers.set(Modifiers::SHIFT, held);
        }
    }
}
