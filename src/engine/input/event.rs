// Raw device events, batched once per frame

use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A single discrete input event from the OS
///
/// Gamepad and axis indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    /// Relative pointer motion in pixels
    MouseMotion { dx: f32, dy: f32 },
    GamepadButtonDown { gamepad: u8, button: u8 },
    GamepadButtonUp { gamepad: u8, button: u8 },
    /// New raw axis reading in [-1, 1]
    GamepadAxisMotion { gamepad: u8, axis: u8, value: f32 },
}

impl InputEvent {
    /// Translate a winit window event, ignoring anything that is not device input
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                // Key repeats are not state changes
                if event.repeat {
                    return None;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                Some(match event.state {
                    ElementState::Pressed => Self::KeyDown(code),
                    ElementState::Released => Self::KeyUp(code),
                })
            }
            WindowEvent::MouseInput { state, button, .. } => Some(match state {
                ElementState::Pressed => Self::MouseButtonDown(*button),
                ElementState::Released => Self::MouseButtonUp(*button),
            }),
            _ => None,
        }
    }

    /// Translate a raw device event (relative mouse motion)
    pub fn from_device_event(event: &DeviceEvent) -> Option<Self> {
        match event {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => Some(Self::MouseMotion {
                dx: *dx as f32,
                dy: *dy as f32,
            }),
            _ => None,
        }
    }
}

/// Collects events between frames until the driver drains them
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) {
        if let Some(event) = InputEvent::from_window_event(event) {
            self.push(event);
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let Some(event) = InputEvent::from_device_event(event) {
            self.push(event);
        }
    }

    /// Take this frame's batch, leaving the queue empty
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
