// Mouse channel source: buttons and relative movement

use super::channel::{Channel, ChannelSource, DeviceMask, SharedChannel, DEAD_ZONE};
use super::config::BoundInput;
use super::event::InputEvent;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use winit::event::MouseButton;

/// Pixels of motion in one frame that count as full deflection at sensitivity 1.0
pub const MOUSE_MOVEMENT_RANGE: f32 = 40.0;

/// Number of movement axes (0 = horizontal, 1 = vertical)
pub const MOUSE_AXES: u8 = 2;

#[derive(Debug)]
pub struct MouseState {
    buttons: HashSet<MouseButton>,
    button_events: Vec<(MouseButton, bool)>,
    /// Accumulated relative motion for this frame
    rel: [f32; 2],
    moved: [bool; 2],
    sensitivity: f32,
}

impl Default for MouseState {
    fn default() -> Self {
        Self {
            buttons: HashSet::new(),
            button_events: Vec::new(),
            rel: [0.0; 2],
            moved: [false; 2],
            sensitivity: 1.0,
        }
    }
}

/// One mouse button
#[derive(Debug)]
pub struct MouseButtonChannel {
    state: Rc<RefCell<MouseState>>,
    button: MouseButton,
    neutral_down: Cell<bool>,
}

impl Channel for MouseButtonChannel {
    fn is_on(&self) -> bool {
        self.state.borrow().buttons.contains(&self.button) != self.neutral_down.get()
    }

    fn matches_frame_events(&self) -> bool {
        let neutral = self.neutral_down.get();
        self.state
            .borrow()
            .button_events
            .iter()
            .any(|&(button, down)| button == self.button && down != neutral)
    }

    fn value(&self) -> f32 {
        if self.is_on() {
            1.0
        } else {
            0.0
        }
    }

    fn set_neutral(&self) {
        let down = self.state.borrow().buttons.contains(&self.button);
        self.neutral_down.set(down);
    }

    fn desc(&self, mask: DeviceMask) -> String {
        if mask.contains(DeviceMask::MOUSE) {
            format!("Mouse {}", mouse_button_name(self.button))
        } else {
            String::new()
        }
    }

    fn bound_input(&self) -> Option<BoundInput> {
        Some(BoundInput::MouseButton {
            button: self.button,
        })
    }
}

/// Relative motion along one axis, scaled into [-1, 1]
#[derive(Debug)]
pub struct MouseMovementChannel {
    state: Rc<RefCell<MouseState>>,
    axis: u8,
}

impl Channel for MouseMovementChannel {
    fn is_on(&self) -> bool {
        self.value().abs() > DEAD_ZONE
    }

    fn matches_frame_events(&self) -> bool {
        self.state.borrow().moved[self.axis as usize] && self.is_on()
    }

    fn value(&self) -> f32 {
        let state = self.state.borrow();
        let v = state.rel[self.axis as usize] * state.sensitivity / MOUSE_MOVEMENT_RANGE;
        v.clamp(-1.0, 1.0)
    }

    fn desc(&self, mask: DeviceMask) -> String {
        if !mask.contains(DeviceMask::MOUSE) {
            return String::new();
        }
        match self.axis {
            0 => "Mouse X".to_string(),
            _ => "Mouse Y".to_string(),
        }
    }

    fn bound_input(&self) -> Option<BoundInput> {
        Some(BoundInput::MouseMovement {
            axis: self.axis,
            invert: false,
        })
    }
}

fn mouse_button_name(button: MouseButton) -> String {
    match button {
        MouseButton::Left => "Left".to_string(),
        MouseButton::Right => "Right".to_string(),
        MouseButton::Middle => "Middle".to_string(),
        MouseButton::Back => "Back".to_string(),
        MouseButton::Forward => "Forward".to_string(),
        MouseButton::Other(n) => n.to_string(),
    }
}

/// Mouse device
#[derive(Debug)]
pub struct Mouse {
    state: Rc<RefCell<MouseState>>,
    buttons: HashMap<MouseButton, Rc<MouseButtonChannel>>,
    movement: Vec<Rc<MouseMovementChannel>>,
}

impl Mouse {
    pub fn new() -> Self {
        let state = Rc::new(RefCell::new(MouseState::default()));
        let movement = (0..MOUSE_AXES)
            .map(|axis| {
                Rc::new(MouseMovementChannel {
                    state: Rc::clone(&state),
                    axis,
                })
            })
            .collect();
        Self {
            state,
            buttons: HashMap::new(),
            movement,
        }
    }

    pub fn button_channel(&mut self, button: MouseButton) -> SharedChannel {
        let channel = self.buttons.entry(button).or_insert_with(|| {
            Rc::new(MouseButtonChannel {
                state: Rc::clone(&self.state),
                button,
                neutral_down: Cell::new(false),
            })
        });
        Rc::clone(channel) as SharedChannel
    }

    /// Movement channel for an axis, or `None` past the last axis
    pub fn movement_channel(&self, axis: u8) -> Option<SharedChannel> {
        self.movement
            .get(axis as usize)
            .map(|ch| Rc::clone(ch) as SharedChannel)
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.state.borrow_mut().sensitivity = sensitivity.max(0.0);
    }
}

impl Default for Mouse {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelSource for Mouse {
    fn update(&mut self, events: &[InputEvent]) {
        let mut seen = Vec::new();
        {
            let mut state = self.state.borrow_mut();
            state.button_events.clear();
            state.rel = [0.0; 2];
            state.moved = [false; 2];

            for event in events {
                match *event {
                    InputEvent::MouseButtonDown(button) => {
                        state.buttons.insert(button);
                        state.button_events.push((button, true));
                        seen.push(button);
                    }
                    InputEvent::MouseButtonUp(button) => {
                        state.buttons.remove(&button);
                        state.button_events.push((button, false));
                        seen.push(button);
                    }
                    InputEvent::MouseMotion { dx, dy } => {
                        state.rel[0] += dx;
                        state.rel[1] += dy;
                        state.moved[0] |= dx != 0.0;
                        state.moved[1] |= dy != 0.0;
                    }
                    _ => {}
                }
            }
        }

        for button in seen {
            self.button_channel(button);
        }
    }

    fn channels(&self) -> Vec<SharedChannel> {
        self.movement
            .iter()
            .map(|ch| Rc::clone(ch) as SharedChannel)
            .chain(self.buttons.values().map(|ch| Rc::clone(ch) as SharedChannel))
            .collect()
    }
}
