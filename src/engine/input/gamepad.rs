// Gamepad channel source
//
// Gamepads are enumerated once when the manager is created; every axis and
// button gets its channel up front. Lookups against a pad or control that
// does not exist return `None` so the caller can fall back to the null channel.

use super::channel::{Channel, ChannelSource, DeviceMask, SharedChannel, DEAD_ZONE};
use super::config::BoundInput;
use super::event::InputEvent;
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Axis movement since the last pseudo event needed to count as a new event
pub const AXIS_EVENT_DELTA: f32 = 0.25;

/// Static description of a connected gamepad
#[derive(Debug, Clone, PartialEq)]
pub struct GamepadInfo {
    pub name: String,
    pub num_axes: u8,
    pub num_buttons: u8,
}

impl GamepadInfo {
    pub fn new(name: impl Into<String>, num_axes: u8, num_buttons: u8) -> Self {
        Self {
            name: name.into(),
            num_axes,
            num_buttons,
        }
    }
}

#[derive(Debug, Default)]
struct PadState {
    axes: Vec<f32>,
    buttons: Vec<bool>,
    button_events: Vec<(u8, bool)>,
}

/// Raw readings for every gamepad, shared with the channels
#[derive(Debug, Default)]
pub struct GamepadState {
    pads: Vec<PadState>,
}

impl GamepadState {
    fn axis(&self, gamepad: u8, axis: u8) -> f32 {
        self.pads
            .get(gamepad as usize)
            .and_then(|pad| pad.axes.get(axis as usize))
            .copied()
            .unwrap_or(0.0)
    }

    fn button(&self, gamepad: u8, button: u8) -> bool {
        self.pads
            .get(gamepad as usize)
            .and_then(|pad| pad.buttons.get(button as usize))
            .copied()
            .unwrap_or(false)
    }
}

/// One analog axis, relative to its neutral reading
///
/// Analog axes have no discrete edges, so an axis "matches" the frame events
/// when it has moved away from neutral by at least `AXIS_EVENT_DELTA` since
/// the last such pseudo event.
#[derive(Debug)]
pub struct GamepadAxisChannel {
    state: Rc<RefCell<GamepadState>>,
    gamepad: u8,
    axis: u8,
    neutral: Cell<f32>,
    last_pseudo_event_value: Cell<f32>,
    matched: Cell<bool>,
}

impl GamepadAxisChannel {
    /// Recompute the pseudo frame event; called once per frame by the manager
    fn refresh_pseudo_event(&self) {
        let value = self.value();
        let last = self.last_pseudo_event_value.get();
        if (value - last).abs() >= AXIS_EVENT_DELTA {
            self.matched.set(value.abs() > last.abs());
            self.last_pseudo_event_value.set(value);
        } else {
            self.matched.set(false);
        }
    }
}

impl Channel for GamepadAxisChannel {
    fn is_on(&self) -> bool {
        self.value().abs() > DEAD_ZONE
    }

    fn matches_frame_events(&self) -> bool {
        self.matched.get()
    }

    fn value(&self) -> f32 {
        let raw = self.state.borrow().axis(self.gamepad, self.axis);
        let v = (raw - self.neutral.get()).clamp(-1.0, 1.0);
        if v.abs() <= DEAD_ZONE {
            0.0
        } else {
            v
        }
    }

    fn set_neutral(&self) {
        let raw = self.state.borrow().axis(self.gamepad, self.axis);
        self.neutral.set(raw);
        self.last_pseudo_event_value.set(0.0);
        self.matched.set(false);
    }

    fn desc(&self, mask: DeviceMask) -> String {
        if mask.contains(DeviceMask::GAMEPAD) {
            format!("Pad {} Axis {}", self.gamepad + 1, self.axis + 1)
        } else {
            String::new()
        }
    }

    fn bound_input(&self) -> Option<BoundInput> {
        Some(BoundInput::GamepadAxis {
            gamepad: self.gamepad,
            axis: self.axis,
            invert: false,
        })
    }
}

/// One gamepad button
#[derive(Debug)]
pub struct GamepadButtonChannel {
    state: Rc<RefCell<GamepadState>>,
    gamepad: u8,
    button: u8,
    neutral_down: Cell<bool>,
}

impl Channel for GamepadButtonChannel {
    fn is_on(&self) -> bool {
        self.state.borrow().button(self.gamepad, self.button) != self.neutral_down.get()
    }

    fn matches_frame_events(&self) -> bool {
        let neutral = self.neutral_down.get();
        let state = self.state.borrow();
        state
            .pads
            .get(self.gamepad as usize)
            .map(|pad| {
                pad.button_events
                    .iter()
                    .any(|&(button, down)| button == self.button && down != neutral)
            })
            .unwrap_or(false)
    }

    fn value(&self) -> f32 {
        if self.is_on() {
            1.0
        } else {
            0.0
        }
    }

    fn set_neutral(&self) {
        let down = self.state.borrow().button(self.gamepad, self.button);
        self.neutral_down.set(down);
    }

    fn desc(&self, mask: DeviceMask) -> String {
        if mask.contains(DeviceMask::GAMEPAD) {
            format!("Pad {} Button {}", self.gamepad + 1, self.button + 1)
        } else {
            String::new()
        }
    }

    fn bound_input(&self) -> Option<BoundInput> {
        Some(BoundInput::GamepadButton {
            gamepad: self.gamepad,
            button: self.button,
        })
    }
}

/// All connected gamepads
#[derive(Debug, Default)]
pub struct GamepadManager {
    state: Rc<RefCell<GamepadState>>,
    infos: Vec<GamepadInfo>,
    /// Indexed by [gamepad][axis]
    axis_channels: Vec<Vec<Rc<GamepadAxisChannel>>>,
    /// Indexed by [gamepad][button]
    button_channels: Vec<Vec<Rc<GamepadButtonChannel>>>,
}

impl GamepadManager {
    pub fn new(gamepads: Vec<GamepadInfo>) -> Self {
        let state = Rc::new(RefCell::new(GamepadState {
            pads: gamepads
                .iter()
                .map(|info| PadState {
                    axes: vec![0.0; info.num_axes as usize],
                    buttons: vec![false; info.num_buttons as usize],
                    button_events: Vec::new(),
                })
                .collect(),
        }));

        let mut axis_channels = Vec::with_capacity(gamepads.len());
        let mut button_channels = Vec::with_capacity(gamepads.len());
        for (index, info) in gamepads.iter().enumerate() {
            let gamepad = index as u8;
            info!(
                "Gamepad {}: {} ({} axes, {} buttons)",
                gamepad, info.name, info.num_axes, info.num_buttons
            );
            axis_channels.push(
                (0..info.num_axes)
                    .map(|axis| {
                        Rc::new(GamepadAxisChannel {
                            state: Rc::clone(&state),
                            gamepad,
                            axis,
                            neutral: Cell::new(0.0),
                            last_pseudo_event_value: Cell::new(0.0),
                            matched: Cell::new(false),
                        })
                    })
                    .collect(),
            );
            button_channels.push(
                (0..info.num_buttons)
                    .map(|button| {
                        Rc::new(GamepadButtonChannel {
                            state: Rc::clone(&state),
                            gamepad,
                            button,
                            neutral_down: Cell::new(false),
                        })
                    })
                    .collect(),
            );
        }

        Self {
            state,
            infos: gamepads,
            axis_channels,
            button_channels,
        }
    }

    pub fn num_gamepads(&self) -> usize {
        self.infos.len()
    }

    pub fn num_axes(&self, gamepad: u8) -> usize {
        self.infos
            .get(gamepad as usize)
            .map(|info| info.num_axes as usize)
            .unwrap_or(0)
    }

    pub fn num_buttons(&self, gamepad: u8) -> usize {
        self.infos
            .get(gamepad as usize)
            .map(|info| info.num_buttons as usize)
            .unwrap_or(0)
    }

    pub fn first_gamepad_name(&self) -> Option<&str> {
        self.infos.first().map(|info| info.name.as_str())
    }

    pub fn axis_channel(&self, gamepad: u8, axis: u8) -> Option<SharedChannel> {
        self.axis_channels
            .get(gamepad as usize)
            .and_then(|axes| axes.get(axis as usize))
            .map(|ch| Rc::clone(ch) as SharedChannel)
    }

    pub fn button_channel(&self, gamepad: u8, button: u8) -> Option<SharedChannel> {
        self.button_channels
            .get(gamepad as usize)
            .and_then(|buttons| buttons.get(button as usize))
            .map(|ch| Rc::clone(ch) as SharedChannel)
    }
}

impl ChannelSource for GamepadManager {
    fn update(&mut self, events: &[InputEvent]) {
        {
            let mut state = self.state.borrow_mut();
            for pad in &mut state.pads {
                pad.button_events.clear();
            }

            for event in events {
                let applied = match *event {
                    InputEvent::GamepadButtonDown { gamepad, button }
                    | InputEvent::GamepadButtonUp { gamepad, button } => {
                        let down = matches!(event, InputEvent::GamepadButtonDown { .. });
                        state
                            .pads
                            .get_mut(gamepad as usize)
                            .and_then(|pad| {
                                let slot = pad.buttons.get_mut(button as usize)?;
                                *slot = down;
                                pad.button_events.push((button, down));
                                Some(())
                            })
                            .is_some()
                    }
                    InputEvent::GamepadAxisMotion {
                        gamepad,
                        axis,
                        value,
                    } => state
                        .pads
                        .get_mut(gamepad as usize)
                        .and_then(|pad| pad.axes.get_mut(axis as usize))
                        .map(|slot| *slot = value.clamp(-1.0, 1.0))
                        .is_some(),
                    _ => continue,
                };
                if !applied {
                    debug!("Dropping event for unknown gamepad control: {:?}", event);
                }
            }
        }

        for channel in self.axis_channels.iter().flatten() {
            channel.refresh_pseudo_event();
        }
    }

    fn channels(&self) -> Vec<SharedChannel> {
        let axes = self
            .axis_channels
            .iter()
            .flatten()
            .map(|ch| Rc::clone(ch) as SharedChannel);
        let buttons = self
            .button_channels
            .iter()
            .flatten()
            .map(|ch| Rc::clone(ch) as SharedChannel);
        axes.chain(buttons).collect()
    }
}
