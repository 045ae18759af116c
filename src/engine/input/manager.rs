// Input manager - binds game actions to channels and drives the device sources

use super::action::{AxisAction, ButtonAction};
use super::channel::{
    Channel, ChannelSource, DeviceMask, InvertAxisChannel, MultiAndChannel, MultiOrChannel,
    NullChannel, PseudoAxisChannel, PseudoButtonChannel, SharedChannel,
};
use super::config::{BoundInput, InputConfig};
use super::event::InputEvent;
use super::gamepad::{GamepadInfo, GamepadManager};
use super::keyboard::Keyboard;
use super::mouse::Mouse;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::rc::Rc;

/// Owns every channel source and the action binding table
///
/// Actions without a usable binding resolve to a shared null channel, so
/// callers never have to check whether an action is bound.
#[derive(Debug)]
pub struct InputManager {
    null: SharedChannel,
    keyboard: Keyboard,
    mouse: Mouse,
    gamepads: GamepadManager,
    axis_map: HashMap<AxisAction, SharedChannel>,
    button_map: HashMap<ButtonAction, SharedChannel>,
}

impl InputManager {
    /// Create the sources; `gamepads` is the session's fixed gamepad list
    pub fn new(gamepads: Vec<GamepadInfo>) -> Self {
        info!("Input initialized with {} gamepad(s)", gamepads.len());
        Self {
            null: Rc::new(NullChannel),
            keyboard: Keyboard::new(),
            mouse: Mouse::new(),
            gamepads: GamepadManager::new(gamepads),
            axis_map: HashMap::new(),
            button_map: HashMap::new(),
        }
    }

    /// Feed this frame's events to every source; call before querying any channel
    pub fn update(&mut self, events: &[InputEvent]) {
        self.keyboard.update(events);
        self.mouse.update(events);
        self.gamepads.update(events);
    }

    /// Take the current reading of every control as its rest state
    pub fn set_neutral(&self) {
        self.keyboard.set_neutral();
        self.mouse.set_neutral();
        self.gamepads.set_neutral();
    }

    /// Rebuild the whole binding table from `config`
    pub fn set_channels_from_config(&mut self, config: &InputConfig) {
        self.mouse.set_sensitivity(config.mouse_sensitivity);

        let mut axis_map = HashMap::new();
        for action in AxisAction::ALL {
            let channels = config
                .axis_inputs(action)
                .into_iter()
                .map(|input| self.bound_input_to_channel(input))
                .collect();
            let mut channel = self.combine(channels);

            let invert = match action {
                AxisAction::TranslateY => config.invert_translate_y,
                AxisAction::RotateY => config.invert_rotate_y,
                _ => false,
            };
            if invert && !channel.is_null() {
                channel = Rc::new(InvertAxisChannel::new(channel));
            }

            debug!("Bound {:?} to {}", action, channel.desc(DeviceMask::ALL));
            axis_map.insert(action, channel);
        }

        let mut button_map = HashMap::new();
        for action in ButtonAction::ALL {
            let channels = config
                .button_inputs(action)
                .into_iter()
                .map(|input| {
                    let channel = self.bound_input_to_channel(input);
                    if input.is_axis() && !channel.is_null() {
                        Rc::new(PseudoButtonChannel::new(channel)) as SharedChannel
                    } else {
                        channel
                    }
                })
                .collect();
            let channel = self.combine(channels);
            debug!("Bound {:?} to {}", action, channel.desc(DeviceMask::ALL));
            button_map.insert(action, channel);
        }

        self.axis_map = axis_map;
        self.button_map = button_map;
    }

    /// Build the live channel for one binding entry
    ///
    /// Anything that cannot be resolved (an unreadable entry, an absent
    /// gamepad, a control past the end of a device) becomes the null channel.
    pub fn bound_input_to_channel(&mut self, input: &BoundInput) -> SharedChannel {
        match input {
            BoundInput::Key { key } => self.keyboard.key_channel(*key),
            BoundInput::MouseButton { button } => self.mouse.button_channel(*button),
            BoundInput::MouseMovement { axis, invert } => {
                let channel = self.mouse.movement_channel(*axis);
                self.or_null(channel, *invert, input)
            }
            BoundInput::GamepadButton { gamepad, button } => {
                let channel = self.gamepads.button_channel(*gamepad, *button);
                self.or_null(channel, false, input)
            }
            BoundInput::GamepadAxis {
                gamepad,
                axis,
                invert,
            } => {
                let channel = self.gamepads.axis_channel(*gamepad, *axis);
                self.or_null(channel, *invert, input)
            }
            BoundInput::PseudoAxis {
                neg,
                pos,
                neg_invert,
                pos_invert,
            } => {
                let neg = self.bound_input_to_channel(neg);
                let pos = self.bound_input_to_channel(pos);
                if neg.is_null() && pos.is_null() {
                    return self.null_channel();
                }
                Rc::new(PseudoAxisChannel::new(neg, pos, *neg_invert, *pos_invert))
            }
            BoundInput::Chord { inputs } => {
                let channels: Vec<SharedChannel> = inputs
                    .iter()
                    .map(|input| self.bound_input_to_channel(input))
                    .collect();
                // A chord with a missing part could never be fully pressed
                if channels.is_empty() || channels.iter().any(|ch| ch.is_null()) {
                    return self.null_channel();
                }
                Rc::new(MultiAndChannel::new(channels))
            }
            BoundInput::Unknown => {
                warn!("Unreadable binding entry, using null channel");
                self.null_channel()
            }
        }
    }

    fn or_null(
        &self,
        channel: Option<SharedChannel>,
        invert: bool,
        input: &BoundInput,
    ) -> SharedChannel {
        match channel {
            Some(channel) if invert => Rc::new(InvertAxisChannel::new(channel)),
            Some(channel) => channel,
            None => {
                debug!("No device for binding {:?}, using null channel", input);
                self.null_channel()
            }
        }
    }

    /// Merge the channels bound to one action
    fn combine(&self, channels: Vec<SharedChannel>) -> SharedChannel {
        let mut channels: Vec<SharedChannel> =
            channels.into_iter().filter(|ch| !ch.is_null()).collect();
        match channels.len() {
            0 => self.null_channel(),
            1 => channels.remove(0),
            _ => Rc::new(MultiOrChannel::new(channels)),
        }
    }

    pub fn null_channel(&self) -> SharedChannel {
        Rc::clone(&self.null)
    }

    pub fn axis_channel(&self, action: AxisAction) -> &dyn Channel {
        &**self.axis_map.get(&action).unwrap_or(&self.null)
    }

    pub fn button_channel(&self, action: ButtonAction) -> &dyn Channel {
        &**self.button_map.get(&action).unwrap_or(&self.null)
    }

    /// Shortcut for the value of an axis action
    pub fn axis(&self, action: AxisAction) -> f32 {
        self.axis_channel(action).value()
    }

    /// True on the frame a button action was pressed
    pub fn pressed(&self, action: ButtonAction) -> bool {
        let channel = self.button_channel(action);
        channel.is_on() && channel.matches_frame_events()
    }

    pub fn held(&self, action: ButtonAction) -> bool {
        self.button_channel(action).is_on()
    }

    /// Find a control that was actuated this frame, for rebinding
    ///
    /// Mouse movement is only considered when `axis_mode` is set, since any
    /// nudge of the mouse would otherwise be captured as a button binding.
    pub fn capture_bound_input(&self, axis_mode: bool) -> Option<BoundInput> {
        let mut candidates = self.keyboard.channels();
        candidates.extend(self.gamepads.channels());
        candidates.extend(self.mouse.channels().into_iter().filter(|ch| {
            axis_mode || !matches!(ch.bound_input(), Some(BoundInput::MouseMovement { .. }))
        }));

        candidates
            .iter()
            .find(|ch| ch.matches_frame_events())
            .and_then(|ch| ch.bound_input())
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
