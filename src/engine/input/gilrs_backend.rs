// Gamepad polling through gilrs
//
// Pads are enumerated once at startup and numbered in the order gilrs lists
// them. Buttons and axes are numbered by their position in `BUTTONS` and
// `AXES`; the built-in gamepad preset is written against these numbers.

use super::event::{EventQueue, InputEvent};
use super::gamepad::GamepadInfo;
use super::InputError;
use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use log::{debug, info};

pub const BUTTONS: [Button; 19] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::C,
    Button::Z,
];

pub const AXES: [Axis; 8] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::LeftZ,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::RightZ,
    Axis::DPadX,
    Axis::DPadY,
];

pub fn button_index(button: Button) -> Option<u8> {
    BUTTONS.iter().position(|&b| b == button).map(|i| i as u8)
}

pub fn axis_index(axis: Axis) -> Option<u8> {
    AXES.iter().position(|&a| a == axis).map(|i| i as u8)
}

/// Analog triggers report pressure as a button value on some platforms;
/// it is mirrored onto the matching Z axis
fn trigger_axis(button: Button) -> Option<Axis> {
    match button {
        Button::LeftTrigger2 => Some(Axis::LeftZ),
        Button::RightTrigger2 => Some(Axis::RightZ),
        _ => None,
    }
}

/// Translate a gilrs event for the pad numbered `gamepad`
pub fn translate_event(gamepad: u8, event: &EventType) -> Option<InputEvent> {
    match *event {
        EventType::ButtonPressed(button, _) => {
            button_index(button).map(|button| InputEvent::GamepadButtonDown { gamepad, button })
        }
        EventType::ButtonReleased(button, _) => {
            button_index(button).map(|button| InputEvent::GamepadButtonUp { gamepad, button })
        }
        EventType::AxisChanged(axis, value, _) => {
            axis_index(axis).map(|axis| InputEvent::GamepadAxisMotion {
                gamepad,
                axis,
                value,
            })
        }
        EventType::ButtonChanged(button, value, _) => trigger_axis(button)
            .and_then(axis_index)
            .map(|axis| InputEvent::GamepadAxisMotion {
                gamepad,
                axis,
                value,
            }),
        _ => None,
    }
}

/// Owns the gilrs context and the session's pad numbering
pub struct GilrsBackend {
    gilrs: Gilrs,
    /// Indexed by session pad number
    pads: Vec<GamepadId>,
}

impl GilrsBackend {
    pub fn new() -> Result<Self, InputError> {
        let gilrs = Gilrs::new().map_err(|e| InputError::Gamepad(e.to_string()))?;
        let pads: Vec<GamepadId> = gilrs
            .gamepads()
            .map(|(id, _)| id)
            .take(u8::MAX as usize)
            .collect();
        info!("Found {} gamepad(s)", pads.len());
        Ok(Self { gilrs, pads })
    }

    /// Descriptions of the pads found at startup, in session order
    pub fn gamepads(&self) -> Vec<GamepadInfo> {
        self.pads
            .iter()
            .map(|&id| {
                GamepadInfo::new(
                    self.gilrs.gamepad(id).name(),
                    AXES.len() as u8,
                    BUTTONS.len() as u8,
                )
            })
            .collect()
    }

    /// Move every pending gamepad event into `queue`
    pub fn poll(&mut self, queue: &mut EventQueue) {
        while let Some(ev) = self.gilrs.next_event() {
            let (id, event) = (ev.id, ev.event);
            match self.pads.iter().position(|&pad| pad == id) {
                Some(gamepad) => {
                    if let Some(event) = translate_event(gamepad as u8, &event) {
                        queue.push(event);
                    }
                }
                None => {
                    // The pad set is fixed for the session
                    if let EventType::Connected = event {
                        info!(
                            "Gamepad {} connected; restart to use it",
                            self.gilrs.gamepad(id).name()
                        );
                    } else {
                        debug!("Dropping event from unknown gamepad: {:?}", event);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::action::ButtonAction;
    use crate::engine::input::config::{InputConfig, GAMEPAD_PRESET};
    use crate::engine::input::{AxisAction, BoundInput};

    #[test]
    fn test_layout_indices() {
        assert_eq!(button_index(Button::South), Some(0));
        assert_eq!(button_index(Button::Start), Some(9));
        assert_eq!(button_index(Button::Unknown), None);
        assert_eq!(axis_index(Axis::LeftStickY), Some(1));
        assert_eq!(axis_index(Axis::RightZ), Some(5));
        assert_eq!(axis_index(Axis::Unknown), None);

        for (i, button) in BUTTONS.iter().enumerate() {
            assert_eq!(button_index(*button), Some(i as u8));
        }
    }

    #[test]
    fn test_triggers_mirror_onto_axes() {
        assert_eq!(trigger_axis(Button::LeftTrigger2).and_then(axis_index), Some(2));
        assert_eq!(trigger_axis(Button::RightTrigger2).and_then(axis_index), Some(5));
        assert_eq!(trigger_axis(Button::South), None);
    }

    fn preset_button(config: &InputConfig, action: ButtonAction) -> u8 {
        match config.preset(GAMEPAD_PRESET).unwrap().bindings.button_inputs(action)[0] {
            BoundInput::GamepadButton { button, .. } => *button,
            other => panic!("{:?} is not a gamepad button", other),
        }
    }

    #[test]
    fn test_gamepad_preset_uses_layout() {
        let config = InputConfig::built_in_defaults();
        assert_eq!(BUTTONS[preset_button(&config, ButtonAction::Jump) as usize], Button::South);
        assert_eq!(BUTTONS[preset_button(&config, ButtonAction::Pause) as usize], Button::Start);
        assert_eq!(
            BUTTONS[preset_button(&config, ButtonAction::MenuUp) as usize],
            Button::DPadUp
        );

        let thrust = config.preset(GAMEPAD_PRESET).unwrap().bindings.axis_inputs(AxisAction::TranslateZ);
        assert_eq!(thrust, vec![&BoundInput::gamepad_axis(0, 1)]);
        assert_eq!(AXES[1], Axis::LeftStickY);
    }
}
