// Input configuration: binding presets, user overrides and control options

use super::action::{AxisAction, ButtonAction};
use super::InputError;
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::Path;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

pub const CONFIG_VERSION: u32 = 1;

pub const KEYBOARD_MOUSE_PRESET: &str = "Keyboard and Mouse";
pub const GAMEPAD_PRESET: &str = "Gamepad";

/// Serialized description of one device control, or a combination of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundInput {
    /// Written as the winit `KeyCode` name, such as `KeyW` or `Space`
    Key { key: KeyCode },
    MouseButton { button: MouseButton },
    MouseMovement {
        axis: u8,
        #[serde(default)]
        invert: bool,
    },
    GamepadButton {
        #[serde(default)]
        gamepad: u8,
        button: u8,
    },
    GamepadAxis {
        #[serde(default)]
        gamepad: u8,
        axis: u8,
        #[serde(default)]
        invert: bool,
    },
    /// Two inputs acting as the negative and positive halves of an axis
    PseudoAxis {
        neg: Box<BoundInput>,
        pos: Box<BoundInput>,
        #[serde(default)]
        neg_invert: bool,
        #[serde(default)]
        pos_invert: bool,
    },
    /// All inputs must be held together
    Chord { inputs: Vec<BoundInput> },
    /// An entry this version cannot read; binds to nothing
    #[serde(other)]
    Unknown,
}

impl BoundInput {
    pub fn key(key: KeyCode) -> Self {
        Self::Key { key }
    }

    pub fn gamepad_button(gamepad: u8, button: u8) -> Self {
        Self::GamepadButton { gamepad, button }
    }

    pub fn gamepad_axis(gamepad: u8, axis: u8) -> Self {
        Self::GamepadAxis {
            gamepad,
            axis,
            invert: false,
        }
    }

    pub fn pseudo_axis(neg: BoundInput, pos: BoundInput) -> Self {
        Self::PseudoAxis {
            neg: Box::new(neg),
            pos: Box::new(pos),
            neg_invert: false,
            pos_invert: false,
        }
    }

    /// Whether the input produces a continuous signed value
    pub fn is_axis(&self) -> bool {
        matches!(
            self,
            Self::MouseMovement { .. } | Self::GamepadAxis { .. } | Self::PseudoAxis { .. }
        )
    }
}

/// One action bound to one input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding<A> {
    pub action: A,
    #[serde(deserialize_with = "lenient_bound_input")]
    pub input: BoundInput,
}

/// Read one binding's input, turning an unreadable entry (a `type` from a
/// newer version, a misspelt key name) into `BoundInput::Unknown`
fn lenient_bound_input<'de, D>(deserializer: D) -> Result<BoundInput, D::Error>
where
    D: Deserializer<'de>,
{
    let value = toml::Value::deserialize(deserializer)?;
    match value.clone().try_into() {
        Ok(input) => Ok(input),
        Err(e) => {
            warn!("Ignoring unreadable binding {}: {}", value, e);
            Ok(BoundInput::Unknown)
        }
    }
}

/// Bindings for both kinds of actions; an action may appear several times
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingSet {
    #[serde(default)]
    pub axes: Vec<Binding<AxisAction>>,
    #[serde(default)]
    pub buttons: Vec<Binding<ButtonAction>>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_axis(mut self, action: AxisAction, input: BoundInput) -> Self {
        self.axes.push(Binding { action, input });
        self
    }

    pub fn bind_button(mut self, action: ButtonAction, input: BoundInput) -> Self {
        self.buttons.push(Binding { action, input });
        self
    }

    pub fn axis_inputs(&self, action: AxisAction) -> Vec<&BoundInput> {
        self.axes
            .iter()
            .filter(|b| b.action == action)
            .map(|b| &b.input)
            .collect()
    }

    pub fn button_inputs(&self, action: ButtonAction) -> Vec<&BoundInput> {
        self.buttons
            .iter()
            .filter(|b| b.action == action)
            .map(|b| &b.input)
            .collect()
    }

    /// Replace every binding of `action` with `input`
    pub fn replace_axis(&mut self, action: AxisAction, input: BoundInput) {
        self.axes.retain(|b| b.action != action);
        self.axes.push(Binding { action, input });
    }

    pub fn replace_button(&mut self, action: ButtonAction, input: BoundInput) {
        self.buttons.retain(|b| b.action != action);
        self.buttons.push(Binding { action, input });
    }

    pub fn clear(&mut self) {
        self.axes.clear();
        self.buttons.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty() && self.buttons.is_empty()
    }
}

/// A named, complete set of default bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(flatten)]
    pub bindings: BindingSet,
}

/// Everything the input system reads from the user's configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,

    /// Preset to take defaults from; the first preset if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_preset: Option<String>,

    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,

    #[serde(default)]
    pub invert_translate_y: bool,

    #[serde(default)]
    pub invert_rotate_y: bool,

    #[serde(default = "built_in_presets")]
    pub presets: Vec<Preset>,

    /// User bindings; any action listed here ignores the preset's bindings
    #[serde(default)]
    pub overrides: BindingSet,
}

fn default_config_version() -> u32 {
    CONFIG_VERSION
}

fn default_mouse_sensitivity() -> f32 {
    1.0
}

/// Presets shipped with the game
pub fn built_in_presets() -> Vec<Preset> {
    let keyboard = BindingSet::new()
        .bind_axis(
            AxisAction::TranslateX,
            BoundInput::pseudo_axis(BoundInput::key(KeyCode::KeyA), BoundInput::key(KeyCode::KeyD)),
        )
        .bind_axis(
            AxisAction::TranslateY,
            BoundInput::pseudo_axis(BoundInput::key(KeyCode::KeyF), BoundInput::key(KeyCode::KeyR)),
        )
        .bind_axis(
            AxisAction::TranslateZ,
            BoundInput::pseudo_axis(BoundInput::key(KeyCode::KeyS), BoundInput::key(KeyCode::KeyW)),
        )
        .bind_axis(
            AxisAction::RotateX,
            BoundInput::MouseMovement {
                axis: 1,
                invert: false,
            },
        )
        .bind_axis(
            AxisAction::RotateY,
            BoundInput::MouseMovement {
                axis: 0,
                invert: false,
            },
        )
        .bind_axis(
            AxisAction::RotateZ,
            BoundInput::pseudo_axis(BoundInput::key(KeyCode::KeyQ), BoundInput::key(KeyCode::KeyE)),
        )
        .bind_button(ButtonAction::Run, BoundInput::key(KeyCode::ShiftLeft))
        .bind_button(ButtonAction::Jump, BoundInput::key(KeyCode::Space))
        .bind_button(ButtonAction::Pause, BoundInput::key(KeyCode::KeyP))
        .bind_button(ButtonAction::Pause, BoundInput::key(KeyCode::Escape))
        .bind_button(ButtonAction::Cancel, BoundInput::key(KeyCode::Escape))
        .bind_button(ButtonAction::Confirm, BoundInput::key(KeyCode::Enter))
        .bind_button(ButtonAction::MenuUp, BoundInput::key(KeyCode::ArrowUp))
        .bind_button(ButtonAction::MenuDown, BoundInput::key(KeyCode::ArrowDown));

    // Indices follow the gilrs layout: buttons South, East, North, West,
    // L1, R1, L2, R2, Select, Start, Mode, L3, R3, D-pad up/down/left/right;
    // axes left stick X/Y, L2, right stick X/Y, R2
    let gamepad = BindingSet::new()
        .bind_axis(AxisAction::TranslateX, BoundInput::gamepad_axis(0, 0))
        .bind_axis(
            AxisAction::TranslateY,
            BoundInput::pseudo_axis(BoundInput::gamepad_axis(0, 2), BoundInput::gamepad_axis(0, 5)),
        )
        .bind_axis(AxisAction::TranslateZ, BoundInput::gamepad_axis(0, 1))
        .bind_axis(AxisAction::RotateX, BoundInput::gamepad_axis(0, 4))
        .bind_axis(AxisAction::RotateY, BoundInput::gamepad_axis(0, 3))
        .bind_axis(
            AxisAction::RotateZ,
            BoundInput::pseudo_axis(
                BoundInput::gamepad_button(0, 4),
                BoundInput::gamepad_button(0, 5),
            ),
        )
        .bind_button(ButtonAction::Run, BoundInput::gamepad_button(0, 11))
        .bind_button(ButtonAction::Jump, BoundInput::gamepad_button(0, 0))
        .bind_button(ButtonAction::Pause, BoundInput::gamepad_button(0, 9))
        .bind_button(ButtonAction::Cancel, BoundInput::gamepad_button(0, 1))
        .bind_button(ButtonAction::Confirm, BoundInput::gamepad_button(0, 0))
        .bind_button(ButtonAction::MenuUp, BoundInput::gamepad_button(0, 13))
        .bind_button(ButtonAction::MenuDown, BoundInput::gamepad_button(0, 14));

    vec![
        Preset {
            name: KEYBOARD_MOUSE_PRESET.to_string(),
            bindings: keyboard,
        },
        Preset {
            name: GAMEPAD_PRESET.to_string(),
            bindings: gamepad,
        },
    ]
}

impl InputConfig {
    pub fn built_in_defaults() -> Self {
        Self {
            version: CONFIG_VERSION,
            active_preset: None,
            mouse_sensitivity: default_mouse_sensitivity(),
            invert_translate_y: false,
            invert_rotate_y: false,
            presets: built_in_presets(),
            overrides: BindingSet::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, InputError> {
        let config: InputConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, InputError> {
        Ok(toml::to_string(self)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load the file if it exists, otherwise use the built-in defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if path.exists() {
            info!("Loading input config from {}", path.display());
            Self::load_from_file(path)
        } else {
            info!("No input config at {}, using defaults", path.display());
            Ok(Self::built_in_defaults())
        }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), InputError> {
        std::fs::write(path.as_ref(), self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.version == 0 {
            return Err(InputError::InvalidConfig(
                "input config version must be >= 1".into(),
            ));
        }
        if !self.mouse_sensitivity.is_finite() || self.mouse_sensitivity <= 0.0 {
            return Err(InputError::InvalidConfig(format!(
                "mouse sensitivity must be positive, got {}",
                self.mouse_sensitivity
            )));
        }

        let mut names = HashSet::new();
        for preset in &self.presets {
            if preset.name.trim().is_empty() {
                return Err(InputError::InvalidConfig("preset name cannot be empty".into()));
            }
            if !names.insert(preset.name.as_str()) {
                return Err(InputError::InvalidConfig(format!(
                    "duplicate preset '{}'",
                    preset.name
                )));
            }
        }
        Ok(())
    }

    pub fn preset(&self, name: &str) -> Result<&Preset, InputError> {
        self.presets
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| InputError::UnknownPreset(name.to_string()))
    }

    pub fn preset_names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }

    /// The preset defaults come from, falling back to the first one
    pub fn active_preset(&self) -> Option<&Preset> {
        if let Some(name) = &self.active_preset {
            match self.preset(name) {
                Ok(preset) => return Some(preset),
                Err(e) => warn!("{}, falling back to the first preset", e),
            }
        }
        self.presets.first()
    }

    /// Inputs for an axis action after applying user overrides
    pub fn axis_inputs(&self, action: AxisAction) -> Vec<&BoundInput> {
        let overridden = self.overrides.axis_inputs(action);
        if !overridden.is_empty() {
            return overridden;
        }
        self.active_preset()
            .map(|p| p.bindings.axis_inputs(action))
            .unwrap_or_default()
    }

    /// Inputs for a button action after applying user overrides
    pub fn button_inputs(&self, action: ButtonAction) -> Vec<&BoundInput> {
        let overridden = self.overrides.button_inputs(action);
        if !overridden.is_empty() {
            return overridden;
        }
        self.active_preset()
            .map(|p| p.bindings.button_inputs(action))
            .unwrap_or_default()
    }

    pub fn set_axis_override(&mut self, action: AxisAction, input: BoundInput) {
        self.overrides.replace_axis(action, input);
    }

    pub fn set_button_override(&mut self, action: ButtonAction, input: BoundInput) {
        self.overrides.replace_button(action, input);
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::built_in_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_defaults_are_valid() {
        let config = InputConfig::built_in_defaults();
        assert!(config.validate().is_ok());
        assert_eq!(config.preset_names(), vec![KEYBOARD_MOUSE_PRESET, GAMEPAD_PRESET]);
    }

    #[test]
    fn test_every_action_has_a_default() {
        let config = InputConfig::built_in_defaults();
        for preset in &config.presets {
            for action in AxisAction::ALL {
                assert!(
                    !preset.bindings.axis_inputs(action).is_empty(),
                    "{} has no binding for {:?}",
                    preset.name,
                    action
                );
            }
            for action in ButtonAction::ALL {
                assert!(!preset.bindings.button_inputs(action).is_empty());
            }
        }
    }

    #[test]
    fn test_active_preset_defaults_to_first() {
        let mut config = InputConfig::built_in_defaults();
        assert_eq!(config.active_preset().unwrap().name, KEYBOARD_MOUSE_PRESET);

        config.active_preset = Some(GAMEPAD_PRESET.to_string());
        assert_eq!(config.active_preset().unwrap().name, GAMEPAD_PRESET);

        config.active_preset = Some("Steering Wheel".to_string());
        assert_eq!(config.active_preset().unwrap().name, KEYBOARD_MOUSE_PRESET);
    }

    #[test]
    fn test_unknown_preset() {
        let config = InputConfig::built_in_defaults();
        let err = config.preset("Steering Wheel").unwrap_err();
        assert_eq!(err.to_string(), "Unknown input preset: Steering Wheel");
    }

    #[test]
    fn test_override_replaces_preset_binding() {
        let mut config = InputConfig::built_in_defaults();
        assert_eq!(config.button_inputs(ButtonAction::Pause).len(), 2);

        config.set_button_override(ButtonAction::Pause, BoundInput::key(KeyCode::KeyT));
        assert_eq!(
            config.button_inputs(ButtonAction::Pause),
            vec![&BoundInput::key(KeyCode::KeyT)]
        );
        // Other actions still come from the preset
        assert_eq!(
            config.button_inputs(ButtonAction::Jump),
            vec![&BoundInput::key(KeyCode::Space)]
        );

        config.set_button_override(ButtonAction::Pause, BoundInput::key(KeyCode::KeyY));
        assert_eq!(config.overrides.buttons.len(), 1);

        config.clear_overrides();
        assert_eq!(config.button_inputs(ButtonAction::Pause).len(), 2);
    }

    #[test]
    fn test_parse_toml() {
        let config = InputConfig::from_toml_str(
            r#"
            version = 1
            active_preset = "Custom"
            invert_rotate_y = true

            [[presets]]
            name = "Custom"

            [[presets.axes]]
            action = "translate_x"
            input = { type = "pseudo_axis", neg = { type = "key", key = "KeyJ" }, pos = { type = "key", key = "KeyL" } }

            [[presets.buttons]]
            action = "jump"
            input = { type = "gamepad_button", button = 2 }

            [[presets.buttons]]
            action = "run"
            input = { type = "chord", inputs = [{ type = "key", key = "ShiftLeft" }, { type = "key", key = "KeyW" }] }
            "#,
        )
        .unwrap();

        assert!(config.invert_rotate_y);
        assert_eq!(config.mouse_sensitivity, 1.0);
        assert_eq!(
            config.axis_inputs(AxisAction::TranslateX),
            vec![&BoundInput::pseudo_axis(
                BoundInput::key(KeyCode::KeyJ),
                BoundInput::key(KeyCode::KeyL)
            )]
        );
        assert_eq!(
            config.button_inputs(ButtonAction::Jump),
            vec![&BoundInput::gamepad_button(0, 2)]
        );
        assert!(matches!(
            config.button_inputs(ButtonAction::Run)[0],
            BoundInput::Chord { inputs } if inputs.len() == 2
        ));
        assert!(config.axis_inputs(AxisAction::RotateZ).is_empty());
    }

    #[test]
    fn test_missing_presets_use_built_ins() {
        let config = InputConfig::from_toml_str("mouse_sensitivity = 2.5").unwrap();
        assert_eq!(config.presets, built_in_presets());
        assert_eq!(config.mouse_sensitivity, 2.5);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            InputConfig::from_toml_str("version = 0"),
            Err(InputError::InvalidConfig(_))
        ));
        assert!(matches!(
            InputConfig::from_toml_str("mouse_sensitivity = -1.0"),
            Err(InputError::InvalidConfig(_))
        ));
        assert!(matches!(
            InputConfig::from_toml_str("version = \"one\""),
            Err(InputError::Parse(_))
        ));
    }

    #[test]
    fn test_saved_config_loads_back() {
        let mut config = InputConfig::built_in_defaults();
        config.active_preset = Some(GAMEPAD_PRESET.to_string());
        config.set_axis_override(
            AxisAction::RotateY,
            BoundInput::MouseMovement {
                axis: 0,
                invert: true,
            },
        );

        let text = config.to_toml_string().unwrap();
        let loaded = InputConfig::from_toml_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_is_axis() {
        assert!(BoundInput::gamepad_axis(0, 1).is_axis());
        assert!(BoundInput::pseudo_axis(BoundInput::key(KeyCode::KeyA), BoundInput::key(KeyCode::KeyD)).is_axis());
        assert!(!BoundInput::key(KeyCode::KeyA).is_axis());
        assert!(!BoundInput::gamepad_button(0, 1).is_axis());
    }

    #[test]
    fn test_unreadable_bindings_load_as_unknown() {
        let config = InputConfig::from_toml_str(
            r#"
            [[overrides.buttons]]
            action = "jump"
            input = { type = "joystick_hat", hat = 0, direction = "up" }

            [[overrides.buttons]]
            action = "run"
            input = { type = "key", key = "LeftShiftt" }

            [[overrides.buttons]]
            action = "pause"
            input = { type = "key", key = "F13" }
            "#,
        )
        .unwrap();

        assert_eq!(config.button_inputs(ButtonAction::Jump), vec![&BoundInput::Unknown]);
        assert_eq!(config.button_inputs(ButtonAction::Run), vec![&BoundInput::Unknown]);
        assert_eq!(
            config.button_inputs(ButtonAction::Pause),
            vec![&BoundInput::key(KeyCode::F13)]
        );
        // The rest of the file still applies
        assert_eq!(config.presets, built_in_presets());
    }

    #[test]
    fn test_key_names_are_winit_names() {
        let mut config = InputConfig::built_in_defaults();
        config.set_button_override(ButtonAction::Jump, BoundInput::key(KeyCode::Numpad5));
        config.set_button_override(ButtonAction::Run, BoundInput::key(KeyCode::Backquote));

        let text = config.to_toml_string().unwrap();
        assert!(text.contains("\"Numpad5\""));
        assert!(text.contains("\"Backquote\""));
        assert_eq!(InputConfig::from_toml_str(&text).unwrap(), config);
    }
}
