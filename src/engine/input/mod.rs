// Input handling system
//
// Raw keyboard, mouse and gamepad events are turned into channels: uniform
// on/off + analog signals that can be inverted, paired into axes and combined.
// Game code never looks at devices directly; it asks the `InputManager` for
// the channel bound to an action.
//
// ## Architecture
//
// - `event`: per-frame raw event batch, translated from winit
// - `channel`: the `Channel` trait, combinators and the null channel
// - `keyboard`, `mouse`, `gamepad`: device channel sources
// - `gilrs_backend`: polls real gamepads and feeds their events in
// - `action`: axis and button actions
// - `config`: presets, user overrides and TOML loading
// - `manager`: builds the binding table and drives the sources
//
// ## Usage Example
//
// ```rust
// let mut input = InputManager::new(gamepads);
// input.set_channels_from_config(&config);
//
// // Once per frame, before anything queries a channel
// input.update(&queue.drain());
//
// if input.pressed(ButtonAction::Pause) {
//     // Pause was pressed this frame
// }
// let thrust = input.axis(AxisAction::TranslateZ);
// ```

pub mod action;
pub mod channel;
pub mod config;
pub mod event;
pub mod gamepad;
pub mod gilrs_backend;
pub mod keyboard;
pub mod manager;
pub mod mouse;

pub use action::{AxisAction, ButtonAction};
pub use channel::{Channel, DeviceMask, SharedChannel};
pub use config::{BoundInput, InputConfig};
pub use event::{EventQueue, InputEvent};
pub use gamepad::GamepadInfo;
pub use gilrs_backend::GilrsBackend;
pub use manager::InputManager;

/// Errors raised while loading or validating input configuration
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Unknown input preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid input config: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse input config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write input config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Gamepad backend unavailable: {0}")]
    Gamepad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
