// Logical game actions that channels get bound to

use serde::{Deserialize, Serialize};

/// Actions read as a signed analog value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisAction {
    // Thrust along the avatar's local axes
    TranslateX,
    TranslateY,
    TranslateZ,

    // Rotation around the avatar's local axes
    RotateX,
    RotateY,
    RotateZ,
}

impl AxisAction {
    pub const ALL: [AxisAction; 6] = [
        AxisAction::TranslateX,
        AxisAction::TranslateY,
        AxisAction::TranslateZ,
        AxisAction::RotateX,
        AxisAction::RotateY,
        AxisAction::RotateZ,
    ];

    /// Name shown in the controls menu
    pub fn label(self) -> &'static str {
        match self {
            AxisAction::TranslateX => "Move Left/Right",
            AxisAction::TranslateY => "Move Up/Down",
            AxisAction::TranslateZ => "Move Forward/Back",
            AxisAction::RotateX => "Pitch",
            AxisAction::RotateY => "Yaw",
            AxisAction::RotateZ => "Roll",
        }
    }
}

/// Actions read as on/off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    // Gameplay
    Run,
    Jump,

    // Meta actions
    Pause,
    Cancel,

    // Menu navigation
    Confirm,
    MenuUp,
    MenuDown,
}

impl ButtonAction {
    pub const ALL: [ButtonAction; 7] = [
        ButtonAction::Run,
        ButtonAction::Jump,
        ButtonAction::Pause,
        ButtonAction::Cancel,
        ButtonAction::Confirm,
        ButtonAction::MenuUp,
        ButtonAction::MenuDown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ButtonAction::Run => "Run",
            ButtonAction::Jump => "Jump",
            ButtonAction::Pause => "Pause",
            ButtonAction::Cancel => "Cancel",
            ButtonAction::Confirm => "Confirm",
            ButtonAction::MenuUp => "Menu Up",
            ButtonAction::MenuDown => "Menu Down",
        }
    }
}
