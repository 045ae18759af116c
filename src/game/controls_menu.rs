// Control settings: lists every action's binding and lets the player rebind them

use super::menu::{Menu, MenuEvent, SCREEN_SIZE};
use crate::engine::input::{
    AxisAction, BoundInput, ButtonAction, Channel, DeviceMask, InputManager,
};
use crate::engine::mode::{Camera, Mode, ModeContext, Renderer};
use glam::Vec2;
use log::info;
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Axis(AxisAction),
    Button(ButtonAction),
    ResetDefaults,
    Done,
}

/// Menu line for one action: name, keyboard/mouse binding, gamepad binding
///
/// Bindings that are partially held (one key of a chord, say) get a `*`.
fn binding_label(label: &str, channel: &dyn Channel) -> String {
    let desc = |mask: DeviceMask| {
        let text = channel.desc(mask);
        if text.is_empty() {
            "-".to_string()
        } else {
            text
        }
    };
    let marker = if channel.is_partially_on() { '*' } else { ' ' };
    format!(
        "{}{:<18} {:<22} {}",
        marker,
        label,
        desc(DeviceMask::KEYBOARD | DeviceMask::MOUSE),
        desc(DeviceMask::GAMEPAD)
    )
}

pub struct ControlSettingsMenuMode {
    menu: Menu<Row>,
    /// Opened from the main menu rather than over a paused mission
    at_main_menu: bool,
}

impl ControlSettingsMenuMode {
    pub fn new(at_main_menu: bool) -> Self {
        let mut menu = Menu::new();
        for action in AxisAction::ALL {
            menu.add_entry(Row::Axis(action), action.label());
        }
        for action in ButtonAction::ALL {
            menu.add_entry(Row::Button(action), action.label());
        }
        menu.add_entry(Row::ResetDefaults, "Reset to Defaults");
        menu.add_entry(Row::Done, "Done");
        Self { menu, at_main_menu }
    }

    fn refresh_labels(&mut self, input: &InputManager) {
        for action in AxisAction::ALL {
            let label = binding_label(action.label(), input.axis_channel(action));
            self.menu.set_label(Row::Axis(action), label);
        }
        for action in ButtonAction::ALL {
            let label = binding_label(action.label(), input.button_channel(action));
            self.menu.set_label(Row::Button(action), label);
        }
    }
}

impl Mode for ControlSettingsMenuMode {
    fn name(&self) -> &str {
        "ControlSettingsMenu"
    }

    fn execute_after_lower_mode(&self) -> bool {
        !self.at_main_menu
    }

    fn simulation_disabled(&self) -> bool {
        true
    }

    fn mouse_cursor_enabled(&self) -> bool {
        true
    }

    fn handle_input(&mut self, ctx: &mut ModeContext) -> bool {
        self.refresh_labels(ctx.input);

        match self.menu.process(ctx.input) {
            Some(MenuEvent::Selected(Row::Axis(action))) => {
                let current = ctx.input.axis_channel(action).desc(DeviceMask::ALL);
                ctx.next_frame_push_mode(Box::new(RebindingDialogMode::new(
                    RebindTarget::Axis(action),
                    current,
                )));
            }
            Some(MenuEvent::Selected(Row::Button(action))) => {
                let current = ctx.input.button_channel(action).desc(DeviceMask::ALL);
                ctx.next_frame_push_mode(Box::new(RebindingDialogMode::new(
                    RebindTarget::Button(action),
                    current,
                )));
            }
            Some(MenuEvent::Selected(Row::ResetDefaults)) => {
                info!("Resetting controls to preset defaults");
                ctx.config.clear_overrides();
                ctx.input.set_channels_from_config(ctx.config);
                self.refresh_labels(ctx.input);
            }
            Some(MenuEvent::Selected(Row::Done)) | Some(MenuEvent::Cancelled) => {
                ctx.next_frame_pop_mode();
            }
            None => {}
        }
        false
    }

    fn camera(&self, _top: bool) -> Option<Camera> {
        if self.at_main_menu {
            Some(Camera::default())
        } else {
            None
        }
    }

    fn draw_3d_far(&mut self, _top: bool, renderer: &mut dyn Renderer) {
        if self.at_main_menu {
            renderer.draw_background();
        }
    }

    fn draw_2d(&mut self, _top: bool, renderer: &mut dyn Renderer) {
        // Stays visible under the rebinding dialog
        self.menu.draw(renderer, !self.at_main_menu);
        renderer.draw_text(Vec2::new(SCREEN_SIZE.x / 2.0 - 60.0, 20.0), 24.0, "Controls");
    }
}

/// The action a rebinding dialog is capturing for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebindTarget {
    Axis(AxisAction),
    Button(ButtonAction),
}

impl RebindTarget {
    pub fn label(self) -> &'static str {
        match self {
            RebindTarget::Axis(action) => action.label(),
            RebindTarget::Button(action) => action.label(),
        }
    }
}

/// Waits for the player to actuate a control and binds it
///
/// Axis actions accept a real axis directly; otherwise two buttons are
/// captured in turn and bound as a pseudo axis. Escape cancels.
pub struct RebindingDialogMode {
    target: RebindTarget,
    old_desc: String,
    /// Captured negative half of a pseudo axis
    neg: Option<BoundInput>,
}

impl RebindingDialogMode {
    pub fn new(target: RebindTarget, old_desc: impl Into<String>) -> Self {
        Self {
            target,
            old_desc: old_desc.into(),
            neg: None,
        }
    }

    fn instruction(&self) -> &'static str {
        match (self.target, &self.neg) {
            (RebindTarget::Button(_), _) => "Press the new key or button",
            (RebindTarget::Axis(_), None) => {
                "Move an axis, or press the key for the negative direction"
            }
            (RebindTarget::Axis(_), Some(_)) => "Press the key for the positive direction",
        }
    }

    fn finish(&self, ctx: &mut ModeContext) {
        ctx.input.set_channels_from_config(ctx.config);
        let new_desc = match self.target {
            RebindTarget::Axis(action) => ctx.input.axis_channel(action).desc(DeviceMask::ALL),
            RebindTarget::Button(action) => ctx.input.button_channel(action).desc(DeviceMask::ALL),
        };
        info!(
            "Rebound {} from {} to {}",
            self.target.label(),
            self.old_desc,
            new_desc
        );
        ctx.next_frame_pop_mode();
    }
}

impl Mode for RebindingDialogMode {
    fn name(&self) -> &str {
        "RebindingDialog"
    }

    fn execute_after_lower_mode(&self) -> bool {
        true
    }

    fn simulation_disabled(&self) -> bool {
        true
    }

    fn handle_input(&mut self, ctx: &mut ModeContext) -> bool {
        let axis_mode = matches!(self.target, RebindTarget::Axis(_)) && self.neg.is_none();
        let captured = match ctx.input.capture_bound_input(axis_mode) {
            Some(captured) => captured,
            None => return false,
        };

        if captured == BoundInput::key(KeyCode::Escape) {
            info!("Rebinding {} cancelled", self.target.label());
            ctx.next_frame_pop_mode();
            return false;
        }

        match self.target {
            RebindTarget::Button(action) => {
                ctx.config.set_button_override(action, captured);
                self.finish(ctx);
            }
            RebindTarget::Axis(action) => match self.neg.take() {
                None if captured.is_axis() => {
                    ctx.config.set_axis_override(action, captured);
                    self.finish(ctx);
                }
                None => self.neg = Some(captured),
                Some(neg) => {
                    ctx.config
                        .set_axis_override(action, BoundInput::pseudo_axis(neg, captured));
                    self.finish(ctx);
                }
            },
        }
        false
    }

    fn draw_2d(&mut self, _top: bool, renderer: &mut dyn Renderer) {
        renderer.draw_fade([0.0, 0.0, 0.0, 0.7]);
        let center = SCREEN_SIZE / 2.0;
        renderer.draw_text(
            center - Vec2::new(150.0, 40.0),
            20.0,
            &format!("Rebinding: {}", self.target.label()),
        );
        renderer.draw_text(center - Vec2::new(150.0, 10.0), 16.0, self.instruction());
        renderer.draw_text(
            center + Vec2::new(-150.0, 20.0),
            14.0,
            &format!("Current: {}", self.old_desc),
        );
    }
}
