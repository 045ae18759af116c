// Options: mouse sensitivity, axis inversion, and the way into the control bindings

use super::controls_menu::ControlSettingsMenuMode;
use super::menu::{Menu, MenuEvent, SCREEN_SIZE};
use crate::engine::input::InputConfig;
use crate::engine::mode::{Camera, Mode, ModeContext, Renderer};
use glam::Vec2;
use log::info;

/// Sensitivities offered, in the order Confirm cycles through them
const SENSITIVITY_STEPS: [f32; 7] = [0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    MouseSensitivity,
    InvertTranslateY,
    InvertRotateY,
    Controls,
    Done,
}

/// The step after `current`, wrapping; off-list values go to the next larger step
fn next_sensitivity(current: f32) -> f32 {
    SENSITIVITY_STEPS
        .iter()
        .copied()
        .find(|&step| step > current + f32::EPSILON)
        .unwrap_or(SENSITIVITY_STEPS[0])
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "On"
    } else {
        "Off"
    }
}

pub struct OptionsMenuMode {
    menu: Menu<Entry>,
    at_main_menu: bool,
}

impl OptionsMenuMode {
    pub fn new(at_main_menu: bool) -> Self {
        let mut menu = Menu::new();
        menu.add_entry(Entry::MouseSensitivity, "Mouse Sensitivity");
        menu.add_entry(Entry::InvertTranslateY, "Invert Translate Y");
        menu.add_entry(Entry::InvertRotateY, "Invert Rotate Y");
        menu.add_entry(Entry::Controls, "Controls");
        menu.add_entry(Entry::Done, "Done");
        Self { menu, at_main_menu }
    }

    fn refresh_labels(&mut self, config: &InputConfig) {
        self.menu.set_label(
            Entry::MouseSensitivity,
            format!("Mouse Sensitivity: {:.2}", config.mouse_sensitivity),
        );
        self.menu.set_label(
            Entry::InvertTranslateY,
            format!("Invert Translate Y: {}", on_off(config.invert_translate_y)),
        );
        self.menu.set_label(
            Entry::InvertRotateY,
            format!("Invert Rotate Y: {}", on_off(config.invert_rotate_y)),
        );
    }
}

impl Mode for OptionsMenuMode {
    fn name(&self) -> &str {
        "OptionsMenu"
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
        self.refresh_labels(ctx.config);

        let changed = match self.menu.process(ctx.input) {
            Some(MenuEvent::Selected(Entry::MouseSensitivity)) => {
                ctx.config.mouse_sensitivity = next_sensitivity(ctx.config.mouse_sensitivity);
                true
            }
            Some(MenuEvent::Selected(Entry::InvertTranslateY)) => {
                ctx.config.invert_translate_y = !ctx.config.invert_translate_y;
                true
            }
            Some(MenuEvent::Selected(Entry::InvertRotateY)) => {
                ctx.config.invert_rotate_y = !ctx.config.invert_rotate_y;
                true
            }
            Some(MenuEvent::Selected(Entry::Controls)) => {
                ctx.next_frame_push_mode(Box::new(ControlSettingsMenuMode::new(
                    self.at_main_menu,
                )));
                false
            }
            Some(MenuEvent::Selected(Entry::Done)) | Some(MenuEvent::Cancelled) => {
                ctx.next_frame_pop_mode();
                false
            }
            None => false,
        };

        if changed {
            info!(
                "Options: sensitivity {:.2}, invert translate Y {}, invert rotate Y {}",
                ctx.config.mouse_sensitivity,
                ctx.config.invert_translate_y,
                ctx.config.invert_rotate_y
            );
            ctx.input.set_channels_from_config(ctx.config);
            self.refresh_labels(ctx.config);
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

    fn draw_2d(&mut self, top: bool, renderer: &mut dyn Renderer) {
        if !top {
            return;
        }
        self.menu.draw(renderer, !self.at_main_menu);
        renderer.draw_text(Vec2::new(SCREEN_SIZE.x / 2.0 - 50.0, 20.0), 24.0, "Options");
    }
}
