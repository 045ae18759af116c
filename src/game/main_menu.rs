// Title screen, the root of the mode stack

use super::gameplay::GameplayMode;
use super::menu::{Menu, MenuEvent, SCREEN_SIZE};
use super::options_menu::OptionsMenuMode;
use crate::engine::mode::{Camera, Mode, ModeContext, Renderer};
use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Play,
    Options,
    Quit,
}

pub struct MainMenuMode {
    menu: Menu<Entry>,
    camera: Camera,
}

impl MainMenuMode {
    pub fn new() -> Self {
        let mut menu = Menu::<Entry>::new().with_center_offset(Vec2::new(0.0, 0.3));
        menu.add_entry(Entry::Play, "Play");
        menu.add_entry(Entry::Options, "Options");
        menu.add_entry(Entry::Quit, "Quit");
        Self {
            menu,
            camera: Camera::looking_at(Vec3::new(0.0, -50.0, -700.0), Vec3::ZERO),
        }
    }
}

impl Default for MainMenuMode {
    fn default() -> Self {
        Self::new()
    }
}

impl Mode for MainMenuMode {
    fn name(&self) -> &str {
        "MainMenu"
    }

    fn simulation_disabled(&self) -> bool {
        true
    }

    fn mouse_cursor_enabled(&self) -> bool {
        true
    }

    fn handle_input(&mut self, ctx: &mut ModeContext) -> bool {
        match self.menu.process(ctx.input) {
            Some(MenuEvent::Selected(Entry::Play)) => {
                ctx.next_frame_push_mode(Box::new(GameplayMode::new()));
            }
            Some(MenuEvent::Selected(Entry::Options)) => {
                ctx.next_frame_push_mode(Box::new(OptionsMenuMode::new(true)));
            }
            Some(MenuEvent::Selected(Entry::Quit)) | Some(MenuEvent::Cancelled) => {
                ctx.next_frame_pop_mode();
            }
            None => {}
        }
        true
    }

    fn camera(&self, _top: bool) -> Option<Camera> {
        Some(self.camera)
    }

    fn draw_3d_far(&mut self, _top: bool, renderer: &mut dyn Renderer) {
        renderer.draw_background();
    }

    fn draw_2d(&mut self, top: bool, renderer: &mut dyn Renderer) {
        if !top {
            return;
        }
        renderer.draw_text(
            Vec2::new(SCREEN_SIZE.x / 2.0 - 120.0, SCREEN_SIZE.y * 0.25),
            48.0,
            "Orbit Ribbon",
        );
        self.menu.draw(renderer, false);
        renderer.draw_text(
            Vec2::new(3.0, SCREEN_SIZE.y - 16.0),
            13.0,
            concat!("Version: ", env!("CARGO_PKG_VERSION")),
        );
    }
}
