// Pause menu drawn over a suspended mission

use super::menu::{Menu, MenuEvent};
use super::options_menu::OptionsMenuMode;
use crate::engine::input::ButtonAction;
use crate::engine::mode::{Mode, ModeContext, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Resume,
    Options,
    Quit,
}

pub struct PauseMenuMode {
    menu: Menu<Entry>,
}

impl PauseMenuMode {
    pub fn new() -> Self {
        let mut menu = Menu::new();
        menu.add_entry(Entry::Resume, "Resume Game");
        menu.add_entry(Entry::Options, "Options");
        menu.add_entry(Entry::Quit, "Quit Mission");
        Self { menu }
    }
}

impl Default for PauseMenuMode {
    fn default() -> Self {
        Self::new()
    }
}

impl Mode for PauseMenuMode {
    fn name(&self) -> &str {
        "PauseMenu"
    }

    fn execute_after_lower_mode(&self) -> bool {
        true
    }

    fn simulation_disabled(&self) -> bool {
        true
    }

    fn mouse_cursor_enabled(&self) -> bool {
        true
    }

    /// Keeps the mission below from seeing input while paused
    fn handle_input(&mut self, ctx: &mut ModeContext) -> bool {
        if ctx
            .input
            .button_channel(ButtonAction::Pause)
            .matches_frame_events()
        {
            ctx.next_frame_pop_mode();
            return false;
        }

        match self.menu.process(ctx.input) {
            Some(MenuEvent::Selected(Entry::Resume)) | Some(MenuEvent::Cancelled) => {
                ctx.next_frame_pop_mode();
            }
            Some(MenuEvent::Selected(Entry::Options)) => {
                ctx.next_frame_push_mode(Box::new(OptionsMenuMode::new(false)));
            }
            Some(MenuEvent::Selected(Entry::Quit)) => {
                // This menu and the mission under it
                ctx.next_frame_pop_mode();
                ctx.next_frame_pop_mode();
            }
            None => {}
        }
        false
    }

    fn draw_2d(&mut self, top: bool, renderer: &mut dyn Renderer) {
        if top {
            self.menu.draw(renderer, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputConfig;
    use crate::engine::mode::ModeRequests;
    use crate::game::menu::tests::{keyboard_input, tap};
    use winit::keyboard::KeyCode;

    #[test]
    fn test_flags() {
        let mode = PauseMenuMode::new();
        assert!(mode.execute_after_lower_mode());
        assert!(mode.simulation_disabled());
        assert!(mode.mouse_cursor_enabled());
    }

    #[test]
    fn test_pause_key_resumes() {
        let mut input = keyboard_input();
        let mut config = InputConfig::default();
        let mut requests = ModeRequests::default();
        let mut mode = PauseMenuMode::new();

        tap(&mut input, KeyCode::KeyP);
        let mut ctx = ModeContext::new(&mut input, &mut config, 0.0, &mut requests);
        assert!(!mode.handle_input(&mut ctx));
        assert_eq!(requests.pending_pops(), 1);
        assert!(!requests.has_pending_push());
    }

    #[test]
    fn test_quit_pops_twice() {
        let mut input = keyboard_input();
        let mut config = InputConfig::default();
        let mut requests = ModeRequests::default();
        let mut mode = PauseMenuMode::new();

        tap(&mut input, KeyCode::ArrowUp);
        mode.handle_input(&mut ModeContext::new(&mut input, &mut config, 0.0, &mut requests));
        tap(&mut input, KeyCode::Enter);
        mode.handle_input(&mut ModeContext::new(&mut input, &mut config, 0.0, &mut requests));

        assert_eq!(requests.pending_pops(), 2);
        assert!(!requests.has_pending_push());
    }

    #[test]
    fn test_options_pushes_options_menu() {
        let mut input = keyboard_input();
        let mut config = InputConfig::default();
        let mut requests = ModeRequests::default();
        let mut mode = PauseMenuMode::new();

        tap(&mut input, KeyCode::ArrowDown);
        mode.handle_input(&mut ModeContext::new(&mut input, &mut config, 0.0, &mut requests));
        tap(&mut input, KeyCode::Enter);
        mode.handle_input(&mut ModeContext::new(&mut input, &mut config, 0.0, &mut requests));
        assert!(requests.has_pending_push());
    }
}
