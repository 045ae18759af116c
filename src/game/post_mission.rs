// Result screen shown over the finished mission

use super::menu::{Menu, MenuEvent};
use crate::engine::mode::{Mode, ModeContext, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Continue,
}

pub struct PostMissionMenuMode {
    menu: Menu<Entry>,
    won: bool,
}

impl PostMissionMenuMode {
    pub fn new(won: bool) -> Self {
        let mut menu = Menu::new();
        let label = if won { "Made it!" } else { "Didn't make it..." };
        menu.add_entry(Entry::Continue, label);
        Self { menu, won }
    }

    pub fn won(&self) -> bool {
        self.won
    }
}

impl Mode for PostMissionMenuMode {
    fn name(&self) -> &str {
        "PostMissionMenu"
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

    fn handle_input(&mut self, ctx: &mut ModeContext) -> bool {
        if let Some(MenuEvent::Selected(Entry::Continue)) = self.menu.process(ctx.input) {
            // Back past the mission to the menu it was started from
            ctx.next_frame_pop_mode();
            ctx.next_frame_pop_mode();
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
    use crate::engine::mode::render::tests::RecordingRenderer;
    use crate::engine::mode::ModeRequests;
    use crate::game::menu::tests::{keyboard_input, tap};
    use winit::keyboard::KeyCode;

    #[test]
    fn test_continue_pops_mission() {
        let mut input = keyboard_input();
        let mut config = InputConfig::default();
        let mut requests = ModeRequests::default();
        let mut mode = PostMissionMenuMode::new(true);

        tap(&mut input, KeyCode::Enter);
        mode.handle_input(&mut ModeContext::new(&mut input, &mut config, 0.0, &mut requests));
        assert_eq!(requests.pending_pops(), 2);
    }

    #[test]
    fn test_cancel_is_ignored() {
        let mut input = keyboard_input();
        let mut config = InputConfig::default();
        let mut requests = ModeRequests::default();
        let mut mode = PostMissionMenuMode::new(false);

        tap(&mut input, KeyCode::Escape);
        mode.handle_input(&mut ModeContext::new(&mut input, &mut config, 0.0, &mut requests));
        assert!(requests.is_empty());
    }

    #[test]
    fn test_result_label() {
        let mut renderer = RecordingRenderer::default();
        let mut mode = PostMissionMenuMode::new(false);
        assert!(!mode.won());
        mode.draw_2d(true, &mut renderer);
        assert_eq!(renderer.texts(), vec!["> Didn't make it..."]);
    }
}
