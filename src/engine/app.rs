// Frame driver: owns the input system, the configuration and the mode stack

use crate::engine::game_loop::{GameLoop, FIXED_TIMESTEP};
use crate::engine::input::{GamepadInfo, InputConfig, InputEvent, InputManager};
use crate::engine::mode::{Mode, ModeStack, Renderer};
use log::info;

/// What the window loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// The last mode was popped
    Exit,
}

pub struct App {
    input: InputManager,
    config: InputConfig,
    stack: ModeStack,
    game_loop: GameLoop,
}

impl App {
    /// Bind the configured controls and queue `root` as the first mode
    pub fn new(config: InputConfig, gamepads: Vec<GamepadInfo>, root: Box<dyn Mode>) -> Self {
        let mut input = InputManager::new(gamepads);
        input.set_channels_from_config(&config);
        input.set_neutral();

        Self {
            input,
            config,
            stack: ModeStack::with_root(root),
            game_loop: GameLoop::new(),
        }
    }

    /// Run one frame, taking the number of simulation steps from the wall clock
    pub fn frame(&mut self, events: &[InputEvent], renderer: &mut dyn Renderer) -> FrameOutcome {
        let steps = self.game_loop.begin_frame();
        self.run_frame(events, steps, renderer)
    }

    /// Run one frame with an explicit number of simulation steps
    ///
    /// Order: sources update, queued stack changes apply, then input,
    /// simulation and drawing are dispatched through the stack.
    pub fn run_frame(
        &mut self,
        events: &[InputEvent],
        steps: u32,
        renderer: &mut dyn Renderer,
    ) -> FrameOutcome {
        self.input.update(events);

        self.stack.apply_pending();
        if self.stack.is_empty() {
            info!("No modes left, exiting");
            return FrameOutcome::Exit;
        }

        let dt = FIXED_TIMESTEP;
        self.stack.handle_input(&mut self.input, &mut self.config, dt);
        let stepped = self.stack.step(&mut self.input, &mut self.config, dt, steps);
        if stepped == 0 {
            // No catch-up burst once the simulation resumes
            self.game_loop.discard_pending_steps();
        }
        self.stack.draw(renderer);

        FrameOutcome::Continue
    }

    /// Whether the top mode wants the OS cursor shown
    pub fn mouse_cursor_enabled(&self) -> bool {
        self.stack.mouse_cursor_enabled()
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn stack(&self) -> &ModeStack {
        &self.stack
    }

    pub fn game_loop(&self) -> &GameLoop {
        &self.game_loop
    }
}
