// Mode system
//
// The application is always in one or more modes (main menu, gameplay, pause
// menu, a dialog...) kept on a stack. Each frame the stack decides which
// modes get to handle input, step the simulation and draw.

pub mod camera;
pub mod render;
pub mod stack;

pub use camera::Camera;
pub use render::{DrawLayer, LogRenderer, Renderer};
pub use stack::{ModeRequests, ModeStack};

use crate::engine::input::{InputConfig, InputManager};

/// What a mode can reach while handling input or stepping
pub struct ModeContext<'a> {
    pub input: &'a mut InputManager,
    pub config: &'a mut InputConfig,
    /// Length of one simulation step in seconds
    pub dt: f32,
    requests: &'a mut ModeRequests,
}

impl<'a> ModeContext<'a> {
    pub fn new(
        input: &'a mut InputManager,
        config: &'a mut InputConfig,
        dt: f32,
        requests: &'a mut ModeRequests,
    ) -> Self {
        Self {
            input,
            config,
            dt,
            requests,
        }
    }

    /// Push `mode` on top of the stack once the current frame is over
    pub fn next_frame_push_mode(&mut self, mode: Box<dyn Mode>) {
        self.requests.push(mode);
    }

    /// Pop the top mode once the current frame is over; may be called repeatedly
    pub fn next_frame_pop_mode(&mut self) {
        self.requests.pop();
    }

    /// Whether some mode already asked for a push this frame
    pub fn has_pending_push(&self) -> bool {
        self.requests.has_pending_push()
    }
}

/// One state of the application
///
/// Every method has a default so a mode only implements what it needs.
pub trait Mode {
    fn name(&self) -> &str;

    /// Whether the mode below this one also handles input, steps and draws
    fn execute_after_lower_mode(&self) -> bool {
        false
    }

    /// When true, this mode and the modes under it are not stepped
    fn simulation_disabled(&self) -> bool {
        false
    }

    fn mouse_cursor_enabled(&self) -> bool {
        false
    }

    /// Return false to keep lower modes from seeing this frame's input
    fn handle_input(&mut self, _ctx: &mut ModeContext) -> bool {
        true
    }

    fn step(&mut self, _ctx: &mut ModeContext) {}

    /// `top` is true only for the topmost mode on the stack
    fn camera(&self, _top: bool) -> Option<Camera> {
        None
    }

    fn draw_3d_far(&mut self, _top: bool, _renderer: &mut dyn Renderer) {}

    fn draw_3d_near(&mut self, _top: bool, _renderer: &mut dyn Renderer) {}

    fn draw_2d(&mut self, _top: bool, _renderer: &mut dyn Renderer) {}

    /// The mode became the topmost one, after a push or after the modes above it were popped
    fn now_at_top(&mut self) {}

    /// Another mode was pushed over this one
    fn pushed_below_top(&mut self) {}
}
