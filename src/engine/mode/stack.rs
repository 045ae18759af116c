// Mode stack driver
//
// Push and pop requests made during a frame are only recorded; the stack's
// membership changes in `apply_pending`, between frames, so no pass ever
// iterates over a stack that is being modified.

use super::render::{DrawLayer, Renderer};
use super::{Camera, Mode, ModeContext};
use crate::engine::input::{InputConfig, InputManager};
use log::info;

/// Stack changes requested during the current frame
#[derive(Default)]
pub struct ModeRequests {
    push: Option<Box<dyn Mode>>,
    pops: usize,
}

impl ModeRequests {
    /// Queue a push
    ///
    /// # Panics
    /// If a push is already queued this frame, or a pop was queued before it.
    pub fn push(&mut self, mode: Box<dyn Mode>) {
        if let Some(queued) = &self.push {
            panic!(
                "Cannot push mode {}: mode {} is already queued for push this frame",
                mode.name(),
                queued.name()
            );
        }
        assert!(
            self.pops == 0,
            "Cannot push mode {} after a pop was queued in the same frame",
            mode.name()
        );
        self.push = Some(mode);
    }

    pub fn pop(&mut self) {
        self.pops += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.push.is_none() && self.pops == 0
    }

    pub fn pending_pops(&self) -> usize {
        self.pops
    }

    pub fn has_pending_push(&self) -> bool {
        self.push.is_some()
    }

    fn take(&mut self) -> (Option<Box<dyn Mode>>, usize) {
        (self.push.take(), std::mem::take(&mut self.pops))
    }
}

/// Ordered modes, bottom (oldest) first
#[derive(Default)]
pub struct ModeStack {
    modes: Vec<Box<dyn Mode>>,
    requests: ModeRequests,
}

impl ModeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack whose first frame will start with `root` pushed
    pub fn with_root(root: Box<dyn Mode>) -> Self {
        let mut stack = Self::new();
        stack.next_frame_push_mode(root);
        stack
    }

    pub fn next_frame_push_mode(&mut self, mode: Box<dyn Mode>) {
        self.requests.push(mode);
    }

    pub fn next_frame_pop_mode(&mut self) {
        self.requests.pop();
    }

    pub fn requests(&self) -> &ModeRequests {
        &self.requests
    }

    /// Apply this frame's queued push and pops; returns whether anything changed
    ///
    /// The push is applied before the pops. Transition hooks run as the
    /// stack changes: the old top hears `pushed_below_top`, and whichever mode
    /// ends up on top afterwards hears `now_at_top`.
    ///
    /// # Panics
    /// If more pops were queued than there are modes to pop.
    pub fn apply_pending(&mut self) -> bool {
        let (push, pops) = self.requests.take();
        if push.is_none() && pops == 0 {
            return false;
        }

        if let Some(mode) = push {
            if let Some(top) = self.modes.last_mut() {
                top.pushed_below_top();
            }
            info!("Pushing mode {}", mode.name());
            self.modes.push(mode);
        }

        assert!(
            pops <= self.modes.len(),
            "Cannot pop {} mode(s) from a stack of {}",
            pops,
            self.modes.len()
        );
        for _ in 0..pops {
            if let Some(mode) = self.modes.pop() {
                info!("Popped mode {}", mode.name());
            }
        }

        match self.modes.last_mut() {
            Some(top) => top.now_at_top(),
            None => info!("Mode stack is empty"),
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn current_mode(&self) -> Option<&dyn Mode> {
        self.modes.last().map(|mode| mode.as_ref())
    }

    /// Modes from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &dyn Mode> + '_ {
        self.modes.iter().map(|mode| mode.as_ref())
    }

    /// Index of the lowest mode that executes this frame
    ///
    /// Starting from the top, each mode that executes after its lower mode
    /// lets the one below it in too.
    pub fn executing_start(&self) -> usize {
        let mut start = self.modes.len().saturating_sub(1);
        while start > 0 && self.modes[start].execute_after_lower_mode() {
            start -= 1;
        }
        start
    }

    /// Index of the lowest mode that gets stepped this frame
    pub fn simulation_start(&self) -> usize {
        let start = self.executing_start();
        self.modes[start..]
            .iter()
            .rposition(|mode| mode.simulation_disabled())
            .map(|i| start + i + 1)
            .unwrap_or(start)
    }

    pub fn mouse_cursor_enabled(&self) -> bool {
        self.current_mode()
            .map(|mode| mode.mouse_cursor_enabled())
            .unwrap_or(false)
    }

    /// Offer input to the executing modes from the top down
    pub fn handle_input(&mut self, input: &mut InputManager, config: &mut InputConfig, dt: f32) {
        let start = self.executing_start();
        if self.modes.is_empty() {
            return;
        }
        for mode in self.modes[start..].iter_mut().rev() {
            let mut ctx = ModeContext::new(input, config, dt, &mut self.requests);
            if !mode.handle_input(&mut ctx) {
                break;
            }
        }
    }

    /// Run `steps` simulation steps over the executing modes, bottom-up
    ///
    /// Returns the number of modes that were stepped.
    pub fn step(
        &mut self,
        input: &mut InputManager,
        config: &mut InputConfig,
        dt: f32,
        steps: u32,
    ) -> usize {
        if self.modes.is_empty() {
            return 0;
        }
        let start = self.simulation_start();
        for _ in 0..steps {
            for mode in self.modes[start..].iter_mut() {
                let mut ctx = ModeContext::new(input, config, dt, &mut self.requests);
                mode.step(&mut ctx);
            }
        }
        self.modes.len() - start
    }

    /// Camera of the highest executing mode that provides one
    pub fn camera(&self) -> Option<Camera> {
        if self.modes.is_empty() {
            return None;
        }
        let start = self.executing_start();
        let top = self.modes.len() - 1;
        (start..=top)
            .rev()
            .find_map(|i| self.modes[i].camera(i == top))
    }

    /// Draw each layer for every executing mode, lower modes first
    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        if self.modes.is_empty() {
            return;
        }
        if let Some(camera) = self.camera() {
            renderer.set_camera(&camera);
        }

        let start = self.executing_start();
        let top = self.modes.len() - 1;
        for layer in DrawLayer::ALL {
            renderer.begin_layer(layer);
            for (i, mode) in self.modes.iter_mut().enumerate().skip(start) {
                let is_top = i == top;
                match layer {
                    DrawLayer::Far3d => mode.draw_3d_far(is_top, renderer),
                    DrawLayer::Near3d => mode.draw_3d_near(is_top, renderer),
                    DrawLayer::Overlay2d => mode.draw_2d(is_top, renderer),
                }
            }
        }
    }
}
