// Vertical text menu shared by the menu modes

use crate::engine::input::{ButtonAction, InputManager};
use crate::engine::mode::Renderer;
use glam::Vec2;

pub const SCREEN_SIZE: Vec2 = Vec2::new(800.0, 600.0);

const ENTRY_HEIGHT: f32 = 22.0;
const ENTRY_PADDING: f32 = 8.0;
const FONT_SIZE: f32 = 16.0;

/// Color laid over lower modes when a menu is drawn on top of them
pub const DIM_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.6];

/// Result of processing one frame of menu input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent<T> {
    Selected(T),
    Cancelled,
}

pub struct Menu<T> {
    entries: Vec<(T, String)>,
    cursor: usize,
    /// Offset of the menu's center from the screen center, in screen fractions
    center_offset: Vec2,
}

impl<T: Copy + PartialEq> Menu<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            center_offset: Vec2::ZERO,
        }
    }

    pub fn with_center_offset(mut self, offset: Vec2) -> Self {
        self.center_offset = offset;
        self
    }

    pub fn add_entry(&mut self, id: T, label: impl Into<String>) {
        self.entries.push((id, label.into()));
    }

    pub fn set_label(&mut self, id: T, label: impl Into<String>) {
        if let Some(entry) = self.entries.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            entry.1 = label.into();
        }
    }

    pub fn selected(&self) -> Option<T> {
        self.entries.get(self.cursor).map(|(id, _)| *id)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(_, label)| label.as_str())
    }

    /// Move the cursor or report a choice based on this frame's input
    pub fn process(&mut self, input: &InputManager) -> Option<MenuEvent<T>> {
        if self.entries.is_empty() {
            return None;
        }
        let len = self.entries.len();

        if input.pressed(ButtonAction::Cancel) {
            Some(MenuEvent::Cancelled)
        } else if input.pressed(ButtonAction::MenuUp) {
            self.cursor = (self.cursor + len - 1) % len;
            None
        } else if input.pressed(ButtonAction::MenuDown) {
            self.cursor = (self.cursor + 1) % len;
            None
        } else if input.pressed(ButtonAction::Confirm) {
            self.selected().map(MenuEvent::Selected)
        } else {
            None
        }
    }

    /// Draw the entries centered on screen, dimming whatever is below first
    pub fn draw(&self, renderer: &mut dyn Renderer, dim_background: bool) {
        if dim_background {
            renderer.draw_fade(DIM_COLOR);
        }

        let total_height = self.entries.len() as f32 * (ENTRY_HEIGHT + ENTRY_PADDING);
        let center = SCREEN_SIZE / 2.0 + self.center_offset * SCREEN_SIZE;
        let mut pos = Vec2::new(center.x, center.y - total_height / 2.0);
        for (i, (_, label)) in self.entries.iter().enumerate() {
            let marker = if i == self.cursor { "> " } else { "  " };
            renderer.draw_text(pos, FONT_SIZE, &format!("{}{}", marker, label));
            pos.y += ENTRY_HEIGHT + ENTRY_PADDING;
        }
    }
}

impl<T: Copy + PartialEq> Default for Menu<T> {
    fn default() -> Self {
        Self::new()
    }
}
