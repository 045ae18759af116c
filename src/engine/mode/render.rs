// Drawing interface the modes render through
//
// The modes decide what to draw; how it reaches the screen belongs to the
// renderer behind this trait.

use super::camera::Camera;
use glam::{Vec2, Vec3};
use log::trace;

/// The three passes drawn every frame, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawLayer {
    /// Sky and distant scenery, no depth testing
    Far3d,
    /// Nearby gameplay objects with depth testing
    Near3d,
    /// Screen-space menus and text
    Overlay2d,
}

impl DrawLayer {
    pub const ALL: [DrawLayer; 3] = [DrawLayer::Far3d, DrawLayer::Near3d, DrawLayer::Overlay2d];
}

pub trait Renderer {
    fn set_camera(&mut self, camera: &Camera);

    /// Called before any mode draws into `layer`
    fn begin_layer(&mut self, layer: DrawLayer);

    fn draw_background(&mut self);

    fn draw_object(&mut self, name: &str, pos: Vec3);

    /// `pos` is in pixels from the top-left corner
    fn draw_text(&mut self, pos: Vec2, size: f32, text: &str);

    /// Full-screen translucent rectangle, used to dim lower modes
    fn draw_fade(&mut self, rgba: [f32; 4]);
}

/// Renderer that only logs its calls
#[derive(Debug, Default)]
pub struct LogRenderer {
    calls: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total draw calls received
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl Renderer for LogRenderer {
    fn set_camera(&mut self, camera: &Camera) {
        trace!("camera pos={} tgt={}", camera.pos, camera.tgt);
    }

    fn begin_layer(&mut self, layer: DrawLayer) {
        trace!("begin layer {:?}", layer);
    }

    fn draw_background(&mut self) {
        self.calls += 1;
        trace!("background");
    }

    fn draw_object(&mut self, name: &str, pos: Vec3) {
        self.calls += 1;
        trace!("object {} at {}", name, pos);
    }

    fn draw_text(&mut self, pos: Vec2, size: f32, text: &str) {
        self.calls += 1;
        trace!("text {:?} at {} size {}", text, pos, size);
    }

    fn draw_fade(&mut self, rgba: [f32; 4]) {
        self.calls += 1;
        trace!("fade {:?}", rgba);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Renderer that keeps a readable transcript of every call
    #[derive(Debug, Default)]
    pub(crate) struct RecordingRenderer {
        pub log: Vec<String>,
        pub camera: Option<Camera>,
    }

    impl RecordingRenderer {
        pub fn texts(&self) -> Vec<&str> {
            self.log
                .iter()
                .filter_map(|line| line.strip_prefix("text "))
                .collect()
        }
    }

    impl Renderer for RecordingRenderer {
        fn set_camera(&mut self, camera: &Camera) {
            self.camera = Some(*camera);
        }

        fn begin_layer(&mut self, layer: DrawLayer) {
            self.log.push(format!("layer {:?}", layer));
        }

        fn draw_background(&mut self) {
            self.log.push("background".to_string());
        }

        fn draw_object(&mut self, name: &str, _pos: Vec3) {
            self.log.push(format!("object {}", name));
        }

        fn draw_text(&mut self, _pos: Vec2, _size: f32, text: &str) {
            self.log.push(format!("text {}", text));
        }

        fn draw_fade(&mut self, _rgba: [f32; 4]) {
            self.log.push("fade".to_string());
        }
    }

    #[test]
    fn test_log_renderer_counts_draws() {
        let mut renderer = LogRenderer::new();
        renderer.begin_layer(DrawLayer::Far3d);
        renderer.draw_background();
        renderer.draw_text(Vec2::ZERO, 12.0, "hello");
        assert_eq!(renderer.calls(), 2);
    }

    #[test]
    fn test_layer_order() {
        assert_eq!(
            DrawLayer::ALL,
            [DrawLayer::Far3d, DrawLayer::Near3d, DrawLayer::Overlay2d]
        );
    }
}
