// Camera handed from the active modes to the renderer

use glam::Vec3;

/// Eye position, look-at target and up vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: Vec3,
    pub tgt: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(pos: Vec3, tgt: Vec3, up: Vec3) -> Self {
        Self { pos, tgt, up }
    }

    /// Camera at `pos` looking at `tgt` with +Y up
    pub fn looking_at(pos: Vec3, tgt: Vec3) -> Self {
        Self::new(pos, tgt, Vec3::Y)
    }

    /// Unit vector from the eye towards the target
    pub fn forward(&self) -> Vec3 {
        (self.tgt - self.pos).normalize_or_zero()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO)
    }
}
