use glam::Vec3;

/// Point light. Only the position matters to the scene core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Vec3,
}

impl LightSource {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}
