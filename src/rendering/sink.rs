use glam::Mat4;

use crate::rendering::shading::ShadingStrategy;
use crate::scene_graph::{MaterialId, MeshId, ModelNode};

/// Receiver of the leaves that survive culling. Implemented by the
/// rasterization backend.
pub trait RenderSink {
    fn begin_deferred(&mut self) {}

    /// `leaf` is always a part; `world` is its resolved world matrix.
    fn draw(&mut self, leaf: &ModelNode, world: Mat4, shading: &dyn ShadingStrategy);

    fn finish_deferred(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub name: String,
    pub mesh: MeshId,
    pub material: Option<MaterialId>,
    pub model_matrix: Mat4,
}

/// Sink that records one draw command per surviving leaf. The list is
/// cleared when a new deferred pass begins.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderSink for DrawList {
    fn begin_deferred(&mut self) {
        self.commands.clear();
    }

    fn draw(&mut self, leaf: &ModelNode, world: Mat4, shading: &dyn ShadingStrategy) {
        let Some(part) = leaf.as_part() else {
            return;
        };

        self.commands.push(DrawCommand {
            name: leaf.name().to_string(),
            mesh: part.mesh(),
            material: shading.material_for(part),
            model_matrix: world,
        });
    }
}
