use crate::scene_graph::{MaterialId, ModelPart};

/// Policy deciding how a surviving part is shaded. The rasterization sink
/// asks it for the material to bind.
pub trait ShadingStrategy {
    fn name(&self) -> &str;

    fn material_for(&self, part: &ModelPart) -> Option<MaterialId>;
}

/// Draws every part with its own material.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopShadingStrategy;

impl ShadingStrategy for NopShadingStrategy {
    fn name(&self) -> &str {
        "nop"
    }

    fn material_for(&self, part: &ModelPart) -> Option<MaterialId> {
        part.material()
    }
}

/// Draws every part with one shared material, e.g. for a debug view.
#[derive(Debug, Clone, Copy)]
pub struct OverrideShadingStrategy(pub MaterialId);

impl ShadingStrategy for OverrideShadingStrategy {
    fn name(&self) -> &str {
        "override"
    }

    fn material_for(&self, _part: &ModelPart) -> Option<MaterialId> {
        Some(self.0)
    }
}
