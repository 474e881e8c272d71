use glam::Mat4;

use crate::scene_graph::ModelNode;

/// A visibility criterion. `update` runs once per frame, before any
/// `should_render` call of that frame; `should_render` is then asked once per
/// leaf.
pub trait VisibilityFilter {
    fn update(&mut self);

    /// `world` is the leaf's fully resolved transform, ancestors included,
    /// i.e. the same matrix it is drawn with.
    fn should_render(&self, node: &ModelNode, world: Mat4) -> bool;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Handle returned when a filter is registered with the render manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(pub(crate) u64);
