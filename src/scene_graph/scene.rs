use glam::Mat4;
use log::{debug, info, trace, warn};
use slotmap::{new_key_type, SlotMap};

use crate::rendering::{RenderManager, RenderSink};
use crate::scene_graph::light::LightSource;
use crate::scene_graph::model_node::ModelNode;

new_key_type! {
    pub struct ModelKey;
    pub struct LightKey;
}

/// Per-frame outcome of [`Scene::render_frame`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub leaves_visited: usize,
    pub leaves_culled: usize,
    pub leaves_drawn: usize,
}

/// Forest of root models plus lights, rendered through one render manager.
pub struct Scene {
    models: SlotMap<ModelKey, ModelNode>,
    // Insertion order of the roots, which is also their render order.
    model_order: Vec<ModelKey>,
    lights: SlotMap<LightKey, LightSource>,
    render_manager: RenderManager,
    frame_index: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_render_manager(RenderManager::new())
    }

    pub fn with_render_manager(render_manager: RenderManager) -> Self {
        Self {
            models: SlotMap::with_key(),
            model_order: Vec::new(),
            lights: SlotMap::with_key(),
            render_manager,
            frame_index: 0,
        }
    }

    /// One-time preparation before the first frame.
    pub fn setup(&mut self) {
        self.frame_index = 0;
        info!(
            "Scene ready with {} root models and {} lights",
            self.models.len(),
            self.lights.len()
        );
    }

    /// Per-frame bookkeeping. Starts a new frame, which leaves the filter
    /// chain stale until the render manager is refreshed.
    pub fn update(&mut self) {
        self.frame_index += 1;
        self.render_manager.mark_stale();
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn add_model(&mut self, model: ModelNode) -> ModelKey {
        debug!(
            "Added model '{}' with {} parts",
            model.name(),
            model.leaf_count()
        );
        let key = self.models.insert(model);
        self.model_order.push(key);
        key
    }

    pub fn remove_model(&mut self, key: ModelKey) -> Option<ModelNode> {
        let model = self.models.remove(key)?;
        self.model_order.retain(|&other| other != key);
        Some(model)
    }

    pub fn model(&self, key: ModelKey) -> Option<&ModelNode> {
        self.models.get(key)
    }

    pub fn model_mut(&mut self, key: ModelKey) -> Option<&mut ModelNode> {
        self.models.get_mut(key)
    }

    /// Root models in insertion order.
    pub fn models(&self) -> impl Iterator<Item = (ModelKey, &ModelNode)> + '_ {
        self.model_order
            .iter()
            .filter_map(move |&key| self.models.get(key).map(|model| (key, model)))
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn add_light(&mut self, light: LightSource) -> LightKey {
        self.lights.insert(light)
    }

    pub fn remove_light(&mut self, key: LightKey) -> Option<LightSource> {
        self.lights.remove(key)
    }

    pub fn light(&self, key: LightKey) -> Option<&LightSource> {
        self.lights.get(key)
    }

    pub fn light_mut(&mut self, key: LightKey) -> Option<&mut LightSource> {
        self.lights.get_mut(key)
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightKey, &LightSource)> + '_ {
        self.lights.iter()
    }

    pub fn render_manager(&self) -> &RenderManager {
        &self.render_manager
    }

    pub fn render_manager_mut(&mut self) -> &mut RenderManager {
        &mut self.render_manager
    }

    /// Leaves of every root whose name contains `pattern`, in render order.
    pub fn find_leaves_by_name(&self, pattern: &str) -> Vec<&ModelNode> {
        self.models()
            .flat_map(|(_, model)| model.stream_tree())
            .filter(|leaf| leaf.name().contains(pattern))
            .collect()
    }

    /// Hands every surviving leaf to `sink`, roots in insertion order and
    /// leaves depth-first. Leaves that ignore filters are always drawn; all
    /// others must pass the render manager's filter chain, which has to be
    /// refreshed for this frame beforehand.
    pub fn render_frame(&self, sink: &mut dyn RenderSink) -> FrameStats {
        let render_manager = &self.render_manager;
        if !render_manager.is_fresh() {
            warn!(
                "Frame {}: rendering with visibility filters that were not refreshed",
                self.frame_index
            );
        }

        let shading = render_manager.shading_strategy();
        let mut stats = FrameStats::default();

        for (_, model) in self.models() {
            model.traverse_tree_with_transform(Mat4::IDENTITY, |leaf, world| {
                stats.leaves_visited += 1;

                if leaf.ignore_filters() || render_manager.should_render(leaf, world) {
                    sink.draw(leaf, world, shading);
                    stats.leaves_drawn += 1;
                } else {
                    stats.leaves_culled += 1;
                }
            });
        }

        trace!(
            "Frame {}: {} leaves, {} drawn, {} culled",
            self.frame_index,
            stats.leaves_visited,
            stats.leaves_drawn,
            stats.leaves_culled
        );

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::math::AABB;
    use crate::rendering::{DrawList, FrustumCullingFilter, VisibilityFilter};
    use crate::scene_graph::{MeshId, ModelPart, Transform};
    use glam::Vec3;

    struct RejectAll;

    impl VisibilityFilter for RejectAll {
        fn update(&mut self) {}

        fn should_render(&self, _node: &ModelNode, _world: Mat4) -> bool {
            false
        }
    }

    fn part(name: &str, mesh: u32) -> ModelNode {
        ModelNode::part(
            name,
            ModelPart::new(MeshId(mesh), AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5))),
        )
    }

    fn drawn_names(list: &DrawList) -> Vec<&str> {
        list.commands().iter().map(|command| command.name.as_str()).collect()
    }

    #[test]
    fn draws_every_leaf_without_filters() {
        let mut scene = Scene::new();
        scene.add_model(ModelNode::composite(
            "first",
            vec![part("a", 0), ModelNode::composite("inner", vec![part("b", 1)])],
        ));
        scene.add_model(part("c", 2));
        scene.update();
        scene.render_manager_mut().update();

        let mut list = DrawList::new();
        list.begin_deferred();
        let stats = scene.render_frame(&mut list);

        assert_eq!(drawn_names(&list), ["a", "b", "c"]);
        assert_eq!(
            stats,
            FrameStats {
                leaves_visited: 3,
                leaves_culled: 0,
                leaves_drawn: 3,
            }
        );
    }

    #[test]
    fn ignore_filters_beats_rejecting_chain() {
        let mut scene = Scene::new();
        let mut sky = part("sky", 0);
        sky.set_ignore_filters(true);
        scene.add_model(ModelNode::composite("world", vec![part("rock", 1), sky]));
        scene.render_manager_mut().add_model_filter(RejectAll);
        scene.update();
        scene.render_manager_mut().update();

        let mut list = DrawList::new();
        let stats = scene.render_frame(&mut list);

        assert_eq!(drawn_names(&list), ["sky"]);
        assert_eq!(stats.leaves_culled, 1);
    }

    #[test]
    fn ignore_filters_on_object_behind_rotated_camera() {
        let camera = Camera::new(90.0, 0.1, 100.0).shared();
        camera.borrow_mut().resize(100, 100);
        camera.borrow_mut().yaw = 180.0;
        camera.borrow_mut().update();

        let mut scene = Scene::new();
        scene
            .render_manager_mut()
            .add_model_filter(FrustumCullingFilter::new(camera));
        let mut pinned = part("pinned", 0)
            .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, -50.0)));
        pinned.set_ignore_filters(true);
        let plain = part("plain", 1)
            .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, -50.0)));
        scene.add_model(pinned);
        scene.add_model(plain);
        scene.update();
        scene.render_manager_mut().update();

        let mut list = DrawList::new();
        scene.render_frame(&mut list);

        assert_eq!(drawn_names(&list), ["pinned"]);
    }

    #[test]
    fn culls_leaves_where_they_are_drawn() {
        let camera = Camera::new(90.0, 0.1, 100.0).shared();
        camera.borrow_mut().resize(100, 100);

        let mut scene = Scene::new();
        scene
            .render_manager_mut()
            .add_model_filter(FrustumCullingFilter::new(camera));
        // Local +Z would be behind the camera; the parent moves it ahead.
        scene.add_model(
            ModelNode::composite(
                "convoy",
                vec![
                    part("ahead", 0)
                        .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, 50.0))),
                    part("behind", 1)
                        .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, 150.0))),
                ],
            )
            .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, -100.0))),
        );
        scene.update();
        scene.render_manager_mut().update();

        let mut list = DrawList::new();
        let stats = scene.render_frame(&mut list);

        assert_eq!(drawn_names(&list), ["ahead"]);
        assert_eq!(stats.leaves_culled, 1);
        assert_eq!(
            list.commands()[0].model_matrix.transform_point3(Vec3::ZERO),
            Vec3::new(0.0, 0.0, -50.0)
        );
    }

    #[test]
    fn sink_receives_world_transform() {
        let mut scene = Scene::new();
        scene.add_model(
            ModelNode::composite(
                "parent",
                vec![part("child", 0).with_transform(Transform::from_translation(Vec3::Y))],
            )
            .with_transform(Transform::from_translation(Vec3::X)),
        );
        scene.update();
        scene.render_manager_mut().update();

        let mut list = DrawList::new();
        scene.render_frame(&mut list);

        assert_eq!(
            list.commands()[0].model_matrix,
            Mat4::from_translation(Vec3::new(1.0, 1.0, 0.0))
        );
    }

    #[test]
    fn removing_models_keeps_remaining_order() {
        let mut scene = Scene::new();
        let a = scene.add_model(part("a", 0));
        scene.add_model(part("b", 1));
        scene.add_model(part("c", 2));

        let removed = scene.remove_model(a).expect("model was added");
        assert_eq!(removed.name(), "a");
        assert!(scene.remove_model(a).is_none());

        let names: Vec<_> = scene.models().map(|(_, model)| model.name()).collect();
        assert_eq!(names, ["b", "c"]);
        assert_eq!(scene.model_count(), 2);
    }

    #[test]
    fn lights_can_be_added_and_removed() {
        let mut scene = Scene::new();
        let key = scene.add_light(LightSource::new(Vec3::ONE));
        scene.add_light(LightSource::new(Vec3::ZERO));

        scene.light_mut(key).expect("light exists").position = Vec3::X;
        assert_eq!(scene.light(key).map(|light| light.position), Some(Vec3::X));
        assert!(scene.remove_light(key).is_some());
        assert_eq!(scene.lights().count(), 1);
    }

    #[test]
    fn finds_leaves_by_name() {
        let mut scene = Scene::new();
        scene.add_model(ModelNode::composite(
            "ship",
            vec![part("Luces_1", 0), part("Hull", 1), part("Luces_2", 2)],
        ));

        let names: Vec<_> = scene
            .find_leaves_by_name("Luces")
            .iter()
            .map(|leaf| leaf.name())
            .collect();
        assert_eq!(names, ["Luces_1", "Luces_2"]);
    }

    #[test]
    fn update_marks_filters_stale() {
        let mut scene = Scene::new();
        scene.render_manager_mut().update();
        assert!(scene.render_manager().is_fresh());

        scene.update();
        assert!(!scene.render_manager().is_fresh());
        assert_eq!(scene.frame_index(), 1);
    }
}
