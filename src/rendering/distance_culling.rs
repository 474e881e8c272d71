use glam::{Mat4, Vec3};

use crate::camera::CameraHandle;
use crate::rendering::filter::VisibilityFilter;
use crate::scene_graph::ModelNode;

/// Drops leaves whose bounding sphere lies entirely beyond `max_distance`
/// from the camera. The eye position is sampled once per frame and kept while
/// the camera is not ready.
pub struct DistanceCullingFilter {
    camera: CameraHandle,
    max_distance: f32,
    eye: Vec3,
}

impl DistanceCullingFilter {
    pub fn new(camera: CameraHandle, max_distance: f32) -> Self {
        Self {
            camera,
            max_distance,
            eye: Vec3::ZERO,
        }
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn set_max_distance(&mut self, max_distance: f32) {
        self.max_distance = max_distance;
    }
}

impl VisibilityFilter for DistanceCullingFilter {
    fn update(&mut self) {
        let camera = self.camera.borrow();
        if camera.ready() {
            self.eye = camera.position();
        }
    }

    fn should_render(&self, node: &ModelNode, world: Mat4) -> bool {
        let sphere = node.world_bounding_sphere(world);
        sphere.center.distance(self.eye) - sphere.radius <= self.max_distance
    }

    fn name(&self) -> &str {
        "distance culling"
    }
}
