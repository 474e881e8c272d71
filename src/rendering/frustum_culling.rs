use glam::Mat4;
use log::trace;

use crate::camera::CameraHandle;
use crate::math::Frustum;
use crate::rendering::filter::VisibilityFilter;
use crate::scene_graph::ModelNode;

/// Keeps leaves whose conservative bounding sphere reaches into the camera
/// frustum.
///
/// The plane set is rebuilt from `projection * view` on every `update`. While
/// the camera is not ready the previous planes stay in effect, so a camera
/// that has not seen its first resize does not cull the whole scene.
pub struct FrustumCullingFilter {
    camera: CameraHandle,
    frustum: Frustum,
}

impl FrustumCullingFilter {
    pub fn new(camera: CameraHandle) -> Self {
        Self {
            camera,
            frustum: Frustum::default(),
        }
    }

    /// Planes in effect for the current frame.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }
}

impl VisibilityFilter for FrustumCullingFilter {
    fn update(&mut self) {
        let camera = self.camera.borrow();
        if !camera.ready() {
            trace!("Camera not ready, keeping previous frustum planes");
            return;
        }

        self.frustum =
            Frustum::from_view_projection(camera.projection_matrix() * camera.view_matrix());
    }

    fn should_render(&self, node: &ModelNode, world: Mat4) -> bool {
        node.world_bounding_sphere(world).intersects_frustum(&self.frustum)
    }

    fn name(&self) -> &str {
        "frustum culling"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::math::AABB;
    use crate::scene_graph::{MeshId, ModelPart, Transform};
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn symmetric_camera() -> Rc<RefCell<Camera>> {
        let mut camera = Camera::new(90.0, 0.1, 100.0);
        camera.resize(512, 512);
        camera.shared()
    }

    fn renders(filter: &FrustumCullingFilter, node: &ModelNode) -> bool {
        filter.should_render(node, node.transform().matrix())
    }

    /// Part whose `size()` has the given length, centered on its origin.
    fn object_at(position: Vec3, size_length: f32) -> ModelNode {
        let half = Vec3::new(size_length * 0.5, 0.0, 0.0);
        ModelNode::part("object", ModelPart::new(MeshId(0), AABB::new(-half, half)))
            .with_transform(Transform::from_translation(position))
    }

    #[test]
    fn scenario_in_front_and_behind() {
        let camera = symmetric_camera();
        let mut filter = FrustumCullingFilter::new(camera);
        filter.update();

        assert!(renders(&filter, &object_at(Vec3::new(0.0, 0.0, -50.0), 2.0)));
        assert!(!renders(&filter, &object_at(Vec3::new(0.0, 0.0, 150.0), 2.0)));
    }

    #[test]
    fn rotating_camera_culls_object_behind() {
        let camera = symmetric_camera();
        let mut filter = FrustumCullingFilter::new(camera.clone());
        let object = object_at(Vec3::new(0.0, 0.0, -50.0), 2.0);

        camera.borrow_mut().yaw = 180.0;
        camera.borrow_mut().update();
        filter.update();

        assert!(!renders(&filter, &object));
    }

    #[test]
    fn not_ready_camera_keeps_previous_planes() {
        let camera = symmetric_camera();
        let mut filter = FrustumCullingFilter::new(camera.clone());
        filter.update();
        let before = *filter.frustum();

        {
            let mut camera = camera.borrow_mut();
            camera.position = Vec3::new(0.0, 0.0, 500.0);
            camera.resize(0, 0);
        }
        filter.update();

        assert_eq!(*filter.frustum(), before);
        assert!(renders(&filter, &object_at(Vec3::new(0.0, 0.0, -50.0), 2.0)));
    }

    #[test]
    fn never_ready_camera_culls_nothing_with_extent() {
        let camera = Camera::new(90.0, 0.1, 100.0).shared();
        let mut filter = FrustumCullingFilter::new(camera);
        filter.update();

        assert_eq!(*filter.frustum(), Frustum::default());
        assert!(renders(&filter, &object_at(Vec3::new(0.0, 0.0, 1000.0), 1.0)));
    }

    #[test]
    fn culling_is_translation_invariant() {
        let offsets = [
            Vec3::ZERO,
            Vec3::new(1000.0, -250.0, 37.5),
            Vec3::new(-3.0, 80.0, -1200.0),
        ];
        let relative = [
            (Vec3::new(0.0, 0.0, -50.0), true),
            (Vec3::new(45.0, 0.0, -40.0), false),
            (Vec3::new(38.0, 0.0, -40.0), true),
            (Vec3::new(0.0, 0.0, -99.0), true),
            (Vec3::new(0.0, 0.0, -110.0), false),
            (Vec3::new(0.0, 0.0, 10.0), false),
        ];

        for offset in offsets {
            let camera = symmetric_camera();
            camera.borrow_mut().position = offset;
            camera.borrow_mut().update();
            let mut filter = FrustumCullingFilter::new(camera);
            filter.update();

            for (position, expected) in relative {
                let object = object_at(offset + position, 2.0);
                assert_eq!(
                    renders(&filter, &object),
                    expected,
                    "object at {position} relative to camera at {offset}"
                );
            }
        }
    }

    #[test]
    fn spheres_fully_inside_are_never_culled() {
        let camera = symmetric_camera();
        {
            let mut camera = camera.borrow_mut();
            camera.position = Vec3::new(5.0, 2.0, -3.0);
            camera.yaw = 30.0;
            camera.pitch = 10.0;
            camera.update();
        }
        let mut filter = FrustumCullingFilter::new(camera);
        filter.update();
        let frustum = *filter.frustum();

        let mut checked = 0;
        for x in -10..=10 {
            for y in -10..=10 {
                for z in 0..=20 {
                    let center = Vec3::new(x as f32 * 8.0, y as f32 * 8.0, -(z as f32) * 8.0);
                    let radius = 1.5;
                    let inside = frustum
                        .planes
                        .iter()
                        .all(|plane| plane.signed_distance_to_point(center) >= radius);
                    if inside {
                        checked += 1;
                        assert!(renders(&filter, &object_at(center, radius)));
                    }
                }
            }
        }

        assert!(checked > 0);
    }
}
