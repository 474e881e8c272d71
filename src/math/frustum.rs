use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::math::{bounds::BoundingSphere, plane::Plane};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Frustum {
    // Planes are in the order: left, right, bottom, top, near, far
    pub planes: [Plane; 6],
}

impl Default for Frustum {
    /// All-zero planes. Every sphere with a positive radius passes this set.
    fn default() -> Self {
        Frustum::zeroed()
    }
}

impl Frustum {
    /// Extracts the clip planes from a combined `projection * view` matrix
    /// (OpenGL clip space, z in [-w, w]). Each plane is normalized, so the
    /// signed distance of a point is measured in world units.
    pub fn from_view_projection(view_projection: Mat4) -> Frustum {
        let x = view_projection.row(0);
        let y = view_projection.row(1);
        let z = view_projection.row(2);
        let w = view_projection.row(3);

        let planes = [
            // Left
            Plane::from_coefficients(w + x),
            // Right
            Plane::from_coefficients(w - x),
            // Bottom
            Plane::from_coefficients(w + y),
            // Top
            Plane::from_coefficients(w - y),
            // Near
            Plane::from_coefficients(w + z),
            // Far
            Plane::from_coefficients(w - z),
        ];

        Frustum { planes }
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        BoundingSphere::new(center, radius).intersects_frustum(self)
    }
}
