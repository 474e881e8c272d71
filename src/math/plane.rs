use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Plane in Hessian normal form. Points with a non-negative signed distance
/// lie on the inside half-space.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Plane {
        Plane { normal, distance }
    }

    /// Builds a plane from raw `(a, b, c, d)` coefficients and normalizes it so
    /// that signed distances are in world units. An all-zero row stays zero.
    pub fn from_coefficients(coefficients: Vec4) -> Plane {
        let normal = coefficients.truncate();
        let length = normal.length();

        if length > 0.0 {
            Plane::new(normal / length, coefficients.w / length)
        } else {
            Plane::new(normal, coefficients.w)
        }
    }

    pub fn signed_distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}
