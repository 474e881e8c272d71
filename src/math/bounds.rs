use glam::{Mat4, Vec3};

use crate::math::{frustum::Frustum, plane::Plane};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> BoundingSphere {
        BoundingSphere { center, radius }
    }

    /// Conservative sphere used for culling: centered on the box, with the
    /// full box diagonal as its radius.
    pub fn enclosing(aabb: &AABB) -> BoundingSphere {
        BoundingSphere::new(aabb.center(), aabb.size().length())
    }

    /// Outside as soon as one plane has the whole sphere on its negative
    /// side, that is `distance <= -radius`.
    pub fn is_outside_plane(&self, plane: &Plane) -> bool {
        plane.signed_distance_to_point(self.center) <= -self.radius
    }

    pub fn intersects_frustum(&self, frustum: &Frustum) -> bool {
        !frustum
            .planes
            .iter()
            .any(|plane| self.is_outside_plane(plane))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for AABB {
    fn default() -> Self {
        AABB::new(Vec3::ZERO, Vec3::ZERO)
    }
}

impl AABB {
    pub fn new(point1: Vec3, point2: Vec3) -> AABB {
        let min = point1.min(point2);
        let max = point1.max(point2);
        AABB { min, max }
    }

    /// Tight box around a point cloud. No points yields the empty box at the
    /// origin.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> AABB {
        let mut points = points.into_iter();

        let Some(first) = points.next() else {
            return AABB::default();
        };

        points.fold(AABB::new(first, first), |aabb, point| AABB {
            min: aabb.min.min(point),
            max: aabb.max.max(point),
        })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Axis-aligned box around the eight transformed corners.
    pub fn transformed(&self, transform: &Mat4) -> AABB {
        AABB::from_points(
            self.corners()
                .map(|corner| transform.transform_point3(corner)),
        )
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}
