//! Ray casting primitives shared by picking, snapping and the interaction states

mod bounds;
mod intersect;

use glam::{Mat4, Vec3};

use crate::constants::RAY_EPSILON;

pub use bounds::BoundingBox;
pub use intersect::{
    ray_aabb_intersection, ray_cylinder_intersection, ray_plane_intersection,
    ray_triangle_intersection,
};

/// A half-line in world (or local) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform the ray into another space. The direction is renormalized,
    /// so parameters are not preserved across spaces; compare hit points instead.
    pub fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray::new(
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }
}

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Horizontal plane at height `y`
    pub fn horizontal(y: f32) -> Self {
        Self::new(Vec3::new(0.0, y, 0.0), Vec3::Y)
    }

    /// Plane containing the line `point + s * axis` that faces the viewer as
    /// much as possible. Used to drag along a single axis.
    pub fn containing_axis(point: Vec3, axis: Vec3, view_dir: Vec3) -> Self {
        let axis = axis.normalize_or_zero();
        let normal = axis.cross(view_dir).cross(axis);
        if normal.length_squared() > RAY_EPSILON {
            return Self::new(point, normal);
        }
        // Looking straight down the axis: any plane containing it will do
        let fallback = if axis.y.abs() < 0.9 { Vec3::Y } else { Vec3::Z };
        Self::new(point, axis.cross(fallback).cross(axis))
    }

    /// Vertical plane through `point` facing the viewer (normal has no Y component)
    pub fn vertical_facing(point: Vec3, view_dir: Vec3) -> Self {
        let mut normal = Vec3::new(view_dir.x, 0.0, view_dir.z);
        if normal.length_squared() < 0.01 {
            normal = Vec3::Z;
        }
        Self::new(point, normal)
    }

    /// Intersection with a ray, if it lies in front of the origin
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        ray_plane_intersection(ray.origin, ray.direction, self.point, self.normal)
    }

    /// Signed distance from the plane to a point
    pub fn distance_to(&self, point: Vec3) -> f32 {
        (point - self.point).dot(self.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_plane_hit() {
        let ray = Ray::new(Vec3::new(3.0, 10.0, -2.0), Vec3::NEG_Y);
        let hit = Plane::horizontal(4.0).intersect(&ray).unwrap();
        assert_relative_eq!(hit.y, 4.0);
        assert_relative_eq!(hit.x, 3.0);
        assert_relative_eq!(hit.z, -2.0);
    }

    #[test]
    fn test_plane_behind_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert!(Plane::horizontal(0.0).intersect(&ray).is_none());
    }

    #[test]
    fn test_axis_plane_contains_axis() {
        let view = Vec3::new(-1.0, -1.0, -1.0).normalize();
        let plane = Plane::containing_axis(Vec3::new(5.0, 0.0, 5.0), Vec3::X, view);
        assert_relative_eq!(plane.normal.dot(Vec3::X), 0.0, epsilon = 1e-5);
        assert_relative_eq!(plane.distance_to(Vec3::new(100.0, 0.0, 5.0)), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_axis_plane_degenerate_view() {
        let plane = Plane::containing_axis(Vec3::ZERO, Vec3::Y, Vec3::NEG_Y);
        assert_relative_eq!(plane.normal.dot(Vec3::Y), 0.0, epsilon = 1e-5);
        assert!(plane.normal.length() > 0.9);
    }
}
