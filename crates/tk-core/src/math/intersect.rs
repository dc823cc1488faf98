//! Ray intersection tests
//!
//! All functions return the ray parameter (or hit point) of the nearest
//! intersection in front of the origin. A miss is `None`.

use glam::Vec3;

use super::{BoundingBox, Ray};
use crate::constants::RAY_EPSILON;

/// Ray-plane intersection point.
///
/// Returns `None` when the ray is parallel to the plane or the plane is
/// behind the ray origin.
pub fn ray_plane_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<Vec3> {
    let denom = ray_dir.dot(plane_normal);
    if denom.abs() < RAY_EPSILON {
        return None;
    }
    let t = (plane_point - ray_origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray_origin + ray_dir * t)
}

/// Ray against a finite cylinder given by its axis endpoints.
///
/// The ray and the axis offset are projected onto the plane perpendicular to
/// the axis, which reduces the test to a 2D circle quadratic. The smallest
/// non-negative root whose hit lies between the two end points wins. End caps
/// are not tested; handles are thin enough that the side wall suffices.
pub fn ray_cylinder_intersection(ray: &Ray, start: Vec3, end: Vec3, radius: f32) -> Option<f32> {
    let span = end - start;
    let length = span.length();
    if length < RAY_EPSILON {
        return None;
    }
    let axis = span / length;

    let offset = ray.origin - start;
    let d = ray.direction - axis * ray.direction.dot(axis);
    let o = offset - axis * offset.dot(axis);

    let a = d.length_squared();
    if a < RAY_EPSILON {
        // Ray runs parallel to the axis
        return None;
    }
    let b = 2.0 * d.dot(o);
    let c = o.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
        .into_iter()
        .filter(|t| *t >= 0.0)
        .find(|t| {
            let along = (ray.at(*t) - start).dot(axis);
            (0.0..=length).contains(&along)
        })
}

/// Slab test against an axis-aligned box.
///
/// A ray starting inside the box reports `t = 0`.
pub fn ray_aabb_intersection(ray: &Ray, bounds: &BoundingBox) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

        if dir.abs() < RAY_EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}

/// Möller-Trumbore ray/triangle test. Both faces count as hits.
pub fn ray_triangle_intersection(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > RAY_EPSILON).then_some(t)
}
