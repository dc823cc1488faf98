//! Pointer picking
//!
//! Tests run in a fixed priority order and the first hit wins:
//!
//! 1. the selected member's axis handles (if shown)
//! 2. the instanced member batch (nearest triangle over all slots)
//! 3. the reference plane
//!
//! Member identity is resolved through [`SceneSynchronizer::index_at`], never
//! from anything attached to the geometry.

use glam::{Mat4, Vec2, Vec3};

use crate::camera::Camera;
use crate::config::HandleSettings;
use crate::geometry::TriangleMesh;
use crate::math::{Plane, Ray, ray_aabb_intersection, ray_cylinder_intersection, ray_triangle_intersection};
use crate::model::{Axis, LogicalIndex, ProfileParams};
use crate::scene::SceneSynchronizer;

/// A hit on the member batch
#[derive(Debug, Clone, PartialEq)]
pub struct MemberHit {
    pub slot: usize,
    pub index: LogicalIndex,
    /// World hit point
    pub point: Vec3,
    /// Hit point in the member's local frame
    pub local_point: Vec3,
    /// Face normal in the member's local frame
    pub local_normal: Vec3,
    /// Face normal in world space
    pub normal: Vec3,
    /// World corners of the hit triangle
    pub triangle: [Vec3; 3],
    /// Distance from the ray origin
    pub distance: f32,
}

/// Result of a pick, in priority order
#[derive(Debug, Clone, PartialEq)]
pub enum PickHit {
    Handle { axis: Axis, point: Vec3 },
    Member(MemberHit),
    Plane { point: Vec3, normal: Vec3 },
    Miss,
}

impl PickHit {
    pub fn is_miss(&self) -> bool {
        matches!(self, PickHit::Miss)
    }
}

/// Three arrows drawn on the selected member, one per local axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisHandles {
    pub origin: Vec3,
    /// World directions of the member's local X, Y, Z
    pub directions: [Vec3; 3],
    pub length: f32,
    pub radius: f32,
}

impl AxisHandles {
    /// Handles centred in the member's section, aligned with its rotation
    pub fn for_member(transform: &Mat4, profile: &ProfileParams, settings: &HandleSettings) -> Self {
        let origin = transform.transform_point3(Vec3::new(0.0, profile.height / 2.0, 0.0));
        let directions = Axis::all().map(|axis| transform.transform_vector3(axis.unit()).normalize_or_zero());
        Self {
            origin,
            directions,
            length: settings.length,
            radius: settings.radius,
        }
    }

    pub fn direction(&self, axis: Axis) -> Vec3 {
        self.directions[axis as usize]
    }

    /// Closest handle under the ray
    pub fn hit(&self, ray: &Ray) -> Option<(Axis, f32)> {
        Axis::all()
            .into_iter()
            .filter_map(|axis| {
                let end = self.origin + self.direction(axis) * self.length;
                ray_cylinder_intersection(ray, self.origin, end, self.radius).map(|t| (axis, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Background plane that catches pointer rays missing every member
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePlane {
    pub plane: Plane,
    /// Square half size around the plane point; `None` is unbounded
    pub half_extent: Option<f32>,
}

impl Default for ReferencePlane {
    fn default() -> Self {
        Self {
            plane: Plane::horizontal(0.0),
            half_extent: None,
        }
    }
}

impl ReferencePlane {
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let point = self.plane.intersect(ray)?;
        match self.half_extent {
            Some(half) => {
                let offset = point - self.plane.point;
                let in_plane = offset - self.plane.normal * offset.dot(self.plane.normal);
                (in_plane.abs().max_element() <= half).then_some(point)
            }
            None => Some(point),
        }
    }
}

/// Ray caster over handles, member batch and reference plane
#[derive(Debug, Clone, Default)]
pub struct PickingEngine {
    pub reference_plane: ReferencePlane,
}

impl PickingEngine {
    pub fn new(reference_plane: ReferencePlane) -> Self {
        Self { reference_plane }
    }

    /// Pick from a pointer position
    pub fn pick_screen(
        &self,
        camera: &Camera,
        screen: Vec2,
        viewport: Vec2,
        handles: Option<&AxisHandles>,
        scene: &SceneSynchronizer,
        mesh: &TriangleMesh,
    ) -> PickHit {
        let ray = camera.screen_to_ray(screen, viewport);
        self.pick(&ray, handles, scene, mesh)
    }

    /// Full priority pick for a world ray
    pub fn pick(
        &self,
        ray: &Ray,
        handles: Option<&AxisHandles>,
        scene: &SceneSynchronizer,
        mesh: &TriangleMesh,
    ) -> PickHit {
        if let Some((axis, t)) = handles.and_then(|h| h.hit(ray)) {
            return PickHit::Handle {
                axis,
                point: ray.at(t),
            };
        }
        if let Some(hit) = self.pick_member(ray, scene, mesh) {
            return PickHit::Member(hit);
        }
        if let Some(point) = self.reference_plane.intersect(ray) {
            return PickHit::Plane {
                point,
                normal: self.reference_plane.plane.normal,
            };
        }
        PickHit::Miss
    }

    /// Nearest member hit over every slot of the batch
    pub fn pick_member(
        &self,
        ray: &Ray,
        scene: &SceneSynchronizer,
        mesh: &TriangleMesh,
    ) -> Option<MemberHit> {
        let local_bounds = mesh.bounds();
        let mut best: Option<MemberHit> = None;

        for (slot, transform) in scene.batch().transforms.iter().enumerate() {
            let local_ray = ray.transformed(&transform.inverse());
            if ray_aabb_intersection(&local_ray, &local_bounds).is_none() {
                continue;
            }

            let nearest = mesh
                .triangles()
                .enumerate()
                .filter_map(|(tri, [a, b, c])| {
                    ray_triangle_intersection(&local_ray, a, b, c).map(|t| (tri, t))
                })
                .min_by(|x, y| x.1.total_cmp(&y.1));
            let Some((tri, t)) = nearest else {
                continue;
            };

            let local_point = local_ray.at(t);
            let point = transform.transform_point3(local_point);
            let distance = (point - ray.origin).length();
            if best.as_ref().is_some_and(|b| b.distance <= distance) {
                continue;
            }
            let Some(index) = scene.index_at(slot) else {
                continue;
            };

            let local_normal = mesh.normals[mesh.indices[tri * 3] as usize];
            best = Some(MemberHit {
                slot,
                index,
                point,
                local_point,
                local_normal,
                normal: transform.transform_vector3(local_normal).normalize_or_zero(),
                triangle: mesh.triangle(tri).map(|v| transform.transform_point3(v)),
                distance,
            });
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::generate_profile_mesh;
    use crate::model::{ArrayModel, ArraySpec};
    use approx::assert_relative_eq;

    fn setup(count_x: u32) -> (ArrayModel, SceneSynchronizer, TriangleMesh) {
        let model = ArrayModel::new(
            ProfileParams::default(),
            ArraySpec {
                count_x,
                count_y: 1,
                spacing_x: 50.0,
                spacing_y: 50.0,
            },
        );
        let mut scene = SceneSynchronizer::default();
        scene.sync(&model);
        let mesh = generate_profile_mesh(&model.profile);
        (model, scene, mesh)
    }

    fn down_at(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 500.0, z), Vec3::NEG_Y)
    }

    #[test]
    fn test_member_hit_reports_logical_index() {
        let (model, mut scene, mesh) = setup(3);
        let model = model.with_deleted(LogicalIndex(0)).unwrap();
        scene.sync(&model);

        let engine = PickingEngine::default();
        let PickHit::Member(hit) = engine.pick(&down_at(100.0, 10.0), None, &scene, &mesh) else {
            panic!("expected a member hit");
        };
        // cell 2 is drawn in slot 1 after cell 0 was deleted
        assert_eq!(hit.slot, 1);
        assert_eq!(hit.index, LogicalIndex(2));
        assert_relative_eq!(hit.point.y, 20.0, epsilon = 1e-3);
        assert_relative_eq!(hit.local_normal.y, 1.0);
    }

    #[test]
    fn test_plane_hit_when_no_member() {
        let (_, scene, mesh) = setup(1);
        let engine = PickingEngine::default();
        match engine.pick(&down_at(25.0, 0.0), None, &scene, &mesh) {
            PickHit::Plane { point, normal } => {
                assert_relative_eq!(point.x, 25.0);
                assert_eq!(normal, Vec3::Y);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bounded_plane_misses_outside() {
        let (_, scene, mesh) = setup(1);
        let engine = PickingEngine::new(ReferencePlane {
            half_extent: Some(200.0),
            ..Default::default()
        });
        assert!(engine.pick(&down_at(500.0, 0.0), None, &scene, &mesh).is_miss());
    }

    #[test]
    fn test_handles_take_priority_over_member() {
        let (model, scene, mesh) = setup(1);
        let handles = AxisHandles::for_member(
            &model.instance_transform(LogicalIndex(0)),
            &model.profile,
            &HandleSettings::default(),
        );
        // straight down onto the X handle, which sits above the member top
        let ray = Ray::new(Vec3::new(60.0, 500.0, 0.0), Vec3::NEG_Y);
        match PickingEngine::default().pick(&ray, Some(&handles), &scene, &mesh) {
            PickHit::Handle { axis, .. } => assert_eq!(axis, Axis::X),
            other => panic!("unexpected {other:?}"),
        }
        // same ray without handles falls through to the plane
        assert!(matches!(
            PickingEngine::default().pick(&ray, None, &scene, &mesh),
            PickHit::Plane { .. }
        ));
    }

    #[test]
    fn test_nearest_member_wins() {
        let (_, scene, mesh) = setup(3);
        // beyond the members' ends
        let ray = Ray::new(Vec3::new(-100.0, 10.0, 150.0), Vec3::X);
        assert!(PickingEngine::default().pick_member(&ray, &scene, &mesh).is_none());
        // along +X through all three members
        let ray = Ray::new(Vec3::new(-100.0, 1.0, 0.0), Vec3::X);
        let hit = PickingEngine::default().pick_member(&ray, &scene, &mesh).unwrap();
        assert_eq!(hit.index, LogicalIndex(0));
        assert_relative_eq!(hit.point.x, -10.0, epsilon = 1e-3);
    }
}
