//! Candidate point constraints for insertion
//!
//! Given a raw pointer-derived point the resolver applies, in order:
//! feature snap (vertex/midpoint of the hit triangle, short-circuits), grid
//! quantization, axis lock, orthogonal lock and forward-axis lock.

use glam::Vec3;

use crate::config::{AxisLock, SnapSettings};

/// Round `value` to the nearest multiple of `size`; `size <= 0` disables snapping
pub fn grid_snap(value: f32, size: f32) -> f32 {
    if size <= 0.0 {
        return value;
    }
    (value / size).round() * size
}

/// Per-axis [`grid_snap`]
pub fn grid_snap_point(point: Vec3, size: f32) -> Vec3 {
    Vec3::new(
        grid_snap(point.x, size),
        grid_snap(point.y, size),
        grid_snap(point.z, size),
    )
}

/// Nearest corner or edge midpoint of a triangle
pub fn nearest_feature(point: Vec3, [a, b, c]: [Vec3; 3]) -> Vec3 {
    [a, b, c, (a + b) * 0.5, (b + c) * 0.5, (c + a) * 0.5]
        .into_iter()
        .min_by(|p, q| {
            p.distance_squared(point)
                .total_cmp(&q.distance_squared(point))
        })
        .unwrap_or(point)
}

/// What the resolver knows about the current pointer sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapInput {
    /// Pointer ray projected onto the constraint plane
    pub raw: Vec3,
    /// Insertion base point
    pub base: Vec3,
    /// World triangle under the pointer, when a member was hit
    pub hit: Option<(Vec3, [Vec3; 3])>,
    /// Preview forward direction while the forward-axis modifier is held
    pub forward: Option<Vec3>,
}

/// Applies [`SnapSettings`] to pointer samples
#[derive(Debug, Clone, Default)]
pub struct SnapResolver {
    pub settings: SnapSettings,
}

impl SnapResolver {
    pub fn new(settings: SnapSettings) -> Self {
        Self { settings }
    }

    pub fn resolve(&self, input: &SnapInput) -> Vec3 {
        let settings = &self.settings;
        let free = settings.axis_lock == AxisLock::Free;

        if settings.snap_to_point
            && free
            && let Some((point, triangle)) = input.hit
        {
            return nearest_feature(point, triangle);
        }

        let mut p = grid_snap_point(input.raw, settings.snap_size);
        let base = input.base;

        match settings.axis_lock {
            AxisLock::Free => p.y = base.y,
            AxisLock::LockX => {
                p.y = base.y;
                p.z = base.z;
            }
            AxisLock::LockZ => {
                p.x = base.x;
                p.y = base.y;
            }
            AxisLock::LockY => {
                p.x = base.x;
                p.z = base.z;
            }
        }

        if settings.orthogonal && free {
            let delta = p - base;
            if delta.x.abs() >= delta.z.abs() {
                p.z = base.z;
            } else {
                p.x = base.x;
            }
        }

        if let Some(forward) = input.forward {
            let forward = forward.normalize_or_zero();
            if forward != Vec3::ZERO {
                p = base + forward * (p - base).dot(forward);
            }
        }

        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(raw: Vec3) -> SnapInput {
        SnapInput {
            raw,
            base: Vec3::new(0.0, 5.0, 0.0),
            hit: None,
            forward: None,
        }
    }

    #[test]
    fn test_grid_snap_rounds_to_nearest() {
        assert_relative_eq!(grid_snap(13.4, 10.0), 10.0);
        assert_relative_eq!(grid_snap(16.0, 10.0), 20.0);
        assert_relative_eq!(grid_snap(-16.0, 10.0), -20.0);
        assert_relative_eq!(grid_snap(13.4, 0.0), 13.4);
    }

    #[test]
    fn test_free_snaps_plane_and_keeps_base_height() {
        let resolver = SnapResolver::default();
        let p = resolver.resolve(&input(Vec3::new(13.4, 7.0, 16.0)));
        assert_eq!(p, Vec3::new(10.0, 5.0, 20.0));
    }

    #[test]
    fn test_axis_locks() {
        let raw = Vec3::new(31.0, 48.0, 62.0);
        let mut resolver = SnapResolver::default();

        resolver.settings.axis_lock = AxisLock::LockX;
        assert_eq!(resolver.resolve(&input(raw)), Vec3::new(30.0, 5.0, 0.0));

        resolver.settings.axis_lock = AxisLock::LockZ;
        assert_eq!(resolver.resolve(&input(raw)), Vec3::new(0.0, 5.0, 60.0));

        resolver.settings.axis_lock = AxisLock::LockY;
        assert_eq!(resolver.resolve(&input(raw)), Vec3::new(0.0, 50.0, 0.0));
    }

    #[test]
    fn test_vertex_snap_short_circuits() {
        let resolver = SnapResolver::new(SnapSettings {
            snap_to_point: true,
            ..Default::default()
        });
        let triangle = [Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 10.0)];
        let snap = SnapInput {
            hit: Some((Vec3::new(4.6, 0.0, 0.4), triangle)),
            ..input(Vec3::new(4.6, 0.0, 0.4))
        };
        // closest feature is the midpoint of the first edge, not a grid node
        assert_eq!(resolver.resolve(&snap), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_vertex_snap_ignored_under_axis_lock() {
        let resolver = SnapResolver::new(SnapSettings {
            snap_to_point: true,
            axis_lock: AxisLock::LockX,
            ..Default::default()
        });
        let triangle = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let snap = SnapInput {
            hit: Some((Vec3::new(0.9, 0.0, 0.0), triangle)),
            ..input(Vec3::new(24.0, 0.0, 33.0))
        };
        assert_eq!(resolver.resolve(&snap), Vec3::new(20.0, 5.0, 0.0));
    }

    #[test]
    fn test_orthogonal_keeps_dominant_direction() {
        let resolver = SnapResolver::new(SnapSettings {
            orthogonal: true,
            ..Default::default()
        });
        assert_eq!(
            resolver.resolve(&input(Vec3::new(40.0, 0.0, 20.0))),
            Vec3::new(40.0, 5.0, 0.0)
        );
        assert_eq!(
            resolver.resolve(&input(Vec3::new(10.0, 0.0, -70.0))),
            Vec3::new(0.0, 5.0, -70.0)
        );
    }

    #[test]
    fn test_forward_lock_projects_onto_line() {
        let resolver = SnapResolver::default();
        let snap = SnapInput {
            forward: Some(Vec3::new(1.0, 0.0, 1.0)),
            ..input(Vec3::new(40.0, 0.0, 0.0))
        };
        let p = resolver.resolve(&snap);
        assert_relative_eq!(p.x, 20.0, epsilon = 1e-4);
        assert_relative_eq!(p.z, 20.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-4);
    }
}
