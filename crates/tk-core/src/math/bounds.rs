//! Axis-aligned bounding boxes

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inverted box that any point expands
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |bbox, p| bbox.expand_to_include(p))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the enclosing sphere around `center()`
    pub fn radius(&self) -> f32 {
        (self.size() * 0.5).length()
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expand_to_include(&self, point: Vec3) -> BoundingBox {
        BoundingBox {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Box enclosing all eight transformed corners
    pub fn transform(&self, transform: &Mat4) -> BoundingBox {
        let (lo, hi) = (self.min, self.max);
        BoundingBox::from_points((0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            transform.transform_point3(corner)
        }))
    }

    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_invalid_until_expanded() {
        let bbox = BoundingBox::empty();
        assert!(!bbox.is_valid());
        let bbox = bbox.expand_to_include(Vec3::ONE);
        assert!(bbox.is_valid());
        assert!(bbox.contains_point(Vec3::ONE));
    }

    #[test]
    fn test_translated_box() {
        let bbox = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
        let moved = bbox.transform(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(moved.max, Vec3::new(11.0, 1.0, 1.0));
    }
}
