//! Hole marker placement

use glam::{Mat4, Quat, Vec3};

use super::HoleMarker;
use crate::config::HoleSettings;
use crate::constants::SINGLE_WALL_MARGIN;
use crate::model::{Face, HoleMode, InstanceOverride, LogicalIndex, ProfileParams};

/// Z positions (member-local) of axis holes, centred along the length.
///
/// `floor(length / pitch)` holes are laid out; any whose rim would pass an
/// end face is dropped.
pub fn axis_hole_offsets(length: f32, pitch: f32, diameter: f32) -> Vec<f32> {
    if pitch <= 0.0 || length <= 0.0 {
        return Vec::new();
    }
    let count = (length / pitch).floor() as usize;
    if count == 0 {
        return Vec::new();
    }
    let half = length / 2.0;
    let start = -half + (length - (count - 1) as f32 * pitch) / 2.0;
    (0..count)
        .map(|k| start + k as f32 * pitch)
        .filter(|z| z.abs() + diameter / 2.0 <= half + 1e-4)
        .collect()
}

/// Point on the outer surface of `face` at local `z`
fn face_point(profile: &ProfileParams, face: Face, z: f32) -> Vec3 {
    let mid = profile.height / 2.0;
    match face {
        Face::Top => Vec3::new(0.0, profile.height, z),
        Face::Bottom => Vec3::new(0.0, 0.0, z),
        Face::Right => Vec3::new(profile.width / 2.0, mid, z),
        Face::Left => Vec3::new(-profile.width / 2.0, mid, z),
    }
}

/// Section dimension perpendicular to `face`
fn across(profile: &ProfileParams, face: Face) -> f32 {
    match face {
        Face::Top | Face::Bottom => profile.height,
        Face::Left | Face::Right => profile.width,
    }
}

fn marker(
    index: LogicalIndex,
    face: Face,
    local_center: Vec3,
    diameter: f32,
    depth: f32,
    instance: &Mat4,
) -> HoleMarker {
    let normal = face.normal();
    let local = Mat4::from_scale_rotation_translation(
        Vec3::new(diameter, diameter, depth),
        Quat::from_rotation_arc(Vec3::Z, normal),
        local_center,
    );
    HoleMarker {
        index,
        face,
        transform: *instance * local,
        center: instance.transform_point3(local_center),
        axis: instance.transform_vector3(normal).normalize_or_zero(),
        diameter,
        depth,
    }
}

/// All markers for one member
pub fn member_markers(
    index: LogicalIndex,
    ov: &InstanceOverride,
    profile: &ProfileParams,
    settings: &HoleSettings,
    instance: &Mat4,
) -> Vec<HoleMarker> {
    let mut markers = Vec::new();

    if ov.has_axis_holes {
        let offsets = axis_hole_offsets(profile.length, settings.pitch, settings.diameter);
        for &face in &settings.faces {
            for &z in &offsets {
                markers.push(marker(
                    index,
                    face,
                    face_point(profile, face, z),
                    settings.diameter,
                    settings.depth,
                    instance,
                ));
            }
        }
    }

    for hole in &ov.side_holes {
        let z = hole.offset - profile.length / 2.0;
        let surface = face_point(profile, hole.face, z);
        let (center, depth) = match hole.mode {
            HoleMode::Through => {
                let span = across(profile, hole.face);
                (surface - hole.face.normal() * span / 2.0, span + SINGLE_WALL_MARGIN)
            }
            HoleMode::SingleWall => (
                surface - hole.face.normal() * profile.thickness / 2.0,
                profile.thickness + SINGLE_WALL_MARGIN,
            ),
        };
        markers.push(marker(index, hole.face, center, hole.diameter, depth, instance));
    }

    markers
}
