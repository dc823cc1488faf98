//! Minimal DXF writer: top view, millimetre units
//!
//! World `(x, z)` maps to drawing `(x, -z)` so +Z points down the sheet.

use std::io::Write;

use glam::Vec2;

use super::{ExportError, axis_segment, footprint, solid_transforms};
use crate::model::Face;
use crate::scene::SceneBatch;

const LAYER_MEMBERS: &str = "MEMBERS";
const LAYER_AXES: &str = "AXES";
const LAYER_HOLES: &str = "HOLES";
const LAYER_PLATE: &str = "PLATE";

/// `$INSUNITS` value for millimetres
const UNITS_MM: i32 = 4;

struct DxfWriter<'a, W: Write> {
    out: &'a mut W,
}

impl<W: Write> DxfWriter<'_, W> {
    fn pair(&mut self, code: i32, value: impl std::fmt::Display) -> Result<(), ExportError> {
        writeln!(self.out, "{code}\n{value}")?;
        Ok(())
    }

    fn point(&mut self, code: i32, p: Vec2) -> Result<(), ExportError> {
        self.pair(code, p.x)?;
        // `+ 0.0` keeps -0 out of the file
        self.pair(code + 10, -p.y + 0.0)
    }

    fn polyline(&mut self, layer: &str, points: &[Vec2]) -> Result<(), ExportError> {
        self.pair(0, "LWPOLYLINE")?;
        self.pair(8, layer)?;
        self.pair(90, points.len())?;
        self.pair(70, 1)?;
        for &p in points {
            self.point(10, p)?;
        }
        Ok(())
    }

    fn line(&mut self, layer: &str, a: Vec2, b: Vec2) -> Result<(), ExportError> {
        self.pair(0, "LINE")?;
        self.pair(8, layer)?;
        self.point(10, a)?;
        self.pair(30, 0)?;
        self.point(11, b)?;
        self.pair(31, 0)
    }

    fn circle(&mut self, layer: &str, center: Vec2, radius: f32) -> Result<(), ExportError> {
        self.pair(0, "CIRCLE")?;
        self.pair(8, layer)?;
        self.point(10, center)?;
        self.pair(30, 0)?;
        self.pair(40, radius)
    }
}

/// Member outlines, centre lines, top-face holes and the plate
pub fn write_dxf<W: Write>(out: &mut W, batch: &SceneBatch) -> Result<(), ExportError> {
    let mut dxf = DxfWriter { out };

    dxf.pair(0, "SECTION")?;
    dxf.pair(2, "HEADER")?;
    dxf.pair(9, "$INSUNITS")?;
    dxf.pair(70, UNITS_MM)?;
    dxf.pair(0, "ENDSEC")?;

    dxf.pair(0, "SECTION")?;
    dxf.pair(2, "ENTITIES")?;

    for transform in solid_transforms(batch) {
        dxf.polyline(LAYER_MEMBERS, &footprint(transform, &batch.profile))?;
        let (a, b) = axis_segment(transform, &batch.profile);
        dxf.line(LAYER_AXES, a, b)?;
    }

    for marker in batch.markers.iter().filter(|m| m.face == Face::Top) {
        let center = Vec2::new(marker.center.x, marker.center.z);
        dxf.circle(LAYER_HOLES, center, marker.diameter / 2.0)?;
    }

    if let Some(plate) = &batch.plate {
        let (hw, hh) = (plate.width / 2.0, plate.height / 2.0);
        let outline = [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ];
        dxf.polyline(LAYER_PLATE, &outline)?;
        for hole in &plate.holes {
            dxf.circle(LAYER_PLATE, Vec2::new(hole.x, hole.y), hole.r)?;
        }
    }

    dxf.pair(0, "ENDSEC")?;
    dxf.pair(0, "EOF")
}
