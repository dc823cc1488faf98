//! SVG top view
//!
//! Drawn in world millimetres with `(x, z)` as SVG `(x, y)`, so the picture
//! matches the DXF output once that is viewed y-down.

use std::fmt::Write as _;
use std::io::Write;

use glam::Vec2;

use super::{ExportError, axis_segment, footprint, solid_transforms};
use crate::model::Face;
use crate::scene::SceneBatch;

/// Blank border around the drawing (mm)
const MARGIN: f32 = 10.0;

const STYLE: &str = ".member{fill:#dfe6ee;stroke:#1f2a36;stroke-width:0.5}\
.axis{stroke:#c0392b;stroke-width:0.3;stroke-dasharray:4 2}\
.hole{fill:none;stroke:#1f2a36;stroke-width:0.3}\
.plate{fill:none;stroke:#7f8c8d;stroke-width:0.5}";

fn path_data(points: &[Vec2]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{cmd}{} {} ", p.x, p.y);
    }
    d.push('Z');
    d
}

pub fn write_svg<W: Write>(out: &mut W, batch: &SceneBatch) -> Result<(), ExportError> {
    let bounds = batch.bounds();
    let min = Vec2::new(bounds.min.x, bounds.min.z) - Vec2::splat(MARGIN);
    let size = Vec2::new(bounds.max.x - bounds.min.x, bounds.max.z - bounds.min.z)
        + Vec2::splat(2.0 * MARGIN);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}mm" height="{}mm">"#,
        min.x, min.y, size.x, size.y, size.x, size.y
    )?;
    writeln!(out, "  <style>{STYLE}</style>")?;

    if let Some(plate) = &batch.plate {
        writeln!(out, r#"  <g class="plate">"#)?;
        writeln!(
            out,
            r#"    <rect x="{}" y="{}" width="{}" height="{}"/>"#,
            -plate.width / 2.0,
            -plate.height / 2.0,
            plate.width,
            plate.height
        )?;
        for hole in &plate.holes {
            writeln!(
                out,
                r#"    <circle cx="{}" cy="{}" r="{}"/>"#,
                hole.x, hole.y, hole.r
            )?;
        }
        writeln!(out, "  </g>")?;
    }

    writeln!(out, r#"  <g id="members">"#)?;
    for transform in solid_transforms(batch) {
        let outline = footprint(transform, &batch.profile);
        writeln!(out, r#"    <path class="member" d="{}"/>"#, path_data(&outline))?;
        let (a, b) = axis_segment(transform, &batch.profile);
        writeln!(
            out,
            r#"    <line class="axis" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            a.x, a.y, b.x, b.y
        )?;
    }
    writeln!(out, "  </g>")?;

    writeln!(out, r#"  <g id="holes">"#)?;
    for marker in batch.markers.iter().filter(|m| m.face == Face::Top) {
        writeln!(
            out,
            r#"    <circle class="hole" cx="{}" cy="{}" r="{}"/>"#,
            marker.center.x,
            marker.center.z,
            marker.diameter / 2.0
        )?;
    }
    writeln!(out, "  </g>")?;

    writeln!(out, "</svg>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::model::PlateSpec;

    fn render(batch: &SceneBatch) -> String {
        let mut out = Vec::new();
        write_svg(&mut out, batch).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_view_box_covers_layout() {
        let (batch, _) = fixtures::layout();
        let text = render(&batch);
        // members span x -10..110 and z -100..400
        assert!(text.contains(r#"viewBox="-20 -110 140 520""#));
        assert_eq!(text.matches(r#"class="member""#).count(), 2);
        assert_eq!(text.matches(r#"class="hole""#).count(), 10);
        assert!(text.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_plate_group() {
        let model = fixtures::model()
            .with_plate(Some(PlateSpec::default()))
            .unwrap();
        let text = render(&fixtures::batch(&model));
        assert!(text.contains(r#"<g class="plate">"#));
        assert!(text.contains(r#"<rect x="-500" y="-500" width="1000" height="1000"/>"#));
    }

    #[test]
    fn test_path_data_closes() {
        let d = path_data(&[Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 2.0)]);
        assert_eq!(d, "M0 0 L1 0 L1 2 Z");
    }
}
