//! Section properties of a rectangular hollow member and of a fiber board
//!
//! Mirrors what the modeling service computes, so the host can fall back to
//! it when the service is unreachable.

use serde::{Deserialize, Serialize};

use crate::constants::{RESIN_DENSITY, STEEL_DENSITY};
use crate::model::ProfileParams;

/// Price per kilogram for materials without a listed rate
pub const DEFAULT_PRICE_PER_KG: f32 = 5.0;

/// Physical properties of one member
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProperties {
    /// mm³
    pub volume: f32,
    /// kg
    pub weight: f32,
    /// mm², inside and outside walls plus both end rings
    pub surface_area: f32,
}

impl SectionProperties {
    pub fn of(profile: &ProfileParams) -> Self {
        let (w, h, l) = (profile.width, profile.height, profile.length);
        let (iw, ih) = (profile.inner_width(), profile.inner_height());
        let area = profile.cross_section_area();
        let volume = area * l;

        Self {
            volume,
            weight: volume * STEEL_DENSITY,
            surface_area: 2.0 * l * (w + h) + 2.0 * l * (iw + ih) + 2.0 * area,
        }
    }

    /// Totals for `count` identical members
    pub fn times(&self, count: usize) -> Self {
        let n = count as f32;
        Self {
            volume: self.volume * n,
            weight: self.weight * n,
            surface_area: self.surface_area * n,
        }
    }
}

/// Flat fiber-reinforced board, the modeling service's second product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FiberBoardParams {
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    pub fiber_type: String,
    pub resin_type: String,
}

impl Default for FiberBoardParams {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            thickness: 5.0,
            fiber_type: "E-glass".to_string(),
            resin_type: "epoxy".to_string(),
        }
    }
}

/// Board treated as a solid block of resin; fiber and resin type do not
/// change the result
pub fn fiber_board_properties(board: &FiberBoardParams) -> SectionProperties {
    let (w, h, t) = (board.width, board.height, board.thickness);
    let volume = w * h * t;
    SectionProperties {
        volume,
        weight: volume * RESIN_DENSITY,
        surface_area: 2.0 * (w * h + w * t + h * t),
    }
}

pub fn price_per_kg(material: &str) -> f32 {
    match material {
        "Q235" => 5.2,
        "Q345" => 6.0,
        _ => DEFAULT_PRICE_PER_KG,
    }
}

/// Estimated price of `weight` kilograms of `material`
pub fn estimate_price(material: &str, weight: f32) -> f32 {
    weight * price_per_kg(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_tube() {
        // 20x20x2: area 400 - 256 = 144, volume 144 * 200
        let props = SectionProperties::of(&ProfileParams::default());
        assert_relative_eq!(props.volume, 28_800.0);
        assert_relative_eq!(props.weight, 0.226_08, epsilon = 1e-5);
        // 2*200*40 + 2*200*32 + 2*144
        assert_relative_eq!(props.surface_area, 29_088.0);
    }

    #[test]
    fn test_solid_bar() {
        let profile = ProfileParams {
            width: 10.0,
            height: 10.0,
            thickness: 6.0,
            length: 100.0,
            ..Default::default()
        };
        let props = SectionProperties::of(&profile);
        assert_relative_eq!(props.volume, 10_000.0);
        assert_relative_eq!(props.surface_area, 4_000.0 + 200.0);
    }

    #[test]
    fn test_default_fiber_board() {
        let props = fiber_board_properties(&FiberBoardParams::default());
        assert_relative_eq!(props.volume, 5.0e6);
        assert_relative_eq!(props.weight, 6.0, epsilon = 1e-4);
        // 2 * (1e6 + 5000 + 5000)
        assert_relative_eq!(props.surface_area, 2.02e6);
    }

    #[test]
    fn test_fiber_board_ignores_materials() {
        let carbon = FiberBoardParams {
            width: 200.0,
            height: 100.0,
            thickness: 2.0,
            fiber_type: "carbon".to_string(),
            resin_type: "vinyl ester".to_string(),
        };
        let glass = FiberBoardParams {
            fiber_type: "E-glass".to_string(),
            ..carbon.clone()
        };
        let props = fiber_board_properties(&carbon);
        assert_eq!(props, fiber_board_properties(&glass));
        assert_relative_eq!(props.volume, 40_000.0);
        assert_relative_eq!(props.surface_area, 2.0 * (20_000.0 + 400.0 + 200.0));
    }

    #[test]
    fn test_fiber_board_field_names() {
        let json = serde_json::to_value(FiberBoardParams::default()).unwrap();
        assert_eq!(json["fiberType"], "E-glass");
        assert_eq!(json["resinType"], "epoxy");
    }

    #[test]
    fn test_price_rates() {
        assert_relative_eq!(estimate_price("Q235", 10.0), 52.0);
        assert_relative_eq!(estimate_price("Q345", 10.0), 60.0);
        assert_relative_eq!(estimate_price("304", 10.0), 50.0);
    }

    #[test]
    fn test_totals_scale() {
        let props = SectionProperties::of(&ProfileParams::default()).times(3);
        assert_relative_eq!(props.volume, 86_400.0);
    }
}
