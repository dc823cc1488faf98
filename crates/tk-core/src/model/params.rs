//! Shared parametric dimensions

use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_ARRAY_COUNT, MAX_LENGTH, MAX_SECTION_SIDE, MAX_SPACING, MAX_THICKNESS, MIN_LENGTH,
    MIN_SECTION_SIDE, MIN_THICKNESS,
};

/// Cross-section and extrusion length shared by every member of the array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileParams {
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    pub length: f32,
    pub material: String,
    pub standard: String,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            thickness: 2.0,
            length: 200.0,
            material: "Q235".to_string(),
            standard: "GB/T 6728-2017".to_string(),
        }
    }
}

impl ProfileParams {
    /// Cavity width; zero once the walls meet
    pub fn inner_width(&self) -> f32 {
        (self.width - 2.0 * self.thickness).max(0.0)
    }

    /// Cavity height; zero once the walls meet
    pub fn inner_height(&self) -> f32 {
        (self.height - 2.0 * self.thickness).max(0.0)
    }

    /// True when the cavity has collapsed and the member is a solid bar
    pub fn is_solid(&self) -> bool {
        self.inner_width() <= 0.0 || self.inner_height() <= 0.0
    }

    /// Steel area of the cross-section (mm²)
    pub fn cross_section_area(&self) -> f32 {
        self.width * self.height - self.inner_width() * self.inner_height()
    }

    /// Copy with every dimension pulled into its editable range
    pub fn clamped(&self) -> Self {
        Self {
            width: clamp_finite(self.width, MIN_SECTION_SIDE, MAX_SECTION_SIDE),
            height: clamp_finite(self.height, MIN_SECTION_SIDE, MAX_SECTION_SIDE),
            thickness: clamp_finite(self.thickness, MIN_THICKNESS, MAX_THICKNESS),
            length: clamp_length(self.length),
            material: self.material.clone(),
            standard: self.standard.clone(),
        }
    }

    /// Exact-dimension cache key
    pub fn key(&self) -> ProfileKey {
        ProfileKey([
            self.width.to_bits(),
            self.height.to_bits(),
            self.thickness.to_bits(),
            self.length.to_bits(),
        ])
    }
}

/// Bit-exact dimension tuple used to memoize generated geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileKey(pub [u32; 4]);

/// Member length clamp applied at every mutation boundary
pub fn clamp_length(length: f32) -> f32 {
    clamp_finite(length, MIN_LENGTH, MAX_LENGTH)
}

fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArraySpec {
    pub count_x: u32,
    pub count_y: u32,
    pub spacing_x: f32,
    pub spacing_y: f32,
}

impl Default for ArraySpec {
    fn default() -> Self {
        Self {
            count_x: 1,
            count_y: 1,
            spacing_x: 50.0,
            spacing_y: 50.0,
        }
    }
}

impl ArraySpec {
    pub fn clamped(&self) -> Self {
        Self {
            count_x: self.count_x.clamp(1, MAX_ARRAY_COUNT),
            count_y: self.count_y.clamp(1, MAX_ARRAY_COUNT),
            spacing_x: clamp_finite(self.spacing_x, 0.0, MAX_SPACING),
            spacing_y: clamp_finite(self.spacing_y, 0.0, MAX_SPACING),
        }
    }
}

/// Circular hole through the base plate, in plate coordinates (x right, y away)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateHole {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

/// Flat base plate the array stands on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateSpec {
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    pub holes: Vec<PlateHole>,
}

impl Default for PlateSpec {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            thickness: 5.0,
            holes: Vec::new(),
        }
    }
}

impl PlateSpec {
    /// Exact-dimension cache key (holes do not change the solid)
    pub fn key(&self) -> ProfileKey {
        ProfileKey([
            self.width.to_bits(),
            self.height.to_bits(),
            self.thickness.to_bits(),
            0,
        ])
    }
}
