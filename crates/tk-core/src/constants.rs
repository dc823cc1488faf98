//! Global constants for tk-core

/// Minimum member width/height (mm)
pub const MIN_SECTION_SIDE: f32 = 5.0;

/// Maximum member width/height (mm)
pub const MAX_SECTION_SIDE: f32 = 200.0;

/// Minimum wall thickness (mm)
pub const MIN_THICKNESS: f32 = 1.0;

/// Maximum wall thickness (mm)
pub const MAX_THICKNESS: f32 = 10.0;

/// Minimum member length (mm)
pub const MIN_LENGTH: f32 = 50.0;

/// Maximum member length (mm)
pub const MAX_LENGTH: f32 = 5000.0;

/// Maximum grid count along either array axis
pub const MAX_ARRAY_COUNT: u32 = 20;

/// Maximum spacing between grid cells (mm)
pub const MAX_SPACING: f32 = 5000.0;

/// Steel density in kg/mm³
pub const STEEL_DENSITY: f32 = 7.85e-6;

/// Cured resin density in kg/mm³, used for fiber boards
pub const RESIN_DENSITY: f32 = 1.2e-6;

/// Extra depth added to single-wall hole markers (mm)
pub const SINGLE_WALL_MARGIN: f32 = 1.0;

/// Number of segments for hole marker cylinders
pub const MARKER_SEGMENTS: u32 = 16;

/// Persistence group used for array member positions
pub const POSITIONS_GROUP: &str = "square-tube";

/// Epsilon for parallel ray/plane tests
pub const RAY_EPSILON: f32 = 1e-6;
