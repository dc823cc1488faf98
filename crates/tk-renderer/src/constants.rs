//! Renderer constants

/// Instance buffer capacities
pub mod instances {
    /// Initial member capacity; buffers grow on demand up to [`MAX_SOLIDS`]
    pub const INITIAL_SOLIDS: u32 = 64;
    /// Hard member limit (grid plus free members)
    pub const MAX_SOLIDS: u32 = 4096;
    /// Initial hole-marker capacity
    pub const INITIAL_MARKERS: u32 = 256;
    /// Hard hole-marker limit
    pub const MAX_MARKERS: u32 = 65_536;
}

/// Instance colors (linear RGBA)
pub mod colors {
    /// Grid member
    pub const MEMBER: [f32; 4] = [0.72, 0.76, 0.80, 1.0];
    /// Selected member
    pub const SELECTED: [f32; 4] = [0.25, 0.55, 0.95, 1.0];
    /// Free (inserted) member
    pub const FREE_MEMBER: [f32; 4] = [0.80, 0.70, 0.50, 1.0];
    /// Hole marker on a member
    pub const HOLE: [f32; 4] = [0.10, 0.10, 0.10, 1.0];
    /// Base plate
    pub const PLATE: [f32; 4] = [0.55, 0.58, 0.60, 0.6];
    /// Hole through the base plate
    pub const PLATE_HOLE: [f32; 4] = [0.20, 0.20, 0.20, 1.0];
}

/// Extra depth of plate-hole markers beyond the plate thickness (mm)
pub const PLATE_HOLE_MARGIN: f32 = 0.5;
