//! Tubekit renderer
//!
//! The GPU half of the scene pipeline. `tk-core` derives a [`SceneBatch`]
//! from each model snapshot; this crate packs it into instance data and
//! uploads it, skipping the upload when nothing changed.
//!
//! # Module Structure
//!
//! ```text
//! tk-renderer/
//! ├── camera.rs     # CameraUniform
//! ├── constants.rs  # Colors and buffer capacities
//! ├── vertex.rs     # Vertex formats and instance attribute helpers
//! ├── instanced.rs  # Growable instance buffers
//! ├── pipeline.rs   # Pipeline builder
//! ├── packing.rs    # SceneBatch → instance data (pure, no GPU)
//! └── member.rs     # MemberRenderer: apply + render
//! ```
//!
//! [`SceneBatch`]: tk_core::SceneBatch

pub mod camera;
pub mod constants;
pub mod instanced;
pub mod member;
pub mod packing;
pub mod pipeline;
pub mod vertex;

pub use camera::CameraUniform;
pub use member::MemberRenderer;
pub use packing::{PackedBatch, SolidInstance, pack_batch, selection_hash};
