//! Tubekit core
//!
//! Headless layout engine for rectangular arrays of extruded profile members.
//!
//! # Module Structure
//!
//! ```text
//! tk-core/
//! ├── model/        # ArrayModel snapshots, pure updates, ModelStore
//! ├── geometry/     # Memoized member / plate / marker meshes
//! ├── scene/        # SceneBatch derivation and slot ↔ index map
//! ├── picking.rs    # Ray casting against handles, members, reference plane
//! ├── snap.rs       # Grid, feature and axis-lock snapping
//! ├── interaction/  # Editor and its interaction state machine
//! ├── history.rs    # Global position undo/redo
//! ├── selection.rs  # Single / multi selection
//! ├── export/       # STL, DXF, SVG writers
//! ├── properties.rs # Section properties and price estimate
//! ├── bom.rs        # Bill of materials lines
//! └── project.rs    # RON project files
//! ```

pub mod bom;
pub mod camera;
pub mod collab;
pub mod config;
pub mod constants;
pub mod export;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod math;
pub mod model;
pub mod picking;
pub mod project;
pub mod properties;
pub mod scene;
pub mod selection;
pub mod snap;

pub use camera::Camera;
pub use collab::{Collaborators, LogEntry, NullCollaborators, PositionRecord};
pub use config::EditorSettings;
pub use export::{ExportError, ExportFormat, export_to_file};
pub use geometry::{GeometryFactory, TriangleMesh};
pub use history::{HistoryEntry, HistoryManager};
pub use interaction::{Editor, InputEvent, InteractionState, Key, Modifiers, Tool};
pub use model::{ArrayModel, ArraySpec, LogicalIndex, ModelStore, PlateSpec, ProfileParams};
pub use project::{Project, ProjectError};
pub use scene::{SceneBatch, SceneSynchronizer};
pub use selection::{SelectionModifier, SelectionSet};
