/// Wordfield core library - text analysis, placement and scene logic
///
/// Turns source text into 3D geometry: the text is tokenized, occurrences of
/// search terms become batches of cubes placed by token position, and
/// sketches animate the resulting scene graph every frame. Rendering is left
/// to the terminal and web front ends.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod orbit;
pub mod placement;
pub mod projection;
pub mod scene;
pub mod sketch;
pub mod text;
pub mod transform;

// Re-export commonly used types
pub use color::Color;
pub use config::WordfieldConfig;
pub use error::{ConfigError, Error, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use orbit::OrbitControls;
pub use placement::{Instance, ScaleMode, SearchTerm, TermStats};
pub use projection::{project_to_screen, Camera};
pub use scene::{DirectionalLight, Material, MeshView, NodeId, Scene};
pub use sketch::{create, FrameTime, Sketch, SketchAction, SKETCH_NAMES};
pub use text::{tokenize, TokenizedText};
pub use transform::{Rotation, Transform};
