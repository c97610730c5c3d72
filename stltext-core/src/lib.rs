/// stl-to-text core library - mesh decoding, transforms and rasterization
///
/// This library provides everything between an STL file and a character
/// buffer: decoding, in-place mesh transforms, the viewing pipeline and the
/// shaded rasterizer.

pub mod config;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod scene;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use config::{RenderConfig, ShadeRamp};
pub use error::{GeometryError, StlError};
pub use geometry::{Bounds, Mesh, Triangle};
pub use projection::{Projection, ProjectionMode, CHAR_RATIO};
pub use scene::{Cell, RenderStats, Scene, SceneState, TriangleRef};
pub use transform::{fit_all, Axis, Transform};
