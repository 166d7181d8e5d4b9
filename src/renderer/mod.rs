//! WebGPU rendering module
//!
//! Top-down flat-shaded view: the scene arena is tessellated on the CPU each
//! frame and drawn with a single passthrough pipeline.

pub mod camera;
pub mod draw;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use camera::Camera;
pub use pipeline::RenderState;
