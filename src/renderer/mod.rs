//! WebGPU rendering module
//!
//! The scene is rebuilt as a flat triangle list every frame in play field
//! pixels, then mapped to clip space through the letterboxing viewport.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;
pub mod viewport;

pub use pipeline::RenderState;
pub use vertex::Vertex;
pub use viewport::Viewport;
