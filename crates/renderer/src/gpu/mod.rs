//! GPU side of the renderer.
//!
//! - `context` owns wgpu instance/device/surface wiring and reconfigures the
//!   swapchain when the window resizes.
//! - `pipeline` links compiled GLSL pairs into render pipelines sharing one
//!   pipeline layout, and owns each program's vertex/uniform buffers.
//! - `texture` uploads the scene image once and exposes its bind group.
//! - `uniforms` mirrors the per-frame `FrameParams` block.
//! - `state` glues everything together and records each frame.

mod context;
mod pipeline;
mod state;
mod texture;
mod uniforms;

pub use pipeline::ShaderProgram;
pub(crate) use state::GpuState;
