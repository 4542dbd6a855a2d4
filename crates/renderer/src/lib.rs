//! Renderer crate for texshade.
//!
//! Compiles configured GLSL pairs, uploads one scene texture, and draws the
//! reference shader and the current shader side by side. The overall flow is:
//!
//! ```text
//!   PaneConfig ──▶ ShaderLibrary ──▶ preflight (naga, CPU)
//!        │                                 │
//!        ▼                                 ▼
//!   RgbaPixels ──▶ Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!                                        │
//!                                        └─▶ ProgramRegistry::get ──▶ link (wgpu)
//! ```
//!
//! Shader sources follow a fixed interface: vertex inputs `vert` (location 0)
//! and `vertTexCoord` (location 1), a `FrameParams { float current; }` block
//! at set 0 binding 0, the scene texture at set 1 binding 0 and its sampler at
//! set 1 binding 1.

mod compile;
mod error;
mod geometry;
mod gpu;
mod pixels;
mod registry;
mod runtime;
mod types;
mod window;

use anyhow::Result;

pub use compile::{compile_program, compile_stage, CompiledProgram};
pub use error::{AssetError, RegistryError, RenderError, ShaderError, StageKind};
pub use geometry::{Pane, Vertex, FAN_INDICES, QUADS};
pub use gpu::ShaderProgram;
pub use pixels::{load_image, RgbaPixels};
pub use registry::{
    preflight, ProgramBuilder, ProgramHandle, ProgramRegistry, ShaderLibrary, ShaderSources,
    DEFAULT_SHADER_DIR,
};
pub use runtime::{SystemTimeSource, TimeSample};
pub use types::RendererConfig;

/// Entry point that owns everything the window needs.
pub struct Renderer {
    config: RendererConfig,
    library: ShaderLibrary,
    pixels: RgbaPixels,
}

impl Renderer {
    pub fn new(config: RendererConfig, library: ShaderLibrary, pixels: RgbaPixels) -> Self {
        Self {
            config,
            library,
            pixels,
        }
    }

    /// Opens the window and renders until it is closed. Blocks the calling
    /// thread, which must be the main thread on most platforms.
    pub fn run(self) -> Result<()> {
        window::run_window(&self.config, self.library, &self.pixels)
    }
}
