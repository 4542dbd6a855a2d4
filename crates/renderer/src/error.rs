use std::fmt;
use std::path::PathBuf;

use wgpu::naga::ShaderStage;

/// Pipeline stage a shader source targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub(crate) fn naga_stage(self) -> ShaderStage {
        match self {
            StageKind::Vertex => ShaderStage::Vertex,
            StageKind::Fragment => ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failure to turn a vertex/fragment pair into a linked program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: StageKind, log: String },
    #[error("failed to link program:\n{log}")]
    Link { log: String },
}

impl ShaderError {
    /// Diagnostic text reported by the shader front end or the GPU validation layer.
    pub fn log(&self) -> &str {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => log,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to open image at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unsupported stride: expected {expected} bytes per row, got {actual}")]
    Stride { expected: usize, actual: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("shader '{0}' is not defined in the configuration")]
    UnknownShader(String),
    #[error("failed to read shader source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build shader '{name}': {source}")]
    Build {
        name: String,
        #[source]
        source: ShaderError,
    },
}

/// Per-frame failure surfaced to the render loop.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
