use wgpu::naga;
use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::{ShaderError, StageKind};
use crate::registry::ShaderSources;

/// A vertex/fragment pair whose stages both passed the GLSL front end and
/// validation. Linking happens on the GPU in [`crate::gpu::ShaderProgram::link`].
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    pub name: String,
    pub vertex_source: String,
    pub fragment_source: String,
}

/// Parses and validates a single GLSL stage.
///
/// The error log is the diagnostic text naga renders against `source`, kept
/// verbatim so callers can print it as-is.
pub fn compile_stage(source: &str, stage: StageKind) -> Result<naga::Module, ShaderError> {
    let mut frontend = Frontend::default();
    let module = frontend
        .parse(&Options::from(stage.naga_stage()), source)
        .map_err(|errors| ShaderError::Compile {
            stage,
            log: errors.emit_to_string(source),
        })?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|error| ShaderError::Compile {
            stage,
            log: error.emit_to_string(source),
        })?;

    Ok(module)
}

/// Compiles both stages of `sources`; the fragment stage is only attempted
/// once the vertex stage succeeded.
pub fn compile_program(sources: &ShaderSources) -> Result<CompiledProgram, ShaderError> {
    compile_stage(&sources.vertex, StageKind::Vertex)?;
    compile_stage(&sources.fragment, StageKind::Fragment)?;
    tracing::debug!(name = %sources.name, "compiled shader stages");

    Ok(CompiledProgram {
        name: sources.name.clone(),
        vertex_source: sources.vertex.clone(),
        fragment_source: sources.fragment.clone(),
    })
}
