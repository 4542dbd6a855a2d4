use std::borrow::Cow;

use wgpu::util::DeviceExt;

use crate::compile::{compile_program, CompiledProgram};
use crate::error::{ShaderError, StageKind};
use crate::geometry::{vertex_layout, Pane, FAN_INDICES};
use crate::registry::{ProgramBuilder, ShaderSources};

use super::uniforms::FrameUniforms;

/// Bind group layouts shared by every program: set 0 carries the per-frame
/// uniform block, set 1 the scene texture and its sampler.
pub(crate) struct ProgramLayouts {
    pub frame_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pub pipeline_layout: wgpu::PipelineLayout,
}

impl ProgramLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shader program layout"),
            bind_group_layouts: &[&frame_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        Self {
            frame_layout,
            texture_layout,
            pipeline_layout,
        }
    }
}

/// A linked program plus the buffers it draws with.
pub struct ShaderProgram {
    name: String,
    pane: Pane,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
}

impl ShaderProgram {
    /// Creates both shader modules and the render pipeline inside a
    /// validation error scope. Anything wgpu reports there is a link failure.
    pub(crate) fn link(
        device: &wgpu::Device,
        layouts: &ProgramLayouts,
        surface_format: wgpu::TextureFormat,
        compiled: &CompiledProgram,
        pane: Pane,
    ) -> Result<Self, ShaderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = create_module(
            device,
            &compiled.name,
            &compiled.vertex_source,
            StageKind::Vertex,
        );
        let fragment_module = create_module(
            device,
            &compiled.name,
            &compiled.fragment_source,
            StageKind::Fragment,
        );

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} pipeline", compiled.name)),
            layout: Some(&layouts.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        // The pipeline keeps what it needs; the stage modules are released here.
        drop(vertex_module);
        drop(fragment_module);

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                log: error.to_string(),
            });
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} vertex buffer", compiled.name)),
            contents: bytemuck::cast_slice(pane.quad()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} index buffer", compiled.name)),
            contents: bytemuck::cast_slice(&FAN_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} frame uniforms", compiled.name)),
            contents: bytemuck::bytes_of(&FrameUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} frame bind group", compiled.name)),
            layout: &layouts.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            name: compiled.name.clone(),
            pane,
            pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            frame_bind_group,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &FrameUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Records one fan draw covering the program's quad.
    pub(crate) fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        texture_bind_group: &wgpu::BindGroup,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        render_pass.set_bind_group(1, texture_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..FAN_INDICES.len() as u32, 0, 0..1);
    }
}

fn create_module(
    device: &wgpu::Device,
    name: &str,
    source: &str,
    stage: StageKind,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{name} {stage} shader")),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source.to_owned()),
            stage: stage.naga_stage(),
            defines: &[],
        },
    })
}

/// Compiles and links programs against the live device. The reference
/// shader gets the left quad; every other shader the right one.
pub(crate) struct GpuProgramBuilder<'a> {
    pub device: &'a wgpu::Device,
    pub layouts: &'a ProgramLayouts,
    pub surface_format: wgpu::TextureFormat,
    pub reference: &'a str,
}

impl ProgramBuilder for GpuProgramBuilder<'_> {
    type Program = ShaderProgram;

    fn build(&self, sources: &ShaderSources) -> Result<ShaderProgram, ShaderError> {
        let compiled = compile_program(sources)?;
        let pane = if sources.name == self.reference {
            Pane::Left
        } else {
            Pane::Right
        };
        ShaderProgram::link(
            self.device,
            self.layouts,
            self.surface_format,
            &compiled,
            pane,
        )
    }
}
