use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::RenderError;
use crate::pixels::RgbaPixels;
use crate::registry::{ProgramHandle, ProgramRegistry, ShaderLibrary};
use crate::runtime::TimeSample;

use super::context::GpuContext;
use super::pipeline::{GpuProgramBuilder, ProgramLayouts, ShaderProgram};
use super::texture::SceneTexture;
use super::uniforms::FrameUniforms;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Everything the render loop touches: device, shared texture, and the
/// programs drawn each frame in pane order.
pub(crate) struct GpuState {
    context: GpuContext,
    _layouts: ProgramLayouts,
    texture: SceneTexture,
    registry: ProgramRegistry<ShaderProgram>,
    active: Vec<ProgramHandle<ShaderProgram>>,
}

impl GpuState {
    pub(crate) fn new(
        window: Arc<Window>,
        library: ShaderLibrary,
        pixels: &RgbaPixels,
        active_names: &[String],
        reference: &str,
    ) -> Result<Self> {
        let context = GpuContext::new(window)?;
        let layouts = ProgramLayouts::new(&context.device);
        let texture = SceneTexture::upload(
            &context.device,
            &context.queue,
            &layouts.texture_layout,
            pixels,
        );

        let mut registry = ProgramRegistry::new(library);
        let builder = GpuProgramBuilder {
            device: &context.device,
            layouts: &layouts,
            surface_format: context.surface_format,
            reference,
        };
        let mut active = Vec::with_capacity(active_names.len());
        for name in active_names {
            let program = registry
                .get(name, &builder)
                .with_context(|| format!("failed to prepare shader '{name}'"))?;
            tracing::debug!(name = %program.name(), pane = ?program.pane(), "program ready");
            active.push(program);
        }

        Ok(Self {
            context,
            _layouts: layouts,
            texture,
            registry,
            active,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    pub(crate) fn cached_programs(&self) -> usize {
        self.registry.len()
    }

    /// Clears the frame, draws each active program over its pane, presents.
    pub(crate) fn render(&mut self, sample: TimeSample) -> Result<(), RenderError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = FrameUniforms::from_sample(sample);
        for program in &self.active {
            program.write_uniforms(&self.context.queue, &uniforms);
        }

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            for program in &self.active {
                program.draw(&mut render_pass, &self.texture.bind_group);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
