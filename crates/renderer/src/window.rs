use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::error::RenderError;
use crate::gpu::GpuState;
use crate::pixels::RgbaPixels;
use crate::registry::ShaderLibrary;
use crate::runtime::SystemTimeSource;
use crate::types::RendererConfig;

/// The render loop only ever runs or winds down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopState {
    Running,
    Closing,
}

/// What the loop does after a frame failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameRecovery {
    Reconfigure,
    Skip,
    Close,
}

impl FrameRecovery {
    pub(crate) fn for_error(error: &RenderError) -> Self {
        match error {
            RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                FrameRecovery::Reconfigure
            }
            RenderError::Surface(wgpu::SurfaceError::OutOfMemory) => FrameRecovery::Close,
            RenderError::Surface(_) => FrameRecovery::Skip,
        }
    }
}

/// Window plus GPU state for the preview.
pub(crate) struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
    clock: SystemTimeSource,
    state: LoopState,
}

impl WindowState {
    pub(crate) fn new(
        window: Arc<Window>,
        clock: SystemTimeSource,
        config: &RendererConfig,
        library: ShaderLibrary,
        pixels: &RgbaPixels,
    ) -> Result<Self> {
        let gpu = GpuState::new(
            window.clone(),
            library,
            pixels,
            &config.active_shaders,
            &config.reference,
        )?;
        tracing::info!(
            programs = gpu.cached_programs(),
            width = gpu.size().width,
            height = gpu.size().height,
            "renderer ready"
        );

        Ok(Self {
            window,
            gpu,
            clock,
            state: LoopState::Running,
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn is_closing(&self) -> bool {
        self.state == LoopState::Closing
    }

    pub(crate) fn close(&mut self) {
        self.state = LoopState::Closing;
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    pub(crate) fn render_frame(&mut self) {
        if self.is_closing() {
            return;
        }

        let sample = self.clock.sample();
        let Err(err) = self.gpu.render(sample) else {
            return;
        };

        match FrameRecovery::for_error(&err) {
            FrameRecovery::Reconfigure => {
                tracing::debug!(error = %err, "surface lost; reconfiguring");
                self.gpu.reconfigure();
            }
            FrameRecovery::Skip => {
                tracing::warn!(error = %err, frame = sample.frame_index, "skipping frame");
            }
            FrameRecovery::Close => {
                tracing::error!(error = %err, "unrecoverable surface error; closing");
                self.close();
            }
        }
    }
}

/// Opens the window and drives the `winit` event loop on the calling thread
/// until the window is closed.
pub(crate) fn run_window(
    config: &RendererConfig,
    library: ShaderLibrary,
    pixels: &RgbaPixels,
) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);
    // Shader time counts from window creation, not from the end of GPU setup.
    let clock = SystemTimeSource::new();

    let mut state = WindowState::new(window.clone(), clock, config, library, pixels)?;
    state.window().request_redraw();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            state.close();
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(new_size);
                        }
                        WindowEvent::MouseInput {
                            state: ElementState::Pressed,
                            button: MouseButton::Left,
                            ..
                        } => {
                            tracing::info!("left mouse button pressed");
                        }
                        WindowEvent::RedrawRequested => {
                            state.render_frame();
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    if !state.is_closing() {
                        state.window().request_redraw();
                    }
                }
                _ => {}
            }

            if state.is_closing() {
                elwt.exit();
            }
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
