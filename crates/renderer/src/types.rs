use paneconfig::{ConfigError, PaneConfig, WindowSize};

use crate::pixels::RgbaPixels;

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Shader names drawn every frame, left pane first.
    pub active_shaders: Vec<String>,
    /// Shader that owns the left pane.
    pub reference: String,
}

impl RendererConfig {
    /// Derives the window layout from the scene config and the decoded image.
    pub fn from_scene(config: &PaneConfig, pixels: &RgbaPixels) -> Result<Self, ConfigError> {
        let size = WindowSize::for_image(pixels.width(), pixels.height(), config.margin)?;
        Ok(Self {
            surface_size: (size.width, size.height),
            title: config.title().to_string(),
            active_shaders: config
                .active_shaders()
                .into_iter()
                .map(str::to_string)
                .collect(),
            reference: config.reference().to_string(),
        })
    }
}
