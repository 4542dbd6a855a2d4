//! YAML scene configuration for texshade.
//!
//! A config names the image that gets uploaded as the shared texture, the
//! margin around each pane, the list of available shader pairs, and which of
//! them is shown next to the reference shader:
//!
//! ```yaml
//! image_path: assets/a.png
//! margin: 2
//! current: bars
//! shaders:
//!   - name: raw
//!     vertex_file: raw.vert
//!     fragment_file: raw.frag
//!   - name: bars
//!     vertex_file: raw.vert
//!     fragment_file: bars.frag
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Shader drawn in the left pane unless the config says otherwise.
pub const DEFAULT_REFERENCE: &str = "raw";

const DEFAULT_TITLE: &str = "texshade";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One named vertex/fragment pair. File names are relative to the shader
/// directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShaderEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vertex_file: String,
    #[serde(default)]
    pub fragment_file: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaneConfig {
    #[serde(default)]
    pub image_path: PathBuf,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub shaders: Vec<ShaderEntry>,
}

impl PaneConfig {
    /// Reads and validates the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            shaders = config.shaders.len(),
            current = %config.current,
            "loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: PaneConfig = serde_yaml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// First entry registered under `name`.
    pub fn shader(&self, name: &str) -> Option<&ShaderEntry> {
        self.shaders.iter().find(|entry| entry.name == name)
    }

    pub fn reference(&self) -> &str {
        self.reference.as_deref().unwrap_or(DEFAULT_REFERENCE)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Names drawn each frame, left pane first. Collapses to a single entry
    /// when the current shader is the reference shader.
    pub fn active_shaders(&self) -> Vec<&str> {
        let reference = self.reference();
        let current = self.current.as_str();
        if current == reference {
            vec![reference]
        } else {
            vec![reference, current]
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("image_path must be set".into()));
        }
        if self.current.trim().is_empty() {
            return Err(ConfigError::Invalid("current must name a shader".into()));
        }

        for (index, entry) in self.shaders.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "shader entry #{index} has an empty name"
                )));
            }
            if entry.vertex_file.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "shader '{}' is missing vertex_file",
                    entry.name
                )));
            }
            if entry.fragment_file.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "shader '{}' is missing fragment_file",
                    entry.name
                )));
            }
        }

        Ok(())
    }
}

/// Window size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    /// Two image-sized panes side by side, each framed by `margin` pixels.
    ///
    /// Fails when either dimension does not fit in a `u32`.
    pub fn for_image(
        image_width: u32,
        image_height: u32,
        margin: u32,
    ) -> Result<Self, ConfigError> {
        let width = image_width
            .checked_mul(2)
            .zip(margin.checked_mul(4))
            .and_then(|(panes, margins)| panes.checked_add(margins));
        let height = margin
            .checked_mul(2)
            .and_then(|margins| image_height.checked_add(margins));

        match (width, height) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(ConfigError::Invalid(format!(
                "window for a {image_width}x{image_height} image with margin {margin} is too large"
            ))),
        }
    }
}
