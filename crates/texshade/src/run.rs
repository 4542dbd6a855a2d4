//! Startup sequencing: every step that can fail without a window runs before
//! the renderer opens one.
//!
//! Functions:
//!
//! - `run` loads the config and image, preflights the active shaders, then
//!   hands off to the renderer.
//! - `initialise_tracing` configures logging.
//! - `prepare` performs the window-free part of startup.

use anyhow::{Context, Result};
use paneconfig::PaneConfig;
use renderer::{load_image, preflight, Renderer, RendererConfig, RgbaPixels, ShaderLibrary};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub fn initialise_tracing() {
    let default_filter = "warn,texshade=info,renderer=info,paneconfig=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Everything the renderer needs, gathered without touching the GPU.
#[derive(Debug)]
pub(crate) struct Prepared {
    pub config: RendererConfig,
    pub library: ShaderLibrary,
    pub pixels: RgbaPixels,
}

pub fn run(cli: Cli) -> Result<()> {
    let prepared = prepare(&cli)?;
    if cli.check {
        tracing::info!(
            shaders = ?prepared.config.active_shaders,
            width = prepared.config.surface_size.0,
            height = prepared.config.surface_size.1,
            "startup check passed"
        );
        return Ok(());
    }

    tracing::info!(
        shaders = ?prepared.config.active_shaders,
        width = prepared.config.surface_size.0,
        height = prepared.config.surface_size.1,
        "opening window"
    );
    Renderer::new(prepared.config, prepared.library, prepared.pixels).run()
}

pub(crate) fn prepare(cli: &Cli) -> Result<Prepared> {
    let mut scene = PaneConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    if let Some(current) = &cli.current {
        tracing::debug!(from = %scene.current, to = %current, "overriding current shader");
        scene.current = current.clone();
    }

    let image = load_image(&scene.image_path)?;
    let pixels = RgbaPixels::from_image(&image)?;
    tracing::debug!(
        path = %scene.image_path.display(),
        width = pixels.width(),
        height = pixels.height(),
        "decoded scene image"
    );

    let config = RendererConfig::from_scene(&scene, &pixels)?;
    let library = ShaderLibrary::from_config(&scene, &cli.shader_dir);
    preflight(&library, &scene.active_shaders())?;

    Ok(Prepared {
        config,
        library,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use paneconfig::ConfigError;
    use renderer::RegistryError;

    use super::*;

    fn workspace_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .and_then(|p| p.parent())
            .expect("crate dir has workspace root")
            .to_path_buf()
    }

    fn cli_for(config: PathBuf) -> Cli {
        Cli {
            config,
            shader_dir: workspace_root().join("shaders"),
            current: None,
            check: true,
        }
    }

    fn write_config(dir: &Path, current: &str) -> PathBuf {
        write_config_with_margin(dir, current, 2)
    }

    fn write_config_with_margin(dir: &Path, current: &str, margin: u32) -> PathBuf {
        let image = workspace_root().join("assets/texture.png");
        let path = dir.join("config.yaml");
        fs::write(
            &path,
            format!(
                "image_path: {}\nmargin: {margin}\ncurrent: {current}\nshaders:\n  - name: raw\n    vertex_file: raw.vert\n    fragment_file: raw.frag\n  - name: bars\n    vertex_file: raw.vert\n    fragment_file: bars.frag\n",
                image.display()
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn prepare_sizes_window_from_bundled_image() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = prepare(&cli_for(write_config(dir.path(), "bars"))).unwrap();

        assert_eq!(prepared.config.surface_size, (136, 68));
        assert_eq!(prepared.config.active_shaders, vec!["raw", "bars"]);
    }

    #[test]
    fn unknown_current_fails_before_window() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare(&cli_for(write_config(dir.path(), "sparkle"))).unwrap_err();
        let registry_err = err.downcast_ref::<RegistryError>().expect("registry error");
        assert!(matches!(registry_err, RegistryError::UnknownShader(name) if name == "sparkle"));
    }

    #[test]
    fn current_override_replaces_config_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut cli = cli_for(write_config(dir.path(), "bars"));
        cli.current = Some("raw".into());
        let prepared = prepare(&cli).unwrap();
        assert_eq!(prepared.config.active_shaders, vec!["raw"]);
    }

    #[test]
    fn oversized_margin_fails_before_window() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            prepare(&cli_for(write_config_with_margin(dir.path(), "bars", 3_000_000_000)))
                .unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().expect("config error");
        assert!(matches!(config_err, ConfigError::Invalid(_)));
    }
}
