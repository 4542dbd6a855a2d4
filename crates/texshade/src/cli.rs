use std::path::PathBuf;

use clap::Parser;
use paneconfig::DEFAULT_CONFIG_PATH;
use renderer::DEFAULT_SHADER_DIR;

#[derive(Parser, Debug)]
#[command(
    name = "texshade",
    author,
    version,
    about = "Side-by-side GLSL shader preview over a single image texture"
)]
pub struct Cli {
    /// YAML scene configuration.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory the configured vertex/fragment files are read from.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_SHADER_DIR)]
    pub shader_dir: PathBuf,

    /// Show this shader in the right pane instead of the configured `current`.
    #[arg(long, value_name = "NAME", value_parser = parse_shader_name)]
    pub current: Option<String>,

    /// Load the config and image and compile every active shader, then exit
    /// without opening a window.
    #[arg(long)]
    pub check: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_shader_name(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("shader name must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}
