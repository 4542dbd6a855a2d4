use std::path::{Path, PathBuf};

use paneconfig::PaneConfig;
use renderer::{
    compile_program, preflight, CompiledProgram, ProgramBuilder, ProgramRegistry, RendererConfig,
    RgbaPixels, ShaderError, ShaderLibrary, ShaderSources,
};

fn shader_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../shaders")
}

fn bundled_scene() -> PaneConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config.yaml");
    PaneConfig::load(&path).expect("bundled config parses")
}

/// Stops at the CPU compile step so the registry can be exercised headless.
struct CompileOnly;

impl ProgramBuilder for CompileOnly {
    type Program = CompiledProgram;

    fn build(&self, sources: &ShaderSources) -> Result<CompiledProgram, ShaderError> {
        compile_program(sources)
    }
}

#[test]
fn every_bundled_shader_compiles() {
    let scene = bundled_scene();
    let library = ShaderLibrary::from_config(&scene, shader_dir());
    let names: Vec<&str> = scene.shaders.iter().map(|s| s.name.as_str()).collect();
    assert!(!names.is_empty());
    preflight(&library, &names).expect("bundled shaders compile");
}

#[test]
fn registry_builds_active_programs_once() {
    let scene = bundled_scene();
    let library = ShaderLibrary::from_config(&scene, shader_dir());
    let mut registry = ProgramRegistry::new(library);

    let active = scene.active_shaders();
    for _ in 0..3 {
        for name in &active {
            registry.get(name, &CompileOnly).expect("program builds");
        }
    }

    assert_eq!(registry.len(), active.len());
    let mut names: Vec<&str> = registry.names().collect();
    names.sort_unstable();
    let mut expected = active.clone();
    expected.sort_unstable();
    assert_eq!(names, expected);
}

#[test]
fn window_layout_for_sixty_four_pixel_image() {
    let scene = PaneConfig::from_yaml_str(
        "image_path: x.png\nmargin: 2\ncurrent: bars\nshaders:\n  - name: raw\n    vertex_file: raw.vert\n    fragment_file: raw.frag\n  - name: bars\n    vertex_file: raw.vert\n    fragment_file: bars.frag\n",
    )
    .unwrap();
    let pixels = RgbaPixels::new(64, 64, 64 * 4, vec![255; 64 * 64 * 4]).unwrap();

    let config = RendererConfig::from_scene(&scene, &pixels).unwrap();
    assert_eq!(config.surface_size, (136, 68));
    assert_eq!(config.active_shaders, vec!["raw", "bars"]);
}
