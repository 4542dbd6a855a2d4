use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

fn texshade(config: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_texshade"));
    cmd.arg("--config")
        .arg(config)
        .arg("--shader-dir")
        .arg(workspace_root().join("shaders"))
        .env("RUST_LOG", "off");
    cmd
}

fn scene_yaml(current: &str) -> String {
    format!(
        "image_path: {image}\nmargin: 2\ncurrent: {current}\nshaders:\n  - name: raw\n    vertex_file: raw.vert\n    fragment_file: raw.frag\n  - name: gray\n    vertex_file: raw.vert\n    fragment_file: gray.frag\n",
        image = workspace_root().join("assets/texture.png").display()
    )
}

#[test]
fn check_succeeds_for_bundled_scene() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("config.yaml");
    fs::write(&config, scene_yaml("gray")).expect("write config");

    let status = texshade(&config).arg("--check").status().expect("spawn");
    assert!(status.success());
}

#[test]
fn malformed_yaml_exits_non_zero() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("config.yaml");
    fs::write(&config, "image_path: [unclosed\n").expect("write config");

    let output = texshade(&config).arg("--check").output().expect("spawn");
    assert!(!output.status.success());
}

#[test]
fn unknown_current_shader_exits_non_zero() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("config.yaml");
    fs::write(&config, scene_yaml("sparkle")).expect("write config");

    // Without --check: the failure must come from startup, not the window.
    // Default log filter, so a duplicate report through tracing would show.
    let output = texshade(&config)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn");
    assert!(!output.status.success());
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(combined.matches("sparkle").count(), 1, "output: {combined}");
}

#[test]
fn missing_image_exits_non_zero() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("config.yaml");
    fs::write(
        &config,
        format!(
            "image_path: {}\ncurrent: raw\nshaders:\n  - name: raw\n    vertex_file: raw.vert\n    fragment_file: raw.frag\n",
            temp.path().join("nope.png").display()
        ),
    )
    .expect("write config");

    let output = texshade(&config).arg("--check").output().expect("spawn");
    assert!(!output.status.success());
}
