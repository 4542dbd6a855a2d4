//! Name → program cache.
//!
//! [`ShaderLibrary`] resolves configured names to GLSL sources on disk, and
//! [`ProgramRegistry`] builds each name at most once through a
//! [`ProgramBuilder`], handing out shared [`ProgramHandle`]s afterwards.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::ops::Deref;
use std::path::PathBuf;
use std::rc::Rc;

use paneconfig::{PaneConfig, ShaderEntry};

use crate::compile::compile_program;
use crate::error::{RegistryError, ShaderError};

/// Directory shader files are read from unless overridden.
pub const DEFAULT_SHADER_DIR: &str = "shaders";

/// GLSL text for one configured shader pair.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub name: String,
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug, Clone)]
pub struct ShaderLibrary {
    entries: Vec<ShaderEntry>,
    shader_dir: PathBuf,
}

impl ShaderLibrary {
    pub fn new(entries: Vec<ShaderEntry>, shader_dir: impl Into<PathBuf>) -> Self {
        Self {
            entries,
            shader_dir: shader_dir.into(),
        }
    }

    pub fn from_config(config: &PaneConfig, shader_dir: impl Into<PathBuf>) -> Self {
        Self::new(config.shaders.clone(), shader_dir)
    }

    fn entry(&self, name: &str) -> Option<&ShaderEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Reads both sources for `name`. Unknown names fail before touching the
    /// filesystem.
    pub fn load(&self, name: &str) -> Result<ShaderSources, RegistryError> {
        let entry = self
            .entry(name)
            .ok_or_else(|| RegistryError::UnknownShader(name.to_string()))?;

        let vertex = self.read(&entry.vertex_file)?;
        let fragment = self.read(&entry.fragment_file)?;
        Ok(ShaderSources {
            name: entry.name.clone(),
            vertex,
            fragment,
        })
    }

    fn read(&self, file: &str) -> Result<String, RegistryError> {
        let path = self.shader_dir.join(file);
        fs::read_to_string(&path).map_err(|source| RegistryError::Io { path, source })
    }
}

/// Turns loaded sources into a program. Implemented by the GPU linker; tests
/// substitute their own builders.
pub trait ProgramBuilder {
    type Program;

    fn build(&self, sources: &ShaderSources) -> Result<Self::Program, ShaderError>;
}

/// Shared reference to a cached program.
pub struct ProgramHandle<P>(Rc<P>);

impl<P> ProgramHandle<P> {
    fn new(program: P) -> Self {
        Self(Rc::new(program))
    }

    /// True when both handles point at the same cached program.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<P> Clone for ProgramHandle<P> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<P: fmt::Debug> fmt::Debug for ProgramHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProgramHandle").field(&*self.0).finish()
    }
}

impl<P> Deref for ProgramHandle<P> {
    type Target = P;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct ProgramRegistry<P> {
    library: ShaderLibrary,
    programs: HashMap<String, ProgramHandle<P>>,
}

impl<P> ProgramRegistry<P> {
    pub fn new(library: ShaderLibrary) -> Self {
        Self {
            library,
            programs: HashMap::new(),
        }
    }

    /// Returns the program cached under `name`, building it on first request.
    /// A failed build leaves nothing behind in the cache.
    pub fn get<B>(&mut self, name: &str, builder: &B) -> Result<ProgramHandle<P>, RegistryError>
    where
        B: ProgramBuilder<Program = P>,
    {
        if let Some(handle) = self.programs.get(name) {
            return Ok(handle.clone());
        }

        let sources = self.library.load(name)?;
        let program = builder
            .build(&sources)
            .map_err(|source| RegistryError::Build {
                name: name.to_string(),
                source,
            })?;
        tracing::info!(name, "built shader program");

        let handle = ProgramHandle::new(program);
        self.programs.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    pub fn cached(&self, name: &str) -> Option<ProgramHandle<P>> {
        self.programs.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.keys().map(String::as_str)
    }
}

/// Reads and compiles every named pair without touching the GPU, so broken
/// shaders are reported before a window exists.
pub fn preflight(library: &ShaderLibrary, names: &[&str]) -> Result<(), RegistryError> {
    for name in names {
        let sources = library.load(name)?;
        compile_program(&sources).map_err(|source| RegistryError::Build {
            name: name.to_string(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::StageKind;

    struct CountingBuilder {
        builds: Cell<usize>,
    }

    impl CountingBuilder {
        fn new() -> Self {
            Self {
                builds: Cell::new(0),
            }
        }
    }

    impl ProgramBuilder for CountingBuilder {
        type Program = String;

        fn build(&self, sources: &ShaderSources) -> Result<String, ShaderError> {
            self.builds.set(self.builds.get() + 1);
            Ok(format!("{}|{}", sources.vertex, sources.fragment))
        }
    }

    struct FailingBuilder;

    impl ProgramBuilder for FailingBuilder {
        type Program = String;

        fn build(&self, _sources: &ShaderSources) -> Result<String, ShaderError> {
            Err(ShaderError::Link {
                log: "varying mismatch".into(),
            })
        }
    }

    fn entry(name: &str, vertex: &str, fragment: &str) -> ShaderEntry {
        ShaderEntry {
            name: name.into(),
            vertex_file: vertex.into(),
            fragment_file: fragment.into(),
        }
    }

    fn library_with_files() -> (tempfile::TempDir, ShaderLibrary) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("raw.vert"), "vertex-src").unwrap();
        fs::write(dir.path().join("raw.frag"), "fragment-src").unwrap();
        let library = ShaderLibrary::new(
            vec![
                entry("raw", "raw.vert", "raw.frag"),
                entry("missing", "raw.vert", "gone.frag"),
            ],
            dir.path(),
        );
        (dir, library)
    }

    #[test]
    fn repeated_get_returns_same_handle() {
        let (_dir, library) = library_with_files();
        let mut registry = ProgramRegistry::new(library);
        let builder = CountingBuilder::new();

        let first = registry.get("raw", &builder).unwrap();
        let second = registry.get("raw", &builder).unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(builder.builds.get(), 1);
        assert_eq!(&*first, "vertex-src|fragment-src");
    }

    #[test]
    fn unknown_name_fails_without_file_io() {
        // The shader directory does not exist, so any read would surface as Io.
        let library = ShaderLibrary::new(
            vec![entry("raw", "raw.vert", "raw.frag")],
            "/nonexistent/texshade/shaders",
        );
        let mut registry = ProgramRegistry::new(library);
        let builder = CountingBuilder::new();

        let err = registry.get("bars", &builder).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownShader(ref name) if name == "bars"));
        assert_eq!(builder.builds.get(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_source_file_is_an_io_error() {
        let (_dir, library) = library_with_files();
        let mut registry = ProgramRegistry::new(library);
        let err = registry.get("missing", &CountingBuilder::new()).unwrap_err();
        match err {
            RegistryError::Io { path, .. } => assert!(path.ends_with("gone.frag")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failed_build_is_not_cached() {
        let (_dir, library) = library_with_files();
        let mut registry = ProgramRegistry::new(library);

        let err = registry.get("raw", &FailingBuilder).unwrap_err();
        match err {
            RegistryError::Build { name, source } => {
                assert_eq!(name, "raw");
                assert_eq!(source.log(), "varying mismatch");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(registry.cached("raw").is_none());

        let builder = CountingBuilder::new();
        registry.get("raw", &builder).unwrap();
        assert_eq!(builder.builds.get(), 1);
    }

    #[test]
    fn handles_format_their_program() {
        let (_dir, library) = library_with_files();
        let mut registry = ProgramRegistry::new(library);
        let handle = registry.get("raw", &CountingBuilder::new()).unwrap();
        assert_eq!(
            format!("{handle:?}"),
            "ProgramHandle(\"vertex-src|fragment-src\")"
        );
    }

    #[test]
    fn preflight_reports_compile_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("raw.vert"),
            include_str!("../../../shaders/raw.vert"),
        )
        .unwrap();
        fs::write(dir.path().join("bad.frag"), "#version 450\nvoid main() {").unwrap();
        let library = ShaderLibrary::new(vec![entry("bad", "raw.vert", "bad.frag")], dir.path());

        let err = preflight(&library, &["bad"]).unwrap_err();
        match err {
            RegistryError::Build {
                source: ShaderError::Compile { stage, log },
                ..
            } => {
                assert_eq!(stage, StageKind::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
