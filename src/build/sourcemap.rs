//! Source map payloads carried between pipeline stages.
//!
//! A payload wraps a [`parcel_sourcemap::SourceMap`] together with the output
//! file name it describes. Serialization adds the `file` field and, once a
//! rebase directory is set, rewrites every source path relative to it.

use parcel_sourcemap::{OriginalLocation, SourceMap};
use serde_json::Value;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Error while building or serializing a source map.
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// Error from the source map library
    #[error("source map error: {0}")]
    Map(String),
    /// Generated JSON could not be rewritten
    #[error("invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<parcel_sourcemap::SourceMapError> for SourceMapError {
    fn from(e: parcel_sourcemap::SourceMapError) -> Self {
        SourceMapError::Map(e.to_string())
    }
}

/// Structured source map prior to serialization.
pub struct SourceMapPayload {
    map: SourceMap,
    /// Base name of the generated file, written as the `file` field
    file: String,
    /// Stylesheet the map was first generated from
    origin: PathBuf,
    /// Directory that relative source paths in `map` are anchored to
    source_root: PathBuf,
    /// Directory source paths are rewritten against on serialization
    rebase_to: Option<PathBuf>,
}

impl SourceMapPayload {
    /// Wrap an existing map generated from `origin`.
    ///
    /// Relative sources in `map` are taken to be relative to the directory
    /// containing `origin`.
    pub fn new(map: SourceMap, file: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        let origin = origin.into();
        let source_root = origin.parent().map(Path::to_path_buf).unwrap_or_default();
        Self { map, file: file.into(), origin, source_root, rebase_to: None }
    }

    /// Map every line of `generated` onto the same line of `source`.
    ///
    /// The embedded source content is `generated` itself, not the text of
    /// `source`: the compiler reports no positions, so the map only ties
    /// the output back to its entry file by name.
    pub fn identity(
        generated: &str,
        source: &Path,
        file: impl Into<String>,
    ) -> Result<Self, SourceMapError> {
        let source_root = source.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut map = SourceMap::new(&source_root.to_string_lossy());
        let source_index = map.add_source(&source.to_string_lossy());
        map.set_source_content(source_index as usize, generated)?;

        for line in 0..generated.lines().count() as u32 {
            map.add_mapping(
                line,
                0,
                Some(OriginalLocation {
                    original_line: line,
                    original_column: 0,
                    source: source_index,
                    name: None,
                }),
            );
        }

        Ok(Self::new(map, file, source))
    }

    /// The `file` field value.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Stylesheet the map was first generated from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Directory relative source paths are anchored to.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Rebase directory, if set.
    pub fn rebase_to(&self) -> Option<&Path> {
        self.rebase_to.as_deref()
    }

    /// Rewrite sources relative to `dir` when serialized.
    pub fn rebase(&mut self, dir: impl Into<PathBuf>) {
        self.rebase_to = Some(dir.into());
    }

    /// Mutable access to the underlying map.
    pub fn map_mut(&mut self) -> &mut SourceMap {
        &mut self.map
    }

    /// Replace the underlying map, keeping file name and roots.
    pub fn replace_map(&mut self, map: SourceMap) {
        self.map = map;
    }

    /// Serialize to JSON with the `file` field set.
    pub fn to_json(&mut self) -> Result<String, SourceMapError> {
        let raw = self.map.to_json(None)?;
        let mut value: Value = serde_json::from_str(&raw)?;

        if let Some(object) = value.as_object_mut() {
            object.insert("file".to_string(), Value::String(self.file.clone()));

            if let Some(rebase_to) = &self.rebase_to {
                if let Some(Value::Array(sources)) = object.get_mut("sources") {
                    for source in sources.iter_mut() {
                        if let Value::String(path) = source {
                            let absolute = self.source_root.join(&*path);
                            *path = relative_url(&absolute, rebase_to);
                        }
                    }
                }
            }
        }

        Ok(serde_json::to_string(&value)?)
    }
}

impl fmt::Debug for SourceMapPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceMapPayload")
            .field("file", &self.file)
            .field("origin", &self.origin)
            .field("source_root", &self.source_root)
            .field("rebase_to", &self.rebase_to)
            .finish_non_exhaustive()
    }
}

/// Express `path` relative to `base` as a `/`-separated URL path.
///
/// Both paths are expected to be absolute. `.` and `..` components are
/// normalized lexically.
pub fn relative_url(path: &Path, base: &Path) -> String {
    let path = normalize(path);
    let base = normalize(base);

    let common = path.iter().zip(base.iter()).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base.len() {
        parts.push("..".to_string());
    }
    for component in &path[common..] {
        parts.push(component.clone());
    }

    parts.join("/")
}

fn normalize(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts
}
