//! Compile SCSS to CSS.
//!
//! This module uses [`grass`] under the hood. Output is always rendered in
//! expanded style; compaction is left to the minify step.

use crate::build::sourcemap::{SourceMapError, SourceMapPayload};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Error during stylesheet compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Syntax or import resolution error reported by the compiler
    #[error(transparent)]
    Sass(#[from] Box<grass::Error>),
    /// Source map could not be built
    #[error(transparent)]
    SourceMap(#[from] SourceMapError),
}

/// Output of the compile step.
#[derive(Debug)]
pub struct CompilationResult {
    /// Expanded CSS
    pub css: String,
    /// Source map, when requested
    pub source_map: Option<SourceMapPayload>,
}

/// SCSS compiler.
#[derive(Debug, Clone, Default)]
pub struct ScssCompiler {
    /// Additional import roots
    load_paths: Vec<PathBuf>,
    /// Output file name for the source map `file` field; `None` disables maps
    source_map_file: Option<String>,
}

impl ScssCompiler {
    /// Create a compiler resolving imports against `load_paths` as well as
    /// the entry file's directory.
    pub fn new(load_paths: Vec<PathBuf>) -> Self {
        Self { load_paths, source_map_file: None }
    }

    /// Emit a source map whose `file` field is `file`.
    pub fn with_source_map(mut self, file: impl Into<String>) -> Self {
        self.source_map_file = Some(file.into());
        self
    }

    /// Compile the stylesheet at `entry`.
    pub fn compile(&self, entry: &Path) -> Result<CompilationResult, CompileError> {
        let options = self
            .load_paths
            .iter()
            .fold(grass::Options::default().style(grass::OutputStyle::Expanded), |options, path| {
                options.load_path(path)
            });

        debug!(entry = %entry.display(), "compiling stylesheet");
        let css = grass::from_path(entry, &options)?;

        let source_map = match &self.source_map_file {
            Some(file) => Some(SourceMapPayload::identity(&css, entry, file.as_str())?),
            None => None,
        };

        Ok(CompilationResult { css, source_map })
    }
}
