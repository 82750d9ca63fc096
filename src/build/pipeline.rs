//! Build pipeline orchestration.
//!
//! The pipeline runs compile → minify → write in sequence. Every stage
//! failure aborts the build before the failing stage writes anything.

use crate::build::{
    minify, write_output, BuildConfig, BuildResult, CompileError, MinifyError, ScssCompiler,
    SourceMapError, WriteError,
};
use crate::config::ConfigError;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Error during build execution.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Options could not be resolved
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Stylesheet compilation failed
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),
    /// Minifier failed or produced nothing
    #[error("Minify error: {0}")]
    Minify(#[from] MinifyError),
    /// Source map serialization failed
    #[error("Source map error: {0}")]
    SourceMap(#[from] SourceMapError),
    /// Output could not be written
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

/// Build pipeline for a single resolved configuration.
pub struct BuildPipeline<'a> {
    /// Resolved build configuration
    config: &'a BuildConfig,
}

impl<'a> BuildPipeline<'a> {
    /// Create a new build pipeline.
    pub fn new(config: &'a BuildConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline.
    ///
    /// Compiles the entry stylesheet, minifies it when enabled, and writes
    /// the CSS (plus source map, when enabled) to the output directory.
    pub fn run(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let config = self.config;

        let mut compiler = ScssCompiler::new(config.load_paths().to_vec());
        if config.source_map() {
            compiler = compiler.with_source_map(config.out_file());
        }
        let compiled = compiler.compile(config.entry())?;
        debug!(bytes = compiled.css.len(), "compiled stylesheet");

        let (css, source_map, warnings) = match config.minify() {
            Some(level) => {
                let minified = minify(
                    &compiled.css,
                    config.out_file(),
                    level,
                    compiled.source_map,
                    config.out_dir(),
                )?;
                (minified.css, minified.source_map, minified.warnings)
            }
            None => {
                // Map sources must resolve from the map's own directory.
                let source_map = compiled.source_map.map(|mut payload| {
                    payload.rebase(config.out_dir());
                    payload
                });
                (compiled.css, source_map, Vec::new())
            }
        };

        let map_json = match source_map {
            Some(mut payload) => Some(payload.to_json()?),
            None => None,
        };

        let outputs =
            write_output(config.out_dir(), config.out_file(), &css, map_json.as_deref())?;

        let result = BuildResult {
            outputs,
            minified: config.minify(),
            source_map: map_json.is_some(),
            warnings,
            duration: start.elapsed(),
        };

        info!(
            output = %config.out_path().display(),
            minify = ?result.minified.map(|level| level.as_u8()),
            source_map = result.source_map,
            duration = ?result.duration,
            "stylesheet built"
        );

        Ok(result)
    }
}
