//! Host integration for the stylesheet pipeline.
//!
//! A host build system drives the plugin through two calls: [`StylesheetPlugin::setup`]
//! once, and [`StylesheetPlugin::before_build`] before every build.

use crate::build::{BuildConfig, BuildError, BuildPipeline, BuildResult};
use crate::config::{ConfigError, StylesheetOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The host build system, as seen by the plugin.
pub trait BuildHost {
    /// Directory relative option paths are resolved against.
    fn project_root(&self) -> &Path;

    /// Ask the host to re-trigger builds when anything under `path` changes.
    fn add_watch_path(&mut self, path: &Path);
}

/// Stylesheet build plugin.
///
/// Holds only the caller's options; every build re-resolves them, so no
/// state carries over between builds.
#[derive(Debug, Clone)]
pub struct StylesheetPlugin {
    options: StylesheetOptions,
    project_root: PathBuf,
}

impl StylesheetPlugin {
    /// Validate `options` and register the source directory with the host.
    pub fn setup<H: BuildHost + ?Sized>(
        options: StylesheetOptions,
        host: &mut H,
    ) -> Result<Self, ConfigError> {
        let project_root = host.project_root().to_path_buf();
        let config = BuildConfig::resolve(options.clone(), &project_root)?;

        debug!(dir = %config.src_dir().display(), "registering watch path");
        host.add_watch_path(config.src_dir());

        Ok(Self { options, project_root })
    }

    /// Caller options as given to [`setup`](Self::setup).
    pub fn options(&self) -> &StylesheetOptions {
        &self.options
    }

    /// Resolve the options for a build.
    pub fn config(&self) -> Result<BuildConfig, ConfigError> {
        BuildConfig::resolve(self.options.clone(), &self.project_root)
    }

    /// Run the pipeline. Called by the host before each build.
    pub fn before_build(&self) -> Result<BuildResult, BuildError> {
        let config = self.config()?;
        BuildPipeline::new(&config).run()
    }
}
