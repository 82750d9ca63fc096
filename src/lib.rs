//! Stylepipe - Sass build step for static-site pipelines
//!
//! This library provides functionality to:
//! - Compile an SCSS entry file to CSS
//! - Minify the result at a chosen optimization level
//! - Emit an external source map that survives minification
//! - Plug into a host build system that re-runs the pipeline on change

pub mod build;
pub mod config;
pub mod plugin;
pub mod watch;

pub use build::{BuildConfig, BuildError, BuildPipeline, BuildResult};
pub use config::{MinifySetting, OptimizationLevel, StylesheetOptions};
pub use plugin::{BuildHost, StylesheetPlugin};
pub use watch::{WatchError, WatchHost};
