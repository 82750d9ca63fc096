//! Build pipeline module for stylepipe
//!
//! Turns an SCSS entry file into a CSS file (and optional source map) in the
//! configured output directory.
//!
//! # Overview
//!
//! The build pipeline consists of:
//! - **Compile**: Render the entry stylesheet to expanded CSS
//! - **Minify**: Optionally optimize the CSS, carrying the source map along
//! - **Write**: Write the map and the CSS, linking them with a comment
//!
//! # Example
//!
//! ```ignore
//! use stylepipe::build::{BuildConfig, BuildPipeline};
//! use stylepipe::config::StylesheetOptions;
//!
//! let options = StylesheetOptions::default()
//!     .with_source("styles", "main.scss")
//!     .with_output("/srv/site/css", "main.css");
//! let config = BuildConfig::resolve(options, &project_root)?;
//!
//! let result = BuildPipeline::new(&config).run()?;
//! println!("Wrote {} files", result.outputs.len());
//! ```

pub mod compile;
pub mod context;
pub mod minify;
pub mod pipeline;
pub mod result;
pub mod sourcemap;
pub mod write;

pub use compile::*;
pub use context::*;
pub use minify::*;
pub use pipeline::*;
pub use result::*;
pub use sourcemap::*;
pub use write::*;
