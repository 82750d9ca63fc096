//! Configuration loading and merging for the stylesheet pipeline
//!
//! Provides the option defaults, the merge of caller options over them, and
//! discovery/loading of `styles.toml`.

use super::schema::{MinifySetting, StylesConfig, StylesheetOptions};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "styles.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse styles.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Default option values applied beneath caller options.
///
/// Source maps on, minification at level 1, and `node_modules` as an extra
/// import root.
pub fn default_options() -> StylesheetOptions {
    StylesheetOptions {
        source_map: Some(true),
        minify: Some(MinifySetting::Enabled(true)),
        load_paths: Some(vec![PathBuf::from("node_modules")]),
        ..Default::default()
    }
}

/// Merge `overrides` over `base`.
///
/// Any field set in `overrides` replaces the one in `base`.
///
/// # Example
/// ```ignore
/// let options = merge_options(default_options(), caller_options);
/// ```
pub fn merge_options(base: StylesheetOptions, overrides: StylesheetOptions) -> StylesheetOptions {
    StylesheetOptions {
        dir: overrides.dir.or(base.dir),
        file: overrides.file.or(base.file),
        out_dir: overrides.out_dir.or(base.out_dir),
        out_file: overrides.out_file.or(base.out_file),
        source_map: overrides.source_map.or(base.source_map),
        minify: overrides.minify.or(base.minify),
        load_paths: overrides.load_paths.or(base.load_paths),
    }
}

/// Find `styles.toml` by walking up from a specific directory.
///
/// # Returns
/// - `Some(path)` for the first `styles.toml` found
/// - `None` once the filesystem root is reached
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a `styles.toml` file.
///
/// The `[stylesheet]` table is returned as written; defaults are applied
/// later, when the options are resolved for a build.
///
/// # Example
/// ```ignore
/// let config = load_config(Path::new("site/styles.toml"))?;
/// let plugin = StylesheetPlugin::setup(config.stylesheet, &mut host)?;
/// ```
pub fn load_config(path: &Path) -> Result<StylesConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: StylesConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
