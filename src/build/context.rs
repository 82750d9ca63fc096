//! Resolved build configuration.

use crate::config::{
    default_options, merge_options, resolve_path, ConfigError, ConfigValidationError,
    OptimizationLevel, StylesheetOptions,
};
use std::path::{Path, PathBuf};

/// Immutable configuration for a single build.
///
/// Produced from caller options merged over the defaults, with every path
/// resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Source root directory (absolute)
    src_dir: PathBuf,
    /// Entry stylesheet (absolute)
    entry: PathBuf,
    /// Output directory (absolute)
    out_dir: PathBuf,
    /// Output file name
    out_file: String,
    /// Whether to emit an external source map
    source_map: bool,
    /// Minification level, `None` when disabled
    minify: Option<OptimizationLevel>,
    /// Extra import roots (absolute)
    load_paths: Vec<PathBuf>,
}

impl BuildConfig {
    /// Merge `options` over the defaults and resolve them.
    ///
    /// # Arguments
    /// - `options` - Caller-supplied options
    /// - `project_root` - Directory relative paths are resolved against
    pub fn resolve(options: StylesheetOptions, project_root: &Path) -> Result<Self, ConfigError> {
        let options = merge_options(default_options(), options);
        let mut errors = Vec::new();

        if options.dir.is_none() {
            errors.push(ConfigValidationError::new("dir", "is required"));
        }
        match &options.file {
            None => errors.push(ConfigValidationError::new("file", "is required")),
            Some(file) if file.is_absolute() => {
                errors.push(ConfigValidationError::new("file", "must be relative to 'dir'"))
            }
            Some(_) => {}
        }
        if options.out_dir.is_none() {
            errors.push(ConfigValidationError::new("outDir", "is required"));
        }
        match options.out_file.as_deref() {
            None => errors.push(ConfigValidationError::new("outFile", "is required")),
            Some(name) if !is_plain_file_name(name) => errors.push(ConfigValidationError::new(
                "outFile",
                format!("must be a file name, got \"{}\"", name),
            )),
            Some(_) => {}
        }
        let minify = match options.minify.unwrap_or_default().level() {
            Ok(level) => level,
            Err(n) => {
                errors.push(ConfigValidationError::new(
                    "minify",
                    format!("must be a boolean or a level from 0 to 2, got {}", n),
                ));
                None
            }
        };

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors.iter().map(|e| e.to_string()).collect()));
        }

        // Presence checked above
        let (Some(dir), Some(file), Some(out_dir), Some(out_file)) =
            (options.dir, options.file, options.out_dir, options.out_file)
        else {
            return Err(ConfigError::Validation(vec!["incomplete options".to_string()]));
        };

        let src_dir = resolve_path(project_root, &dir);
        let entry = src_dir.join(file);
        let load_paths = options
            .load_paths
            .unwrap_or_default()
            .iter()
            .map(|p| resolve_path(project_root, p))
            .collect();

        Ok(Self {
            src_dir,
            entry,
            out_dir: resolve_path(project_root, &out_dir),
            out_file,
            source_map: options.source_map.unwrap_or(true),
            minify,
            load_paths,
        })
    }

    /// Get the source root directory.
    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Get the entry stylesheet path.
    pub fn entry(&self) -> &Path {
        &self.entry
    }

    /// Get the output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Get the output file name.
    pub fn out_file(&self) -> &str {
        &self.out_file
    }

    /// Full path of the CSS output.
    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(&self.out_file)
    }

    /// Whether a source map is emitted.
    pub fn source_map(&self) -> bool {
        self.source_map
    }

    /// Minification level, `None` when disabled.
    pub fn minify(&self) -> Option<OptimizationLevel> {
        self.minify
    }

    /// Extra import roots.
    pub fn load_paths(&self) -> &[PathBuf] {
        &self.load_paths
    }
}

/// A single normal path component, e.g. `main.css`.
fn is_plain_file_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty()
        && path.file_name().map(|n| n == path.as_os_str()).unwrap_or(false)
}
