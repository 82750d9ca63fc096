//! Configuration schema types for the stylesheet pipeline
//!
//! Defines the caller-facing option set, the `minify` setting and its
//! normalization to an optimization level, and the `styles.toml` file layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Minifier optimization level.
///
/// Higher levels apply more aggressive, structurally transformative
/// optimizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptimizationLevel {
    /// Whitespace and formatting only
    Zero,
    /// Rule-local optimizations (declaration merging, shorthands, value compaction)
    One,
    /// Whole-sheet optimizations, merging rules and `@media` blocks
    Two,
}

impl OptimizationLevel {
    /// Numeric value of the level.
    pub fn as_u8(self) -> u8 {
        match self {
            OptimizationLevel::Zero => 0,
            OptimizationLevel::One => 1,
            OptimizationLevel::Two => 2,
        }
    }
}

impl Default for OptimizationLevel {
    fn default() -> Self {
        Self::One
    }
}

impl TryFrom<u8> for OptimizationLevel {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OptimizationLevel::Zero),
            1 => Ok(OptimizationLevel::One),
            2 => Ok(OptimizationLevel::Two),
            other => Err(other),
        }
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// The `minify` option: either a flag or an explicit level.
///
/// `true` means level 1. `0` is a valid level and keeps minification on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinifySetting {
    /// `minify = true` / `minify = false`
    Enabled(bool),
    /// `minify = 0 | 1 | 2`
    Level(u8),
}

impl MinifySetting {
    /// Normalize the setting to an optimization level.
    ///
    /// Returns `Ok(None)` when minification is disabled and `Err(n)` for a
    /// level outside `0..=2`.
    pub fn level(self) -> Result<Option<OptimizationLevel>, u8> {
        match self {
            MinifySetting::Enabled(false) => Ok(None),
            MinifySetting::Enabled(true) => Ok(Some(OptimizationLevel::default())),
            MinifySetting::Level(n) => OptimizationLevel::try_from(n).map(Some),
        }
    }
}

impl Default for MinifySetting {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl From<bool> for MinifySetting {
    fn from(value: bool) -> Self {
        MinifySetting::Enabled(value)
    }
}

impl From<u8> for MinifySetting {
    fn from(value: u8) -> Self {
        MinifySetting::Level(value)
    }
}

/// Caller-supplied pipeline options.
///
/// Every field is optional so a partial option set can be merged over the
/// defaults. `dir`, `file`, `out_dir` and `out_file` must be present after
/// merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesheetOptions {
    /// Source root directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Entry stylesheet, relative to `dir`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    /// Output file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_file: Option<String>,
    /// Emit an external source map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<bool>,
    /// Minification flag or level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<MinifySetting>,
    /// Extra import roots for `@use` / `@import`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_paths: Option<Vec<PathBuf>>,
}

impl StylesheetOptions {
    /// Set the source root and entry file.
    pub fn with_source(mut self, dir: impl Into<PathBuf>, file: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self.file = Some(file.into());
        self
    }

    /// Set the output directory and file name.
    pub fn with_output(mut self, out_dir: impl Into<PathBuf>, out_file: impl Into<String>) -> Self {
        self.out_dir = Some(out_dir.into());
        self.out_file = Some(out_file.into());
        self
    }

    /// Set the source map flag.
    pub fn with_source_map(mut self, source_map: bool) -> Self {
        self.source_map = Some(source_map);
        self
    }

    /// Set the minify setting.
    pub fn with_minify(mut self, minify: impl Into<MinifySetting>) -> Self {
        self.minify = Some(minify.into());
        self
    }

    /// Set the extra import roots.
    pub fn with_load_paths(mut self, load_paths: Vec<PathBuf>) -> Self {
        self.load_paths = Some(load_paths);
        self
    }
}

/// Watch host settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Clear terminal between rebuilds
    #[serde(default)]
    pub clear_screen: bool,
}

fn default_debounce_ms() -> u32 {
    100
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms(), clear_screen: false }
    }
}

/// Complete `styles.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylesConfig {
    /// Pipeline options
    #[serde(default)]
    pub stylesheet: StylesheetOptions,
    /// Watch host settings
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Name of the invalid option (e.g., "outFile")
    pub field: String,
    /// Error message
    pub message: String,
}

impl ConfigValidationError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self { field: field.to_string(), message: message.into() }
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.field, self.message)
    }
}
