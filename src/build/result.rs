//! Build result types.
//!
//! Contains the outcome of a single successful pipeline run.

use crate::config::OptimizationLevel;
use std::path::PathBuf;
use std::time::Duration;

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildResult {
    /// Files written, in write order
    pub outputs: Vec<PathBuf>,
    /// Minification level applied, `None` when minification was off
    pub minified: Option<OptimizationLevel>,
    /// Whether a source map was written
    pub source_map: bool,
    /// Non-fatal warnings reported while building
    pub warnings: Vec<String>,
    /// Build duration
    pub duration: Duration,
}

impl BuildResult {
    /// Check if the build produced any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Path of the written CSS file.
    pub fn css_path(&self) -> Option<&PathBuf> {
        self.outputs.last()
    }

    /// Path of the written source map, if any.
    pub fn map_path(&self) -> Option<&PathBuf> {
        if self.source_map {
            self.outputs.first()
        } else {
            None
        }
    }
}

/// Format duration for display
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
