//! Watch mode for automatic rebuilds on file changes
//!
//! [`WatchHost`] is a minimal [`BuildHost`]: it records the paths the plugin
//! registers, then watches them with debouncing and runs the plugin's
//! before-build hook on every relevant change.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::build::format_duration;
use crate::config::WatchConfig;
use crate::plugin::{BuildHost, StylesheetPlugin};

/// Error during watch mode
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize file watcher
    #[error("Failed to initialize file watcher: {0}")]
    WatcherInit(notify::Error),
    /// Failed to add watch path
    #[error("Failed to watch path: {0}")]
    WatchPath(notify::Error),
    /// Channel receive error
    #[error("Watch channel error: {0}")]
    ChannelError(String),
    /// Registered path does not exist
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Nothing was registered to watch
    #[error("No watch paths registered")]
    NothingToWatch,
}

/// File-watching build host.
#[derive(Debug, Clone)]
pub struct WatchHost {
    /// Directory relative option paths resolve against
    project_root: PathBuf,
    /// Debounce and screen settings
    config: WatchConfig,
    /// Paths registered by plugins
    watch_paths: Vec<PathBuf>,
}

impl WatchHost {
    /// Create a host rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>, config: WatchConfig) -> Self {
        Self { project_root: project_root.into(), config, watch_paths: Vec::new() }
    }

    /// Paths registered so far.
    pub fn watch_paths(&self) -> &[PathBuf] {
        &self.watch_paths
    }

    /// Watch registered paths and rebuild on change.
    ///
    /// Runs an initial build, then blocks until the watcher channel closes.
    /// Failed builds are logged and watching continues.
    pub fn run(&self, plugin: &StylesheetPlugin) -> Result<(), WatchError> {
        if self.watch_paths.is_empty() {
            return Err(WatchError::NothingToWatch);
        }
        if let Some(missing) = self.watch_paths.iter().find(|p| !p.exists()) {
            return Err(WatchError::SourceNotFound(missing.clone()));
        }

        let (tx, rx) = channel();

        let debounce_duration = Duration::from_millis(self.config.debounce_ms as u64);
        let mut debouncer = new_debouncer(debounce_duration, tx).map_err(WatchError::WatcherInit)?;

        for path in &self.watch_paths {
            debouncer
                .watcher()
                .watch(path, RecursiveMode::Recursive)
                .map_err(WatchError::WatchPath)?;
        }

        if self.config.clear_screen {
            clear_screen();
        }
        let mut last_failed = !rebuild(plugin, false);
        info!(paths = ?self.watch_paths, "watching for changes");

        loop {
            match rx.recv() {
                Ok(Ok(events)) => {
                    let changed: Vec<&Path> = events
                        .iter()
                        .filter(|e| {
                            matches!(e.kind, DebouncedEventKind::Any) && is_relevant_file(&e.path)
                        })
                        .map(|e| e.path.as_path())
                        .collect();

                    if changed.is_empty() {
                        continue;
                    }

                    for path in &changed {
                        info!(file = %path.display(), "changed");
                    }

                    if self.config.clear_screen {
                        clear_screen();
                    }

                    last_failed = !rebuild(plugin, last_failed);
                }
                Ok(Err(error)) => {
                    // Non-fatal, keep watching
                    warn!(error = ?error, "watch error");
                }
                Err(e) => {
                    return Err(WatchError::ChannelError(e.to_string()));
                }
            }
        }
    }
}

impl BuildHost for WatchHost {
    fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn add_watch_path(&mut self, path: &Path) {
        if !self.watch_paths.iter().any(|p| p == path) {
            self.watch_paths.push(path.to_path_buf());
        }
    }
}

/// Run one build and log its outcome. Returns `true` on success.
fn rebuild(plugin: &StylesheetPlugin, previously_failed: bool) -> bool {
    match plugin.before_build() {
        Ok(result) => {
            if previously_failed {
                info!("build recovered");
            }
            if result.has_warnings() {
                warn!(count = result.warnings.len(), "build finished with warnings");
            }
            info!(
                output = ?result.css_path(),
                duration = %format_duration(result.duration),
                files = result.outputs.len(),
                "build complete"
            );
            true
        }
        Err(e) => {
            error!(error = %e, "build failed");
            false
        }
    }
}

/// Clear the terminal screen
fn clear_screen() {
    // ANSI escape code to clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
}

/// Check if a file is relevant for rebuilding
fn is_relevant_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        let ext = ext.to_string_lossy().to_lowercase();
        matches!(ext.as_str(), "scss" | "sass" | "css")
    } else {
        false
    }
}
