//! Write compiled stylesheets to disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Error while writing build output.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Output path exists but is not a directory
    #[error("output path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// Filesystem error
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// Path being checked or written
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

impl WriteError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        WriteError::Io { path: path.to_path_buf(), source }
    }
}

/// Comment linking a stylesheet to its `<out_file>.map`.
pub fn source_mapping_comment(out_file: &str) -> String {
    format!("/*# sourceMappingURL={}.map */", out_file)
}

/// Create `dir` (and missing parents) if it does not exist.
///
/// Any error other than "not found" is returned as-is.
pub fn ensure_dir(dir: &Path) -> Result<(), WriteError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(WriteError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "creating output directory");
            fs::create_dir_all(dir).map_err(|e| WriteError::io(dir, e))
        }
        Err(e) => Err(WriteError::io(dir, e)),
    }
}

/// Write `css` to `<out_dir>/<out_file>`.
///
/// When `source_map` is given it is written to `<out_dir>/<out_file>.map`
/// first, and the CSS gets a trailing `sourceMappingURL` comment line.
///
/// # Returns
/// The written paths, in write order.
pub fn write_output(
    out_dir: &Path,
    out_file: &str,
    css: &str,
    source_map: Option<&str>,
) -> Result<Vec<PathBuf>, WriteError> {
    ensure_dir(out_dir)?;

    let css_path = out_dir.join(out_file);
    let mut written = Vec::with_capacity(2);

    let css = match source_map {
        Some(map) => {
            let map_path = out_dir.join(format!("{}.map", out_file));
            fs::write(&map_path, map).map_err(|e| WriteError::io(&map_path, e))?;
            written.push(map_path);

            let mut annotated = String::with_capacity(css.len() + out_file.len() + 32);
            annotated.push_str(css);
            if !css.is_empty() && !css.ends_with('\n') {
                annotated.push('\n');
            }
            annotated.push_str(&source_mapping_comment(out_file));
            annotated
        }
        None => css.to_string(),
    };

    fs::write(&css_path, css).map_err(|e| WriteError::io(&css_path, e))?;
    written.push(css_path);

    Ok(written)
}
