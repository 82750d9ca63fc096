//! Minify CSS code.
//!
//! This module uses [`lightningcss`] under the hood. Each optimization level
//! enables more of its optimizer:
//!
//! - **Level 0**: parse and print compactly, no optimization
//! - **Level 1**: optimize every top-level rule on its own (shorthand
//!   folding, duplicate declaration removal, value compaction)
//! - **Level 2**: optimize the whole sheet at once, which additionally
//!   merges rules with equal selectors or equal declarations and
//!   combines adjacent `@media` blocks
//!
//! When an input source map is given, the map printed by the pass is
//! chained onto it so the result still points at the original sources.

use crate::build::sourcemap::{SourceMapError, SourceMapPayload};
use crate::config::OptimizationLevel;
use lightningcss::error::{Error as CssError, ErrorLocation};
use lightningcss::rules::CssRuleList;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use parcel_sourcemap::SourceMap;
use std::fmt::Display;
use std::path::Path;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum MinifyError {
    /// Parser error.
    #[error("CSS parse error: {0}")]
    Parse(String),
    /// Minifier error.
    #[error("CSS minify error: {0}")]
    Minify(String),
    /// Printer error.
    #[error("CSS print error: {0}")]
    Print(String),
    /// Source map chaining error.
    #[error(transparent)]
    SourceMap(#[from] SourceMapError),
    /// The minifier produced no styles.
    #[error("minifier produced no output{}", format_errors(.errors))]
    NoOutput {
        /// Errors and warnings reported while minifying
        errors: Vec<String>,
    },
}

fn format_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(": {}", errors.join("; "))
    }
}

impl From<parcel_sourcemap::SourceMapError> for MinifyError {
    fn from(e: parcel_sourcemap::SourceMapError) -> Self {
        MinifyError::SourceMap(e.into())
    }
}

/// Output of the minify step.
#[derive(Debug)]
pub struct MinificationResult {
    /// Minified CSS
    pub css: String,
    /// Source map for the minified CSS, when an input map was given
    pub source_map: Option<SourceMapPayload>,
    /// Non-fatal problems reported by the minifier
    pub warnings: Vec<String>,
}

/// Minify `css` at `level`.
///
/// `source_name` labels the stylesheet in warnings. If `source_map` is
/// given, the returned map reflects positions in the minified output and
/// has its sources rebased to `rebase_to`.
///
/// Warnings are logged and returned; they never block output. An empty
/// result is an error.
pub fn minify(
    css: &str,
    source_name: &str,
    level: OptimizationLevel,
    source_map: Option<SourceMapPayload>,
    rebase_to: &Path,
) -> Result<MinificationResult, MinifyError> {
    let mut source_map = source_map;

    let recovered = Arc::new(RwLock::new(Vec::new()));
    let parser_options = ParserOptions {
        filename: source_name.to_string(),
        error_recovery: true,
        warnings: Some(recovered.clone()),
        ..ParserOptions::default()
    };

    let mut style_sheet = StyleSheet::parse(css, parser_options)
        .map_err(|source| MinifyError::Parse(source.to_string()))?;

    match level {
        OptimizationLevel::Zero => {}
        OptimizationLevel::One => minify_each_rule(&mut style_sheet)?,
        OptimizationLevel::Two => style_sheet
            .minify(MinifyOptions::default())
            .map_err(|source| MinifyError::Minify(source.to_string()))?,
    }

    // Single source: the payload's origin, so chaining keeps one entry.
    let mut pass_map = source_map.as_ref().map(|payload| {
        let mut map = SourceMap::new(&payload.source_root().to_string_lossy());
        map.add_source(&payload.origin().to_string_lossy());
        map
    });
    let printer_options =
        PrinterOptions { minify: true, source_map: pass_map.as_mut(), ..PrinterOptions::default() };

    let code = style_sheet
        .to_css(printer_options)
        .map_err(|source| MinifyError::Print(source.to_string()))?
        .code;
    debug!(level = level.as_u8(), bytes = code.len(), "minified stylesheet");

    let mut warnings: Vec<String> = Vec::new();
    if let Ok(list) = recovered.read() {
        for message in list.iter().map(format_warning) {
            if !warnings.contains(&message) {
                warn!(level = level.as_u8(), "{}", message);
                warnings.push(message);
            }
        }
    }

    if code.trim().is_empty() {
        return Err(MinifyError::NoOutput { errors: warnings });
    }

    if let (Some(mut pass_map), Some(payload)) = (pass_map, source_map.as_mut()) {
        pass_map.extends(payload.map_mut())?;
        payload.replace_map(pass_map);
        payload.rebase(rebase_to);
    }

    Ok(MinificationResult { css: code, source_map, warnings })
}

/// Run the optimizer over each top-level rule separately, so no rule is
/// merged with its neighbours.
fn minify_each_rule(style_sheet: &mut StyleSheet<'_>) -> Result<(), MinifyError> {
    let rules = std::mem::take(&mut style_sheet.rules.0);
    let mut minified = Vec::with_capacity(rules.len());

    for rule in rules {
        let mut single = StyleSheet::new(
            style_sheet.sources.clone(),
            CssRuleList(vec![rule]),
            ParserOptions::default(),
        );
        single
            .minify(MinifyOptions::default())
            .map_err(|source| MinifyError::Minify(source.to_string()))?;
        minified.append(&mut single.rules.0);
    }

    style_sheet.rules.0 = minified;
    Ok(())
}

/// `file:line:column: message`, with 1-based lines.
fn format_warning<T: Display>(error: &CssError<T>) -> String {
    match &error.loc {
        Some(ErrorLocation { filename, line, column }) => {
            format!("{}:{}:{}: {}", filename, line + 1, column, error.kind)
        }
        None => error.kind.to_string(),
    }
}
