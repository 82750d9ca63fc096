//! Pipeline Test Suite
//!
//! Integration tests for the stylesheet build pipeline, driven through the
//! plugin the way a host build system drives it:
//!
//! - Source map on/off output shape
//! - Minify levels and the `true` == `1` normalization
//! - Output directory creation
//! - Fatal failures leave previous output untouched
//! - Idempotent rebuilds

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use stylepipe::build::{BuildError, MinifyError};
use stylepipe::config::{load_config, StylesheetOptions};
use stylepipe::{BuildHost, OptimizationLevel, StylesheetPlugin};

// ============================================================================
// Test Utilities
// ============================================================================

/// Host that records watch registrations.
struct TestHost {
    root: PathBuf,
    watched: Vec<PathBuf>,
}

impl TestHost {
    fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf(), watched: vec![] }
    }
}

impl BuildHost for TestHost {
    fn project_root(&self) -> &Path {
        &self.root
    }

    fn add_watch_path(&mut self, path: &Path) {
        self.watched.push(path.to_path_buf());
    }
}

/// Create a project with `styles/main.scss`.
fn create_project(source: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    create_test_file(&temp.path().join("styles"), "main.scss", source);
    temp
}

/// Create a test file with content.
fn create_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn options(out_dir: impl Into<PathBuf>) -> StylesheetOptions {
    StylesheetOptions::default().with_source("styles", "main.scss").with_output(out_dir, "main.css")
}

fn build(root: &Path, options: StylesheetOptions) -> Result<stylepipe::BuildResult, BuildError> {
    let mut host = TestHost::new(root);
    let plugin = StylesheetPlugin::setup(options, &mut host).unwrap();
    plugin.before_build()
}

const SOURCE: &str = r#"
$accent: #ff0000;
$gap: 4px;

.card {
  margin: $gap;
  margin-top: $gap * 2;

  .title {
    color: $accent;
  }
}

.button {
  color: $accent;
}
"#;

// ============================================================================
// Source maps
// ============================================================================

#[test]
fn test_source_map_disabled_writes_css_only() {
    for minify in [false, true] {
        let temp = create_project(SOURCE);
        let out_dir = temp.path().join("public");

        let result =
            build(temp.path(), options(&out_dir).with_source_map(false).with_minify(minify))
                .unwrap();

        assert_eq!(result.outputs, vec![out_dir.join("main.css")]);
        assert!(!out_dir.join("main.css.map").exists());
        let css = fs::read_to_string(out_dir.join("main.css")).unwrap();
        assert!(!css.contains("sourceMappingURL"));
    }
}

#[test]
fn test_source_map_enabled_writes_map_and_comment() {
    for minify in [false, true] {
        let temp = create_project(SOURCE);
        let out_dir = temp.path().join("public");

        build(temp.path(), options(&out_dir).with_source_map(true).with_minify(minify)).unwrap();

        let map: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out_dir.join("main.css.map")).unwrap())
                .unwrap();
        assert_eq!(map["file"], "main.css");
        assert!(map["sources"].as_array().map(|s| !s.is_empty()).unwrap_or(false));

        let css = fs::read_to_string(out_dir.join("main.css")).unwrap();
        assert_eq!(css.lines().last(), Some("/*# sourceMappingURL=main.css.map */"));
    }
}

#[test]
fn test_minified_map_sources_relative_to_out_dir() {
    let temp = create_project(SOURCE);
    let out_dir = temp.path().join("public").join("css");

    build(temp.path(), options(&out_dir)).unwrap();

    let map: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("main.css.map")).unwrap()).unwrap();
    assert_eq!(map["sources"][0], "../../styles/main.scss");
}

#[test]
fn test_unminified_map_sources_resolve_from_out_dir() {
    let temp = create_project(SOURCE);
    let out_dir = temp.path().join("public").join("css");

    build(temp.path(), options(&out_dir).with_minify(false)).unwrap();

    let map: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("main.css.map")).unwrap()).unwrap();
    let source = map["sources"][0].as_str().unwrap();
    assert_eq!(source, "../../styles/main.scss");
    assert!(out_dir.join(source).exists());
}

// ============================================================================
// Minification
// ============================================================================

#[test]
fn test_unminified_output_is_compiler_output() {
    let temp = create_project(SOURCE);
    let out_dir = temp.path().join("public");

    build(temp.path(), options(&out_dir).with_minify(false).with_source_map(false)).unwrap();

    let expected =
        grass::from_path(temp.path().join("styles/main.scss"), &grass::Options::default())
            .unwrap();
    assert_eq!(fs::read_to_string(out_dir.join("main.css")).unwrap(), expected);
}

#[test]
fn test_minify_true_equals_level_one() {
    let temp = create_project(SOURCE);
    let flag_dir = temp.path().join("flag");
    let level_dir = temp.path().join("level");

    let flag = build(temp.path(), options(&flag_dir).with_minify(true)).unwrap();
    let level = build(temp.path(), options(&level_dir).with_minify(1u8)).unwrap();

    assert_eq!(flag.minified, Some(OptimizationLevel::One));
    assert_eq!(level.minified, Some(OptimizationLevel::One));
    assert_eq!(
        fs::read_to_string(flag_dir.join("main.css")).unwrap(),
        fs::read_to_string(level_dir.join("main.css")).unwrap()
    );
}

#[test]
fn test_every_level_keeps_selectors() {
    for level in [0u8, 1, 2] {
        let temp = create_project(SOURCE);
        let out_dir = temp.path().join("public");

        let result =
            build(temp.path(), options(&out_dir).with_minify(level).with_source_map(false))
                .unwrap();
        assert_eq!(result.minified.map(|l| l.as_u8()), Some(level));

        let css = fs::read_to_string(out_dir.join("main.css")).unwrap();
        assert!(!css.is_empty());
        assert!(css.contains(".card"));
        assert!(css.contains(".title"));
        assert!(css.contains(".button"));
        assert!(!css.contains(".unknown"));
        assert!(!css.contains('\n'));
    }
}

#[test]
fn test_minify_zero_is_not_disabled() {
    let temp = create_project(SOURCE);
    let out_dir = temp.path().join("public");

    let result =
        build(temp.path(), options(&out_dir).with_minify(0u8).with_source_map(false)).unwrap();

    assert_eq!(result.minified, Some(OptimizationLevel::Zero));
    let css = fs::read_to_string(out_dir.join("main.css")).unwrap();
    assert!(!css.contains("\n  "));
}

#[test]
fn test_level_two_merges_more_than_level_one() {
    let temp = create_project(".a { color: red; }\n.b { color: red; }\n");
    let one_dir = temp.path().join("one");
    let two_dir = temp.path().join("two");

    build(temp.path(), options(&one_dir).with_minify(1u8).with_source_map(false)).unwrap();
    build(temp.path(), options(&two_dir).with_minify(2u8).with_source_map(false)).unwrap();

    let one = fs::read_to_string(one_dir.join("main.css")).unwrap();
    let two = fs::read_to_string(two_dir.join("main.css")).unwrap();
    assert_eq!(two, ".a,.b{color:red}");
    assert!(two.len() < one.len());
}

#[test]
fn test_minifier_warnings_do_not_block_output() {
    let temp = create_project(".a { color: red; }\n.b:hovered { color: blue; }\n");
    let out_dir = temp.path().join("public");

    let result = build(temp.path(), options(&out_dir)).unwrap();

    assert!(result.has_warnings());
    let css = fs::read_to_string(out_dir.join("main.css")).unwrap();
    assert!(css.contains(".a{color:red}"));
    assert!(out_dir.join("main.css.map").exists());
}

// ============================================================================
// Output directory and failures
// ============================================================================

#[test]
fn test_creates_nested_out_dir() {
    let temp = create_project(SOURCE);
    let out_dir = temp.path().join("a").join("b").join("c");
    assert!(!out_dir.exists());

    build(temp.path(), options(&out_dir)).unwrap();
    assert!(out_dir.join("main.css").exists());
    assert!(out_dir.join("main.css.map").exists());
}

#[test]
fn test_empty_minifier_output_keeps_previous_build() {
    let temp = create_project(SOURCE);
    let out_dir = temp.path().join("public");
    let mut host = TestHost::new(temp.path());
    let plugin = StylesheetPlugin::setup(options(&out_dir), &mut host).unwrap();

    plugin.before_build().unwrap();
    let previous_css = fs::read_to_string(out_dir.join("main.css")).unwrap();
    let previous_map = fs::read_to_string(out_dir.join("main.css.map")).unwrap();

    create_test_file(&temp.path().join("styles"), "main.scss", "$only: variables;");
    let result = plugin.before_build();
    assert!(matches!(result, Err(BuildError::Minify(MinifyError::NoOutput { .. }))));

    assert_eq!(fs::read_to_string(out_dir.join("main.css")).unwrap(), previous_css);
    assert_eq!(fs::read_to_string(out_dir.join("main.css.map")).unwrap(), previous_map);
}

#[test]
fn test_compile_error_propagates() {
    let temp = create_project("@use 'missing';\n.a { color: red; }");
    let out_dir = temp.path().join("public");

    let result = build(temp.path(), options(&out_dir));
    assert!(matches!(result, Err(BuildError::Compile(_))));
    assert!(!out_dir.join("main.css").exists());
}

#[test]
fn test_partial_imports_resolve() {
    let temp = create_project("@use 'colors';\n.a { color: colors.$brand; }");
    create_test_file(&temp.path().join("styles"), "_colors.scss", "$brand: #123456;");
    let out_dir = temp.path().join("public");

    build(temp.path(), options(&out_dir).with_minify(false)).unwrap();
    assert!(fs::read_to_string(out_dir.join("main.css")).unwrap().contains("#123456"));
}

// ============================================================================
// Idempotence and setup
// ============================================================================

#[test]
fn test_rebuild_is_byte_identical() {
    let temp = create_project(SOURCE);
    let out_dir = temp.path().join("public");
    let mut host = TestHost::new(temp.path());
    let plugin = StylesheetPlugin::setup(options(&out_dir).with_minify(2u8), &mut host).unwrap();

    plugin.before_build().unwrap();
    let css = fs::read(out_dir.join("main.css")).unwrap();
    let map = fs::read(out_dir.join("main.css.map")).unwrap();

    plugin.before_build().unwrap();
    assert_eq!(fs::read(out_dir.join("main.css")).unwrap(), css);
    assert_eq!(fs::read(out_dir.join("main.css.map")).unwrap(), map);
}

#[test]
fn test_setup_registers_source_dir() {
    let temp = create_project(SOURCE);
    let mut host = TestHost::new(temp.path());

    StylesheetPlugin::setup(options("public"), &mut host).unwrap();
    assert_eq!(host.watched, vec![temp.path().join("styles")]);
}

#[test]
fn test_example_expanded_output() {
    let temp = create_project("$c: red; body { color: $c; }");
    let out_dir = temp.path().join("out");

    build(temp.path(), options(&out_dir).with_minify(false).with_source_map(false)).unwrap();

    let css = fs::read_to_string(out_dir.join("main.css")).unwrap();
    assert!(css.contains("body {\n  color: red;\n}"));
    assert!(!out_dir.join("main.css.map").exists());
}

#[test]
fn test_build_from_config_file() {
    let temp = create_project(SOURCE);
    let config_path = create_test_file(
        temp.path(),
        "styles.toml",
        r#"
[stylesheet]
dir = "styles"
file = "main.scss"
outDir = "dist"
outFile = "site.css"
sourceMap = false
minify = 2
"#,
    );

    let config = load_config(&config_path).unwrap();
    let mut host = TestHost::new(temp.path());
    let plugin = StylesheetPlugin::setup(config.stylesheet, &mut host).unwrap();
    let result = plugin.before_build().unwrap();

    assert_eq!(result.outputs, vec![temp.path().join("dist/site.css")]);
    assert_eq!(result.minified, Some(OptimizationLevel::Two));
}
