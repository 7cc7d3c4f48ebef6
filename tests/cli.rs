use std::{fs, path::Path};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

const TOKENS: &str = r##"{
  "$metadata": {"tokenSetOrder": ["global", "dark"]},
  "global": {
    "colors": {"brand": {"value": "#ff0000", "type": "color"}},
    "spacing": {"sm": {"value": "4px", "type": "spacing"}}
  },
  "dark": {
    "colors": {"brand": {"value": "#880000", "type": "color"}}
  }
}"##;

#[test]
fn split_writes_token_sets() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "tokens/tokens.json", TOKENS);

    let mut cmd = cargo_bin_cmd!("tokens");
    cmd.arg("split").arg("--root").arg(dir.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("global-tokens.json"));

    let transformed = dir.path().join("tokens").join("transformed");
    assert!(transformed.join("global-tokens.json").is_file());
    assert!(transformed.join("dark-tokens.json").is_file());
    assert!(!transformed.join("$metadata-tokens.json").exists());
}

#[test]
fn split_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "tokens/tokens.json", "{ \"global\": {");

    let mut cmd = cargo_bin_cmd!("tokens");
    cmd.arg("split").arg("--root").arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to split tokens"));
    assert!(!dir.path().join("tokens").join("transformed").exists());
}

#[test]
fn build_then_inject_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "tokens/tokens.json", TOKENS);
    write(
        dir.path(),
        "tailwind.theme.json",
        r##"{"theme": {"extend": {"colors": {"brand": {"DEFAULT": "#ff0000", "muted": "#ffcccc"}}}}}"##,
    );

    let mut cmd = cargo_bin_cmd!("tokens");
    cmd.arg("build").arg("--root").arg(dir.path());
    cmd.assert().success().stderr(predicate::str::contains(
        "using 2 :root vars and 1 dark vars",
    ));

    let stylesheet = dir.path().join("app").join("globals.css");
    let first = fs::read_to_string(&stylesheet).unwrap();
    assert!(first.contains("    --colors-brand: #ff0000;\n    --spacing-sm: 4px;"));
    assert!(first.contains("  --color-brand: #ff0000;\n  --color-brand-muted: #ffcccc;"));

    let mut cmd = cargo_bin_cmd!("tokens");
    cmd.arg("inject-colors").arg("--root").arg(dir.path());
    cmd.assert().success();
    assert_eq!(fs::read_to_string(&stylesheet).unwrap(), first);
}

#[test]
fn inject_colors_needs_a_stylesheet() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "tailwind.theme.json", r#"{"theme": {}}"#);

    let mut cmd = cargo_bin_cmd!("tokens");
    cmd.arg("inject-colors").arg("--root").arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn tailwind_config_keeps_source_on_request() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "tailwind.generated.json",
        r##"{"theme": {"extend": {"colors": {"brand": "#f00"}, "tokensSetOrder": {"0": "x"}}}}"##,
    );

    let mut cmd = cargo_bin_cmd!("tokens");
    cmd.args(["tailwind-config", "--keep-source", "--root"]).arg(dir.path());
    cmd.assert().success();

    assert!(dir.path().join("tailwind.generated.json").exists());
    let ts = fs::read_to_string(dir.path().join("tailwind.config.ts")).unwrap();
    assert!(ts.starts_with("import type { Config } from 'tailwindcss';"));
    assert!(ts.contains("\"brand\": \"#f00\""));
    assert!(!ts.contains("tokensSetOrder"));
}
