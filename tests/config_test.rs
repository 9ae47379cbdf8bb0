//! Integration tests for Settings loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE
//! - Global → Local: UNION with `!` negation
//! - Any → Env vars: REPLACE

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use ast_contract::application::ApplicationError;
use ast_contract::config::{local_config_path, Settings, VerifyConfig};

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_no_files_when_loading_then_compiled_defaults() {
    let settings = Settings::load_files(None, None).unwrap();

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.synthesis.text, "42");
    assert_eq!(settings.synthesis.integer, 42);
    assert!(settings.synthesis.boolean);
    assert_eq!(settings.synthesis.class_name, "FooBar");
    assert_eq!(settings.compiler.command, "ecj");
    assert!(settings.verify.exclude_kinds.is_empty());
}

#[test]
fn given_global_and_local_excludes_when_loading_then_union() {
    let dir = TempDir::new().unwrap();
    let global = write(&dir, "global.toml", "[verify]\nexclude_kinds = [\"If\"]\n");
    let local = write(&dir, "local.toml", "[verify]\nexclude_kinds = [\"Throw\"]\n");

    let settings = Settings::load_files(Some(&global), Some(&local)).unwrap();

    assert_eq!(settings.verify.exclude_kinds, vec!["If", "Throw"]);
}

#[test]
fn given_negated_local_entry_when_loading_then_removes_inherited_kind() {
    let dir = TempDir::new().unwrap();
    let global = write(
        &dir,
        "global.toml",
        "[verify]\nexclude_kinds = [\"If\", \"Block\"]\n",
    );
    let local = write(&dir, "local.toml", "[verify]\nexclude_kinds = [\"!If\"]\n");

    let settings = Settings::load_files(Some(&global), Some(&local)).unwrap();

    assert_eq!(settings.verify.exclude_kinds, vec!["Block"]);
}

#[test]
fn given_local_scalars_when_loading_then_override_global() {
    let dir = TempDir::new().unwrap();
    let global = write(
        &dir,
        "global.toml",
        "[synthesis]\nclass_name = \"Global\"\ntext = \"g\"\n",
    );
    let local = write(&dir, "local.toml", "[synthesis]\nclass_name = \"Local\"\n");

    let settings = Settings::load_files(Some(&global), Some(&local)).unwrap();

    assert_eq!(settings.synthesis.class_name, "Local");
    assert_eq!(settings.synthesis.text, "g");
    assert_eq!(settings.synthesis.integer, 42);
}

#[test]
fn given_compiler_section_when_loading_then_applied() {
    let dir = TempDir::new().unwrap();
    let local = write(
        &dir,
        "local.toml",
        "[compiler]\ncommand = \"javac\"\ncompliance = 17\n",
    );

    let settings = Settings::load_files(None, Some(&local)).unwrap();

    assert_eq!(settings.compiler.command, "javac");
    assert_eq!(settings.compiler.compliance, 17);
    assert_eq!(settings.compiler.encoding, "UTF-8");
}

#[test]
fn given_malformed_toml_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let local = write(&dir, "local.toml", "[verify\nexclude_kinds = 3");

    let result = Settings::load_files(None, Some(&local));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_project_dir_with_local_file_when_loading_then_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[synthesis]\npackage_prefix = \"gen\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert_eq!(settings.synthesis.package_prefix, "gen");
}

#[test]
fn given_env_override_when_loading_then_replaces_file_value() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[synthesis]\nclass_name = \"FromFile\"\n",
    )
    .unwrap();
    std::env::set_var("AST_CONTRACT__SYNTHESIS__CLASS_NAME", "FromEnv");

    let settings = Settings::load(Some(dir.path()));
    std::env::remove_var("AST_CONTRACT__SYNTHESIS__CLASS_NAME");

    assert_eq!(settings.unwrap().synthesis.class_name, "FromEnv");
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips() {
    let mut settings = Settings::default();
    settings.verify.exclude_kinds = vec!["Comment".to_string()];

    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    assert_eq!(parsed, settings);
}

#[test]
fn given_template_when_parsed_then_yields_defaults() {
    let parsed: Settings = toml::from_str(&Settings::template()).unwrap();

    assert_eq!(parsed, Settings::default());
}

#[test]
fn given_overlay_with_duplicates_when_merging_then_sorted_unique() {
    let merged = VerifyConfig::merge_array(
        &["If".to_string(), "Block".to_string()],
        &["If".to_string(), "Throw".to_string(), "!Missing".to_string()],
    );

    assert_eq!(merged, vec!["Block", "If", "Throw"]);
}
