//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ast-contract/ast-contract.toml`
//! 3. Local config: `<project_dir>/.ast-contract.toml`
//! 4. Environment variables: `AST_CONTRACT__*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Sentinels and names used when synthesizing mutator arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Text sentinel for `String` parameters
    pub text: String,
    /// Integer sentinel for `int` parameters and `Object[]` elements
    pub integer: i64,
    /// Boolean sentinel
    pub boolean: bool,
    /// Name of the class synthesized for the abstract type of types
    pub class_name: String,
    /// Prefix of synthetic names given to namespace kinds
    pub package_prefix: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            text: "42".into(),
            integer: 42,
            boolean: true,
            class_name: "FooBar".into(),
            package_prefix: "synthetic".into(),
        }
    }
}

/// Verification run settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct VerifyConfig {
    /// Kinds reported as skipped instead of verified
    pub exclude_kinds: Vec<String>,
}

/// External compiler settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompilerConfig {
    /// Compiler executable
    pub command: String,
    /// Source/target compliance level
    pub compliance: u8,
    pub encoding: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: "ecj".into(),
            compliance: 8,
            encoding: "UTF-8".into(),
        }
    }
}

/// Raw sections for intermediate parsing (arrays are Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSynthesisConfig {
    pub text: Option<String>,
    pub integer: Option<i64>,
    pub boolean: Option<bool>,
    pub class_name: Option<String>,
    pub package_prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawVerifyConfig {
    pub exclude_kinds: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCompilerConfig {
    pub command: Option<String>,
    pub compliance: Option<u8>,
    pub encoding: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub synthesis: RawSynthesisConfig,
    pub verify: RawVerifyConfig,
    pub compiler: RawCompilerConfig,
}

impl SynthesisConfig {
    fn merge(&self, overlay: &RawSynthesisConfig) -> Self {
        Self {
            text: overlay.text.clone().unwrap_or_else(|| self.text.clone()),
            integer: overlay.integer.unwrap_or(self.integer),
            boolean: overlay.boolean.unwrap_or(self.boolean),
            class_name: overlay
                .class_name
                .clone()
                .unwrap_or_else(|| self.class_name.clone()),
            package_prefix: overlay
                .package_prefix
                .clone()
                .unwrap_or_else(|| self.package_prefix.clone()),
        }
    }
}

impl CompilerConfig {
    fn merge(&self, overlay: &RawCompilerConfig) -> Self {
        Self {
            command: overlay.command.clone().unwrap_or_else(|| self.command.clone()),
            compliance: overlay.compliance.unwrap_or(self.compliance),
            encoding: overlay
                .encoding
                .clone()
                .unwrap_or_else(|| self.encoding.clone()),
        }
    }
}

impl VerifyConfig {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["If", "Block"], &["Throw"])   // → ["Block", "If", "Throw"]
    /// merge_array(&["If", "Block"], &["!If"])     // → ["Block"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Local layer: union with negation.
    pub fn merge(&self, overlay: &RawVerifyConfig) -> Self {
        Self {
            exclude_kinds: overlay
                .exclude_kinds
                .as_ref()
                .map(|o| Self::merge_array(&self.exclude_kinds, o))
                .unwrap_or_else(|| self.exclude_kinds.clone()),
        }
    }

    /// Global layer: a specified array replaces the default.
    pub fn apply_global(&self, global: &RawVerifyConfig) -> Self {
        Self {
            exclude_kinds: global
                .exclude_kinds
                .clone()
                .unwrap_or_else(|| self.exclude_kinds.clone()),
        }
    }
}

/// Unified configuration for ast-contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub synthesis: SynthesisConfig,
    pub verify: VerifyConfig,
    pub compiler: CompilerConfig,
}

/// Get the XDG config directory for ast-contract.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ast-contract").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ast-contract.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".ast-contract.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            synthesis: self.synthesis.merge(&overlay.synthesis),
            verify: self.verify.merge(&overlay.verify),
            compiler: self.compiler.merge(&overlay.compiler),
        }
    }

    /// Scalars behave as in `merge_with`; arrays replace instead of union.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            synthesis: self.synthesis.merge(&global.synthesis),
            verify: self.verify.apply_global(&global.verify),
            compiler: self.compiler.merge(&global.compiler),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        let local = project_dir
            .map(local_config_path)
            .filter(|p| p.exists());
        let settings = Self::load_files(global.as_deref(), local.as_deref())?;
        Self::apply_env_overrides(settings)
    }

    /// File layers only: defaults, then `global`, then `local`.
    pub fn load_files(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = global {
            debug!("load_files: global={}", path.display());
            current = current.apply_global(&load_raw_settings(path)?);
        }
        if let Some(path) = local {
            debug!("load_files: local={}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }
        Ok(current)
    }

    /// Apply AST_CONTRACT__* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("AST_CONTRACT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("verify.exclude_kinds")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("synthesis.text") {
            settings.synthesis.text = val;
        }
        if let Ok(val) = config.get_int("synthesis.integer") {
            settings.synthesis.integer = val;
        }
        if let Ok(val) = config.get_bool("synthesis.boolean") {
            settings.synthesis.boolean = val;
        }
        if let Ok(val) = config.get_string("synthesis.class_name") {
            settings.synthesis.class_name = val;
        }
        if let Ok(val) = config.get_string("synthesis.package_prefix") {
            settings.synthesis.package_prefix = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("verify.exclude_kinds") {
            settings.verify.exclude_kinds = val;
        }
        if let Ok(val) = config.get_string("compiler.command") {
            settings.compiler.command = val;
        }
        if let Ok(val) = config.get::<u8>("compiler.compliance") {
            settings.compiler.compliance = val;
        }
        if let Ok(val) = config.get_string("compiler.encoding") {
            settings.compiler.encoding = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# ast-contract configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/ast-contract/ast-contract.toml
#   Local:  <project>/.ast-contract.toml
#   Env:    AST_CONTRACT__<SECTION>__<KEY> environment variables
#
# Local config UNIONS arrays with global; "!Kind" removes an inherited entry.

[synthesis]
# text = "42"
# integer = 42
# boolean = true
# class_name = "FooBar"
# package_prefix = "synthetic"

[verify]
# Kinds reported as skipped; a run with skipped kinds does not pass
# exclude_kinds = ["Comment"]

[compiler]
# command = "ecj"
# compliance = 8
# encoding = "UTF-8"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
