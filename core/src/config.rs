//! Declarative option definitions.
//!
//! An [`OptionsConfig`] describes a whole [`Options`] instance in YAML or
//! JSON. Building it replays every definition in file order through the
//! regular API, so a bad file fails with the same errors a program would see.
//!
//! # Example YAML
//!
//! ```yaml
//! program: app
//! description: Example application
//! positional: [input]
//! options:
//!   - short: v
//!     long: version
//!     description: Print version
//!   - short: o
//!     long: output
//!     kind: string
//!     description: Output file
//!   - long: input
//!     kind: string
//! aliases:
//!   - target: v
//!     alias: V
//!   - target: output
//!     alias: out
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{OptionError, OptionSpec, Options};

/// Errors raised while loading or building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is not `.json`, `.yaml` or `.yml`.
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A definition was rejected while building.
    #[error(transparent)]
    Definition(#[from] OptionError),
}

/// One `alias -> target` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSpec {
    /// Existing option name or alias.
    pub target: String,
    /// New secondary name.
    pub alias: String,
}

/// Serializable description of an [`Options`] instance.
///
/// # Examples
///
/// ```
/// use option_alias_core::OptionsConfig;
///
/// let config = OptionsConfig::from_yaml_str(r#"
/// program: app
/// options:
///   - short: h
///     long: help
/// aliases:
///   - target: h
///     alias: "?"
/// "#).unwrap();
///
/// let options = config.build().unwrap();
/// assert_eq!(options.resolve_alias("?").unwrap(), "h");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Program name for usage and argv[0].
    pub program: String,
    #[serde(default)]
    pub description: String,
    /// Options receiving positional arguments, in order.
    #[serde(default)]
    pub positional: Vec<String>,
    #[serde(default)]
    pub positional_help: String,
    /// Collect unknown options instead of failing.
    #[serde(default)]
    pub allow_unrecognised: bool,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    #[serde(default)]
    pub aliases: Vec<AliasSpec>,
}

impl OptionsConfig {
    /// Loads a configuration file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for an
    /// unknown extension, [`IoError`](ConfigError::IoError) if the file
    /// cannot be read, or a parse error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !matches!(ext.as_str(), "json" | "yaml" | "yml") {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }

        let reader = BufReader::new(std::fs::File::open(path)?);
        let config = if ext == "json" {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        debug!(path = %path.display(), "loaded options config");
        Ok(config)
    }

    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](ConfigError::YamlError) on malformed input.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](ConfigError::JsonError) on malformed input.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Builds an [`Options`] instance: options first, then aliases, each in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`OptionError`] raised by a definition.
    pub fn build(&self) -> Result<Options, ConfigError> {
        let program = if self.program.is_empty() {
            "program"
        } else {
            self.program.as_str()
        };
        let mut options = Options::new(program, &self.description);
        for spec in &self.options {
            options.add_option(spec.clone())?;
        }
        for alias in &self.aliases {
            options.add_alias(&alias.target, &alias.alias)?;
        }
        if !self.positional.is_empty() {
            options.parse_positional(self.positional.iter().cloned());
        }
        if !self.positional_help.is_empty() {
            options.positional_help(&self.positional_help);
        }
        if self.allow_unrecognised {
            options.allow_unrecognised_options();
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
program: app
description: Example
positional: [input]
positional_help: "<FILE>"
options:
  - short: v
    long: version
  - short: o
    long: output
    kind: string
  - long: input
    kind: string
aliases:
  - target: v
    alias: V
  - target: output
    alias: target
"#
    }

    #[test]
    fn test_yaml_config_builds_options() {
        let options = OptionsConfig::from_yaml_str(sample_yaml())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(options.program(), "app");
        assert_eq!(options.resolve_alias("target").unwrap(), "output");
        assert!(options.help().contains("app [OPTION...] <FILE>"));

        let result = options.parse(["app", "-V", "in.txt"]).unwrap();
        assert!(result.get::<bool>("version").unwrap());
        assert_eq!(result.get::<String>("input").unwrap(), "in.txt");
    }

    #[test]
    fn test_json_config_builds_options() {
        let raw = r#"{
            "program": "app",
            "options": [{"short": "h", "long": "help"}],
            "aliases": [{"target": "help", "alias": "info"}]
        }"#;
        let options = OptionsConfig::from_json_str(raw).unwrap().build().unwrap();
        assert_eq!(options.get_aliases("help").unwrap(), vec!["info"]);
    }

    #[test]
    fn test_bad_alias_surfaces_option_error() {
        let raw = r#"
program: app
options:
  - short: x
    long: xray
  - short: y
    long: yank
aliases:
  - target: x
    alias: y
"#;
        let err = OptionsConfig::from_yaml_str(raw).unwrap().build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Definition(OptionError::AliasConflict(ref name)) if name == "y"
        ));
        assert!(err.to_string().contains("conflicts with existing option"));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = OptionsConfig::load("options.toml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.yml");
        std::fs::write(&path, sample_yaml()).unwrap();

        let config = OptionsConfig::load(&path).unwrap();
        assert_eq!(config.options.len(), 3);
        assert_eq!(config.aliases.len(), 2);
    }
}
