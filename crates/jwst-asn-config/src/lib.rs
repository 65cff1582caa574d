//! Configuration system for the association builder.
//!
//! Load builder configuration from TOML or YAML files to choose rules, stamp
//! a version id and steer output without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use jwst_asn_config::AsnConfig;
//!
//! let config = AsnConfig::from_toml_str(r#"
//!     version_id = "20261018t120000"
//!     rules = ["Asn_Lv2Spec"]
//!     program = "00623"
//!
//!     [output]
//!     dir = "asn"
//!     pretty = false
//! "#).unwrap();
//!
//! assert_eq!(config.rules, vec!["Asn_Lv2Spec".to_string()]);
//! assert_eq!(config.output.dir.to_str(), Some("asn"));
//! assert!(!config.output.pretty);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use jwst_asn_config::AsnConfig;
//!
//! let config = AsnConfig::load("asn.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! assert!(config.output.pretty);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main builder configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AsnConfig {
    /// Version id stamped into every generated association.
    #[serde(default)]
    pub version_id: Option<String>,

    /// Rules to run. Empty runs every registered rule.
    #[serde(default)]
    pub rules: Vec<String>,

    /// Restrict generation to one program.
    #[serde(default)]
    pub program: Option<String>,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

impl AsnConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing the format by extension.
    ///
    /// `.yaml` and `.yml` are parsed as YAML, anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or fails to parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()
    }

    /// Sets the version id.
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Adds a rule to run.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Restricts generation to one program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output.dir = dir.into();
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.rules.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::Invalid("rule names must not be empty".into()));
        }
        if self.program.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid("program must not be empty".into()));
        }
        Ok(self)
    }
}

/// Where and how association documents are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputConfig {
    /// Directory association files are written to.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Pretty-print JSON output.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            pretty: default_pretty(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_pretty() -> bool {
    true
}
