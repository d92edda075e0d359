//! Pipeline options and their TOML representation.

use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::diagram::DiagramKind;
use crate::errors::ConfigError;
use crate::mapper::{MappingOptions, Scale};

/// Options controlling a pipeline run.
///
/// Every field has a default, so an empty file (or no file) is a valid
/// configuration:
///
/// ```toml
/// load_cases = ["LC1"]
/// kinds = ["sfd", "bmd"]
/// fail_fast = false
///
/// [mapping]
/// axis = "y"
/// scale = { mode = "normalized", amplitude = 0.3 }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Load cases to process; every load case in the force table when absent.
    #[serde(default)]
    pub load_cases: Option<Vec<String>>,
    /// Diagram kinds to build for each girder and load case.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<DiagramKind>,
    /// Stop at the first failing girder instead of skipping it.
    #[serde(default)]
    pub fail_fast: bool,
    /// Options for the 3D projection.
    #[serde(default)]
    pub mapping: MappingOptions,
}

/// Both diagram kinds.
fn default_kinds() -> Vec<DiagramKind> {
    DiagramKind::ALL.to_vec()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            load_cases: None,
            kinds: default_kinds(),
            fail_fast: false,
            mapping: MappingOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Validation`] for values that parse but cannot be used.
    ///
    /// # Examples
    /// ```
    /// use grillagex::{Axis, PipelineConfig};
    ///
    /// let config = PipelineConfig::from_toml_str("[mapping]\naxis = \"z\"\n")
    ///     .expect("valid configuration");
    /// assert_eq!(config.mapping.axis, Axis::Z);
    /// assert!(!config.fail_fast);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when `path` does not exist, plus the
    /// errors of [`PipelineConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        info!(path = path.display().to_string(); "Loading configuration");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check values serde cannot check on its own.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.kinds.is_empty() {
            return Err(ConfigError::Validation(
                "at least one diagram kind is required".to_owned(),
            ));
        }
        if let Some(load_cases) = &self.load_cases {
            if load_cases.is_empty() {
                return Err(ConfigError::Validation(
                    "load_cases must not be empty when given".to_owned(),
                ));
            }
        }
        match self.mapping.scale {
            Scale::Fixed { factor } if !factor.is_finite() => Err(ConfigError::Validation(
                format!("fixed scale factor must be finite (received {factor})"),
            )),
            Scale::Normalized { amplitude } if !amplitude.is_finite() || amplitude <= 0.0 => {
                Err(ConfigError::Validation(format!(
                    "normalized amplitude must be positive (received {amplitude})"
                )))
            }
            _ => Ok(()),
        }
    }
}
