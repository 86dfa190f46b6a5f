// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    DEFAULT_MARGIN_FRACTION, DEFAULT_STANDARD_RIBBON_FRACTION, DEFAULT_WIDE_ASPECT_THRESHOLD,
    DEFAULT_WIDE_RIBBON_FRACTION,
};
use crate::logging::LoggingConfig;
use crate::pptx::PackageLimits;
use crate::watermark::{ImageLimits, Margin, PlacementRules, WatermarkOptions};

/// Errors raised while loading or validating a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watermark: WatermarkOptions,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub limits: ImageLimits,
    #[serde(default)]
    pub package: PackageLimits,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_margin_fraction() -> f64 {
    DEFAULT_MARGIN_FRACTION
}

fn default_wide_aspect_threshold() -> f64 {
    DEFAULT_WIDE_ASPECT_THRESHOLD
}

fn default_wide_ribbon_fraction() -> f64 {
    DEFAULT_WIDE_RIBBON_FRACTION
}

fn default_standard_ribbon_fraction() -> f64 {
    DEFAULT_STANDARD_RIBBON_FRACTION
}

/// Placement heuristics as written in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Corner margin as a fraction of the shorter slide side (default: 0.05)
    #[serde(default = "default_margin_fraction")]
    pub margin_fraction: f64,

    /// Fixed corner margin in EMU; overrides margin_fraction when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_emu: Option<f64>,

    /// Aspect ratio above which ribbons use the thin band (default: 2.5)
    #[serde(default = "default_wide_aspect_threshold")]
    pub wide_aspect_threshold: f64,

    /// Thin band thickness as a fraction of the slide side (default: 0.20)
    #[serde(default = "default_wide_ribbon_fraction")]
    pub wide_ribbon_fraction: f64,

    /// Regular band thickness as a fraction of the slide side (default: 0.35)
    #[serde(default = "default_standard_ribbon_fraction")]
    pub standard_ribbon_fraction: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin_fraction: default_margin_fraction(),
            margin_emu: None,
            wide_aspect_threshold: default_wide_aspect_threshold(),
            wide_ribbon_fraction: default_wide_ribbon_fraction(),
            standard_ribbon_fraction: default_standard_ribbon_fraction(),
        }
    }
}

impl PlacementConfig {
    pub fn to_placement_rules(&self) -> PlacementRules {
        PlacementRules {
            margin: match self.margin_emu {
                Some(emu) => Margin::Absolute(emu),
                None => Margin::Fraction(self.margin_fraction),
            },
            wide_aspect_threshold: self.wide_aspect_threshold,
            wide_ribbon_fraction: self.wide_ribbon_fraction,
            standard_ribbon_fraction: self.standard_ribbon_fraction,
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnvVar(var_name.to_string()));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        // An empty or comment-only file means "all defaults"
        let has_content = substituted
            .lines()
            .any(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'));
        if !has_content {
            return Ok(Config::default());
        }

        Ok(serde_yaml::from_str(&substituted)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.watermark
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("watermark: {}", e)))?;

        self.placement
            .to_placement_rules()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("placement: {}", e)))?;

        let limits = &self.limits;
        if limits.max_width == 0
            || limits.max_height == 0
            || limits.max_pixels == 0
            || limits.max_file_size == 0
        {
            return Err(ConfigError::Invalid(
                "limits: all limits must be greater than zero".to_string(),
            ));
        }

        if self.package.max_part_size == 0 || self.package.max_package_size == 0 {
            return Err(ConfigError::Invalid(
                "package: all limits must be greater than zero".to_string(),
            ));
        }

        self.logging
            .env_filter()
            .map_err(|e| ConfigError::Invalid(format!("logging: {}", e)))?;

        Ok(())
    }

    pub fn to_placement_rules(&self) -> PlacementRules {
        self.placement.to_placement_rules()
    }
}
