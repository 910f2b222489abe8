//! Application configuration.
//!
//! Loaded from an optional TOML file. Every section and key may be omitted;
//! missing values fall back to the built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimError;
use crate::io::DEFAULT_PARAMETERS_FILE;
use crate::models::Parameters;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "popgrowth.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Defaults for parameters not given on the command line
    pub parameters: ParameterSettings,
    pub simulation: SimulationSettings,
    pub output: OutputSettings,
}

/// Default model parameters, with descriptive key names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterSettings {
    pub growth_rate: f64,
    pub carrying_capacity: f64,
    pub initial_population: f64,
    pub seasonal_factor: f64,
    pub immigration_rate: f64,
    pub noise_intensity: f64,
}

impl Default for ParameterSettings {
    fn default() -> Self {
        Self::from(Parameters::default())
    }
}

impl From<Parameters> for ParameterSettings {
    fn from(p: Parameters) -> Self {
        Self {
            growth_rate: p.growth_rate,
            carrying_capacity: p.carrying_capacity,
            initial_population: p.initial_population,
            seasonal_factor: p.seasonal_factor,
            immigration_rate: p.immigration_rate,
            noise_intensity: p.noise_intensity,
        }
    }
}

impl From<ParameterSettings> for Parameters {
    fn from(s: ParameterSettings) -> Self {
        Self {
            growth_rate: s.growth_rate,
            carrying_capacity: s.carrying_capacity,
            initial_population: s.initial_population,
            seasonal_factor: s.seasonal_factor,
            immigration_rate: s.immigration_rate,
            noise_intensity: s.noise_intensity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Noise seed; OS entropy when absent
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Where `save-params` writes and `load-params` reads
    pub parameters_file: PathBuf,
    pub pretty_json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            parameters_file: PathBuf::from(DEFAULT_PARAMETERS_FILE),
            pretty_json: true,
        }
    }
}

impl AppConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load `path` if given, else `popgrowth.toml` when it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SimError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reject parameter defaults that could never be simulated.
    pub fn validate(&self) -> Result<(), SimError> {
        let issues = self.parameters().issues();
        if !issues.is_empty() {
            return Err(SimError::ValidationError(format!(
                "[parameters] {}",
                issues.join("; ")
            )));
        }
        if self.output.parameters_file.as_os_str().is_empty() {
            return Err(SimError::ValidationError(
                "[output] parameters_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Default parameters from the config.
    pub fn parameters(&self) -> Parameters {
        Parameters::from(self.parameters)
    }
}
