use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Input parameters of one simulation run.
///
/// Serialized with the short keys used by saved parameter files
/// (`r`, `K`, `P0`, ...). Values may be stored either as JSON numbers or as
/// numeric strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SavedParameters")]
pub struct Parameters {
    /// Intrinsic growth rate per day (r)
    #[serde(rename = "r")]
    pub growth_rate: f64,
    /// Carrying capacity before seasonal modulation (K)
    #[serde(rename = "K")]
    pub carrying_capacity: f64,
    /// Population at t = 0 (P0)
    #[serde(rename = "P0")]
    pub initial_population: f64,
    /// Amplitude of the yearly carrying capacity oscillation, |s| < 1
    pub seasonal_factor: f64,
    /// Constant inflow (or outflow when negative) per day
    pub immigration_rate: f64,
    /// Standard deviation of the multiplicative noise, relative to the precise value
    pub noise_intensity: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            growth_rate: 0.1,
            carrying_capacity: 1000.0,
            initial_population: 10.0,
            seasonal_factor: 0.0,
            immigration_rate: 0.0,
            noise_intensity: 0.0,
        }
    }
}

impl Parameters {
    /// Collect every problem with these parameters, in field order.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (name, value) in self.fields() {
            if !value.is_finite() {
                issues.push(format!("{name} must be a finite number, got {value}"));
            }
        }
        if issues.is_empty() {
            if self.growth_rate <= 0.0 {
                issues.push(format!(
                    "growth rate must be positive, got {}",
                    self.growth_rate
                ));
            }
            if self.carrying_capacity <= 0.0 {
                issues.push(format!(
                    "carrying capacity must be positive, got {}",
                    self.carrying_capacity
                ));
            }
            if self.initial_population <= 0.0 {
                issues.push(format!(
                    "initial population must be positive, got {}",
                    self.initial_population
                ));
            }
            // K_t = K * (1 + s * sin(..)) reaches zero when |s| >= 1
            if self.seasonal_factor.abs() >= 1.0 {
                issues.push(format!(
                    "seasonal factor must lie in (-1, 1), got {}",
                    self.seasonal_factor
                ));
            }
            if self.noise_intensity < 0.0 {
                issues.push(format!(
                    "noise intensity must not be negative, got {}",
                    self.noise_intensity
                ));
            }
        }

        issues
    }

    /// Validate parameters. Returns `SimError::ValidationError` listing every problem.
    pub fn validate(&self) -> Result<(), SimError> {
        let issues = self.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(SimError::ValidationError(issues.join("; ")))
        }
    }

    /// Field names (as saved) paired with their values.
    pub fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("r", self.growth_rate),
            ("K", self.carrying_capacity),
            ("P0", self.initial_population),
            ("seasonal_factor", self.seasonal_factor),
            ("immigration_rate", self.immigration_rate),
            ("noise_intensity", self.noise_intensity),
        ]
    }
}

/// Parse a single user-entered numeric field.
pub fn parse_field(name: &str, raw: &str) -> Result<f64, SimError> {
    raw.trim().parse::<f64>().map_err(|_| {
        SimError::ValidationError(format!("{name}: '{raw}' is not a valid number"))
    })
}

/// A saved value, either a JSON number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum SavedNumber {
    Number(f64),
    Text(String),
}

impl SavedNumber {
    fn resolve(self, name: &str) -> Result<f64, SimError> {
        match self {
            SavedNumber::Number(v) => Ok(v),
            SavedNumber::Text(s) => parse_field(name, &s),
        }
    }
}

/// On-disk layout of [`Parameters`].
#[derive(Deserialize)]
struct SavedParameters {
    r: SavedNumber,
    #[serde(rename = "K")]
    k: SavedNumber,
    #[serde(rename = "P0")]
    p0: SavedNumber,
    seasonal_factor: SavedNumber,
    immigration_rate: SavedNumber,
    noise_intensity: SavedNumber,
}

impl TryFrom<SavedParameters> for Parameters {
    type Error = SimError;

    fn try_from(saved: SavedParameters) -> Result<Self, Self::Error> {
        Ok(Self {
            growth_rate: saved.r.resolve("r")?,
            carrying_capacity: saved.k.resolve("K")?,
            initial_population: saved.p0.resolve("P0")?,
            seasonal_factor: saved.seasonal_factor.resolve("seasonal_factor")?,
            immigration_rate: saved.immigration_rate.resolve("immigration_rate")?,
            noise_intensity: saved.noise_intensity.resolve("noise_intensity")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Parameters::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_growth_rate() {
        let params = Parameters {
            growth_rate: 0.0,
            ..Parameters::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, SimError::ValidationError(_)));
        assert!(err.to_string().contains("growth rate"));
    }

    #[test]
    fn test_rejects_negative_capacity() {
        let params = Parameters {
            carrying_capacity: -1.0,
            ..Parameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_initial_population() {
        let params = Parameters {
            initial_population: 0.0,
            ..Parameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_degenerate_seasonal_factor() {
        for s in [1.0, -1.0, 1.5] {
            let params = Parameters {
                seasonal_factor: s,
                ..Parameters::default()
            };
            assert!(params.validate().is_err(), "seasonal factor {s} accepted");
        }
        let params = Parameters {
            seasonal_factor: 0.99,
            ..Parameters::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_noise() {
        let params = Parameters {
            noise_intensity: -0.1,
            ..Parameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let params = Parameters {
            immigration_rate: f64::NAN,
            ..Parameters::default()
        };
        let issues = params.issues();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("immigration_rate"));
    }

    #[test]
    fn test_collects_all_issues() {
        let params = Parameters {
            growth_rate: 0.0,
            carrying_capacity: -1.0,
            initial_population: 0.0,
            ..Parameters::default()
        };
        assert_eq!(params.issues().len(), 3);
    }

    #[test]
    fn test_negative_immigration_allowed() {
        let params = Parameters {
            immigration_rate: -2.0,
            ..Parameters::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("r", " 0.25 ").unwrap(), 0.25);
        let err = parse_field("K", "abc").unwrap_err();
        assert!(err.to_string().contains("K: 'abc'"));
    }

    #[test]
    fn test_json_uses_short_keys() {
        let json = serde_json::to_string(&Parameters::default()).unwrap();
        assert!(json.contains("\"r\":0.1"));
        assert!(json.contains("\"K\":1000.0"));
        assert!(json.contains("\"P0\":10.0"));
        assert!(json.contains("\"noise_intensity\""));
    }

    #[test]
    fn test_deserialize_string_values() {
        let json = r#"{"r": "0.2", "K": "500", "P0": "5", "seasonal_factor": "0.1",
                       "immigration_rate": "0", "noise_intensity": "0.05"}"#;
        let params: Parameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.growth_rate, 0.2);
        assert_eq!(params.carrying_capacity, 500.0);
        assert_eq!(params.noise_intensity, 0.05);
    }

    #[test]
    fn test_deserialize_rejects_bad_string() {
        let json = r#"{"r": "fast", "K": 1, "P0": 1, "seasonal_factor": 0,
                       "immigration_rate": 0, "noise_intensity": 0}"#;
        let err = serde_json::from_str::<Parameters>(json).unwrap_err();
        assert!(err.to_string().contains("r: 'fast'"), "{err}");
    }

    #[test]
    fn test_bad_string_names_its_key() {
        let json = r#"{"r": 0.1, "K": 1, "P0": 1, "seasonal_factor": 0,
                       "immigration_rate": "lots", "noise_intensity": 0}"#;
        let err = serde_json::from_str::<Parameters>(json).unwrap_err();
        assert!(err.to_string().contains("immigration_rate: 'lots'"), "{err}");
    }
}
