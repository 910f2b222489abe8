use std::path::Path;

use tracing::info;

use crate::error::SimError;
use crate::models::Parameters;

/// File the parameters are saved to when no other path is given.
pub const DEFAULT_PARAMETERS_FILE: &str = "simulation_parameters.json";

/// Save parameters as a flat JSON object, overwriting any existing file.
pub fn save_parameters(params: &Parameters, path: impl AsRef<Path>) -> Result<(), SimError> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(params)?;
    std::fs::write(path, content)?;
    info!(path = %path.display(), "parameters saved");
    Ok(())
}

/// Load previously saved parameters.
///
/// A missing file yields `SimError::NoSavedParameters`. Values are not
/// validated here; simulating with them does that.
pub fn load_parameters(path: impl AsRef<Path>) -> Result<Parameters, SimError> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SimError::NoSavedParameters(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let params: Parameters = serde_json::from_str(&content)?;
    info!(path = %path.display(), "parameters loaded");
    Ok(params)
}

/// Parse saved parameters from raw bytes.
pub fn read_parameters_from_bytes(data: &[u8]) -> Result<Parameters, SimError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| SimError::ParseError(format!("Invalid UTF-8: {e}")))?;
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_parameters() -> Parameters {
        Parameters {
            growth_rate: 0.15,
            carrying_capacity: 2500.0,
            initial_population: 42.0,
            seasonal_factor: 0.35,
            immigration_rate: -1.25,
            noise_intensity: 0.07,
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let params = sample_parameters();

        save_parameters(&params, &path).unwrap();
        let loaded = load_parameters(&path).unwrap();

        assert_eq!(loaded, params);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");

        save_parameters(&sample_parameters(), &path).unwrap();
        save_parameters(&Parameters::default(), &path).unwrap();

        assert_eq!(load_parameters(&path).unwrap(), Parameters::default());
    }

    #[test]
    fn test_missing_file_is_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nothing_here.json");
        let err = load_parameters(&path).unwrap_err();
        assert!(matches!(err, SimError::NoSavedParameters(p) if p == path));
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_parameters(&path), Err(SimError::Json(_))));
    }

    #[test]
    fn test_loads_string_valued_record() {
        let data = br#"{"r": "0.1", "K": "1000", "P0": "10", "seasonal_factor": "0.2",
                        "immigration_rate": "0.5", "noise_intensity": "0.01"}"#;
        let params = read_parameters_from_bytes(data).unwrap();
        assert_eq!(params.carrying_capacity, 1000.0);
        assert_eq!(params.seasonal_factor, 0.2);
    }

    #[test]
    fn test_missing_key_is_error() {
        let data = br#"{"r": 0.1, "K": 1000}"#;
        assert!(read_parameters_from_bytes(data).is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let err = read_parameters_from_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, SimError::ParseError(_)));
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("params.json");
        assert!(matches!(
            save_parameters(&sample_parameters(), &path),
            Err(SimError::Io(_))
        ));
    }
}
