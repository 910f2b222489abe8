use std::path::Path;

use tracing::info;

use crate::error::SimError;
use crate::models::SimulationRun;

fn validate_run(run: SimulationRun) -> Result<SimulationRun, SimError> {
    run.check_alignment()?;
    Ok(run)
}

/// Read a complete simulation run from a JSON file.
pub fn read_json(path: impl AsRef<Path>) -> Result<SimulationRun, SimError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let run: SimulationRun = serde_json::from_str(&content)?;
    validate_run(run)
}

/// Read a complete simulation run from JSON bytes.
pub fn read_json_from_bytes(data: &[u8]) -> Result<SimulationRun, SimError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| SimError::ParseError(format!("Invalid UTF-8: {e}")))?;
    let run: SimulationRun = serde_json::from_str(content)?;
    validate_run(run)
}

/// Write a complete simulation run (parameters, grid, series, seed) to a JSON file.
pub fn write_json(
    run: &SimulationRun,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), SimError> {
    let content = if pretty {
        serde_json::to_string_pretty(run)?
    } else {
        serde_json::to_string(run)?
    };
    std::fs::write(path.as_ref(), content)?;
    info!(path = %path.as_ref().display(), "JSON written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Parameters, SeriesResult, TimeGrid};

    fn sample_run() -> SimulationRun {
        SimulationRun::new(
            Parameters {
                noise_intensity: 0.02,
                ..Parameters::default()
            },
            TimeGrid::linspace(0.0, 4.0, 5).unwrap(),
            SeriesResult::new(
                vec![10.0, 11.0, 12.1, 13.3, 14.6],
                vec![10.0, 11.0, 12.0, 13.2, 14.5],
                vec![10.1, 10.9, 12.3, 13.0, 14.9],
            )
            .unwrap(),
            Some(99),
        )
        .unwrap()
    }

    #[test]
    fn test_json_roundtrip_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let run = sample_run();
        write_json(&run, &path, true).unwrap();
        assert_eq!(read_json(&path).unwrap(), run);
    }

    #[test]
    fn test_json_roundtrip_compact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let run = sample_run();
        write_json(&run, &path, false).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains('\n'));
        assert_eq!(read_json(&path).unwrap(), run);
    }

    #[test]
    fn test_json_contains_parameter_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        write_json(&sample_run(), &path, false).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"parameters\":{\"r\":0.1"));
        assert!(content.contains("\"seed\":99"));
    }

    #[test]
    fn test_read_json_rejects_misaligned_series() {
        let data = br#"{"parameters": {"r": 0.1, "K": 1000, "P0": 10, "seasonal_factor": 0,
                        "immigration_rate": 0, "noise_intensity": 0},
                        "time_grid": [0.0, 1.0, 2.0],
                        "series": {"precise": [1, 2], "euler": [1, 2], "stochastic": [1, 2]},
                        "seed": null}"#;
        let err = read_json_from_bytes(data).unwrap_err();
        assert!(matches!(err, SimError::ValidationError(_)));
    }

    #[test]
    fn test_read_json_rejects_unsorted_grid() {
        let data = br#"{"parameters": {"r": 0.1, "K": 1000, "P0": 10, "seasonal_factor": 0,
                        "immigration_rate": 0, "noise_intensity": 0},
                        "time_grid": [0.0, 2.0, 1.0],
                        "series": {"precise": [1, 2, 3], "euler": [1, 2, 3], "stochastic": [1, 2, 3]},
                        "seed": null}"#;
        assert!(read_json_from_bytes(data).is_err());
    }

    #[test]
    fn test_read_json_invalid_utf8() {
        assert!(matches!(
            read_json_from_bytes(&[0xc3, 0x28]),
            Err(SimError::ParseError(_))
        ));
    }
}
