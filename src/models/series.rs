use serde::{Deserialize, Serialize};

use super::{Parameters, TimeGrid};
use crate::error::SimError;

/// The three solutions of one run, aligned index-for-index with the time grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResult {
    /// Adaptive high-order solution
    pub precise: Vec<f64>,
    /// Fixed-step forward Euler solution
    pub euler: Vec<f64>,
    /// Precise solution with per-point Gaussian noise
    pub stochastic: Vec<f64>,
}

impl SeriesResult {
    /// Build a result, rejecting series of unequal length.
    pub fn new(precise: Vec<f64>, euler: Vec<f64>, stochastic: Vec<f64>) -> Result<Self, SimError> {
        if precise.len() != euler.len() || precise.len() != stochastic.len() {
            return Err(SimError::ValidationError(format!(
                "series lengths differ: precise {}, euler {}, stochastic {}",
                precise.len(),
                euler.len(),
                stochastic.len()
            )));
        }
        Ok(Self {
            precise,
            euler,
            stochastic,
        })
    }

    pub fn len(&self) -> usize {
        self.precise.len()
    }

    pub fn is_empty(&self) -> bool {
        self.precise.is_empty()
    }
}

/// One exported row: a time point and the three series values at it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Odeint")]
    pub precise: f64,
    #[serde(rename = "Euler")]
    pub euler: f64,
    #[serde(rename = "Stochastic")]
    pub stochastic: f64,
}

/// A complete simulation run: inputs, grid, and the resulting series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub parameters: Parameters,
    pub time_grid: TimeGrid,
    pub series: SeriesResult,
    /// Seed of the noise generator, when one was given
    pub seed: Option<u64>,
}

impl SimulationRun {
    /// Assemble a run, checking that the series align with the grid.
    pub fn new(
        parameters: Parameters,
        time_grid: TimeGrid,
        series: SeriesResult,
        seed: Option<u64>,
    ) -> Result<Self, SimError> {
        let run = Self {
            parameters,
            time_grid,
            series,
            seed,
        };
        run.check_alignment()?;
        Ok(run)
    }

    /// Verify every series has one value per grid point.
    pub fn check_alignment(&self) -> Result<(), SimError> {
        let n = self.time_grid.len();
        let s = &self.series;
        if s.precise.len() != n || s.euler.len() != n || s.stochastic.len() != n {
            return Err(SimError::ValidationError(format!(
                "series do not align with the {n}-point time grid \
                 (precise {}, euler {}, stochastic {})",
                s.precise.len(),
                s.euler.len(),
                s.stochastic.len()
            )));
        }
        Ok(())
    }

    /// Rows in grid order, as written by the tabular exporters.
    pub fn rows(&self) -> impl Iterator<Item = SeriesRow> + '_ {
        self.time_grid
            .points()
            .iter()
            .enumerate()
            .map(move |(i, &time)| SeriesRow {
                time,
                precise: self.series.precise[i],
                euler: self.series.euler[i],
                stochastic: self.series.stochastic[i],
            })
    }
}

/// Series read back from an exported file.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDataset {
    /// Name of the dataset, usually the file stem
    pub name: String,
    pub time: Vec<f64>,
    pub series: SeriesResult,
    /// Parameters, when the source file carried them
    pub parameters: Option<Parameters>,
}

impl SeriesDataset {
    /// Build a dataset from rows in file order.
    pub fn from_rows(name: impl Into<String>, rows: &[SeriesRow]) -> Self {
        Self {
            name: name.into(),
            time: rows.iter().map(|r| r.time).collect(),
            series: SeriesResult {
                precise: rows.iter().map(|r| r.precise).collect(),
                euler: rows.iter().map(|r| r.euler).collect(),
                stochastic: rows.iter().map(|r| r.stochastic).collect(),
            },
            parameters: None,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

impl From<SimulationRun> for SeriesDataset {
    fn from(run: SimulationRun) -> Self {
        Self {
            name: "simulation".to_string(),
            time: run.time_grid.points().to_vec(),
            series: run.series,
            parameters: Some(run.parameters),
        }
    }
}
