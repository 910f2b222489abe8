use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::SimError;
use crate::models::SeriesResult;

/// Descriptive statistics of a single series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub initial: f64,
    pub final_value: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SeriesStats {
    fn compute(values: &[f64]) -> Self {
        Self {
            initial: values[0],
            final_value: values[values.len() - 1],
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            mean: values.iter().mean(),
        }
    }
}

/// Summary of one run: per-series statistics and how the series compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub points: usize,
    pub precise: SeriesStats,
    pub euler: SeriesStats,
    pub stochastic: SeriesStats,
    /// Largest |euler - precise| over the run
    pub max_euler_deviation: f64,
    /// (euler - precise) / precise at the final point
    pub final_euler_relative_error: f64,
    /// Sample standard deviation of (stochastic - precise) / precise
    pub realized_noise: Option<f64>,
}

impl SeriesSummary {
    /// Summarize a result. Fails on empty series.
    pub fn compute(series: &SeriesResult) -> Result<Self, SimError> {
        if series.is_empty() {
            return Err(SimError::InsufficientData(
                "Cannot summarize an empty series".to_string(),
            ));
        }
        if series.euler.len() != series.len() || series.stochastic.len() != series.len() {
            return Err(SimError::ValidationError(
                "Cannot summarize series of unequal length".to_string(),
            ));
        }

        let precise = SeriesStats::compute(&series.precise);
        let euler = SeriesStats::compute(&series.euler);
        let stochastic = SeriesStats::compute(&series.stochastic);

        let max_euler_deviation = series
            .precise
            .iter()
            .zip(&series.euler)
            .map(|(p, e)| (e - p).abs())
            .fold(0.0f64, f64::max);

        let final_euler_relative_error = if precise.final_value != 0.0 {
            (euler.final_value - precise.final_value) / precise.final_value
        } else {
            0.0
        };

        let relative_noise: Vec<f64> = series
            .precise
            .iter()
            .zip(&series.stochastic)
            .filter(|(p, _)| **p != 0.0)
            .map(|(p, s)| (s - p) / p)
            .collect();
        let realized_noise = if relative_noise.len() >= 2 {
            Some(relative_noise.iter().std_dev())
        } else {
            None
        };

        Ok(Self {
            points: series.len(),
            precise,
            euler,
            stochastic,
            max_euler_deviation,
            final_euler_relative_error,
            realized_noise,
        })
    }
}
