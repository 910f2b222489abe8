use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Number of points in the standard simulation grid.
pub const STANDARD_POINTS: usize = 1000;
/// Length of the standard simulation horizon in days.
pub const STANDARD_HORIZON_DAYS: f64 = 1000.0;

/// Equally spaced time points (days), endpoints included.
///
/// Always holds at least two finite, strictly increasing points; deserializing
/// goes through [`TimeGrid::from_points`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// The fixed grid every simulation runs on: 1000 points over [0, 1000] days.
    pub fn standard() -> Self {
        Self {
            points: linspace(0.0, STANDARD_HORIZON_DAYS, STANDARD_POINTS),
        }
    }

    /// `n` equally spaced points from `start` to `end` inclusive.
    ///
    /// # Examples
    ///
    /// ```
    /// use population_growth_simulator::TimeGrid;
    ///
    /// let grid = TimeGrid::linspace(0.0, 1.0, 3).unwrap();
    /// assert_eq!(grid.points(), &[0.0, 0.5, 1.0]);
    /// ```
    pub fn linspace(start: f64, end: f64, n: usize) -> Result<Self, SimError> {
        if n < 2 {
            return Err(SimError::ValidationError(format!(
                "time grid needs at least 2 points, got {n}"
            )));
        }
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(SimError::ValidationError(format!(
                "time grid must span an increasing finite interval, got [{start}, {end}]"
            )));
        }
        Ok(Self {
            points: linspace(start, end, n),
        })
    }

    /// Build a grid from explicit points, which must be strictly increasing.
    pub fn from_points(points: Vec<f64>) -> Result<Self, SimError> {
        if points.len() < 2 {
            return Err(SimError::ValidationError(format!(
                "time grid needs at least 2 points, got {}",
                points.len()
            )));
        }
        if points.windows(2).any(|w| !(w[1] > w[0])) || points.iter().any(|t| !t.is_finite()) {
            return Err(SimError::ValidationError(
                "time grid points must be finite and strictly increasing".to_string(),
            ));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Uniform step size, taken from the first interval.
    pub fn step(&self) -> f64 {
        self.points[1] - self.points[0]
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }
}

impl TryFrom<Vec<f64>> for TimeGrid {
    type Error = SimError;

    fn try_from(points: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<TimeGrid> for Vec<f64> {
    fn from(grid: TimeGrid) -> Self {
        grid.points
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grid() {
        let grid = TimeGrid::standard();
        assert_eq!(grid.len(), 1000);
        assert_eq!(grid.start(), 0.0);
        assert_eq!(grid.end(), 1000.0);
        assert!((grid.step() - 1000.0 / 999.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_is_increasing() {
        let grid = TimeGrid::standard();
        for w in grid.points().windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_linspace_rejects_single_point() {
        assert!(TimeGrid::linspace(0.0, 1.0, 1).is_err());
    }

    #[test]
    fn test_linspace_rejects_reversed_interval() {
        assert!(TimeGrid::linspace(5.0, 1.0, 10).is_err());
        assert!(TimeGrid::linspace(1.0, 1.0, 10).is_err());
    }

    #[test]
    fn test_from_points_rejects_unsorted() {
        assert!(TimeGrid::from_points(vec![0.0, 2.0, 1.0]).is_err());
        assert!(TimeGrid::from_points(vec![0.0, 1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let grid = TimeGrid::linspace(0.0, 2.0, 3).unwrap();
        assert_eq!(serde_json::to_string(&grid).unwrap(), "[0.0,1.0,2.0]");
    }

    #[test]
    fn test_deserialize_validates_points() {
        let grid: TimeGrid = serde_json::from_str("[0.0,0.5,1.0]").unwrap();
        assert_eq!(grid.step(), 0.5);
        assert_eq!(grid.end(), 1.0);

        for bad in ["[]", "[1.0]", "[0.0,2.0,1.0]"] {
            assert!(
                serde_json::from_str::<TimeGrid>(bad).is_err(),
                "accepted {bad}"
            );
        }
    }
}
