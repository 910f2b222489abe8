use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::models::Parameters;

/// Length of the seasonal cycle in days.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Logistic growth with a seasonally varying carrying capacity and constant immigration.
///
/// dP/dt = r * P * (1 - P / K_t) + m, where K_t = K * (1 + s * sin(2πt / 365))
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthModel {
    pub growth_rate: f64,
    pub carrying_capacity: f64,
    pub seasonal_factor: f64,
    pub immigration_rate: f64,
}

impl GrowthModel {
    pub fn from_parameters(params: &Parameters) -> Self {
        Self {
            growth_rate: params.growth_rate,
            carrying_capacity: params.carrying_capacity,
            seasonal_factor: params.seasonal_factor,
            immigration_rate: params.immigration_rate,
        }
    }

    /// Carrying capacity at day `t`.
    pub fn effective_capacity(&self, t: f64) -> f64 {
        effective_capacity(self.carrying_capacity, self.seasonal_factor, t)
    }

    /// Instantaneous rate of change dP/dt.
    pub fn rate(&self, population: f64, t: f64) -> f64 {
        logistic_rate(
            population,
            t,
            self.growth_rate,
            self.carrying_capacity,
            self.seasonal_factor,
            self.immigration_rate,
        )
    }
}

/// Seasonally modulated carrying capacity K_t.
pub fn effective_capacity(carrying_capacity: f64, seasonal_factor: f64, t: f64) -> f64 {
    carrying_capacity * (1.0 + seasonal_factor * (2.0 * PI * t / DAYS_PER_YEAR).sin())
}

/// dP/dt for population `p` at day `t`.
///
/// Undefined when K_t is zero, which validated parameters (|s| < 1, K > 0) rule out.
///
/// # Examples
///
/// ```
/// use population_growth_simulator::analysis::logistic_rate;
///
/// // Half the carrying capacity, no seasonality: r * P / 2
/// let rate = logistic_rate(500.0, 0.0, 0.1, 1000.0, 0.0, 0.0);
/// assert!((rate - 25.0).abs() < 1e-12);
/// ```
pub fn logistic_rate(
    p: f64,
    t: f64,
    growth_rate: f64,
    carrying_capacity: f64,
    seasonal_factor: f64,
    immigration_rate: f64,
) -> f64 {
    let k_t = effective_capacity(carrying_capacity, seasonal_factor, t);
    growth_rate * p * (1.0 - p / k_t) + immigration_rate
}

/// Closed-form solution of plain logistic growth: P(t) = K / (1 + ((K - P0)/P0) * e^(-r*t)).
///
/// Only exact without seasonality and immigration.
pub fn logistic_closed_form(
    initial_population: f64,
    growth_rate: f64,
    carrying_capacity: f64,
    t: f64,
) -> f64 {
    if initial_population <= 0.0 {
        return 0.0;
    }
    let k = carrying_capacity;
    k / (1.0 + ((k - initial_population) / initial_population) * (-growth_rate * t).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_model() -> GrowthModel {
        GrowthModel {
            growth_rate: 0.1,
            carrying_capacity: 1000.0,
            seasonal_factor: 0.0,
            immigration_rate: 0.0,
        }
    }

    #[test]
    fn test_rate_zero_at_capacity() {
        let model = plain_model();
        assert_eq!(model.rate(1000.0, 42.0), 0.0);
    }

    #[test]
    fn test_rate_positive_below_capacity() {
        let model = plain_model();
        assert!(model.rate(10.0, 0.0) > 0.0);
        // r * P * (1 - P/K) = 0.1 * 10 * 0.99
        assert!((model.rate(10.0, 0.0) - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_rate_negative_above_capacity() {
        assert!(plain_model().rate(1500.0, 0.0) < 0.0);
    }

    #[test]
    fn test_immigration_shifts_rate() {
        let mut model = plain_model();
        let base = model.rate(200.0, 10.0);
        model.immigration_rate = 3.0;
        assert!((model.rate(200.0, 10.0) - base - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_seasonal_capacity_peaks_at_quarter_year() {
        let mut model = plain_model();
        model.seasonal_factor = 0.5;
        assert!((model.effective_capacity(0.0) - 1000.0).abs() < 1e-9);
        assert!((model.effective_capacity(DAYS_PER_YEAR / 4.0) - 1500.0).abs() < 1e-9);
        assert!((model.effective_capacity(3.0 * DAYS_PER_YEAR / 4.0) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_seasonal_capacity_is_periodic() {
        let mut model = plain_model();
        model.seasonal_factor = 0.3;
        let a = model.effective_capacity(17.0);
        let b = model.effective_capacity(17.0 + DAYS_PER_YEAR);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_model_matches_free_function() {
        let params = Parameters {
            seasonal_factor: 0.2,
            immigration_rate: 1.5,
            ..Parameters::default()
        };
        let model = GrowthModel::from_parameters(&params);
        let expected = logistic_rate(300.0, 90.0, 0.1, 1000.0, 0.2, 1.5);
        assert_eq!(model.rate(300.0, 90.0), expected);
    }

    #[test]
    fn test_closed_form_bounds() {
        assert_eq!(logistic_closed_form(10.0, 0.1, 1000.0, 0.0), 10.0);
        let late = logistic_closed_form(10.0, 0.1, 1000.0, 500.0);
        assert!(late <= 1000.0 && late > 999.9);
        assert_eq!(logistic_closed_form(0.0, 0.1, 1000.0, 5.0), 0.0);
    }

    #[test]
    fn test_growth_model_json_roundtrip() {
        let model = plain_model();
        let json = serde_json::to_string(&model).unwrap();
        let back: GrowthModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
