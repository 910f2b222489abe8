use crate::models::Parameters;

/// Plain-text explanation of a run, shown below the chart and in the PDF report.
pub fn format_description(params: &Parameters) -> String {
    let mut text = String::new();
    text.push_str("The chart compares three solutions of the seasonal logistic growth model:\n\n");
    text.push_str(
        "1. Adaptive ODE Solution (blue): the logistic equation integrated with an \
         adaptive Dormand-Prince solver at tight tolerances.\n\n",
    );
    text.push_str(
        "2. Euler's Method (green): fixed-step forward Euler on the same time grid, \
         a cheaper approximation that drifts when the step is coarse.\n\n",
    );
    text.push_str(
        "3. With Stochastic Noise (red): the adaptive solution perturbed point by point \
         with Gaussian noise proportional to the population.\n\n",
    );
    text.push_str("Current parameters:\n");
    text.push_str(&format!("- Growth Rate (r): {}\n", params.growth_rate));
    text.push_str(&format!("- Carrying Capacity (K): {}\n", params.carrying_capacity));
    text.push_str(&format!("- Initial Population (P0): {}\n", params.initial_population));
    text.push_str(&format!("- Seasonal Variation Factor: {}\n", params.seasonal_factor));
    text.push_str(&format!("- Immigration Rate: {}\n", params.immigration_rate));
    text.push_str(&format!("- Noise Intensity: {}\n\n", params.noise_intensity));
    text.push_str(
        "Seasonality makes the carrying capacity oscillate over a 365-day year, \
         while immigration adds a constant inflow on top of logistic growth.",
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_lists_parameters() {
        let params = Parameters {
            growth_rate: 0.25,
            carrying_capacity: 500.0,
            initial_population: 20.0,
            seasonal_factor: 0.3,
            immigration_rate: 1.5,
            noise_intensity: 0.05,
        };
        let text = format_description(&params);
        assert!(text.contains("Growth Rate (r): 0.25"));
        assert!(text.contains("Carrying Capacity (K): 500"));
        assert!(text.contains("Initial Population (P0): 20"));
        assert!(text.contains("Seasonal Variation Factor: 0.3"));
        assert!(text.contains("Immigration Rate: 1.5"));
        assert!(text.contains("Noise Intensity: 0.05"));
    }

    #[test]
    fn test_description_is_plain_ascii() {
        let text = format_description(&Parameters::default());
        assert!(text.is_ascii());
        assert!(!text.contains("**"));
    }
}
