use tracing::debug;

use crate::error::SimError;

/// Forward Euler over a uniform grid.
///
/// Uses the step `times[1] - times[0]` throughout and evaluates the rate at the
/// start of each interval. Returns one value per grid point, starting with `y0`.
pub fn euler<F>(rate: F, y0: f64, times: &[f64]) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    let mut values = Vec::with_capacity(times.len());
    if times.is_empty() {
        return values;
    }
    values.push(y0);
    if times.len() < 2 {
        return values;
    }

    let dt = times[1] - times[0];
    let mut y = y0;
    for &t in &times[..times.len() - 1] {
        y += rate(y, t) * dt;
        values.push(y);
    }
    values
}

// Dormand-Prince 5(4) tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights, also the last stage (FSAL).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Fifth minus fourth order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// Adaptive Dormand-Prince 5(4) integrator with per-point output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DormandPrince {
    /// Relative error tolerance per step
    pub rtol: f64,
    /// Absolute error tolerance per step
    pub atol: f64,
    /// Step budget for a single output interval
    pub max_steps_per_interval: usize,
}

impl Default for DormandPrince {
    fn default() -> Self {
        Self {
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            max_steps_per_interval: 10_000,
        }
    }
}

/// Counters reported after an adaptive integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rate_evaluations: usize,
}

impl DormandPrince {
    /// Integrate dy/dt = rate(y, t) from `times[0]`, reporting `y` at every point of `times`.
    ///
    /// `times` must be strictly increasing. Internal steps never cross an output
    /// point, and the step size carries over from one interval to the next.
    pub fn integrate<F>(
        &self,
        rate: F,
        y0: f64,
        times: &[f64],
    ) -> Result<(Vec<f64>, SolverStats), SimError>
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut stats = SolverStats::default();
        let mut values = Vec::with_capacity(times.len());
        if times.is_empty() {
            return Ok((values, stats));
        }
        values.push(y0);

        stats.rate_evaluations += 1;
        let mut t = times[0];
        let mut y = y0;
        let mut k1 = rate(y, t);
        let mut h = if times.len() > 1 {
            times[1] - times[0]
        } else {
            0.0
        };

        for &t_out in &times[1..] {
            let mut steps = 0usize;
            while t < t_out {
                if steps >= self.max_steps_per_interval {
                    return Err(SimError::ComputationError(format!(
                        "step budget of {} exhausted before t = {t_out}",
                        self.max_steps_per_interval
                    )));
                }
                steps += 1;

                let remaining = t_out - t;
                let last = h >= remaining;
                let step = if last { remaining } else { h };

                let k2 = rate(y + step * A21 * k1, t + C2 * step);
                let k3 = rate(y + step * (A31 * k1 + A32 * k2), t + C3 * step);
                let k4 = rate(y + step * (A41 * k1 + A42 * k2 + A43 * k3), t + C4 * step);
                let k5 = rate(
                    y + step * (A51 * k1 + A52 * k2 + A53 * k3 + A54 * k4),
                    t + C5 * step,
                );
                let k6 = rate(
                    y + step * (A61 * k1 + A62 * k2 + A63 * k3 + A64 * k4 + A65 * k5),
                    t + step,
                );
                let y_new = y + step * (B1 * k1 + B3 * k3 + B4 * k4 + B5 * k5 + B6 * k6);
                let k7 = rate(y_new, t + step);
                stats.rate_evaluations += 6;

                // Reject and shrink; real blow-ups end in the underflow or budget check.
                if !y_new.is_finite() || !k7.is_finite() {
                    stats.rejected_steps += 1;
                    h = step * 0.2;
                    check_step_size(h, t)?;
                    continue;
                }

                let err_estimate =
                    step * (E1 * k1 + E3 * k3 + E4 * k4 + E5 * k5 + E6 * k6 + E7 * k7);
                let scale = self.atol + self.rtol * y.abs().max(y_new.abs());
                let err = (err_estimate / scale).abs();

                if err <= 1.0 {
                    stats.accepted_steps += 1;
                    t = if last { t_out } else { t + step };
                    y = y_new;
                    k1 = k7;
                } else {
                    stats.rejected_steps += 1;
                }

                let factor = if err == 0.0 {
                    5.0
                } else {
                    (0.9 * err.powf(-0.2)).clamp(0.2, 5.0)
                };
                // A shortened final step says nothing about the natural step size.
                if !(last && err <= 1.0) || factor < 1.0 {
                    h = step * factor;
                }
                check_step_size(h, t)?;
            }
            values.push(y);
        }

        debug!(
            accepted = stats.accepted_steps,
            rejected = stats.rejected_steps,
            evaluations = stats.rate_evaluations,
            "adaptive integration finished"
        );
        Ok((values, stats))
    }
}

fn check_step_size(h: f64, t: f64) -> Result<(), SimError> {
    if h <= f64::EPSILON * t.abs().max(1.0) {
        return Err(SimError::ComputationError(format!(
            "step size underflow near t = {t}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euler_constant_rate_is_exact() {
        let times = [0.0, 0.5, 1.0, 1.5];
        let values = euler(|_, _| 2.0, 1.0, &times);
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_euler_uses_start_of_interval() {
        // dy/dt = t: Euler lags the exact t^2 / 2
        let times = [0.0, 1.0, 2.0];
        let values = euler(|_, t| t, 0.0, &times);
        assert_eq!(values, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_euler_single_point() {
        assert_eq!(euler(|y, _| y, 3.0, &[0.0]), vec![3.0]);
        assert!(euler(|y, _| y, 3.0, &[]).is_empty());
    }

    #[test]
    fn test_dormand_prince_exponential_decay() {
        let times: Vec<f64> = (0..=10).map(|i| i as f64 * 0.5).collect();
        let (values, stats) = DormandPrince::default()
            .integrate(|y, _| -y, 1.0, &times)
            .unwrap();
        assert_eq!(values.len(), times.len());
        for (t, y) in times.iter().zip(&values) {
            let exact = (-t).exp();
            assert!((y - exact).abs() < 1e-7, "t={t}: {y} vs {exact}");
        }
        assert!(stats.accepted_steps >= 10);
    }

    #[test]
    fn test_dormand_prince_time_dependent_rate() {
        // dy/dt = cos(t), y(0) = 0 -> y = sin(t)
        let times: Vec<f64> = (0..=20).map(|i| i as f64 * 0.3).collect();
        let (values, _) = DormandPrince::default()
            .integrate(|_, t| t.cos(), 0.0, &times)
            .unwrap();
        for (t, y) in times.iter().zip(&values) {
            assert!((y - t.sin()).abs() < 1e-7);
        }
    }

    #[test]
    fn test_dormand_prince_hits_output_points_exactly() {
        let times = [0.0, 0.1, 0.35, 2.0];
        let (values, _) = DormandPrince::default()
            .integrate(|_, _| 1.0, 0.0, &times)
            .unwrap();
        for (t, y) in times.iter().zip(&values) {
            assert!((y - t).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dormand_prince_blow_up_is_an_error() {
        // dy/dt = y^2 explodes at t = 1
        let times = [0.0, 0.5, 2.0];
        let result = DormandPrince::default().integrate(|y, _| y * y, 1.0, &times);
        assert!(matches!(result, Err(SimError::ComputationError(_))));
    }

    #[test]
    fn test_dormand_prince_recovers_from_overflowing_step() {
        // the first trial step spans the whole interval and overflows for r = 1e4
        let times = [0.0, 1000.0 / 999.0, 2000.0 / 999.0];
        let (values, stats) = DormandPrince::default()
            .integrate(|y, _| 1.0e4 * y * (1.0 - y / 1000.0), 10.0, &times)
            .unwrap();
        assert!(stats.rejected_steps >= 1);
        assert!((values[2] - 1000.0).abs() < 1e-3, "end value {}", values[2]);
    }

    #[test]
    fn test_dormand_prince_step_budget() {
        let solver = DormandPrince {
            max_steps_per_interval: 1,
            ..DormandPrince::default()
        };
        let result = solver.integrate(|y, _| -50.0 * y, 1.0, &[0.0, 100.0]);
        assert!(result.is_err());
    }
}
