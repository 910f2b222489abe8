use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rand_distr::StandardNormal;
use tracing::{debug, info};

use super::growth::GrowthModel;
use super::integrators::{euler, DormandPrince};
use crate::error::SimError;
use crate::models::{Parameters, SeriesResult, SimulationRun, TimeGrid};

/// Produces the precise, Euler, and stochastic series for a parameter set.
///
/// Owns the noise generator. Without a seed it is drawn from the OS and runs
/// are not reproducible; with a seed, two simulators fed the same inputs
/// produce identical stochastic series.
pub struct Simulator {
    solver: DormandPrince,
    rng: ChaCha12Rng,
    seed: Option<u64>,
}

impl Simulator {
    /// Create a simulator seeded from `seed`, or from OS entropy when `None`.
    pub fn new(seed: Option<u64>) -> Result<Self, SimError> {
        match seed {
            Some(seed) => Ok(Self::with_seed(seed)),
            None => Self::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            solver: DormandPrince::default(),
            rng: ChaCha12Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Result<Self, SimError> {
        let rng = ChaCha12Rng::try_from_os_rng().map_err(|e| SimError::Random(e.to_string()))?;
        Ok(Self {
            solver: DormandPrince::default(),
            rng,
            seed: None,
        })
    }

    /// Replace the adaptive solver settings.
    pub fn with_solver(mut self, solver: DormandPrince) -> Self {
        self.solver = solver;
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Compute all three series over `grid`.
    ///
    /// Parameters are validated first; invalid input never reaches the solver.
    pub fn simulate(
        &mut self,
        params: &Parameters,
        grid: &TimeGrid,
    ) -> Result<SeriesResult, SimError> {
        params.validate()?;

        let precise = precise_series(params, grid, &self.solver)?;
        let euler = euler_series(params, grid);
        let stochastic = add_noise(&precise, params.noise_intensity, &mut self.rng);

        SeriesResult::new(precise, euler, stochastic)
    }

    /// Simulate over the standard 1000-day grid and bundle the result into a run.
    pub fn run(&mut self, params: &Parameters) -> Result<SimulationRun, SimError> {
        let grid = TimeGrid::standard();
        let series = self.simulate(params, &grid)?;
        info!(
            points = grid.len(),
            final_precise = series.precise[series.len() - 1],
            "simulation complete"
        );
        SimulationRun::new(*params, grid, series, self.seed)
    }
}

/// Adaptive solution at every grid point.
pub fn precise_series(
    params: &Parameters,
    grid: &TimeGrid,
    solver: &DormandPrince,
) -> Result<Vec<f64>, SimError> {
    let model = GrowthModel::from_parameters(params);
    let (values, stats) = solver.integrate(
        |p, t| model.rate(p, t),
        params.initial_population,
        grid.points(),
    )?;
    debug!(?stats, "precise series computed");
    Ok(values)
}

/// Forward Euler solution with the grid's uniform step.
pub fn euler_series(params: &Parameters, grid: &TimeGrid) -> Vec<f64> {
    let model = GrowthModel::from_parameters(params);
    euler(
        |p, t| model.rate(p, t),
        params.initial_population,
        grid.points(),
    )
}

/// Perturb each value with independent Gaussian noise of standard deviation
/// `noise_intensity * |value|`.
///
/// Zero intensity returns an exact copy and draws nothing from `rng`.
pub fn add_noise<R: Rng>(precise: &[f64], noise_intensity: f64, rng: &mut R) -> Vec<f64> {
    if noise_intensity == 0.0 {
        return precise.to_vec();
    }
    precise
        .iter()
        .map(|&p| {
            let z: f64 = rng.sample(StandardNormal);
            p + noise_intensity * p.abs() * z
        })
        .collect()
}
