mod growth;
mod integrators;
mod simulator;
mod statistics;

pub use growth::{
    effective_capacity, logistic_closed_form, logistic_rate, GrowthModel, DAYS_PER_YEAR,
};
pub use integrators::{euler, DormandPrince, SolverStats};
pub use simulator::{add_noise, euler_series, precise_series, Simulator};
pub use statistics::{SeriesStats, SeriesSummary};
