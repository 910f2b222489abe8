mod parameters;
mod series;
mod time_grid;

pub use parameters::{parse_field, Parameters};
pub use series::{SeriesDataset, SeriesResult, SeriesRow, SimulationRun};
pub use time_grid::{TimeGrid, STANDARD_HORIZON_DAYS, STANDARD_POINTS};
