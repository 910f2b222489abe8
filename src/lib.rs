pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod session;
pub mod visualization;

pub use analysis::{SeriesSummary, Simulator};
pub use config::AppConfig;
pub use error::SimError;
pub use io::{SeriesReader, SeriesWriter};
pub use models::{Parameters, SeriesDataset, SeriesResult, SimulationRun, TimeGrid};
pub use session::Session;
