use std::path::Path;

use crate::analysis::{SeriesSummary, Simulator};
use crate::error::SimError;
use crate::io;
use crate::models::{Parameters, SimulationRun};

/// Command interface over one simulator and its most recent run.
///
/// Every user action maps to one method. Exports always write the last
/// successful run; a failed simulation leaves it in place.
pub struct Session {
    simulator: Simulator,
    last: Option<SimulationRun>,
    pretty_json: bool,
}

impl Session {
    /// Create a session around the given simulator.
    pub fn new(simulator: Simulator) -> Self {
        Self {
            simulator,
            last: None,
            pretty_json: true,
        }
    }

    /// Choose between pretty and compact JSON exports.
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    /// Run a simulation and keep it as the current run.
    pub fn simulate(&mut self, params: &Parameters) -> Result<&SimulationRun, SimError> {
        let run = self.simulator.run(params)?;
        Ok(self.last.insert(run))
    }

    /// The most recent successful run, if any.
    pub fn last_run(&self) -> Option<&SimulationRun> {
        self.last.as_ref()
    }

    fn current(&self) -> Result<&SimulationRun, SimError> {
        self.last.as_ref().ok_or(SimError::NoSimulation)
    }

    /// Summary statistics of the current run.
    pub fn summary(&self) -> Result<SeriesSummary, SimError> {
        SeriesSummary::compute(&self.current()?.series)
    }

    pub fn save_parameters(
        &self,
        params: &Parameters,
        path: impl AsRef<Path>,
    ) -> Result<(), SimError> {
        io::save_parameters(params, path)
    }

    pub fn load_parameters(&self, path: impl AsRef<Path>) -> Result<Parameters, SimError> {
        io::load_parameters(path)
    }

    /// Load saved parameters and immediately simulate with them.
    pub fn load_and_simulate(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<&SimulationRun, SimError> {
        let params = io::load_parameters(path)?;
        self.simulate(&params)
    }

    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        io::write_csv(self.current()?, path)
    }

    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        io::write_json(self.current()?, path, self.pretty_json)
    }

    pub fn export_excel(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        io::write_excel(self.current()?, path)
    }

    /// Write the PDF report (chart plus description) of the current run.
    pub fn export_report(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        io::write_report(self.current()?, path)
    }
}
