mod csv_io;
mod excel_io;
mod json_io;
mod params_io;
mod report;

use std::path::Path;

use crate::error::SimError;
use crate::models::{SeriesDataset, SimulationRun};

pub use csv_io::{read_csv, read_csv_from_bytes, write_csv, write_csv_to, CSV_HEADERS};
pub use excel_io::{read_excel, write_excel};
pub use json_io::{read_json, read_json_from_bytes, write_json};
pub use params_io::{
    load_parameters, read_parameters_from_bytes, save_parameters, DEFAULT_PARAMETERS_FILE,
};
pub use report::{scale_points, wrap_text, write_report, Bounds, ChartFrame};

/// Trait for reading previously exported series from a file.
pub trait SeriesReader {
    fn read(&self, path: &Path) -> Result<SeriesDataset, SimError>;
}

/// Trait for writing a simulation run to a file.
pub trait SeriesWriter {
    fn write(&self, run: &SimulationRun, path: &Path) -> Result<(), SimError>;
}

/// CSV format reader/writer.
pub struct CsvFormat;

impl SeriesReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<SeriesDataset, SimError> {
        read_csv(path)
    }
}

impl SeriesWriter for CsvFormat {
    fn write(&self, run: &SimulationRun, path: &Path) -> Result<(), SimError> {
        write_csv(run, path)
    }
}

/// JSON format reader/writer.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl SeriesReader for JsonFormat {
    fn read(&self, path: &Path) -> Result<SeriesDataset, SimError> {
        let mut dataset = SeriesDataset::from(read_json(path)?);
        if let Some(stem) = path.file_stem() {
            dataset.name = stem.to_string_lossy().to_string();
        }
        Ok(dataset)
    }
}

impl SeriesWriter for JsonFormat {
    fn write(&self, run: &SimulationRun, path: &Path) -> Result<(), SimError> {
        write_json(run, path, self.pretty)
    }
}

/// Excel (.xlsx) format reader/writer.
pub struct ExcelFormat;

impl SeriesReader for ExcelFormat {
    fn read(&self, path: &Path) -> Result<SeriesDataset, SimError> {
        read_excel(path)
    }
}

impl SeriesWriter for ExcelFormat {
    fn write(&self, run: &SimulationRun, path: &Path) -> Result<(), SimError> {
        write_excel(run, path)
    }
}

/// PDF report writer.
pub struct PdfReport;

impl SeriesWriter for PdfReport {
    fn write(&self, run: &SimulationRun, path: &Path) -> Result<(), SimError> {
        write_report(run, path)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Pick a reader from the file extension (.csv, .json, .xlsx).
pub fn reader_for(path: &Path) -> Result<Box<dyn SeriesReader>, SimError> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat::default())),
        "xlsx" | "xls" => Ok(Box::new(ExcelFormat)),
        ext => Err(SimError::ParseError(format!(
            "Unsupported file format: .{ext}. Use .csv, .json, or .xlsx"
        ))),
    }
}

/// Pick a writer from the file extension (.csv, .json, .xlsx, .pdf).
pub fn writer_for(path: &Path, pretty_json: bool) -> Result<Box<dyn SeriesWriter>, SimError> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat {
            pretty: pretty_json,
        })),
        "xlsx" => Ok(Box::new(ExcelFormat)),
        "pdf" => Ok(Box::new(PdfReport)),
        ext => Err(SimError::ParseError(format!(
            "Unsupported output format: .{ext}. Use .csv, .json, .xlsx, or .pdf"
        ))),
    }
}
