use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::error::SimError;
use crate::models::{SeriesDataset, SeriesRow, SimulationRun};

/// Column headers of the tabular export.
pub const CSV_HEADERS: [&str; 4] = ["Time", "Odeint", "Euler", "Stochastic"];

fn parse_csv_rows<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<SeriesRow>, SimError> {
    let headers = rdr.headers()?.clone();
    let found: Vec<&str> = headers.iter().collect();
    if found != CSV_HEADERS {
        return Err(SimError::ParseError(format!(
            "Expected CSV headers {}, found {}",
            CSV_HEADERS.join(","),
            found.join(",")
        )));
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: SeriesRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Read series previously written by [`write_csv`].
pub fn read_csv(path: impl AsRef<Path>) -> Result<SeriesDataset, SimError> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let rows = parse_csv_rows(&mut rdr)?;

    Ok(SeriesDataset::from_rows(
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
        &rows,
    ))
}

/// Read series from CSV bytes.
pub fn read_csv_from_bytes(data: &[u8], name: &str) -> Result<SeriesDataset, SimError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let rows = parse_csv_rows(&mut rdr)?;
    Ok(SeriesDataset::from_rows(name, &rows))
}

/// Write the time grid and the three series to any writer, one row per point.
pub fn write_csv_to<W: Write>(run: &SimulationRun, writer: W) -> Result<(), SimError> {
    run.check_alignment()?;
    let mut wtr = csv::Writer::from_writer(writer);
    for row in run.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the time grid and the three series to a CSV file, overwriting it.
///
/// The header is `Time,Odeint,Euler,Stochastic`.
pub fn write_csv(run: &SimulationRun, path: impl AsRef<Path>) -> Result<(), SimError> {
    let path = path.as_ref();
    run.check_alignment()?;
    let file = std::fs::File::create(path)?;
    write_csv_to(run, file)?;
    info!(path = %path.display(), rows = run.time_grid.len(), "CSV written");
    Ok(())
}
