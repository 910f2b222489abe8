use std::path::Path;

use calamine::{open_workbook, DataType, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use tracing::{info, warn};

use super::csv_io::CSV_HEADERS;
use crate::error::SimError;
use crate::models::{SeriesDataset, SeriesRow, SimulationRun};

/// Read series from an Excel (.xlsx) file written by [`write_excel`].
///
/// Expects the first sheet to hold columns Time, Odeint, Euler, Stochastic
/// under a header row. Rows without four numeric cells are skipped.
pub fn read_excel(path: impl AsRef<Path>) -> Result<SeriesDataset, SimError> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SimError::Excel("No sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SimError::Excel(e.to_string()))?;

    let mut rows = Vec::new();
    let mut cells = range.rows();

    // Skip header row
    cells.next();

    for (idx, row) in cells.enumerate() {
        let get_f64 = |col: usize| -> Option<f64> { row.get(col).and_then(|c| c.get_float()) };

        match (get_f64(0), get_f64(1), get_f64(2), get_f64(3)) {
            (Some(time), Some(precise), Some(euler), Some(stochastic)) => rows.push(SeriesRow {
                time,
                precise,
                euler,
                stochastic,
            }),
            _ => warn!(row = idx + 2, "skipping row without four numeric cells"),
        }
    }

    Ok(SeriesDataset::from_rows(
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
        &rows,
    ))
}

/// Write the time grid and the three series to an Excel (.xlsx) file.
pub fn write_excel(run: &SimulationRun, path: impl AsRef<Path>) -> Result<(), SimError> {
    run.check_alignment()?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, header) in CSV_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, row) in run.rows().enumerate() {
        let row_idx = idx as u32 + 1;
        worksheet.write_number(row_idx, 0, row.time)?;
        worksheet.write_number(row_idx, 1, row.precise)?;
        worksheet.write_number(row_idx, 2, row.euler)?;
        worksheet.write_number(row_idx, 3, row.stochastic)?;
    }

    workbook.save(path.as_ref())?;
    info!(path = %path.as_ref().display(), "Excel workbook written");

    Ok(())
}
