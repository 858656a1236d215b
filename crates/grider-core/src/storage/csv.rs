//! CSV import/export.
//!
//! Cells are written as their raw text (formulas keep their `=`), so a file
//! round-trips through Grider without losing anything. There is no header row.

use crate::error::Result;
use grider_engine::engine::{Cell, CellRef, Grid};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Read a CSV file into cells. Empty fields are skipped.
pub fn read_csv(path: &Path) -> Result<Vec<(CellRef, Cell)>> {
    let file = File::open(path)?;
    read_csv_from(file)
}

/// Read CSV from any reader. Rows may have different field counts.
pub fn read_csv_from<R: Read>(reader: R) -> Result<Vec<(CellRef, Cell)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut cells = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for (col, field) in record.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            cells.push((CellRef::new(col, row), Cell::new(field)));
        }
    }
    Ok(cells)
}

/// Write every row `0..rows` and column `0..cols` of the grid to a file.
pub fn write_csv(path: &Path, grid: &Grid, rows: usize, cols: usize) -> Result<()> {
    let file = File::create(path)?;
    write_csv_to(file, grid, rows, cols)
}

/// Write the `rows x cols` rectangle of the grid as CSV, missing cells as
/// empty fields.
pub fn write_csv_to<W: Write>(out: W, grid: &Grid, rows: usize, cols: usize) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    for row in 0..rows {
        let record: Vec<String> = (0..cols)
            .map(|col| {
                grid.get(&CellRef::new(col, row))
                    .map(|cell| cell.text.clone())
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
