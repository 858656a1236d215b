//! Native `.grider` document format.
//!
//! A pretty-printed JSON object:
//!
//! ```text
//! {
//!   "grid": { "0,1": { "Text": "=A1*2" } },
//!   "col_widths": [16, 16],
//!   "row_heights": [1, 1]
//! }
//! ```
//!
//! Grid keys are `"row,col"` with zero-based indices.

use crate::error::{GriderError, Result};
use grider_engine::engine::{Cell, CellRef, Grid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

/// The serialized shape of a document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(default)]
    pub grid: BTreeMap<String, Cell>,
    #[serde(default)]
    pub col_widths: Vec<usize>,
    #[serde(default)]
    pub row_heights: Vec<usize>,
}

impl StoredDocument {
    /// Snapshot a grid and its layout. Empty cells are not stored.
    pub fn capture(grid: &Grid, col_widths: &[usize], row_heights: &[usize]) -> Self {
        let grid = grid
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| (cell_to_key(entry.key()), entry.value().clone()))
            .collect();
        StoredDocument {
            grid,
            col_widths: col_widths.to_vec(),
            row_heights: row_heights.to_vec(),
        }
    }

    /// Decode the grid keys. Fails on the first malformed key.
    pub fn cells(&self) -> Result<Vec<(CellRef, Cell)>> {
        self.grid
            .iter()
            .map(|(key, cell)| Ok((key_to_cell(key)?, cell.clone())))
            .collect()
    }
}

/// `"row,col"` key for a cell.
pub fn cell_to_key(cell: &CellRef) -> String {
    format!("{},{}", cell.row, cell.col)
}

/// Parse a `"row,col"` key.
pub fn key_to_cell(key: &str) -> Result<CellRef> {
    let invalid = || GriderError::InvalidKey(key.to_string());
    let (row, col) = key.split_once(',').ok_or_else(invalid)?;
    let row = row.trim().parse::<usize>().map_err(|_| invalid())?;
    let col = col.trim().parse::<usize>().map_err(|_| invalid())?;
    Ok(CellRef::new(col, row))
}

/// Read a `.grider` file.
pub fn read_document(path: &Path) -> Result<StoredDocument> {
    let file = fs::File::open(path)?;
    read_document_from(std::io::BufReader::new(file))
}

pub fn read_document_from<R: Read>(reader: R) -> Result<StoredDocument> {
    Ok(serde_json::from_reader(reader)?)
}

/// Write a `.grider` file.
pub fn write_document(path: &Path, doc: &StoredDocument) -> Result<()> {
    fs::write(path, write_document_content(doc)?)?;
    Ok(())
}

/// Render a document as indented JSON with a trailing newline.
pub fn write_document_content(doc: &StoredDocument) -> Result<String> {
    let mut content = serde_json::to_string_pretty(doc)?;
    content.push('\n');
    Ok(content)
}
