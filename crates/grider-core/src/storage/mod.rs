//! On-disk formats.
//!
//! - [`csv`] - raw cell text as a dense rectangle, no header row
//! - [`grider`] - the native JSON document with layout information

pub mod csv;
pub mod grider;

pub use self::csv::{read_csv, read_csv_from, write_csv, write_csv_to};
pub use self::grider::{
    StoredDocument, cell_to_key, key_to_cell, read_document, read_document_from, write_document,
    write_document_content,
};
