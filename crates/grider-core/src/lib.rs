//! grider-core - UI-agnostic document model, editor commands and storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, load_config};
pub use document::{CommandOutcome, Document, FileFormat};
pub use error::{GriderError, Result};

pub use grider_engine::engine::CellRef;
