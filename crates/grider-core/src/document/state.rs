use crate::config::Config;
use crate::error::Result;
use grider_engine::engine::Grid;
use std::path::PathBuf;

/// UI-agnostic document state for the spreadsheet.
///
/// The grid is sparse; `col_widths` and `row_heights` are the tracked
/// extents. Every stored cell lies inside them, and any reference outside
/// them evaluates to `#REF`.
pub struct Document {
    /// Raw cell text keyed by coordinate.
    pub grid: Grid,
    /// Display width of each tracked column.
    pub col_widths: Vec<usize>,
    /// Display height of each tracked row.
    pub row_heights: Vec<usize>,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the grid has been modified since the last save or load
    pub modified: bool,
    pub config: Config,
}

impl Document {
    /// Create an empty document with the default configuration.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Document {
            grid: Grid::new(),
            col_widths: vec![config.default_width; config.initial_columns],
            row_heights: vec![config.default_height; config.initial_rows],
            file_path: None,
            modified: false,
            config,
        }
    }

    /// Create a document and load `path` into it when the file exists.
    /// A missing file just becomes the save target.
    pub fn with_file(path: Option<PathBuf>, config: Config) -> Result<Self> {
        let mut doc = Self::with_config(config);
        if let Some(path) = path {
            if path.exists() {
                doc.load_path(&path)?;
            } else {
                doc.file_path = Some(path);
            }
        }
        Ok(doc)
    }

    /// Tracked `(rows, columns)`.
    pub fn extents(&self) -> (usize, usize) {
        (self.row_heights.len(), self.col_widths.len())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
