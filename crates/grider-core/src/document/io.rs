use super::Document;
use crate::error::{GriderError, Result};
use crate::storage::{StoredDocument, read_csv, read_document, write_csv, write_document};
use std::path::{Path, PathBuf};

/// On-disk format of a document file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Grider,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Grider => "grider",
        }
    }

    /// `.csv` files are CSV; everything else is a `.grider` document.
    pub fn from_path(path: &Path) -> FileFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => FileFormat::Csv,
            _ => FileFormat::Grider,
        }
    }
}

impl Document {
    /// Path for a bare document name inside the configured documents
    /// directory, with the format's extension appended when missing.
    pub fn document_path(&self, name: &str, format: FileFormat) -> PathBuf {
        let ext = format!(".{}", format.extension());
        let file_name = if name.to_ascii_lowercase().ends_with(&ext) {
            name.to_string()
        } else {
            format!("{name}{ext}")
        };
        self.config.documents_dir.join(file_name)
    }

    /// Save to the current file path.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let path = self.file_path.clone().ok_or(GriderError::NoFilePath)?;
        let format = FileFormat::from_path(&path);
        self.save_as(&path, format)?;
        Ok(path)
    }

    /// Save to `path`, creating parent directories as needed. The path
    /// becomes the current file path.
    pub fn save_as(&mut self, path: &Path, format: FileFormat) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        match format {
            FileFormat::Csv => {
                let (rows, cols) = self.used_extent();
                write_csv(path, &self.grid, rows, cols)?;
            }
            FileFormat::Grider => {
                let stored = StoredDocument::capture(&self.grid, &self.col_widths, &self.row_heights);
                write_document(path, &stored)?;
            }
        }
        log::info!("saved {}", path.display());
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Load `path`, choosing the format from its extension.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        self.load_as(path, FileFormat::from_path(path))
    }

    /// Replace the grid with the contents of `path`.
    ///
    /// CSV keeps the current column and row sizes, growing them to cover
    /// the file. A `.grider` document brings its own sizes, and is still
    /// grown if it stores cells outside them. Nothing changes on error.
    pub fn load_as(&mut self, path: &Path, format: FileFormat) -> Result<()> {
        match format {
            FileFormat::Csv => {
                let cells = read_csv(path)?;
                self.replace_cells(cells);
            }
            FileFormat::Grider => {
                let stored = read_document(path)?;
                let cells = stored.cells()?;
                self.col_widths = stored.col_widths;
                self.row_heights = stored.row_heights;
                self.replace_cells(cells);
            }
        }
        log::info!("loaded {} ({} cells)", path.display(), self.grid.len());
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::{TempDir, TempFile};
    use grider_engine::engine::CellRef;

    fn cell(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a/b.CSV")), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("b.grider")), FileFormat::Grider);
        assert_eq!(FileFormat::from_path(Path::new("b")), FileFormat::Grider);
    }

    #[test]
    fn test_document_path() {
        let doc = Document::new();
        assert_eq!(
            doc.document_path("budget", FileFormat::Grider),
            PathBuf::from("documents/budget.grider")
        );
        assert_eq!(
            doc.document_path("budget.csv", FileFormat::Csv),
            PathBuf::from("documents/budget.csv")
        );
        assert_eq!(
            doc.document_path("budget.grider", FileFormat::Csv),
            PathBuf::from("documents/budget.grider.csv")
        );
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut doc = Document::new();
        assert!(matches!(doc.save_file(), Err(GriderError::NoFilePath)));
    }

    #[test]
    fn test_grider_round_trip_keeps_layout() {
        let file = TempFile::new("round_trip", "grider");
        let mut doc = Document::new();
        doc.set_cell(cell("A1"), "2");
        doc.set_cell(cell("B1"), "=A1*21");
        doc.set_all_column_widths(10).unwrap();
        doc.save_as(file.path(), FileFormat::Grider).unwrap();
        assert!(!doc.modified);

        let mut loaded = Document::new();
        loaded.load_path(file.path()).unwrap();
        assert_eq!(loaded.col_widths, vec![10; 8]);
        assert_eq!(loaded.row_heights, vec![1; 8]);
        assert_eq!(loaded.display_text(&cell("B1")), "42");
        assert_eq!(loaded.file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_grider_load_grows_extents_for_stray_cells() {
        let file = TempFile::new("stray", "grider");
        file.write(r#"{"grid":{"4,2":{"Text":"7"}},"col_widths":[5],"row_heights":[1]}"#);
        let mut doc = Document::new();
        doc.load_path(file.path()).unwrap();
        assert_eq!(doc.col_widths, vec![5, 16, 16]);
        assert_eq!(doc.extents(), (5, 3));
        assert_eq!(doc.display_text(&cell("C5")), "7");
    }

    #[test]
    fn test_failed_load_leaves_document_untouched() {
        let file = TempFile::new("bad_key", "grider");
        file.write(r#"{"grid":{"x":{"Text":"7"}}}"#);
        let mut doc = Document::new();
        doc.set_cell(cell("A1"), "1");
        assert!(doc.load_path(file.path()).is_err());
        assert_eq!(doc.cell_text(&cell("A1")).as_deref(), Some("1"));
        assert_eq!(doc.extents(), (8, 8));
    }

    #[test]
    fn test_csv_save_and_load() {
        let dir = TempDir::new("csv_docs");
        let config = Config {
            documents_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let mut doc = Document::with_config(config.clone());
        doc.set_cell(cell("B2"), "=SUM(A1:A3)");
        doc.set_cell(cell("A1"), "5");
        let path = doc.document_path("sheet", FileFormat::Csv);
        doc.save_as(&path, FileFormat::Csv).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "5,\n,=SUM(A1:A3)\n");

        let mut loaded = Document::with_config(config);
        loaded.set_cell(cell("H8"), "gone");
        loaded.load_path(&path).unwrap();
        assert!(loaded.cell_text(&cell("H8")).is_none());
        assert_eq!(loaded.display_text(&cell("B2")), "5");
    }

    #[test]
    fn test_csv_load_grows_extents() {
        let file = TempFile::new("wide", "csv");
        file.write(&format!("{}x\n", ",".repeat(11)));
        let mut doc = Document::new();
        doc.load_path(file.path()).unwrap();
        assert_eq!(doc.extents(), (8, 12));
        assert_eq!(doc.cell_text(&cell("L1")).as_deref(), Some("x"));
    }
}
