//! Editor command line (`:w budget`, `:cw 10`, ...), without the leading colon.

use super::{Document, FileFormat};
use crate::error::{GriderError, Result};
use std::path::PathBuf;

/// What the caller should do after a command ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
    Saved(PathBuf),
    Loaded(PathBuf),
}

impl Document {
    /// Run one editor command.
    ///
    /// - `q`, `quit`
    /// - `cw N` / `rh N`: set every column width / row height
    /// - `w NAME [csv]`: save into the documents directory
    /// - `o NAME [csv]`: open from the documents directory
    pub fn execute_command(&mut self, line: &str) -> Result<CommandOutcome> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            return Ok(CommandOutcome::Continue);
        };

        match command {
            "q" | "quit" => Ok(CommandOutcome::Quit),
            "cw" => {
                let width = parse_size(command, args)?;
                self.set_all_column_widths(width)?;
                Ok(CommandOutcome::Continue)
            }
            "rh" => {
                let height = parse_size(command, args)?;
                self.set_all_row_heights(height)?;
                Ok(CommandOutcome::Continue)
            }
            "w" => {
                let (name, format) = parse_target(command, args)?;
                let path = self.document_path(name, format);
                self.save_as(&path, format)?;
                Ok(CommandOutcome::Saved(path))
            }
            "o" => {
                let (name, format) = parse_target(command, args)?;
                let path = self.document_path(name, format);
                self.load_as(&path, format)?;
                Ok(CommandOutcome::Loaded(path))
            }
            _ => Err(GriderError::UnknownCommand(command.to_string())),
        }
    }
}

fn invalid(command: &str, message: impl Into<String>) -> GriderError {
    GriderError::InvalidArgument {
        command: command.to_string(),
        message: message.into(),
    }
}

fn parse_size(command: &str, args: &[&str]) -> Result<usize> {
    match args {
        [value] => value
            .parse::<usize>()
            .map_err(|_| invalid(command, format!("expected a number, got {value:?}"))),
        [] => Err(invalid(command, "missing size")),
        _ => Err(invalid(command, "too many arguments")),
    }
}

/// `NAME` or `NAME csv`. A name ending in `.csv` also selects CSV.
fn parse_target<'a>(command: &str, args: &[&'a str]) -> Result<(&'a str, FileFormat)> {
    match args {
        [name] if name.to_ascii_lowercase().ends_with(".csv") => Ok((*name, FileFormat::Csv)),
        [name] => Ok((*name, FileFormat::Grider)),
        [name, flag] if flag.eq_ignore_ascii_case("csv") => Ok((*name, FileFormat::Csv)),
        [_, flag] => Err(invalid(command, format!("unknown format {flag:?}"))),
        [] => Err(invalid(command, "missing file name")),
        _ => Err(invalid(command, "too many arguments")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::TempDir;
    use grider_engine::engine::CellRef;

    fn doc_in(dir: &TempDir) -> Document {
        Document::with_config(Config {
            documents_dir: dir.path().to_path_buf(),
            ..Config::default()
        })
    }

    #[test]
    fn test_quit_and_blank() {
        let mut doc = Document::new();
        assert_eq!(doc.execute_command("q").unwrap(), CommandOutcome::Quit);
        assert_eq!(doc.execute_command(" quit ").unwrap(), CommandOutcome::Quit);
        assert_eq!(doc.execute_command("   ").unwrap(), CommandOutcome::Continue);
    }

    #[test]
    fn test_unknown_command() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.execute_command("wq"),
            Err(GriderError::UnknownCommand(c)) if c == "wq"
        ));
    }

    #[test]
    fn test_resize_commands() {
        let mut doc = Document::new();
        doc.execute_command("cw 12").unwrap();
        assert!(doc.col_widths.iter().all(|&w| w == 12));
        doc.execute_command("rh 3").unwrap();
        assert!(doc.row_heights.iter().all(|&h| h == 3));

        for bad in ["cw 3", "cw", "cw x", "cw 5 6", "rh 0", "rh -1"] {
            assert!(
                matches!(doc.execute_command(bad), Err(GriderError::InvalidArgument { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(doc.col_widths.iter().all(|&w| w == 12));
    }

    #[test]
    fn test_write_and_open() {
        let dir = TempDir::new("commands");
        let mut doc = doc_in(&dir);
        doc.set_cell(CellRef::new(0, 0), "=6*7");

        let saved = doc.execute_command("w answer").unwrap();
        assert_eq!(saved, CommandOutcome::Saved(dir.path().join("answer.grider")));
        let saved = doc.execute_command("w answer csv").unwrap();
        assert_eq!(saved, CommandOutcome::Saved(dir.path().join("answer.csv")));
        assert_eq!(doc.file_path, Some(dir.path().join("answer.csv")));

        let mut other = doc_in(&dir);
        let loaded = other.execute_command("o answer.csv").unwrap();
        assert_eq!(loaded, CommandOutcome::Loaded(dir.path().join("answer.csv")));
        assert_eq!(other.display_text(&CellRef::new(0, 0)), "42");

        let mut other = doc_in(&dir);
        other.execute_command("o answer").unwrap();
        assert_eq!(other.display_text(&CellRef::new(0, 0)), "42");
    }

    #[test]
    fn test_target_errors() {
        let dir = TempDir::new("command_errors");
        let mut doc = doc_in(&dir);
        assert!(matches!(
            doc.execute_command("w"),
            Err(GriderError::InvalidArgument { .. })
        ));
        assert!(matches!(
            doc.execute_command("w name xlsx"),
            Err(GriderError::InvalidArgument { .. })
        ));
        assert!(matches!(doc.execute_command("o missing"), Err(GriderError::Io(_))));
    }
}
