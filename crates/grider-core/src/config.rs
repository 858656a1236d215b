//! User configuration.
//!
//! Read from `config.toml` in the platform config directory (or an explicit
//! path). Every key is optional; missing keys take the built-in defaults.
//! Problems never abort startup: they come back as warnings and the
//! affected values fall back to defaults.
//!
//! ```toml
//! default_width = 16
//! default_height = 1
//! initial_columns = 8
//! initial_rows = 8
//! min_column_width = 4
//! documents_dir = "documents"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 64 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Width given to newly tracked columns.
    pub default_width: usize,
    /// Height given to newly tracked rows.
    pub default_height: usize,
    /// Columns tracked by a new document.
    pub initial_columns: usize,
    /// Rows tracked by a new document.
    pub initial_rows: usize,
    /// Smallest width `cw` accepts.
    pub min_column_width: usize,
    /// Smallest height `rh` accepts.
    pub min_row_height: usize,
    /// Where `w` and `o` resolve bare file names.
    pub documents_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_width: 16,
            default_height: 1,
            initial_columns: 8,
            initial_rows: 8,
            min_column_width: 4,
            min_row_height: 1,
            documents_dir: PathBuf::from("documents"),
        }
    }
}

impl Config {
    /// Parse TOML text into a config.
    pub fn from_toml(content: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(content)
    }

    /// Replace values that would break the document's invariants, one
    /// warning per replaced value.
    fn sanitize(mut self) -> (Config, Vec<String>) {
        let defaults = Config::default();
        let mut warnings = Vec::new();
        if self.min_row_height == 0 {
            warnings.push("min_row_height must be at least 1; using 1".to_string());
            self.min_row_height = defaults.min_row_height;
        }
        if self.min_column_width == 0 {
            warnings.push("min_column_width must be at least 1; using 4".to_string());
            self.min_column_width = defaults.min_column_width;
        }
        if self.default_width < self.min_column_width {
            warnings.push(format!(
                "default_width {} is below min_column_width {}; using {}",
                self.default_width, self.min_column_width, self.min_column_width
            ));
            self.default_width = self.min_column_width;
        }
        if self.default_height < self.min_row_height {
            warnings.push(format!(
                "default_height {} is below min_row_height {}; using {}",
                self.default_height, self.min_row_height, self.min_row_height
            ));
            self.default_height = self.min_row_height;
        }
        (self, warnings)
    }
}

/// Load the configuration.
///
/// With `explicit` set, that file must exist; otherwise the user config file
/// is used if present. Returns the config and any warnings to show.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = explicit.map(Path::to_path_buf).or_else(user_config_path);

    let Some(path) = config_path else {
        return (Config::default(), warnings);
    };
    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match Config::from_toml(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    let (config, sanitize_warnings) = config.unwrap_or_default().sanitize();
    warnings.extend(sanitize_warnings);
    (config, warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "grider")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
