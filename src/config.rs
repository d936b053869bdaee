//! User configuration (`config.toml`).
//!
//! Everything here is optional and overridden by command-line flags. A
//! config file that cannot be read or parsed is reported as a warning and
//! ignored.

use crate::output::OutputFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use sheetrow_core::SheetBounds;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Rows and columns a CSV sheet offers at minimum, like a fresh remote sheet.
pub(crate) const DEFAULT_MIN_ROWS: usize = 1000;
pub(crate) const DEFAULT_MIN_COLS: usize = 26;

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    pub workbook: Option<PathBuf>,
    pub sheet: Option<String>,
    pub format: Option<OutputFormat>,
    pub min_rows: Option<usize>,
    pub min_cols: Option<usize>,
}

impl Config {
    pub fn sheet_floor(&self) -> SheetBounds {
        SheetBounds::new(
            self.min_rows.unwrap_or(DEFAULT_MIN_ROWS),
            self.min_cols.unwrap_or(DEFAULT_MIN_COLS),
        )
    }
}

pub(crate) fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("me", "shoryuken", "sheetrow")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Load `config_file`, or the user config when none is given.
///
/// Returns the config (default when nothing usable was found) and any
/// warnings worth showing. A missing user config is not a warning; a missing
/// explicit file is.
pub(crate) fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_config(&path) {
        Ok(config) => (config, warnings),
        Err(warning) => {
            warnings.push(warning);
            (Config::default(), warnings)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    toml::from_str::<Config>(&content)
        .map_err(|err| format!("Failed to parse {}: {}", path.display(), err))
}
