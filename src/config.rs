//! Shared constants and the resolved on-disk layout. The category and property
//! type lists live here so the add form, the filters, and the tests all agree
//! on the same closed sets.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".lead-tracker";
/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "LEAD_TRACKER_DATA_DIR";
/// SQLite file holding the lead table.
pub const DB_FILE_NAME: &str = "leads.sqlite";
/// Flat file backing the stock variant.
pub const STOCK_FILE_NAME: &str = "inventory_data.csv";
/// Fixed name of the generated spreadsheet.
pub const EXPORT_FILE_NAME: &str = "inventory_data.xlsx";
/// MIME type advertised for the spreadsheet export.
pub const EXPORT_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// Sub-directory for the rolling log files.
pub const LOG_DIR_NAME: &str = "logs";

/// Closed list of lead categories offered by the add form.
pub const CATEGORIES: [&str; 6] = [
    "Residential Land/Plot",
    "Kothi/Villa",
    "Builder floor",
    "Appartement/Flats",
    "Old/New Floors",
    "1RK/Studio Apartements",
];

/// Number of rows shown on the home screen.
pub const RECENT_LIMIT: usize = 10;
/// Exact length of a valid phone number.
pub const PHONE_LEN: usize = 10;
/// Longest sheet name the xlsx format accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;
/// Name of the sheet carrying every lead.
pub const FULL_DATA_SHEET: &str = "Full_Data";

/// Resolved file locations for one run of the application.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
}

impl Settings {
    /// Pick the data directory: explicit override first, then the home
    /// directory default.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self { data_dir })
    }

    /// Build settings rooted at an arbitrary directory.
    pub fn at(dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn stock_path(&self) -> PathBuf {
        self.data_dir.join(STOCK_FILE_NAME)
    }

    pub fn export_path(&self) -> PathBuf {
        self.data_dir.join(EXPORT_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

/// Resolve `~/.lead-tracker`.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
