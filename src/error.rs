//! Typed failures for the domain layers. The UI wraps these in `anyhow` and
//! only ever shows the innermost message, so the `Display` strings below are
//! exactly what the user reads in the footer.

use thiserror::Error;

/// Input rejected before anything touches storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Owner_Name and Category are required.")]
    MissingOwnerOrCategory,
    #[error("Phone number must be exactly 10 digits.")]
    InvalidPhone,
    #[error("Please enter both Item Name and Category.")]
    MissingItemOrCategory,
    #[error("{field} must be a non-negative number.")]
    InvalidNumber { field: &'static str },
}

/// Failures raised by the SQLite table or the stock flat file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures while building or writing the spreadsheet export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
