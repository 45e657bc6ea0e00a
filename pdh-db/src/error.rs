use pdh_types::InvalidWindow;
use thiserror::Error;

/// Failure to read or load the source dataset. Fatal to startup.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The source does not provide the sheet
    #[error("sheet '{sheet}' not found in {location}")]
    SheetNotFound { sheet: String, location: String },

    /// The sheet exists but could not be read
    #[error("failed to read sheet '{sheet}' from {location}: {cause}")]
    Unreadable {
        sheet: String,
        location: String,
        #[source]
        cause: std::io::Error,
    },

    /// Malformed CSV
    #[error("failed to parse CSV in sheet '{sheet}': {cause}")]
    Csv {
        sheet: String,
        #[source]
        cause: csv::Error,
    },

    /// A column the schema requires is absent
    #[error("sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    /// A required cell does not hold a number
    #[error("sheet '{sheet}', line {line}, column '{column}': invalid value {value:?}")]
    InvalidValue {
        sheet: String,
        line: u64,
        column: String,
        value: String,
    },

    /// Writing to the in-memory tables failed
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Failure of a single lookup. Recoverable: the loaded tables are untouched.
#[derive(Error, Debug)]
pub enum DatahubError {
    /// No row for the product key in the named table
    #[error("product '{key}' not found in {table} table")]
    ProductNotFound { key: String, table: &'static str },

    /// Window bounds out of order
    #[error(transparent)]
    InvalidWindow(#[from] InvalidWindow),

    /// The query itself failed
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

impl DatahubError {
    pub(crate) fn not_found(key: &str, table: &'static str) -> Self {
        DatahubError::ProductNotFound {
            key: key.to_string(),
            table,
        }
    }
}

/// Type alias for lookup results.
pub type Result<T> = std::result::Result<T, DatahubError>;
