//! Where the dataset comes from.
//!
//! The dataset is a workbook with three sheets. Parsing the workbook format
//! itself is left to export tooling: a [`DataSource`] hands back each named
//! sheet as CSV text.

use crate::DataLoadError;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A provider of named sheets as CSV text.
pub trait DataSource {
    /// Human-readable location for diagnostics.
    fn location(&self) -> String;

    /// Read the sheet called `sheet`.
    fn read_sheet(&self, sheet: &str) -> Result<String, DataLoadError>;
}

/// Sheets exported to a directory as `<Sheet>.csv` or `<Sheet>.csv.gz`.
///
/// The plain file wins when both exist.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn unreadable(&self, sheet: &str, cause: std::io::Error) -> DataLoadError {
        DataLoadError::Unreadable {
            sheet: sheet.to_string(),
            location: self.location(),
            cause,
        }
    }
}

impl DataSource for DirectorySource {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn read_sheet(&self, sheet: &str) -> Result<String, DataLoadError> {
        let plain = self.root.join(format!("{}.csv", sheet));
        if plain.is_file() {
            log::debug!("[PDH] source: reading {}", plain.display());
            return std::fs::read_to_string(&plain).map_err(|e| self.unreadable(sheet, e));
        }

        let gzipped = self.root.join(format!("{}.csv.gz", sheet));
        if gzipped.is_file() {
            log::debug!("[PDH] source: decompressing {}", gzipped.display());
            let file = File::open(&gzipped).map_err(|e| self.unreadable(sheet, e))?;
            let mut text = String::new();
            GzDecoder::new(file)
                .read_to_string(&mut text)
                .map_err(|e| self.unreadable(sheet, e))?;
            return Ok(text);
        }

        Err(DataLoadError::SheetNotFound {
            sheet: sheet.to_string(),
            location: self.location(),
        })
    }
}

/// Sheets held in memory, e.g. embedded with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: &str, csv: &str) -> Self {
        self.sheets.insert(name.to_string(), csv.to_string());
        self
    }
}

impl DataSource for MemorySource {
    fn location(&self) -> String {
        "in-memory source".to_string()
    }

    fn read_sheet(&self, sheet: &str) -> Result<String, DataLoadError> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| DataLoadError::SheetNotFound {
                sheet: sheet.to_string(),
                location: self.location(),
            })
    }
}
