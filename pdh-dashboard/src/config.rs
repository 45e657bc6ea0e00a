//! Dashboard settings, loaded from JSON.
//!
//! Every field has a default, so an empty object (or no file at all) gives
//! the stock dashboard: sheets `Lookup`/`Flows`/`Composition` under `fixtures/`,
//! `Laptop` preselected, the `Imports` flow wired to the chart, and a
//! 2010..=2050 selector in 5-year steps.

use pdh_db::{DirectorySource, LoaderConfig};
use pdh_types::flow::IMPORTS;
use pdh_types::WindowBounds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory searched for the sheet files when none is configured.
pub const DEFAULT_DATA_DIR: &str = "fixtures";
/// Product preselected on startup when it is in the catalog.
pub const DEFAULT_PRODUCT: &str = "Laptop";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {cause}")]
    Io {
        path: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding `<sheet>.csv` or `<sheet>.csv.gz` files.
    pub data_dir: PathBuf,
    pub loader: LoaderConfig,
    pub default_product: String,
    /// Flow variable feeding the bar chart and the cumulative total.
    pub flow_variable: String,
    pub window: WindowBounds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            loader: LoaderConfig::default(),
            default_product: DEFAULT_PRODUCT.to_string(),
            flow_variable: IMPORTS.to_string(),
            window: WindowBounds::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|cause| ConfigError::Io {
            path: path.display().to_string(),
            cause,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("[PDH] config: loaded {}", path.display());
        Ok(config)
    }

    /// Directory source rooted at [`DashboardConfig::data_dir`].
    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(&self.data_dir)
    }
}
