//! Dashboard layer for the product datahub.
//!
//! This crate provides:
//! - `config`: `DashboardConfig`, loaded from JSON with defaults for every field
//! - `selection`: the current product and window, as reported by the controls
//! - `controller`: `Controller::refresh`, recomputing every output per interaction
//! - `charts`: bar chart and treemap configuration JSON
//!
//! [`Dashboard`] ties them together: it owns the loaded [`Database`] and
//! hands out controllers borrowing it.

pub mod charts;
pub mod config;
pub mod controller;
pub mod selection;

pub use config::{ConfigError, DashboardConfig};
pub use controller::{Controller, ControllerOutput};
pub use selection::Selection;

use pdh_db::{DataLoadError, DataSource, Database, DatahubError};

pub struct Dashboard {
    db: Database,
    config: DashboardConfig,
}

impl Dashboard {
    /// Load the sheets from `config.data_dir`.
    pub fn open(config: DashboardConfig) -> Result<Self, DataLoadError> {
        let source = config.source();
        Self::from_source(&source, config)
    }

    pub fn from_source(
        source: &dyn DataSource,
        config: DashboardConfig,
    ) -> Result<Self, DataLoadError> {
        let db = Database::load_with(source, &config.loader)?;
        Ok(Self { db, config })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn controller(&self) -> Result<Controller<'_>, DatahubError> {
        Controller::new(&self.db, &self.config)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use pdh_db::{Database, MemorySource};

    pub const LOOKUP_CSV: &str = include_str!("../../fixtures/Lookup.csv");
    pub const FLOWS_CSV: &str = include_str!("../../fixtures/Flows.csv");
    pub const COMPOSITION_CSV: &str = include_str!("../../fixtures/Composition.csv");

    pub fn fixture_source() -> MemorySource {
        MemorySource::new()
            .with_sheet("Lookup", LOOKUP_CSV)
            .with_sheet("Flows", FLOWS_CSV)
            .with_sheet("Composition", COMPOSITION_CSV)
    }

    pub fn fixture_database() -> Database {
        Database::load(&fixture_source()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_source, COMPOSITION_CSV, FLOWS_CSV, LOOKUP_CSV};
    use std::path::PathBuf;

    #[test]
    fn from_source_builds_working_controller() {
        let dashboard =
            Dashboard::from_source(&fixture_source(), DashboardConfig::default()).unwrap();
        let controller = dashboard.controller().unwrap();
        let selection = Selection::initial(controller.catalog(), dashboard.config()).unwrap();
        assert_eq!(selection, Selection::new("Laptop", [2010, 2050]));

        let out = controller.refresh_selection(&selection);
        assert_eq!(out.cumulative.millions(), Some(150.0));
    }

    #[test]
    fn open_reads_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Lookup.csv"), LOOKUP_CSV).unwrap();
        std::fs::write(dir.path().join("Flows.csv"), FLOWS_CSV).unwrap();
        std::fs::write(dir.path().join("Composition.csv"), COMPOSITION_CSV).unwrap();

        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let dashboard = Dashboard::open(config).unwrap();
        assert_eq!(dashboard.database().query_available_products().unwrap().len(), 4);
    }

    #[test]
    fn open_missing_dir_fails_with_sheet_not_found() {
        let config = DashboardConfig {
            data_dir: PathBuf::from("/nonexistent/pdh-data"),
            ..Default::default()
        };
        let err = Dashboard::open(config).err().expect("open should fail");
        assert!(matches!(err, DataLoadError::SheetNotFound { ref sheet, .. } if sheet == "Lookup"));
    }
}
