//! In-memory SQLite layer for the product dataset.
//!
//! The three source sheets (products, flows, composition) are read once from
//! a [`DataSource`], filtered, and loaded into an in-memory SQLite database.
//! After [`Database::load`] returns, the tables are only ever read: every
//! public method on [`Database`] is a query.
//!
//! # Usage
//!
//! ```rust
//! use pdh_db::{Database, MemorySource};
//! use pdh_types::YearWindow;
//!
//! let source = MemorySource::new()
//!     .with_sheet("Lookup", "product_category_2,EoL_lower_yr,EoL_upper_yr,EoL_average_yr,Mass_lower_kg,Mass_upper_kg,Mass_average_kg,Source,Source URL\nLaptop,4,8,6,1.2,3,2.1,Survey,https://example.org\n")
//!     .with_sheet("Flows", "Product,Variable,Indicator,2010,2011\nLaptop,Imports,Volume (Number of items),1250000,3750000\n")
//!     .with_sheet("Composition", "Product,Material,Percentage\nLaptop,Plastic,0.4\n");
//!
//! let db = Database::load(&source).unwrap();
//! assert!(db.query_available_products().unwrap().contains("Laptop"));
//!
//! let window = YearWindow::new(2010, 2050).unwrap();
//! let flow = db.query_windowed_flow("Laptop", "Imports", &window).unwrap();
//! assert_eq!(flow.total.millions(), Some(5.0));
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`]. The wide flow sheet is stored long, one
//! `flow_values` row per (flow row, year) with a value, so window filtering
//! is a range predicate on `year`.

pub mod config;
pub mod error;
pub mod schema;
pub mod source;
mod loader;
mod queries;

pub use config::{LoaderConfig, SheetNames};
pub use error::{DataLoadError, DatahubError};
pub use source::{DataSource, DirectorySource, MemorySource};

use rusqlite::Connection;
use std::rc::Rc;

/// The loaded product dataset.
///
/// Cheaply cloneable (via `Rc`); clones share the same read-only tables.
/// The handle is single-threaded: a host serving sessions from several
/// threads loads one instance per thread.
#[derive(Clone)]
pub struct Database {
    conn: Rc<Connection>,
}

impl Database {
    /// Load all three sheets from `source` with the default loader settings.
    pub fn load(source: &dyn DataSource) -> Result<Self, DataLoadError> {
        Self::load_with(source, &LoaderConfig::default())
    }

    /// Load all three sheets from `source`.
    ///
    /// Any failure (missing sheet, missing column, malformed required value)
    /// aborts the whole load: a partially loaded dataset is never returned.
    pub fn load_with(
        source: &dyn DataSource,
        config: &LoaderConfig,
    ) -> Result<Self, DataLoadError> {
        let db = Self::empty()?;

        let products_csv = source.read_sheet(&config.sheets.products)?;
        db.load_products(&products_csv, config)?;

        let flows_csv = source.read_sheet(&config.sheets.flows)?;
        db.load_flows(&flows_csv, config)?;

        let composition_csv = source.read_sheet(&config.sheets.composition)?;
        db.load_compositions(&composition_csv, config)?;

        log::info!("[PDH] loader: dataset loaded from {}", source.location());
        Ok(db)
    }

    /// A database with the schema applied and no rows.
    fn empty() -> Result<Self, DataLoadError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(conn),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::MemorySource;

    pub const PRODUCTS_CSV: &str = "\
product_category_2,PRODCOM,HS6/CN6,EoL_lower_yr,EoL_upper_yr,EoL_average_yr,Mass_lower_kg,Mass_upper_kg,Mass_average_kg,Source,Source URL
Laptop,26201100,847130,4,8,6,1.2,3,2.1,Survey,https://example.org/laptop
Television,26402000,852872,6,12,9.5,5,25,12,Survey,https://example.org/tv
Kettle,27511000,851671,3,7,5,0.8,1.5,1.1,Survey,https://example.org/kettle
Phone,26302200,851712,2,5,3.5,0.1,0.3,0.2,Open_repair,https://example.org/phone
";

    pub const FLOWS_CSV: &str = "\
Product,Variable,Indicator,2010,2015,2020,2025,2030,2035,2040,2045,2050
Laptop,Imports,Volume (Number of items),1250000,3750000,5000000,6200000,,7000000,8450000,9100000,9650000
Laptop,Imports,Value (GBP),1,2,3,4,5,6,7,8,9
Laptop,Domestic,Volume (Number of items),100000,200000,300000,,,,,,
Television,Imports,Volume (Number of items),2000000,2100000,2200000,2300000,2400000,2500000,2600000,2700000,2800000
Phone,Imports,Volume (Number of items),9000000,9000000,9000000,9000000,9000000,9000000,9000000,9000000,9000000
Tablet,Imports,Volume (Number of items),500000,600000,700000,800000,900000,1000000,1100000,1200000,1300000
";

    pub const COMPOSITION_CSV: &str = "\
Product,Material,Percentage
Laptop,Plastic,0.40
Laptop,Metal,0.35
Laptop,Glass,0.25
Television,Glass,0.5
Television,Plastic,0.3
Television,Metal,0.2
";

    pub fn sample_source() -> MemorySource {
        MemorySource::new()
            .with_sheet("Lookup", PRODUCTS_CSV)
            .with_sheet("Flows", FLOWS_CSV)
            .with_sheet("Composition", COMPOSITION_CSV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_source;

    #[test]
    fn database_loads_successfully() {
        let db = Database::load(&sample_source());
        assert!(db.is_ok(), "Sample dataset should load without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::load(&sample_source()).unwrap();
        let db2 = db.clone();
        assert_eq!(
            db.query_available_products().unwrap(),
            db2.query_available_products().unwrap(),
            "Clone should see same data via shared Rc"
        );
    }

    #[test]
    fn missing_sheet_aborts_load() {
        let source = MemorySource::new().with_sheet("Lookup", crate::test_support::PRODUCTS_CSV);
        let err = Database::load(&source).err().expect("load should fail");
        assert!(matches!(err, DataLoadError::SheetNotFound { ref sheet, .. } if sheet == "Flows"));
    }

    #[test]
    fn custom_sheet_names_are_honored() {
        let source = MemorySource::new()
            .with_sheet("products", crate::test_support::PRODUCTS_CSV)
            .with_sheet("flows", crate::test_support::FLOWS_CSV)
            .with_sheet("materials", crate::test_support::COMPOSITION_CSV);
        let config = LoaderConfig {
            sheets: SheetNames {
                products: "products".to_string(),
                flows: "flows".to_string(),
                composition: "materials".to_string(),
            },
            ..LoaderConfig::default()
        };
        let db = Database::load_with(&source, &config).unwrap();
        assert!(db.query_available_products().unwrap().contains("Laptop"));
    }
}
