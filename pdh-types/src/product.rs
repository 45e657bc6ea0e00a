use crate::models::Lifespan;
use serde::{Deserialize, Serialize};

/// Provenance tag whose rows are dropped from the product sheet at load time.
pub const EXCLUDED_SOURCE: &str = "Open_repair";

/// One row of the product (`Lookup`) sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product category name, e.g. "Laptop". Joins against flow and
    /// composition rows.
    pub category_key: String,
    /// PRODCOM classification code, when the sheet carries one.
    pub prodcom: Option<String>,
    /// HS6/CN6 trade code, when the sheet carries one.
    pub hs6_cn6: Option<String>,
    /// End-of-life estimates in years.
    pub eol_lower: f64,
    pub eol_upper: f64,
    pub eol_average: f64,
    /// Mass estimates in kg. Blank cells load as `None`.
    pub mass_lower: Option<f64>,
    pub mass_upper: Option<f64>,
    pub mass_average: Option<f64>,
    pub source: String,
    pub source_url: String,
}

impl ProductRecord {
    pub fn lifespan(&self) -> Lifespan {
        Lifespan {
            lower: self.eol_lower,
            upper: self.eol_upper,
            average: self.eol_average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop() -> ProductRecord {
        ProductRecord {
            category_key: "Laptop".to_string(),
            prodcom: Some("26201100".to_string()),
            hs6_cn6: Some("847130".to_string()),
            eol_lower: 4.0,
            eol_upper: 8.0,
            eol_average: 6.0,
            mass_lower: Some(1.2),
            mass_upper: Some(3.0),
            mass_average: Some(2.1),
            source: "Survey".to_string(),
            source_url: "https://example.org/laptops".to_string(),
        }
    }

    #[test]
    fn lifespan_projects_eol_fields() {
        let l = laptop().lifespan();
        assert_eq!(l.lower, 4.0);
        assert_eq!(l.upper, 8.0);
        assert_eq!(l.average, 6.0);
        assert!(l.is_ordered());
    }
}
