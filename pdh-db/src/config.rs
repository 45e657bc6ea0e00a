//! Loader settings: sheet names and row filters.

use pdh_types::flow::ACCEPTED_INDICATOR;
use pdh_types::product::EXCLUDED_SOURCE;
use serde::{Deserialize, Serialize};

/// Names of the three sheets in the source workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub products: String,
    pub flows: String,
    pub composition: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            products: "Lookup".to_string(),
            flows: "Flows".to_string(),
            composition: "Composition".to_string(),
        }
    }
}

/// How the dataset is read and filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub sheets: SheetNames,
    /// Product rows with this `Source` are dropped.
    pub excluded_source: String,
    /// Only flow rows with exactly this `Indicator` are kept.
    pub accepted_indicator: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sheets: SheetNames::default(),
            excluded_source: EXCLUDED_SOURCE.to_string(),
            accepted_indicator: ACCEPTED_INDICATOR.to_string(),
        }
    }
}
