use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only `Indicator` value retained from the flow sheet.
pub const ACCEPTED_INDICATOR: &str = "Volume (Number of items)";

/// Flow variable for imported goods, the one wired to the dashboard.
pub const IMPORTS: &str = "Imports";

/// One row of the flow sheet: a (product, variable) pair and its yearly counts.
///
/// The sheet is wide, one column per year. Only years with a numeric
/// value end up in `values`, so the mapping is sparse and need not be
/// contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub product_key: String,
    pub variable: String,
    pub indicator: String,
    /// Year -> number of items.
    pub values: BTreeMap<i32, f64>,
}

impl FlowRecord {
    pub fn new(product_key: &str, variable: &str, indicator: &str) -> Self {
        Self {
            product_key: product_key.to_string(),
            variable: variable.to_string(),
            indicator: indicator.to_string(),
            values: BTreeMap::new(),
        }
    }

    /// True if the indicator matches `accepted` exactly (case-sensitive).
    pub fn has_indicator(&self, accepted: &str) -> bool {
        self.indicator == accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_match_is_case_sensitive() {
        let row = FlowRecord::new("Laptop", IMPORTS, "Volume (Number of items)");
        assert!(row.has_indicator(ACCEPTED_INDICATOR));

        let row = FlowRecord::new("Laptop", IMPORTS, "volume (number of items)");
        assert!(!row.has_indicator(ACCEPTED_INDICATOR));
    }
}
