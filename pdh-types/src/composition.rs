use serde::{Deserialize, Serialize};

/// One row of the composition sheet: a material's share of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRecord {
    pub product_key: String,
    pub material: String,
    /// Share as a proportion in `[0, 1]`. The sheet displays it with a
    /// percent format, so the stored cell is the raw fraction.
    pub fraction: f64,
}
