//! Derived output models.
//!
//! All structs derive `Serialize` so a rendering layer can receive them as
//! JSON without knowing anything about how they were computed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single (year, value) bar of a flow chart.
///
/// In a windowed flow series `value` is in millions of items, rounded to
/// one decimal place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// One block of the composition treemap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialShare {
    pub material: String,
    /// Share of the product on the 0-100 scale.
    pub percentage: f64,
}

/// End-of-life estimates for a product, in years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Lifespan {
    pub lower: f64,
    pub upper: f64,
    pub average: f64,
}

impl Lifespan {
    /// True if `lower <= average <= upper`. Source rows are not required to
    /// satisfy this.
    pub fn is_ordered(&self) -> bool {
        self.lower <= self.average && self.average <= self.upper
    }
}

/// Cumulative flow over a window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CumulativeTotal {
    /// The window does not overlap any year with data.
    NoData,
    /// Sum over the window in millions of items (one decimal), reported as
    /// of the latest year that contributed.
    Total { millions: f64, as_of: i32 },
}

impl CumulativeTotal {
    pub fn is_no_data(&self) -> bool {
        matches!(self, CumulativeTotal::NoData)
    }

    pub fn as_of(&self) -> Option<i32> {
        match self {
            CumulativeTotal::NoData => None,
            CumulativeTotal::Total { as_of, .. } => Some(*as_of),
        }
    }

    pub fn millions(&self) -> Option<f64> {
        match self {
            CumulativeTotal::NoData => None,
            CumulativeTotal::Total { millions, .. } => Some(*millions),
        }
    }
}

impl fmt::Display for CumulativeTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CumulativeTotal::NoData => write!(f, "No data"),
            CumulativeTotal::Total { millions, as_of } => {
                write!(f, "{:.1}M as of {}", millions, as_of)
            }
        }
    }
}

/// A flow series restricted to a window, plus its cumulative total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowedFlow {
    pub series: Vec<YearValue>,
    pub total: CumulativeTotal,
}

impl WindowedFlow {
    /// The result for a window that overlaps no data.
    pub fn empty() -> Self {
        Self {
            series: Vec::new(),
            total: CumulativeTotal::NoData,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
