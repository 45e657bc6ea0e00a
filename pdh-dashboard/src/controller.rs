//! The single entry point run on every selection change.
//!
//! [`Controller::refresh`] recomputes every dashboard output from the
//! current product and window. It reads the shared [`Database`] and never
//! writes anything, so the same inputs always give the same output.

use crate::config::DashboardConfig;
use crate::selection::Selection;
use pdh_data::lifespan;
use pdh_db::{Database, DatahubError};
use pdh_types::{CumulativeTotal, MaterialShare, WindowedFlow, YearValue, YearWindow};
use serde::Serialize;
use std::collections::BTreeSet;

/// Prefix of the cumulative total line.
pub const CUMULATIVE_LABEL: &str = "Cumulated number of products";

/// Everything the rendering layer needs after one refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerOutput {
    pub product: String,
    pub window: [i32; 2],
    /// Flow variable behind `flow_series` and `cumulative`.
    pub flow_variable: String,
    pub eol_lower: String,
    pub eol_upper: String,
    pub eol_average: String,
    pub cumulative: CumulativeTotal,
    /// e.g. `Cumulated number of products: 50.4M as of 2050`
    pub cumulative_display: String,
    pub composition: Vec<MaterialShare>,
    /// Ascending by year, values in millions with one decimal.
    pub flow_series: Vec<YearValue>,
    /// Set when some section shows placeholder content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl ControllerOutput {
    /// Placeholder content for a selection that could not be resolved.
    fn placeholder(
        product: &str,
        window: [i32; 2],
        flow_variable: &str,
        diagnostic: String,
    ) -> Self {
        let [eol_lower, eol_upper, eol_average] = lifespan::placeholder_labels();
        Self {
            product: product.to_string(),
            window,
            flow_variable: flow_variable.to_string(),
            eol_lower,
            eol_upper,
            eol_average,
            cumulative: CumulativeTotal::NoData,
            cumulative_display: cumulative_display(&CumulativeTotal::NoData),
            composition: Vec::new(),
            flow_series: Vec::new(),
            diagnostic: Some(diagnostic),
        }
    }
}

pub fn cumulative_display(total: &CumulativeTotal) -> String {
    format!("{}: {}", CUMULATIVE_LABEL, total)
}

pub struct Controller<'db> {
    db: &'db Database,
    catalog: BTreeSet<String>,
    flow_variable: String,
}

impl<'db> Controller<'db> {
    /// Build a controller over `db`. The catalog is computed here, once.
    pub fn new(db: &'db Database, config: &DashboardConfig) -> Result<Self, DatahubError> {
        let catalog = db.query_available_products()?;
        log::info!(
            "[PDH] controller: {} selectable products, flow variable '{}'",
            catalog.len(),
            config.flow_variable
        );
        Ok(Self {
            db,
            catalog,
            flow_variable: config.flow_variable.clone(),
        })
    }

    /// Products offered by the selection control, sorted.
    pub fn catalog(&self) -> &BTreeSet<String> {
        &self.catalog
    }

    pub fn flow_variable(&self) -> &str {
        &self.flow_variable
    }

    /// Recompute all outputs. Never fails.
    ///
    /// An unknown product or a reversed window yields placeholder output
    /// with [`ControllerOutput::diagnostic`] set. A product without a row
    /// for the wired flow variable keeps its lifespan and composition and
    /// shows no flow data.
    pub fn refresh(&self, product: &str, window: [i32; 2]) -> ControllerOutput {
        match self.try_refresh(product, window) {
            Ok(output) => output,
            Err(err) => {
                log::warn!(
                    "[PDH] controller: refresh({}, {:?}) failed: {}",
                    product,
                    window,
                    err
                );
                ControllerOutput::placeholder(product, window, &self.flow_variable, err.to_string())
            }
        }
    }

    pub fn refresh_selection(&self, selection: &Selection) -> ControllerOutput {
        self.refresh(&selection.product, selection.window)
    }

    /// Like [`Controller::refresh`], but reports unresolvable selections
    /// as errors instead of placeholders.
    ///
    /// A missing flow row is still not an error: only the flow section is
    /// emptied and the diagnostic explains why.
    pub fn try_refresh(
        &self,
        product: &str,
        window: [i32; 2],
    ) -> Result<ControllerOutput, DatahubError> {
        let year_window = YearWindow::try_from(window)?;
        if !self.catalog.contains(product) {
            return Err(DatahubError::ProductNotFound {
                key: product.to_string(),
                table: "catalog",
            });
        }

        let [eol_lower, eol_upper, eol_average] =
            lifespan::labels(&self.db.query_lifespan(product)?);
        let composition = self.db.query_composition(product)?;

        let windowed = self
            .db
            .query_windowed_flow(product, &self.flow_variable, &year_window);
        let (flow, diagnostic) = match windowed {
            Ok(flow) => (flow, None),
            Err(err @ DatahubError::ProductNotFound { .. }) => {
                log::warn!("[PDH] controller: {}", err);
                (WindowedFlow::empty(), Some(err.to_string()))
            }
            Err(err) => return Err(err),
        };

        log::debug!(
            "[PDH] controller: refresh({}, {}) -> {} points, {}",
            product,
            year_window,
            flow.series.len(),
            flow.total
        );

        Ok(ControllerOutput {
            product: product.to_string(),
            window,
            flow_variable: self.flow_variable.clone(),
            eol_lower,
            eol_upper,
            eol_average,
            cumulative_display: cumulative_display(&flow.total),
            cumulative: flow.total,
            composition,
            flow_series: flow.series,
            diagnostic,
        })
    }
}
