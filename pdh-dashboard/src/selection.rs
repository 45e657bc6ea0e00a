//! The user's current choice of product and window.
//!
//! The rendering layer owns the controls; this is the value it hands to
//! [`crate::Controller::refresh_selection`] after every change.

use crate::config::DashboardConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub product: String,
    /// Raw `[start, end]` as reported by the range selector.
    pub window: [i32; 2],
}

impl Selection {
    pub fn new(product: &str, window: [i32; 2]) -> Self {
        Self {
            product: product.to_string(),
            window,
        }
    }

    /// Startup selection: the configured default product if the catalog
    /// offers it, else the first catalog entry, over the full window.
    ///
    /// `None` when the catalog is empty.
    pub fn initial(catalog: &BTreeSet<String>, config: &DashboardConfig) -> Option<Self> {
        let product = if catalog.contains(&config.default_product) {
            config.default_product.as_str()
        } else {
            let first = catalog.iter().next()?;
            log::warn!(
                "[PDH] selection: default product '{}' not in catalog, using '{}'",
                config.default_product,
                first
            );
            first.as_str()
        };
        let bounds = config.window;
        let window = bounds
            .full()
            .map(<[i32; 2]>::from)
            .unwrap_or([bounds.min_year, bounds.max_year]);
        Some(Self::new(product, window))
    }

    pub fn with_product(mut self, product: &str) -> Self {
        self.product = product.to_string();
        self
    }

    /// Move the window, clamped to the selector bounds.
    pub fn with_window(mut self, window: [i32; 2], config: &DashboardConfig) -> Self {
        self.window = config.window.clamp(window);
        self
    }
}
