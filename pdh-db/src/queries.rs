//! Typed read-only queries over the loaded product tables.
//!
//! # First-match policy
//!
//! Neither the product sheet nor the flow sheet guarantees one row per key.
//! When several rows match, the row loaded first (lowest `row_id` /
//! `flow_id`) is used and a warning is logged; the other rows are ignored.

use crate::error::{DatahubError, Result};
use crate::Database;
use pdh_data::{composition, flow};
use pdh_types::{
    CompositionRecord, Lifespan, MaterialShare, ProductRecord, WindowedFlow, YearValue,
    YearWindow,
};
use rusqlite::params;
use std::collections::BTreeSet;

impl Database {
    // ───────────────────── Catalog ─────────────────────

    /// Products that have both a product row and at least one kept flow row.
    ///
    /// This is the only list offered to the product selector.
    pub fn query_available_products(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT category_key FROM products
             INTERSECT
             SELECT product_key FROM flows",
        )?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<BTreeSet<_>, _>>()?;
        log::info!(
            "[PDH] query: query_available_products returned {} products",
            rows.len()
        );
        Ok(rows)
    }

    // ───────────────────── Products ─────────────────────

    /// The full product row for `key` (first match).
    pub fn query_product(&self, key: &str) -> Result<ProductRecord> {
        let mut stmt = self.conn.prepare(
            "SELECT category_key, prodcom, hs6_cn6, eol_lower, eol_upper, eol_average,
                    mass_lower, mass_upper, mass_average, source, source_url
             FROM products
             WHERE category_key = ?1
             ORDER BY row_id",
        )?;
        let mut rows = stmt
            .query_map(params![key], |row| {
                Ok(ProductRecord {
                    category_key: row.get(0)?,
                    prodcom: row.get(1)?,
                    hs6_cn6: row.get(2)?,
                    eol_lower: row.get(3)?,
                    eol_upper: row.get(4)?,
                    eol_average: row.get(5)?,
                    mass_lower: row.get(6)?,
                    mass_upper: row.get(7)?,
                    mass_average: row.get(8)?,
                    source: row.get(9)?,
                    source_url: row.get(10)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if rows.len() > 1 {
            log::warn!(
                "[PDH] query: {} product rows share key '{}', using the first",
                rows.len(),
                key
            );
        }
        if rows.is_empty() {
            return Err(DatahubError::not_found(key, "products"));
        }
        Ok(rows.swap_remove(0))
    }

    /// Lower, upper and average end-of-life estimates for `key`.
    pub fn query_lifespan(&self, key: &str) -> Result<Lifespan> {
        let lifespan = self.query_product(key)?.lifespan();
        log::debug!("[PDH] query: query_lifespan({}) = {:?}", key, lifespan);
        Ok(lifespan)
    }

    // ───────────────────── Flows ─────────────────────

    /// Flow variables recorded for `key`, in sheet order. Empty if none.
    pub fn query_flow_variables(&self, key: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT variable FROM flows
             WHERE product_key = ?1
             GROUP BY variable
             ORDER BY MIN(flow_id)",
        )?;
        let rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every recorded year of the (`key`, `variable`) flow row, unscaled,
    /// ascending by year.
    pub fn query_flow_series(&self, key: &str, variable: &str) -> Result<Vec<YearValue>> {
        let flow_id = self.first_flow_id(key, variable)?;
        let mut stmt = self.conn.prepare(
            "SELECT year, count FROM flow_values
             WHERE flow_id = ?1
             ORDER BY year",
        )?;
        let rows = stmt
            .query_map(params![flow_id], |row| {
                Ok(YearValue {
                    year: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        log::info!(
            "[PDH] query: query_flow_series returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// The (`key`, `variable`) flow restricted to `window`, scaled to
    /// millions, with its cumulative total.
    ///
    /// A window that overlaps no recorded year is not an error: it yields
    /// [`WindowedFlow::empty`]. A product without such a flow row is
    /// [`DatahubError::ProductNotFound`].
    pub fn query_windowed_flow(
        &self,
        key: &str,
        variable: &str,
        window: &YearWindow,
    ) -> Result<WindowedFlow> {
        let flow_id = self.first_flow_id(key, variable)?;
        let mut stmt = self.conn.prepare(
            "SELECT year, count FROM flow_values
             WHERE flow_id = ?1 AND year >= ?2 AND year <= ?3
             ORDER BY year",
        )?;
        let points = stmt
            .query_map(params![flow_id, window.start(), window.end()], |row| {
                Ok(YearValue {
                    year: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        log::info!(
            "[PDH] query: query_windowed_flow({}, {}, {}) returned {} records",
            key,
            variable,
            window,
            points.len()
        );
        Ok(flow::summarize_window(&points, window))
    }

    /// The (min, max) year with a recorded flow value across all rows.
    ///
    /// `None` when no flow values were loaded.
    pub fn query_year_range(&self) -> Result<Option<(i32, i32)>> {
        let range = self.conn.query_row(
            "SELECT MIN(year), MAX(year) FROM flow_values",
            [],
            |row| Ok((row.get::<_, Option<i32>>(0)?, row.get::<_, Option<i32>>(1)?)),
        )?;
        Ok(match range {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        })
    }

    fn first_flow_id(&self, key: &str, variable: &str) -> Result<i64> {
        let mut stmt = self.conn.prepare(
            "SELECT flow_id FROM flows
             WHERE product_key = ?1 AND variable = ?2
             ORDER BY flow_id",
        )?;
        let ids = stmt
            .query_map(params![key, variable], |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match ids.as_slice() {
            [] => Err(DatahubError::not_found(key, "flows")),
            [id] => Ok(*id),
            [id, ..] => {
                log::warn!(
                    "[PDH] query: {} flow rows for ({}, {}), using the first",
                    ids.len(),
                    key,
                    variable
                );
                Ok(*id)
            }
        }
    }

    // ───────────────────── Composition ─────────────────────

    /// Material shares of `key` as percentages, in sheet order.
    ///
    /// Empty when the product has no composition rows.
    pub fn query_composition(&self, key: &str) -> Result<Vec<MaterialShare>> {
        let mut stmt = self.conn.prepare(
            "SELECT product_key, material, fraction FROM compositions
             WHERE product_key = ?1
             ORDER BY row_id",
        )?;
        let rows = stmt
            .query_map(params![key], |row| {
                Ok(CompositionRecord {
                    product_key: row.get(0)?,
                    material: row.get(1)?,
                    fraction: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        log::info!(
            "[PDH] query: query_composition returned {} records",
            rows.len()
        );
        Ok(composition::normalize(&rows))
    }
}
