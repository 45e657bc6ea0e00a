//! CSV loading for the three product sheets.
//!
//! Each loader parses one sheet's CSV text, applies the sheet's row filter,
//! and inserts the kept rows inside a single transaction.
//!
//! # Sheets
//!
//! - **Lookup** (products): `product_category_2, PRODCOM, HS6/CN6,
//!   EoL_lower_yr, EoL_upper_yr, EoL_average_yr, Mass_lower_kg,
//!   Mass_upper_kg, Mass_average_kg, Source, Source URL`. `PRODCOM` and
//!   `HS6/CN6` are optional; other columns are ignored.
//! - **Flows**: `Product, Variable, Indicator` followed by one column per
//!   year (`2010`, `2011`, ...).
//! - **Composition**: `Product, Material, Percentage` (a fraction in `[0, 1]`).
//!
//! Column identifiers are matched with all whitespace removed, so
//! `Source URL`, `SourceURL` and ` Source URL ` are the same column.
//! Cell values are trimmed.

use crate::{DataLoadError, Database, LoaderConfig};
use csv::StringRecord;
use pdh_types::{CompositionRecord, FlowRecord, ProductRecord};
use rusqlite::params;
use std::collections::HashMap;

const PRODUCT_KEY: &str = "product_category_2";
const PRODCOM: &str = "PRODCOM";
const HS6_CN6: &str = "HS6/CN6";
const EOL_LOWER: &str = "EoL_lower_yr";
const EOL_UPPER: &str = "EoL_upper_yr";
const EOL_AVERAGE: &str = "EoL_average_yr";
const MASS_LOWER: &str = "Mass_lower_kg";
const MASS_UPPER: &str = "Mass_upper_kg";
const MASS_AVERAGE: &str = "Mass_average_kg";
const SOURCE: &str = "Source";
const SOURCE_URL: &str = "Source URL";

const FLOW_PRODUCT: &str = "Product";
const FLOW_VARIABLE: &str = "Variable";
const FLOW_INDICATOR: &str = "Indicator";

const COMPOSITION_PRODUCT: &str = "Product";
const COMPOSITION_MATERIAL: &str = "Material";
const COMPOSITION_FRACTION: &str = "Percentage";

impl Database {
    /// Load the product sheet, dropping rows from the excluded source.
    ///
    /// Rows with a blank EoL cell are skipped; a non-numeric EoL value fails
    /// the load.
    pub(crate) fn load_products(
        &self,
        csv_data: &str,
        config: &LoaderConfig,
    ) -> Result<(), DataLoadError> {
        let sheet = config.sheets.products.as_str();
        let mut rdr = reader(csv_data);
        let headers = rdr.headers().map_err(|e| csv_error(sheet, e))?.clone();
        let cols = Columns::new(sheet, &headers);

        let key_idx = cols.require(PRODUCT_KEY)?;
        let eol_lower_idx = cols.require(EOL_LOWER)?;
        let eol_upper_idx = cols.require(EOL_UPPER)?;
        let eol_average_idx = cols.require(EOL_AVERAGE)?;
        let mass_lower_idx = cols.require(MASS_LOWER)?;
        let mass_upper_idx = cols.require(MASS_UPPER)?;
        let mass_average_idx = cols.require(MASS_AVERAGE)?;
        let source_idx = cols.require(SOURCE)?;
        let source_url_idx = cols.require(SOURCE_URL)?;
        let prodcom_idx = cols.optional(PRODCOM);
        let hs6_idx = cols.optional(HS6_CN6);

        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0u32;
        let mut excluded = 0u32;
        let mut skipped = 0u32;
        let mut incomplete = 0u32;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO products
                 (category_key, prodcom, hs6_cn6, eol_lower, eol_upper, eol_average,
                  mass_lower, mass_upper, mass_average, source, source_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;

            for result in rdr.records() {
                let r = result.map_err(|e| csv_error(sheet, e))?;
                let category_key = cell(&r, key_idx);
                if category_key.is_empty() {
                    skipped += 1;
                    continue;
                }

                // Filter before parsing so excluded rows cannot fail the load
                let source = cell(&r, source_idx);
                if source == config.excluded_source {
                    excluded += 1;
                    continue;
                }

                let eol_cells = [eol_lower_idx, eol_upper_idx, eol_average_idx];
                if eol_cells.iter().any(|&idx| cell(&r, idx).is_empty()) {
                    log::warn!(
                        "[PDH] loader: {} has blank EoL estimates, row skipped",
                        category_key
                    );
                    incomplete += 1;
                    continue;
                }

                let product = ProductRecord {
                    category_key: category_key.to_string(),
                    prodcom: optional_text(&r, prodcom_idx),
                    hs6_cn6: optional_text(&r, hs6_idx),
                    eol_lower: parse_required(&r, eol_lower_idx, sheet, EOL_LOWER)?,
                    eol_upper: parse_required(&r, eol_upper_idx, sheet, EOL_UPPER)?,
                    eol_average: parse_required(&r, eol_average_idx, sheet, EOL_AVERAGE)?,
                    mass_lower: parse_optional(&r, mass_lower_idx),
                    mass_upper: parse_optional(&r, mass_upper_idx),
                    mass_average: parse_optional(&r, mass_average_idx),
                    source: source.to_string(),
                    source_url: cell(&r, source_url_idx).to_string(),
                };

                if !product.lifespan().is_ordered() {
                    log::warn!(
                        "[PDH] loader: {} has EoL estimates out of order ({} / {} / {})",
                        product.category_key,
                        product.eol_lower,
                        product.eol_average,
                        product.eol_upper
                    );
                }

                stmt.execute(params![
                    product.category_key,
                    product.prodcom,
                    product.hs6_cn6,
                    product.eol_lower,
                    product.eol_upper,
                    product.eol_average,
                    product.mass_lower,
                    product.mass_upper,
                    product.mass_average,
                    product.source,
                    product.source_url,
                ])?;
                count += 1;
            }
        }
        tx.commit()?;

        log::info!(
            "[PDH] loader: Loaded {} products, excluded {} from '{}', skipped {} without key and {} with blank EoL",
            count,
            excluded,
            config.excluded_source,
            skipped,
            incomplete
        );
        Ok(())
    }

    /// Load the wide flow sheet, keeping only rows with the accepted indicator.
    ///
    /// Headers that parse as a year are year columns. Blank and non-numeric
    /// year cells are absent values: the row simply has no entry for that year.
    pub(crate) fn load_flows(
        &self,
        csv_data: &str,
        config: &LoaderConfig,
    ) -> Result<(), DataLoadError> {
        let sheet = config.sheets.flows.as_str();
        let mut rdr = reader(csv_data);
        let headers = rdr.headers().map_err(|e| csv_error(sheet, e))?.clone();
        let cols = Columns::new(sheet, &headers);

        let product_idx = cols.require(FLOW_PRODUCT)?;
        let variable_idx = cols.require(FLOW_VARIABLE)?;
        let indicator_idx = cols.require(FLOW_INDICATOR)?;
        let year_columns: Vec<(usize, i32)> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| parse_year(h).map(|year| (i, year)))
            .collect();
        if year_columns.is_empty() {
            log::warn!("[PDH] loader: sheet '{}' has no year columns", sheet);
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0u32;
        let mut filtered = 0u32;
        let mut skipped = 0u32;
        let mut values = 0u32;
        let mut blank = 0u32;
        let mut non_numeric = 0u32;
        {
            let mut insert_flow = tx.prepare(
                "INSERT INTO flows (product_key, variable, indicator) VALUES (?1, ?2, ?3)",
            )?;
            let mut insert_value = tx.prepare(
                "INSERT INTO flow_values (flow_id, year, count) VALUES (?1, ?2, ?3)",
            )?;

            for result in rdr.records() {
                let r = result.map_err(|e| csv_error(sheet, e))?;
                let product_key = cell(&r, product_idx);
                if product_key.is_empty() {
                    skipped += 1;
                    continue;
                }

                let mut flow = FlowRecord::new(
                    product_key,
                    cell(&r, variable_idx),
                    cell(&r, indicator_idx),
                );
                if !flow.has_indicator(&config.accepted_indicator) {
                    filtered += 1;
                    continue;
                }

                for &(idx, year) in &year_columns {
                    let raw = cell(&r, idx);
                    if raw.is_empty() {
                        blank += 1;
                        continue;
                    }
                    match raw.parse::<f64>() {
                        Ok(v) if v.is_finite() => {
                            flow.values.insert(year, v);
                        }
                        _ => non_numeric += 1,
                    }
                }

                insert_flow.execute(params![flow.product_key, flow.variable, flow.indicator])?;
                let flow_id = tx.last_insert_rowid();
                for (year, value) in &flow.values {
                    insert_value.execute(params![flow_id, year, value])?;
                    values += 1;
                }
                count += 1;
            }
        }
        tx.commit()?;

        if non_numeric > 0 {
            log::warn!(
                "[PDH] loader: {} non-numeric year cells in sheet '{}' treated as missing",
                non_numeric,
                sheet
            );
        }
        log::info!(
            "[PDH] loader: Loaded {} flow rows ({} yearly values, {} blank), filtered {} by indicator, skipped {} without key",
            count,
            values,
            blank,
            filtered,
            skipped
        );
        Ok(())
    }

    /// Load the composition sheet as-is, in sheet order.
    ///
    /// Rows with a blank share are skipped; a non-numeric share fails the load.
    pub(crate) fn load_compositions(
        &self,
        csv_data: &str,
        config: &LoaderConfig,
    ) -> Result<(), DataLoadError> {
        let sheet = config.sheets.composition.as_str();
        let mut rdr = reader(csv_data);
        let headers = rdr.headers().map_err(|e| csv_error(sheet, e))?.clone();
        let cols = Columns::new(sheet, &headers);

        let product_idx = cols.require(COMPOSITION_PRODUCT)?;
        let material_idx = cols.require(COMPOSITION_MATERIAL)?;
        let fraction_idx = cols.require(COMPOSITION_FRACTION)?;

        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0u32;
        let mut skipped = 0u32;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO compositions (product_key, material, fraction) VALUES (?1, ?2, ?3)",
            )?;

            for result in rdr.records() {
                let r = result.map_err(|e| csv_error(sheet, e))?;
                let product_key = cell(&r, product_idx);
                if product_key.is_empty() || cell(&r, fraction_idx).is_empty() {
                    skipped += 1;
                    continue;
                }

                let row = CompositionRecord {
                    product_key: product_key.to_string(),
                    material: cell(&r, material_idx).to_string(),
                    fraction: parse_required(&r, fraction_idx, sheet, COMPOSITION_FRACTION)?,
                };
                stmt.execute(params![row.product_key, row.material, row.fraction])?;
                count += 1;
            }
        }
        tx.commit()?;

        log::info!(
            "[PDH] loader: Loaded {} composition rows, skipped {} incomplete",
            count,
            skipped
        );
        Ok(())
    }
}

fn reader(csv_data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes())
}

fn csv_error(sheet: &str, cause: csv::Error) -> DataLoadError {
    DataLoadError::Csv {
        sheet: sheet.to_string(),
        cause,
    }
}

/// Column identifier with every whitespace character removed.
fn normalize_header(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Header positions of one sheet, keyed by normalized identifier.
struct Columns<'a> {
    sheet: &'a str,
    index: HashMap<String, usize>,
}

impl<'a> Columns<'a> {
    fn new(sheet: &'a str, headers: &StringRecord) -> Self {
        let mut index = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            // First occurrence wins on duplicate headers
            index.entry(normalize_header(header)).or_insert(i);
        }
        Self { sheet, index }
    }

    fn require(&self, column: &str) -> Result<usize, DataLoadError> {
        self.optional(column)
            .ok_or_else(|| DataLoadError::MissingColumn {
                sheet: self.sheet.to_string(),
                column: column.to_string(),
            })
    }

    fn optional(&self, column: &str) -> Option<usize> {
        self.index.get(&normalize_header(column)).copied()
    }
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("").trim()
}

fn parse_required(
    record: &StringRecord,
    idx: usize,
    sheet: &str,
    column: &str,
) -> Result<f64, DataLoadError> {
    let raw = cell(record, idx);
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataLoadError::InvalidValue {
            sheet: sheet.to_string(),
            line: record.position().map(|p| p.line()).unwrap_or(0),
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn parse_optional(record: &StringRecord, idx: usize) -> Option<f64> {
    cell(record, idx)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn optional_text(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.map(|i| cell(record, i))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The year a flow sheet header denotes, if any.
///
/// Spreadsheet exports write year headers either as `2010` or `2010.0`.
fn parse_year(header: &str) -> Option<i32> {
    let header = header.trim();
    if let Ok(year) = header.parse::<i32>() {
        return Some(year);
    }
    let value: f64 = header.parse().ok()?;
    if value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX) {
        Some(value as i32)
    } else {
        None
    }
}
