//! Single-query subcommands: one `Database` query, rendered as text or JSON.

use pdh_db::Database;
use pdh_types::YearWindow;
use serde::Serialize;
use std::fmt::Write;

fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn or_blank(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn or_blank_num(value: Option<f64>) -> String {
    value
        .map(pdh_data::lifespan::format_years)
        .unwrap_or_else(|| "-".to_string())
}

/// The product catalog, one key per line.
pub fn products(db: &Database, json: bool) -> anyhow::Result<String> {
    let catalog = db.query_available_products()?;
    if json {
        return to_json(&catalog);
    }

    let mut out = String::new();
    for key in &catalog {
        writeln!(out, "{}", key)?;
    }
    match db.query_year_range()? {
        Some((min, max)) => write!(
            out,
            "{} products, flow data {}..={}",
            catalog.len(),
            min,
            max
        )?,
        None => write!(out, "{} products, no flow data", catalog.len())?,
    }
    Ok(out)
}

/// Full product row plus the flow variables recorded for it.
pub fn product(db: &Database, key: &str, json: bool) -> anyhow::Result<String> {
    let record = db.query_product(key)?;
    let variables = db.query_flow_variables(key)?;
    if json {
        return to_json(&serde_json::json!({
            "product": record,
            "flow_variables": variables,
        }));
    }

    let mut out = String::new();
    writeln!(out, "Product:         {}", record.category_key)?;
    writeln!(out, "PRODCOM:         {}", or_blank(record.prodcom.as_deref()))?;
    writeln!(out, "HS6/CN6:         {}", or_blank(record.hs6_cn6.as_deref()))?;
    writeln!(
        out,
        "EoL (years):     {} / {} / {}",
        pdh_data::lifespan::format_years(record.eol_lower),
        pdh_data::lifespan::format_years(record.eol_upper),
        pdh_data::lifespan::format_years(record.eol_average)
    )?;
    writeln!(
        out,
        "Mass (kg):       {} / {} / {}",
        or_blank_num(record.mass_lower),
        or_blank_num(record.mass_upper),
        or_blank_num(record.mass_average)
    )?;
    writeln!(out, "Source:          {} ({})", record.source, record.source_url)?;
    if variables.is_empty() {
        write!(out, "Flow variables:  none")?;
    } else {
        write!(out, "Flow variables:  {}", variables.join(", "))?;
    }
    Ok(out)
}

pub fn lifespan(db: &Database, key: &str, json: bool) -> anyhow::Result<String> {
    let lifespan = db.query_lifespan(key)?;
    if json {
        return to_json(&lifespan);
    }
    Ok(pdh_data::lifespan::labels(&lifespan).join("\n"))
}

/// Windowed flow in millions with its cumulative total.
pub fn flow(
    db: &Database,
    key: &str,
    variable: &str,
    window: [i32; 2],
    json: bool,
) -> anyhow::Result<String> {
    let window = YearWindow::try_from(window)?;
    let flow = db.query_windowed_flow(key, variable, &window)?;
    if json {
        return to_json(&flow);
    }

    let mut out = String::new();
    writeln!(out, "{} {} {} (millions of items)", key, variable, window)?;
    for point in &flow.series {
        writeln!(out, "{}  {:.1}", point.year, point.value)?;
    }
    write!(out, "Cumulated number of products: {}", flow.total)?;
    Ok(out)
}

/// Every recorded year of a flow row, as loaded.
pub fn raw_flow(db: &Database, key: &str, variable: &str, json: bool) -> anyhow::Result<String> {
    let series = db.query_flow_series(key, variable)?;
    if json {
        return to_json(&series);
    }

    let mut out = String::new();
    writeln!(out, "{} {} (items)", key, variable)?;
    for point in &series {
        writeln!(out, "{}  {}", point.year, point.value)?;
    }
    write!(out, "{} years", series.len())?;
    Ok(out)
}

pub fn composition(db: &Database, key: &str, json: bool) -> anyhow::Result<String> {
    let breakdown = db.query_composition(key)?;
    if json {
        return to_json(&breakdown);
    }
    if breakdown.is_empty() {
        return Ok(format!("No composition data for {}", key));
    }

    let mut out = String::new();
    for share in &breakdown {
        writeln!(out, "{:<12} {:>5.1}%", share.material, share.percentage)?;
    }
    let total = pdh_data::composition::total_percentage(&breakdown);
    write!(out, "{:<12} {:>5.1}%", "Total", total)?;
    Ok(out)
}
