//! `refresh`: one dashboard interaction from the command line.
//!
//! The product defaults to the startup selection and the window is clamped
//! to the selector bounds, so the output is what the dashboard would show
//! after the same clicks.

use crate::WindowArgs;
use pdh_dashboard::charts::{chart_payload, window_selector_config};
use pdh_dashboard::{ControllerOutput, Dashboard, Selection};
use std::fmt::Write;

pub fn run_refresh(
    dashboard: &Dashboard,
    product: Option<&str>,
    window: WindowArgs,
    json: bool,
    charts: bool,
) -> anyhow::Result<String> {
    let controller = dashboard.controller()?;
    let config = dashboard.config();

    let initial = match Selection::initial(controller.catalog(), config) {
        Some(selection) => selection,
        None => anyhow::bail!("no selectable products in {}", config.data_dir.display()),
    };
    let selection = match product {
        Some(key) => initial.with_product(key),
        None => initial,
    }
    .with_window(window.resolve(config), config);

    log::info!(
        "[PDH] cmd: refresh {} {:?}",
        selection.product,
        selection.window
    );
    let output = controller.refresh_selection(&selection);

    if json {
        let value = if charts {
            serde_json::json!({
                "output": output,
                "charts": chart_payload(&output),
                "window_selector": window_selector_config(&config.window),
            })
        } else {
            serde_json::to_value(&output)?
        };
        return Ok(serde_json::to_string_pretty(&value)?);
    }
    render_text(&output)
}

fn render_text(output: &ControllerOutput) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{} [{}, {}]",
        output.product, output.window[0], output.window[1]
    )?;
    if let Some(diagnostic) = &output.diagnostic {
        writeln!(out, "warning: {}", diagnostic)?;
    }
    writeln!(out, "{}", output.eol_lower)?;
    writeln!(out, "{}", output.eol_upper)?;
    writeln!(out, "{}", output.eol_average)?;
    writeln!(out, "{}", output.cumulative_display)?;

    if !output.composition.is_empty() {
        writeln!(out, "Composition:")?;
        for share in &output.composition {
            writeln!(out, "  {}: {}%", share.material, share.percentage)?;
        }
    }

    write!(out, "{} (millions):", output.flow_variable)?;
    if output.flow_series.is_empty() {
        write!(out, " none")?;
    }
    for point in &output.flow_series {
        write!(out, "\n  {}: {:.1}", point.year, point.value)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_dashboard;

    fn window(start: i32, end: i32) -> WindowArgs {
        WindowArgs {
            start: Some(start),
            end: Some(end),
        }
    }

    #[test]
    fn defaults_to_laptop_over_full_window() {
        let dashboard = fixture_dashboard();
        let out = run_refresh(&dashboard, None, WindowArgs::default(), false, false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Laptop [2010, 2050]");
        assert_eq!(lines[1], "EoL lower: 4.0");
        assert_eq!(lines[4], "Cumulated number of products: 150.0M as of 2050");
        assert_eq!(lines[5], "Composition:");
        assert_eq!(lines[6], "  Plastic: 40%");
        assert_eq!(lines[9], "Imports (millions):");
        assert_eq!(lines[10], "  2010: 1.2");
    }

    #[test]
    fn window_is_clamped_like_the_slider() {
        let dashboard = fixture_dashboard();
        let out = run_refresh(
            &dashboard,
            Some("Television"),
            window(1990, 2070),
            true,
            false,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["product"], "Television");
        assert_eq!(value["window"], serde_json::json!([2010, 2050]));
    }

    #[test]
    fn reversed_window_prints_warning() {
        let dashboard = fixture_dashboard();
        let out =
            run_refresh(&dashboard, Some("Laptop"), window(2040, 2020), false, false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].starts_with("warning: invalid window"));
        assert_eq!(lines[2], "EoL lower: n/a");
        assert!(out.ends_with("Imports (millions): none"));
    }

    #[test]
    fn missing_flow_row_keeps_other_sections() {
        let dashboard = fixture_dashboard();
        let out = run_refresh(
            &dashboard,
            Some("Microwave"),
            WindowArgs::default(),
            false,
            false,
        )
        .unwrap();
        assert!(out.contains("warning: product 'Microwave' not found in flows table"));
        assert!(out.contains("EoL average: 8.0"));
        assert!(out.contains("  Metal: 70%"));
        assert!(out.contains("Cumulated number of products: No data"));
    }

    #[test]
    fn json_with_charts_bundles_payload() {
        let dashboard = fixture_dashboard();
        let out = run_refresh(&dashboard, None, window(2010, 2011), true, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value["output"]["cumulative_display"],
            "Cumulated number of products: 2.6M as of 2011"
        );
        assert_eq!(
            value["charts"]["flow-chart"]["config"]["title"],
            "Number of goods imported by year"
        );
        assert_eq!(value["charts"]["composition-chart"]["data"][2]["label"], "Glass");
        assert_eq!(value["window_selector"]["marks"][1], 2015);
    }
}
