//! Chart configuration handed to the renderer with each refresh.
//!
//! Data and presentation travel separately: the renderer gets a data array
//! and a config object per chart, the same split the bar chart and treemap
//! scripts expect.

use crate::controller::ControllerOutput;
use pdh_types::flow::IMPORTS;
use pdh_types::WindowBounds;
use serde_json::Value;

/// DOM id of the flow bar chart container.
pub const FLOW_CHART_ID: &str = "flow-chart";
/// DOM id of the composition treemap container.
pub const COMPOSITION_CHART_ID: &str = "composition-chart";

const FLOW_COLOR: &str = "#2196F3";

/// Bar chart config for the wired flow variable.
pub fn flow_chart_config(variable: &str) -> Value {
    let (title, y_label) = if variable == IMPORTS {
        (
            "Number of goods imported by year".to_string(),
            "Number of Items imported (in Millions)".to_string(),
        )
    } else {
        (
            format!("Number of goods by year ({})", variable),
            format!("Number of Items, {} (in Millions)", variable),
        )
    };
    serde_json::json!({
        "title": title,
        "xAxisLabel": "Year",
        "yAxisLabel": y_label,
        "yUnit": "M",
        "color": FLOW_COLOR,
    })
}

/// Treemap config. Leaves hang off a single root named after the product.
pub fn composition_chart_config(product: &str) -> Value {
    serde_json::json!({
        "title": "Product composition",
        "root": product,
        "hoverTemplate": "%{label}<br>%{value}%",
    })
}

/// Range slider settings: bounds, step, and the labelled tick marks.
pub fn window_selector_config(bounds: &WindowBounds) -> Value {
    serde_json::json!({
        "min": bounds.min_year,
        "max": bounds.max_year,
        "step": bounds.step,
        "marks": bounds.marks(),
    })
}

/// Both charts for one refresh, keyed by container id.
pub fn chart_payload(output: &ControllerOutput) -> Value {
    let flow_data: Vec<Value> = output
        .flow_series
        .iter()
        .map(|p| {
            serde_json::json!({
                "year": p.year,
                "value": p.value,
            })
        })
        .collect();

    let composition_data: Vec<Value> = output
        .composition
        .iter()
        .map(|s| {
            serde_json::json!({
                "label": s.material,
                "parent": output.product,
                "value": s.percentage,
            })
        })
        .collect();

    serde_json::json!({
        FLOW_CHART_ID: {
            "data": flow_data,
            "config": flow_chart_config(&output.flow_variable),
        },
        COMPOSITION_CHART_ID: {
            "data": composition_data,
            "config": composition_chart_config(&output.product),
        },
    })
}
