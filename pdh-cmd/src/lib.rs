//! Command implementations for the PDH CLI.
//!
//! Every subcommand loads the dataset once, runs one query (or one
//! controller refresh), and prints the result as text or JSON. The
//! per-command functions return the rendered output so they can be tested
//! without capturing stdout.

use clap::{Args, Subcommand};
use pdh_dashboard::{Dashboard, DashboardConfig};
use std::path::PathBuf;

pub mod query;
pub mod refresh;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct Options {
    /// Dashboard config file (JSON). Defaults apply to missing fields
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the Lookup, Flows, and Composition sheets (.csv or .csv.gz)
    #[arg(short = 'd', long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Year window arguments. Omitted ends default to the selector bounds.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct WindowArgs {
    /// First year of the window (inclusive)
    #[arg(short = 's', long)]
    pub start: Option<i32>,

    /// Last year of the window (inclusive)
    #[arg(short = 'e', long)]
    pub end: Option<i32>,
}

impl WindowArgs {
    pub fn resolve(&self, config: &DashboardConfig) -> [i32; 2] {
        [
            self.start.unwrap_or(config.window.min_year),
            self.end.unwrap_or(config.window.max_year),
        ]
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the selectable products (present in both the product and flow sheets)
    Products,

    /// Show every field of one product row
    Product {
        /// Product category name, e.g. "Laptop"
        key: String,
    },

    /// Show the end-of-life lower, upper, and average years of a product
    Lifespan {
        key: String,
    },

    /// Show a flow series restricted to a year window, with its cumulative total
    Flow {
        key: String,

        /// Flow variable; defaults to the configured one
        #[arg(long)]
        variable: Option<String>,

        #[command(flatten)]
        window: WindowArgs,

        /// Print unscaled item counts for every recorded year instead
        #[arg(long)]
        raw: bool,
    },

    /// Show the material composition of a product as percentages
    Composition {
        key: String,
    },

    /// Run one dashboard refresh, as the product selector and year slider would
    Refresh {
        /// Product to select; defaults to the configured default product
        product: Option<String>,

        #[command(flatten)]
        window: WindowArgs,

        /// Include bar chart and treemap configuration (JSON output only)
        #[arg(long)]
        charts: bool,
    },
}

/// Resolve the effective config: file (if any), then `--data-dir` on top.
pub fn load_config(options: &Options) -> anyhow::Result<DashboardConfig> {
    let mut config = match &options.config {
        Some(path) => DashboardConfig::from_path(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(dir) = &options.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

pub fn open_dashboard(options: &Options) -> anyhow::Result<Dashboard> {
    let config = load_config(options)?;
    log::info!("[PDH] cmd: loading dataset from {}", config.data_dir.display());
    Ok(Dashboard::open(config)?)
}

pub fn run(options: &Options, command: Command) -> anyhow::Result<()> {
    let dashboard = open_dashboard(options)?;
    let output = execute(&dashboard, options.json, command)?;
    println!("{}", output);
    Ok(())
}

/// Run `command` against an already opened dashboard, returning what
/// [`run`] would print.
pub fn execute(dashboard: &Dashboard, json: bool, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Products => query::products(dashboard.database(), json),
        Command::Product { key } => query::product(dashboard.database(), &key, json),
        Command::Lifespan { key } => query::lifespan(dashboard.database(), &key, json),
        Command::Flow {
            key,
            variable,
            window,
            raw,
        } => {
            let variable = variable.unwrap_or_else(|| dashboard.config().flow_variable.clone());
            if raw {
                query::raw_flow(dashboard.database(), &key, &variable, json)
            } else {
                let window = window.resolve(dashboard.config());
                query::flow(dashboard.database(), &key, &variable, window, json)
            }
        }
        Command::Composition { key } => query::composition(dashboard.database(), &key, json),
        Command::Refresh {
            product,
            window,
            charts,
        } => refresh::run_refresh(dashboard, product.as_deref(), window, json, charts),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use pdh_dashboard::{Dashboard, DashboardConfig};
    use pdh_db::MemorySource;

    pub fn fixture_dashboard() -> Dashboard {
        let source = MemorySource::new()
            .with_sheet("Lookup", include_str!("../../fixtures/Lookup.csv"))
            .with_sheet("Flows", include_str!("../../fixtures/Flows.csv"))
            .with_sheet("Composition", include_str!("../../fixtures/Composition.csv"));
        Dashboard::from_source(&source, DashboardConfig::default()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_dashboard;
    use std::io::Write;

    #[test]
    fn window_args_default_to_bounds() {
        let config = DashboardConfig::default();
        assert_eq!(WindowArgs::default().resolve(&config), [2010, 2050]);
        let args = WindowArgs {
            start: Some(2020),
            end: None,
        };
        assert_eq!(args.resolve(&config), [2020, 2050]);
    }

    #[test]
    fn data_dir_flag_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_dir": "/from/config", "default_product": "Television"}}"#).unwrap();

        let options = Options {
            config: Some(file.path().to_path_buf()),
            data_dir: Some(PathBuf::from("/from/flag")),
            json: false,
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.default_product, "Television");
    }

    #[test]
    fn open_dashboard_reports_missing_data() {
        let dir = tempfile::tempdir().unwrap();
        let options = Options {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = open_dashboard(&options).err().expect("open should fail");
        assert!(err.to_string().contains("Lookup"));
    }

    #[test]
    fn execute_dispatches_flow_with_configured_variable() {
        let dashboard = fixture_dashboard();
        let out = execute(
            &dashboard,
            false,
            Command::Flow {
                key: "Laptop".to_string(),
                variable: None,
                window: WindowArgs {
                    start: Some(2010),
                    end: Some(2011),
                },
                raw: false,
            },
        )
        .unwrap();
        assert!(out.contains("Imports"));
        assert!(out.contains("2.6M as of 2011"));
    }

    #[test]
    fn execute_propagates_lookup_errors() {
        let dashboard = fixture_dashboard();
        let err = execute(
            &dashboard,
            false,
            Command::Lifespan {
                key: "Toaster".to_string(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Toaster"));
    }
}
