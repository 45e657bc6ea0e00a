//! PDH CLI - Command line tool for the product lifespan, flow, and composition dataset.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "pdh-cli",
    version,
    about = "Product datahub toolkit: lifespans, import flows, and material composition"
)]
struct Cli {
    #[command(flatten)]
    options: pdh_cmd::Options,

    #[command(subcommand)]
    command: pdh_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[PDH] cli: starting");
    pdh_cmd::run(&cli.options, cli.command)
}
