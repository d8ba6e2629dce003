//! GWD CLI - Command line tool for groundwater depth analysis.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "gwd-cli",
    version,
    about = "Groundwater depth drop-off, selection, and component toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: gwd_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("gwd-cli {}", env!("CARGO_PKG_VERSION"));
    gwd_cmd::run(cli.command)
}
