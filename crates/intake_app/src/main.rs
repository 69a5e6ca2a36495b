mod cli;
mod platform;

use clap::Parser;
use log::LevelFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    intake_logging::initialize(cli.log, level);
    platform::run(cli)
}
