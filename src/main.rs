use anyhow::Result;
use clap::Parser;

use chorekit::cli::Cli;
use chorekit::{commands, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init()?;
    commands::run(&cli)
}
